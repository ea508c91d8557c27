//! Main Iced application for the body measurement analyzer GUI.

use std::path::PathBuf;

use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, image as iced_image, row,
    scrollable, text, text_input, toggler, vertical_space,
};
use iced::{Element, Length, Task, Theme};

use crate::analysis::{analyze_image, AnalysisConfig, AnalysisResult};
use crate::measure::MeasurementOutcome;
use crate::settings::AppSettings;

use super::logger::Logger;

/// Current view/tab of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    Settings,
    Logs,
}

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Idle,
    Analyzing,
}

/// One row of the results table.
#[derive(Debug, Clone)]
struct ResultRow {
    category: String,
    label: String,
    value: String,
}

/// Messages for the Iced application.
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    SwitchView(View),

    // Image selection
    PickImage,
    ImagePicked(Option<PathBuf>),

    // Analysis
    EyeDistanceChanged(String),
    Analyze,
    AnalysisCompleted(Result<AnalysisResult, String>),

    // Settings - API
    BaseUrlChanged(String),
    ApiKeyChanged(String),
    WorkspaceChanged(String),
    WorkflowIdChanged(String),

    // Settings - Defaults
    DefaultEyeDistanceChanged(String),
    SaveProcessedToggled(bool),

    // Settings actions
    SaveSettings,
    ResetSettings,
    SettingsSaved(Result<(), String>),

    // Logs
    ClearLogs,
}

/// Main application struct.
pub struct BodyMeasureApp {
    // Current view
    view: View,

    // Settings
    settings: AppSettings,

    // Input fields as strings
    eye_distance_input: String,
    default_eye_input: String,

    // Selected image
    image_path: Option<PathBuf>,
    original_image: Option<iced_image::Handle>,
    processed_image: Option<iced_image::Handle>,

    // Last analysis output
    result_rows: Vec<ResultRow>,
    keypoints_text: String,

    // Application state
    state: AppState,

    // Logger
    logger: Logger,

    // Status message
    status: String,
}

impl Default for BodyMeasureApp {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyMeasureApp {
    /// Create a new application instance.
    pub fn new() -> Self {
        let mut settings = AppSettings::load();
        settings.apply_env_overrides();
        let mut logger = Logger::new();
        logger.info("Body Measurement Analyzer started");

        Self {
            view: View::Main,
            eye_distance_input: settings.eye_distance_cm.to_string(),
            default_eye_input: settings.eye_distance_cm.to_string(),
            settings,
            image_path: None,
            original_image: None,
            processed_image: None,
            result_rows: Vec::new(),
            keypoints_text: String::new(),
            state: AppState::Idle,
            logger,
            status: "Ready".to_string(),
        }
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        "Body Measurement Analyzer".to_string()
    }

    /// Get the theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Update the application state based on messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Navigation
            Message::SwitchView(view) => {
                self.view = view;
                Task::none()
            }

            // Image selection
            Message::PickImage => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Image", &["jpg", "jpeg", "png", "bmp", "gif", "tiff"])
                        .set_title("Select Image")
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::ImagePicked,
            ),
            Message::ImagePicked(path) => {
                if let Some(path) = path {
                    self.logger
                        .info(format!("Image loaded: {}", path.display()));
                    self.status = format!(
                        "Image loaded: {}",
                        path.file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default()
                    );
                    self.original_image = Some(iced_image::Handle::from_path(&path));
                    self.processed_image = None;
                    self.image_path = Some(path);
                }
                Task::none()
            }

            // Analysis
            Message::EyeDistanceChanged(value) => {
                self.eye_distance_input = value;
                Task::none()
            }
            Message::Analyze => {
                let Some(path) = self.image_path.clone() else {
                    self.logger.warning("Please select an image first");
                    return Task::none();
                };

                let eye_distance_cm: f64 = match self.eye_distance_input.trim().parse() {
                    Ok(v) if v > 0.0 => v,
                    _ => {
                        self.logger
                            .warning("Please enter a valid positive eye distance in cm");
                        return Task::none();
                    }
                };

                self.state = AppState::Analyzing;
                self.status = "Analyzing image...".to_string();
                self.logger.info(format!(
                    "Analyzing {} (eye distance {} cm)",
                    path.display(),
                    eye_distance_cm
                ));

                let config = AnalysisConfig {
                    detector: self.settings.detector_config(),
                    eye_distance_cm,
                };

                Task::perform(
                    async move {
                        analyze_image(&config, &path)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::AnalysisCompleted,
                )
            }
            Message::AnalysisCompleted(result) => {
                self.state = AppState::Idle;
                match result {
                    Ok(result) => self.apply_analysis(result),
                    Err(e) => {
                        self.logger.error(format!("Analysis failed: {}", e));
                        self.status = format!("Analysis failed: {}", e);
                    }
                }
                Task::none()
            }

            // Settings - API
            Message::BaseUrlChanged(value) => {
                self.settings.base_url = value;
                Task::none()
            }
            Message::ApiKeyChanged(value) => {
                self.settings.api_key = value;
                Task::none()
            }
            Message::WorkspaceChanged(value) => {
                self.settings.workspace = value;
                Task::none()
            }
            Message::WorkflowIdChanged(value) => {
                self.settings.workflow_id = value;
                Task::none()
            }

            // Settings - Defaults
            Message::DefaultEyeDistanceChanged(value) => {
                self.default_eye_input = value.clone();
                if let Ok(v) = value.parse::<f64>() {
                    if v > 0.0 {
                        self.settings.eye_distance_cm = v;
                    }
                }
                Task::none()
            }
            Message::SaveProcessedToggled(enabled) => {
                self.settings.save_processed = enabled;
                Task::none()
            }

            // Settings actions
            Message::SaveSettings => {
                let settings = self.settings.clone();
                Task::perform(async move { settings.save() }, Message::SettingsSaved)
            }
            Message::ResetSettings => {
                self.settings = AppSettings::default();
                self.default_eye_input = self.settings.eye_distance_cm.to_string();
                self.logger.info("Settings reset to defaults");
                Task::none()
            }
            Message::SettingsSaved(result) => {
                match result {
                    Ok(()) => {
                        self.logger.success("Settings saved");
                        self.status = "Settings saved".to_string();
                    }
                    Err(e) => {
                        self.logger.error(format!("Failed to save settings: {}", e));
                        self.status = format!("Save failed: {}", e);
                    }
                }
                Task::none()
            }

            // Logs
            Message::ClearLogs => {
                self.logger.clear();
                self.logger.info("Logs cleared");
                Task::none()
            }
        }
    }

    /// Fold a finished analysis into the display state.
    fn apply_analysis(&mut self, result: AnalysisResult) {
        self.result_rows = result
            .report
            .entries()
            .iter()
            .map(|entry| ResultRow {
                category: entry.category.as_str().to_string(),
                label: entry.kind.label(),
                value: match &entry.outcome {
                    MeasurementOutcome::Centimeters(v) => format!("{:.1} cm", v),
                    MeasurementOutcome::Unavailable(e) => format!("unavailable ({})", e),
                },
            })
            .collect();

        let mut lines = vec![format!(
            "Scale: eye distance {:.1} px -> {:.4} cm/px",
            result.eye_distance_px,
            result.scale.cm_per_px()
        )];
        lines.push("Detected keypoints:".to_string());
        for (i, kp) in result.raw_keypoints.iter().enumerate() {
            lines.push(format!(
                "{}. {}: ({:.0}, {:.0}) [conf {:.3}]",
                i + 1,
                crate::keypoint::Landmark::from_class_name(&kp.class_name)
                    .map(|lm| lm.name().to_string())
                    .unwrap_or_else(|| kp.class_name.clone()),
                kp.x,
                kp.y,
                kp.confidence
            ));
        }
        self.keypoints_text = lines.join("\n");

        if let Some(png) = &result.processed_png {
            if self.settings.save_processed {
                if let Err(e) = std::fs::write(&self.settings.processed_path, png) {
                    self.logger
                        .warning(format!("Could not save processed image: {}", e));
                }
            }
            self.processed_image = Some(iced_image::Handle::from_bytes(png.clone()));
        }

        self.logger.success(format!(
            "Analysis complete: {}/{} measurements available",
            result.report.available_count(),
            result.report.entries().len()
        ));
        self.status = "Analysis complete".to_string();
    }

    /// Build the view.
    pub fn view(&self) -> Element<'_, Message> {
        let content = match self.view {
            View::Main => self.view_main(),
            View::Settings => self.view_settings(),
            View::Logs => self.view_logs(),
        };

        let nav_bar = self.view_nav_bar();
        let status_bar = self.view_status_bar();

        column![nav_bar, content, status_bar]
            .spacing(10)
            .padding(20)
            .into()
    }

    /// Navigation bar.
    fn view_nav_bar(&self) -> Element<'_, Message> {
        let main_btn = button(text("📏 Analyze"))
            .on_press(Message::SwitchView(View::Main))
            .style(if self.view == View::Main {
                button::primary
            } else {
                button::secondary
            });

        let settings_btn = button(text("⚙️ Settings"))
            .on_press(Message::SwitchView(View::Settings))
            .style(if self.view == View::Settings {
                button::primary
            } else {
                button::secondary
            });

        let logs_btn = button(text("📋 Logs"))
            .on_press(Message::SwitchView(View::Logs))
            .style(if self.view == View::Logs {
                button::primary
            } else {
                button::secondary
            });

        row![main_btn, settings_btn, logs_btn].spacing(10).into()
    }

    /// Status bar.
    fn view_status_bar(&self) -> Element<'_, Message> {
        let state_text = match self.state {
            AppState::Idle => "🟢 Ready",
            AppState::Analyzing => "🔵 Analyzing",
        };

        row![
            text(state_text).size(14),
            horizontal_space(),
            text(&self.status).size(14),
        ]
        .padding(10)
        .into()
    }

    /// Main view with image selection, calibration input and results.
    fn view_main(&self) -> Element<'_, Message> {
        let pick_btn = button(text("🖼 Select Image").size(16))
            .on_press(Message::PickImage)
            .padding([10, 20]);

        let file_label = text(
            self.image_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No image selected".to_string()),
        )
        .size(14);

        let eye_input = text_input("Eye distance (cm)", &self.eye_distance_input)
            .on_input(Message::EyeDistanceChanged)
            .padding(10)
            .size(16)
            .width(160);

        let analyze_btn = if self.state == AppState::Idle {
            button(text("▶️ Analyze").size(16))
                .on_press(Message::Analyze)
                .style(button::success)
                .padding([10, 20])
        } else {
            button(text("⏳ Working...").size(16)).padding([10, 20])
        };

        let controls = row![pick_btn, file_label, horizontal_space(), eye_input, analyze_btn]
            .spacing(10);

        let results = container(scrollable(self.view_results_table()))
            .width(Length::FillPortion(2))
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        let images = container(scrollable(self.view_images()))
            .width(Length::FillPortion(3))
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        let body = row![results, images].spacing(10).height(Length::Fill);

        column![controls, vertical_space().height(10), body]
            .spacing(5)
            .height(Length::Fill)
            .into()
    }

    /// Measurement results table plus detected keypoint listing.
    fn view_results_table(&self) -> Element<'_, Message> {
        let mut table = column![row![
            text("Category").size(14).width(90),
            text("Measurement").size(14).width(180),
            text("Value").size(14),
        ]
        .spacing(10)]
        .spacing(4);

        if self.result_rows.is_empty() {
            table = table.push(text("No measurements yet").size(13));
        }

        for row_data in &self.result_rows {
            table = table.push(
                row![
                    text(&row_data.category).size(13).width(90),
                    text(&row_data.label).size(13).width(180),
                    text(&row_data.value).size(13),
                ]
                .spacing(10),
            );
        }

        let mut content = column![text("📊 Results").size(16), table].spacing(10);

        if !self.keypoints_text.is_empty() {
            content = content
                .push(horizontal_rule(1))
                .push(text(&self.keypoints_text).size(12));
        }

        content.into()
    }

    /// Original and processed image panes.
    fn view_images(&self) -> Element<'_, Message> {
        let original: Element<'_, Message> = match &self.original_image {
            Some(handle) => iced_image(handle.clone()).width(Length::Fill).into(),
            None => text("No image selected").size(13).into(),
        };

        let processed: Element<'_, Message> = match &self.processed_image {
            Some(handle) => iced_image(handle.clone()).width(Length::Fill).into(),
            None => text("No processed image").size(13).into(),
        };

        column![
            text("Original Image").size(16),
            original,
            vertical_space().height(10),
            text("Processed Image").size(16),
            processed,
        ]
        .spacing(5)
        .into()
    }

    /// Settings view.
    fn view_settings(&self) -> Element<'_, Message> {
        let title = text("⚙️ Settings").size(28);

        let api_section = column![
            text("Detection API").size(18),
            text_input("Base URL", &self.settings.base_url)
                .on_input(Message::BaseUrlChanged)
                .padding(8),
            text_input("API key", &self.settings.api_key)
                .on_input(Message::ApiKeyChanged)
                .secure(true)
                .padding(8),
            text_input("Workspace", &self.settings.workspace)
                .on_input(Message::WorkspaceChanged)
                .padding(8),
            text_input("Workflow id", &self.settings.workflow_id)
                .on_input(Message::WorkflowIdChanged)
                .padding(8),
        ]
        .spacing(8);

        let defaults_section = column![
            text("Defaults").size(18),
            row![
                text("Eye distance (cm)").size(14).width(160),
                text_input("6.3", &self.default_eye_input)
                    .on_input(Message::DefaultEyeDistanceChanged)
                    .padding(8)
                    .width(120),
            ]
            .spacing(10),
            row![
                text("Save processed image").size(14).width(160),
                toggler(self.settings.save_processed)
                    .on_toggle(Message::SaveProcessedToggled),
            ]
            .spacing(10),
        ]
        .spacing(8);

        let actions = row![
            button(text("💾 Save"))
                .on_press(Message::SaveSettings)
                .style(button::success)
                .padding([8, 16]),
            button(text("↩️ Reset"))
                .on_press(Message::ResetSettings)
                .style(button::danger)
                .padding([8, 16]),
        ]
        .spacing(10);

        scrollable(
            column![
                title,
                vertical_space().height(10),
                api_section,
                horizontal_rule(1),
                defaults_section,
                horizontal_rule(1),
                actions,
            ]
            .spacing(15),
        )
        .height(Length::Fill)
        .into()
    }

    /// Logs view.
    fn view_logs(&self) -> Element<'_, Message> {
        let title = text("📋 Logs").size(28);

        let clear_btn = button(text("🗑 Clear"))
            .on_press(Message::ClearLogs)
            .padding([8, 16]);

        let log_view = scrollable(text(self.logger.format_all()).size(13)).height(Length::Fill);

        let log_container = container(log_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        let file_hint = self
            .logger
            .log_file_path()
            .map(|p| format!("Session log: {}", p.display()))
            .unwrap_or_else(|| "Session log unavailable".to_string());

        column![
            row![title, horizontal_space(), clear_btn],
            log_container,
            text(file_hint).size(12),
        ]
        .spacing(10)
        .height(Length::Fill)
        .into()
    }
}
