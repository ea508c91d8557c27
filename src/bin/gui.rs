//! GUI entry point for the body measurement analyzer.
//!
//! Run with: cargo run --bin body-measure-gui

use iced::Size;

use body_measure::gui::BodyMeasureApp;

fn main() -> iced::Result {
    // Credentials may come from a .env file, same as the CLI.
    let _ = dotenvy::dotenv();

    iced::application(
        BodyMeasureApp::title,
        BodyMeasureApp::update,
        BodyMeasureApp::view,
    )
    .theme(BodyMeasureApp::theme)
    .window_size(Size::new(1400.0, 800.0))
    .run_with(|| (BodyMeasureApp::new(), iced::Task::none()))
}
