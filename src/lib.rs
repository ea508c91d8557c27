//! # Body Measurement Analyzer
//!
//! Desktop utility that sends a photograph to a hosted keypoint-detection
//! workflow, receives anatomical landmark coordinates, and converts pixel
//! distances into centimeter measurements using a user-supplied eye-distance
//! calibration.
//!
//! The detection intelligence lives entirely in the remote model; this crate
//! is a thin client (`detect`), a pure measurement core (`measure`), and a
//! presentation layer (`gui` plus the CLI binary).
//!
//! ## Example
//!
//! ```rust,no_run
//! use body_measure::analysis::{analyze_image, AnalysisConfig};
//! use body_measure::detect::DetectorConfig;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalysisConfig {
//!         detector: DetectorConfig::default()
//!             .with_api_key("...")
//!             .with_workspace("my-workspace")
//!             .with_workflow_id("body-keypoints"),
//!         eye_distance_cm: 6.5,
//!     };
//!
//!     let result = analyze_image(&config, Path::new("photo.jpg")).await?;
//!     for entry in result.report.entries() {
//!         println!("{}: {:?}", entry.kind.label(), entry.outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod annotate;
pub mod detect;
pub mod gui;
pub mod keypoint;
pub mod measure;
pub mod settings;

pub use analysis::{
    analyze_bytes, analyze_image, calibrate_and_measure, AnalysisConfig, AnalysisError,
    AnalysisResult,
};
pub use detect::{Detection, DetectError, DetectorClient, DetectorConfig};
pub use keypoint::{Keypoint, KeypointSet, Landmark, Side};
pub use measure::{
    compute_report, MeasureError, MeasurementKind, MeasurementOutcome, MeasurementReport, Scale,
};
pub use settings::AppSettings;
