//! Calibration and body measurement computation.
//!
//! The calibration unit derives a centimeters-per-pixel scale factor from the
//! detected eye keypoints and a user-supplied real eye distance. The
//! measurement unit applies that scale to a declarative catalog of named
//! segments and anatomical-proportion estimates. Everything here is pure
//! arithmetic over the keypoint set; no I/O.

mod calibration;
mod catalog;

use thiserror::Error;

use crate::keypoint::Landmark;

pub use calibration::Scale;
pub use catalog::{
    catalog, compute_report, Category, MeasurementKind, MeasurementOutcome, MeasurementReport,
    MeasurementSpec, ReportEntry, Rule, HAND_TO_FOREARM_RATIO, HEAD_TOP_TO_EYE_RATIO,
};

/// Measurement errors.
///
/// Calibration errors abort the whole analysis; `MissingKeypoint` and
/// `MissingReference` are raised per measurement and never fail the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Invalid calibration input: {0}")]
    InvalidCalibrationInput(String),
    #[error("Degenerate calibration: eye keypoints coincide")]
    DegenerateCalibration,
    #[error("Missing keypoint: {0}")]
    MissingKeypoint(Landmark),
    /// A proportion estimate referenced a measurement the catalog never
    /// produced.
    #[error("Unavailable reference measurement: {}", .0.label())]
    MissingReference(MeasurementKind),
}
