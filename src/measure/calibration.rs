//! Pixel-to-centimeter calibration from the eye-distance reference.

use crate::keypoint::{KeypointSet, Landmark, Side};

use super::MeasureError;

/// Eye keypoints closer than this many pixels are treated as coincident.
const MIN_REFERENCE_PX: f64 = 1e-6;

/// Centimeters-per-pixel scale factor for one analysis run.
///
/// Invariant: the factor is strictly positive and finite. Construction fails
/// otherwise, so downstream measurement code never has to re-validate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    cm_per_px: f64,
}

impl Scale {
    /// Build a scale factor from a real-world reference distance and its
    /// measured pixel distance: `cm_per_px = real_cm / pixel_distance`.
    pub fn new(real_cm: f64, pixel_distance: f64) -> Result<Self, MeasureError> {
        if !real_cm.is_finite() || real_cm <= 0.0 {
            return Err(MeasureError::InvalidCalibrationInput(format!(
                "eye distance must be a positive number, got {}",
                real_cm
            )));
        }
        if !pixel_distance.is_finite() {
            return Err(MeasureError::InvalidCalibrationInput(format!(
                "reference pixel distance is not finite: {}",
                pixel_distance
            )));
        }
        if pixel_distance.abs() < MIN_REFERENCE_PX {
            return Err(MeasureError::DegenerateCalibration);
        }
        Ok(Self {
            cm_per_px: real_cm / pixel_distance,
        })
    }

    /// Calibrate against the two detected eye keypoints.
    ///
    /// Fails with `InvalidCalibrationInput` when either eye is absent from the
    /// detection result, with `DegenerateCalibration` when the eyes coincide.
    pub fn from_eye_distance(keypoints: &KeypointSet, real_cm: f64) -> Result<Self, MeasureError> {
        let left = keypoints.get(Landmark::eye(Side::Left)).ok_or_else(|| {
            MeasureError::InvalidCalibrationInput("left eye keypoint not detected".to_string())
        })?;
        let right = keypoints.get(Landmark::eye(Side::Right)).ok_or_else(|| {
            MeasureError::InvalidCalibrationInput("right eye keypoint not detected".to_string())
        })?;

        Self::new(real_cm, left.distance_to(right))
    }

    /// The scale factor in centimeters per pixel.
    pub fn cm_per_px(&self) -> f64 {
        self.cm_per_px
    }

    /// Convert a pixel distance to centimeters.
    pub fn to_cm(&self, pixel_distance: f64) -> f64 {
        pixel_distance * self.cm_per_px
    }
}
