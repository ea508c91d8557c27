//! One-shot analysis pipeline: photo in, measurement report out.
//!
//! Each invocation loads the image, runs one remote detection call, calibrates
//! against the detected eye distance, and computes the measurement catalog.
//! All intermediate state is local to the call; nothing survives between runs.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

use crate::annotate::{annotate_keypoints, encode_png};
use crate::detect::{DetectError, DetectorClient, DetectorConfig, RawKeypoint, Visualization};
use crate::keypoint::{KeypointSet, Landmark, Side};
use crate::measure::{compute_report, MeasureError, MeasurementReport, Scale};

/// Analysis errors. Calibration failures surface the measurement error
/// directly so the interface can show an actionable message.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Detection failed: {0}")]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error("Failed to load image: {0}")]
    Image(String),
}

/// Configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Detection workflow settings.
    pub detector: DetectorConfig,
    /// User-entered real-world eye distance in centimeters.
    pub eye_distance_cm: f64,
}

/// Everything one analysis run produces. Value types only; discarded after
/// display.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub keypoints: KeypointSet,
    pub raw_keypoints: Vec<RawKeypoint>,
    pub scale: Scale,
    pub eye_distance_px: f64,
    pub report: MeasurementReport,
    /// PNG bytes of the processed image (workflow visualization when present,
    /// local annotation otherwise).
    pub processed_png: Option<Vec<u8>>,
}

/// Calibrate against the detected eye pair and compute the measurement
/// catalog.
///
/// A calibration failure returns before any measurement is attempted; a
/// keypoint set with both eyes but other landmarks missing yields a partial
/// report instead of an error.
pub fn calibrate_and_measure(
    keypoints: &KeypointSet,
    eye_distance_cm: f64,
) -> Result<(Scale, MeasurementReport), MeasureError> {
    let scale = Scale::from_eye_distance(keypoints, eye_distance_cm)?;
    Ok((scale, compute_report(keypoints, scale)))
}

/// Run a full analysis on an image file.
pub async fn analyze_image(
    config: &AnalysisConfig,
    path: &Path,
) -> Result<AnalysisResult, AnalysisError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AnalysisError::Image(format!("{}: {}", path.display(), e)))?;
    analyze_bytes(config, &bytes).await
}

/// Run a full analysis on in-memory image bytes.
pub async fn analyze_bytes(
    config: &AnalysisConfig,
    image_bytes: &[u8],
) -> Result<AnalysisResult, AnalysisError> {
    let client = DetectorClient::new(config.detector.clone());
    let detection = client.detect_base64(&STANDARD.encode(image_bytes)).await?;

    // Calibration failure aborts the run; no measurement can be scaled.
    let (scale, report) = calibrate_and_measure(&detection.keypoints, config.eye_distance_cm)?;
    let eye_distance_px = detection
        .keypoints
        .segment_px(Landmark::eye(Side::Left), Landmark::eye(Side::Right))
        .unwrap_or(0.0);
    tracing::info!(
        available = report.available_count(),
        total = report.entries().len(),
        cm_per_px = scale.cm_per_px(),
        "measurement report computed"
    );

    let processed_png = match detection.visualization {
        Some(Visualization::Inline(bytes)) => Some(bytes),
        Some(Visualization::Remote(url)) => match client.fetch_visualization(&url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("failed to fetch workflow visualization: {}", e);
                annotate_locally(image_bytes, &detection.keypoints)
            }
        },
        None => annotate_locally(image_bytes, &detection.keypoints),
    };

    Ok(AnalysisResult {
        keypoints: detection.keypoints,
        raw_keypoints: detection.raw_keypoints,
        scale,
        eye_distance_px,
        report,
        processed_png,
    })
}

fn annotate_locally(image_bytes: &[u8], keypoints: &KeypointSet) -> Option<Vec<u8>> {
    let image = match image::load_from_memory(image_bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!("could not decode source image for annotation: {}", e);
            return None;
        }
    };
    encode_png(&annotate_keypoints(&image, keypoints)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;

    #[test]
    fn test_eyeless_detection_yields_no_measurements() {
        // Shoulders and hips alone could support a partial report, but with no
        // eye pair there is no scale, so calibration fails first.
        let mut keypoints = KeypointSet::new();
        keypoints.insert(Landmark::LeftShoulder, Keypoint::new(180.0, 300.0, 0.9));
        keypoints.insert(Landmark::RightShoulder, Keypoint::new(60.0, 300.0, 0.9));
        keypoints.insert(Landmark::LeftHip, Keypoint::new(160.0, 600.0, 0.9));
        keypoints.insert(Landmark::RightHip, Keypoint::new(80.0, 600.0, 0.9));

        match calibrate_and_measure(&keypoints, 6.5) {
            Err(MeasureError::InvalidCalibrationInput(_)) => {}
            other => panic!("expected InvalidCalibrationInput, got {:?}", other),
        }
    }

    #[test]
    fn test_eye_pair_calibrates_and_reports() {
        let mut keypoints = KeypointSet::new();
        keypoints.insert(Landmark::LeftEye, Keypoint::new(140.0, 200.0, 0.9));
        keypoints.insert(Landmark::RightEye, Keypoint::new(100.0, 200.0, 0.9));

        let (scale, report) = calibrate_and_measure(&keypoints, 6.5).unwrap();
        assert!((scale.cm_per_px() - 0.1625).abs() < 1e-12);
        // Eyes alone support no catalog entry, but the report still exists
        // with every entry marked unavailable.
        assert_eq!(report.available_count(), 0);
        assert!(!report.entries().is_empty());
    }
}
