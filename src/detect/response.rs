//! Parsing of the workflow response payload.
//!
//! The serverless workflow returns a list of outputs; the first carries the
//! nested person detections with their keypoint lists, plus an optional
//! rendered visualization. The visualization arrives in one of three shapes
//! depending on workflow configuration: a `data:image/...` URI, bare base64,
//! or an HTTP URL.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::Value;

use crate::keypoint::{Keypoint, KeypointSet, Landmark};

use super::DetectError;

/// A keypoint exactly as reported by the workflow, before landmark mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct RawKeypoint {
    pub class_id: i64,
    #[serde(rename = "class")]
    pub class_name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub confidence: f64,
}

/// Rendered keypoint visualization from the workflow, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    /// Decoded image bytes delivered inline.
    Inline(Vec<u8>),
    /// URL the image must be fetched from.
    Remote(String),
}

/// Parsed detection result for one image.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Keypoints mapped onto the landmark vocabulary.
    pub keypoints: KeypointSet,
    /// Raw keypoints in class-id order, for display.
    pub raw_keypoints: Vec<RawKeypoint>,
    /// Workflow-rendered visualization, when the workflow provides one.
    pub visualization: Option<Visualization>,
}

/// Parse the workflow response body.
///
/// Keypoints with class names outside the known vocabulary are kept in
/// `raw_keypoints` but do not enter the landmark set.
pub fn parse_workflow_response(body: &Value) -> Result<Detection, DetectError> {
    let first = body
        .get("outputs")
        .and_then(Value::as_array)
        .and_then(|outputs| outputs.first())
        .or_else(|| body.as_array().and_then(|outputs| outputs.first()))
        .ok_or_else(|| DetectError::ParseError("response has no outputs".to_string()))?;

    let mut raw_keypoints = extract_keypoints(first)?;
    raw_keypoints.sort_by_key(|kp| kp.class_id);

    let keypoints = raw_keypoints
        .iter()
        .filter_map(|kp| {
            Landmark::from_class_name(&kp.class_name)
                .map(|lm| (lm, Keypoint::new(kp.x, kp.y, kp.confidence)))
        })
        .collect();

    let visualization = first
        .get("keypoint_visualization")
        .and_then(classify_visualization);

    Ok(Detection {
        keypoints,
        raw_keypoints,
        visualization,
    })
}

fn extract_keypoints(output: &Value) -> Result<Vec<RawKeypoint>, DetectError> {
    let persons = output
        .get("predictions")
        .and_then(|p| p.get("predictions"))
        .and_then(Value::as_array)
        .ok_or_else(|| DetectError::ParseError("no person detections in response".to_string()))?;

    // Measurements are single-subject; only the first detected person counts.
    let Some(person) = persons.first() else {
        return Ok(Vec::new());
    };

    let keypoints = person
        .get("keypoints")
        .and_then(Value::as_array)
        .ok_or_else(|| DetectError::ParseError("person detection has no keypoints".to_string()))?;

    keypoints
        .iter()
        .map(|kp| {
            serde_json::from_value(kp.clone())
                .map_err(|e| DetectError::ParseError(format!("malformed keypoint: {}", e)))
        })
        .collect()
}

/// Classify the visualization field into inline bytes or a remote URL.
fn classify_visualization(value: &Value) -> Option<Visualization> {
    // Some workflows wrap the payload as {"type": ..., "value": ...}.
    let data = value
        .as_str()
        .or_else(|| value.get("value").and_then(Value::as_str))?;

    if let Some(rest) = data.strip_prefix("data:image") {
        let encoded = rest.split_once(',').map(|(_, b64)| b64).unwrap_or(rest);
        return STANDARD.decode(encoded).ok().map(Visualization::Inline);
    }
    // Bare base64 payloads start with the JPEG or PNG magic prefix.
    if data.starts_with("/9j/") || data.starts_with("iVBOR") {
        return STANDARD.decode(data).ok().map(Visualization::Inline);
    }
    if data.starts_with("http") {
        return Some(Visualization::Remote(data.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body(visualization: Value) -> Value {
        json!({
            "outputs": [{
                "predictions": {
                    "predictions": [{
                        "keypoints": [
                            {"class_id": 2, "class": "new-point-2", "x": 140.0, "y": 200.0, "confidence": 0.95},
                            {"class_id": 1, "class": "new-point-1", "x": 100.0, "y": 200.0, "confidence": 0.93},
                            {"class_id": 99, "class": "new-point-99", "x": 1.0, "y": 2.0, "confidence": 0.1}
                        ]
                    }]
                },
                "keypoint_visualization": visualization
            }]
        })
    }

    #[test]
    fn test_parse_keypoints_sorted_and_mapped() {
        let detection = parse_workflow_response(&sample_body(Value::Null)).unwrap();

        assert_eq!(detection.raw_keypoints.len(), 3);
        assert_eq!(detection.raw_keypoints[0].class_id, 1);

        // Unknown class stays raw-only; the two eyes land in the set.
        assert_eq!(detection.keypoints.len(), 2);
        let left = detection.keypoints.get(Landmark::LeftEye).unwrap();
        assert_eq!(left.x, 140.0);
        assert!(detection.keypoints.get(Landmark::Nose).is_none());
    }

    #[test]
    fn test_parse_accepts_bare_list_response() {
        let body = json!([{
            "predictions": {"predictions": [{"keypoints": []}]}
        }]);
        let detection = parse_workflow_response(&body).unwrap();
        assert!(detection.keypoints.is_empty());
        assert!(detection.visualization.is_none());
    }

    #[test]
    fn test_no_person_detected_yields_empty_set() {
        let body = json!({
            "outputs": [{"predictions": {"predictions": []}}]
        });
        let detection = parse_workflow_response(&body).unwrap();
        assert!(detection.keypoints.is_empty());
        assert!(detection.raw_keypoints.is_empty());
    }

    #[test]
    fn test_missing_outputs_is_parse_error() {
        let err = parse_workflow_response(&json!({})).unwrap_err();
        assert!(matches!(err, DetectError::ParseError(_)));
    }

    #[test]
    fn test_visualization_data_uri() {
        let encoded = STANDARD.encode(b"png-bytes");
        let body = sample_body(json!(format!("data:image/png;base64,{}", encoded)));
        let detection = parse_workflow_response(&body).unwrap();
        assert_eq!(
            detection.visualization,
            Some(Visualization::Inline(b"png-bytes".to_vec()))
        );
    }

    #[test]
    fn test_visualization_bare_base64_png() {
        // PNG files start with bytes that base64-encode to "iVBOR...".
        let png_magic = [0x89u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];
        let encoded = STANDARD.encode(png_magic);
        assert!(encoded.starts_with("iVBOR"));

        let body = sample_body(json!(encoded));
        let detection = parse_workflow_response(&body).unwrap();
        assert_eq!(
            detection.visualization,
            Some(Visualization::Inline(png_magic.to_vec()))
        );
    }

    #[test]
    fn test_visualization_wrapped_url() {
        let body = sample_body(json!({"type": "url", "value": "https://example.com/vis.png"}));
        let detection = parse_workflow_response(&body).unwrap();
        assert_eq!(
            detection.visualization,
            Some(Visualization::Remote(
                "https://example.com/vis.png".to_string()
            ))
        );
    }
}
