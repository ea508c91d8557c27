//! Remote keypoint detection via a hosted workflow API.

mod client;
mod response;

pub use client::{DetectError, DetectorClient, DetectorConfig, DEFAULT_BASE_URL};
pub use response::{parse_workflow_response, Detection, RawKeypoint, Visualization};
