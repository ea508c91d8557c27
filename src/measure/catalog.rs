//! Declarative catalog of body measurements.
//!
//! Each catalog entry names a measurement, its display category, and the rule
//! that combines landmarks into a pixel distance. Estimated quantities are
//! expressed as a fixed anatomical proportion of another catalog entry and are
//! evaluated after the direct measurements they reference. A measurement whose
//! landmarks were not detected is reported as unavailable; the rest of the
//! catalog still computes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::keypoint::{KeypointSet, Landmark, Side};

use super::{MeasureError, Scale};

/// Estimated hand length as a fraction of the measured forearm.
///
/// Empirical anthropometric heuristic; not tuned beyond the body types the
/// original measurements were calibrated on.
pub const HAND_TO_FOREARM_RATIO: f64 = 0.75;

/// Estimated head-top-to-eye distance as a multiple of the vertical
/// eye-to-nose distance. Same caveat as above.
pub const HEAD_TOP_TO_EYE_RATIO: f64 = 2.0;

/// Display category for tabular rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Overall,
    Arms,
    Legs,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Overall => "Overall",
            Category::Arms => "Arms",
            Category::Legs => "Legs",
        }
    }
}

/// Named measurement in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Height,
    ArmSpan,
    ShoulderWidth,
    WaistWidth,
    TorsoLength,
    ArmLength(Side),
    UpperArm(Side),
    Forearm(Side),
    HandLength(Side),
    LegLength(Side),
    Thigh(Side),
    Shin(Side),
}

impl MeasurementKind {
    /// Display label, e.g. "Left Forearm".
    pub fn label(&self) -> String {
        match self {
            MeasurementKind::Height => "Height".to_string(),
            MeasurementKind::ArmSpan => "Arm Span".to_string(),
            MeasurementKind::ShoulderWidth => "Shoulder Width".to_string(),
            MeasurementKind::WaistWidth => "Waist Width".to_string(),
            MeasurementKind::TorsoLength => "Torso Length".to_string(),
            MeasurementKind::ArmLength(side) => format!("{} Arm Length", side),
            MeasurementKind::UpperArm(side) => format!("{} Upper Arm", side),
            MeasurementKind::Forearm(side) => format!("{} Forearm", side),
            MeasurementKind::HandLength(side) => format!("{} Hand Length (est.)", side),
            MeasurementKind::LegLength(side) => format!("{} Leg Length", side),
            MeasurementKind::Thigh(side) => format!("{} Thigh", side),
            MeasurementKind::Shin(side) => format!("{} Shin", side),
        }
    }
}

/// How a measurement combines landmarks into a pixel distance.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Euclidean distance between two landmarks.
    Segment(Landmark, Landmark),
    /// Sum of several segments. Segments whose endpoints are missing are
    /// skipped; the measurement is unavailable only when nothing resolves.
    SegmentSum(Vec<(Landmark, Landmark)>),
    /// Vertical distance from eye level down to the lower of the given pair,
    /// falling back to whichever of the pair was detected.
    VerticalFromEyes(Landmark, Landmark),
    /// Vertical eye-to-ankle distance plus the estimated head-top-to-eye
    /// distance (omitted when the nose is missing).
    Stature,
    /// Fixed anatomical fraction of another catalog measurement.
    Proportion { of: MeasurementKind, ratio: f64 },
}

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct MeasurementSpec {
    pub kind: MeasurementKind,
    pub category: Category,
    pub rule: Rule,
}

static CATALOG: Lazy<Vec<MeasurementSpec>> = Lazy::new(|| {
    use Landmark::*;

    let mut specs = vec![
        MeasurementSpec {
            kind: MeasurementKind::Height,
            category: Category::Overall,
            rule: Rule::Stature,
        },
        MeasurementSpec {
            kind: MeasurementKind::ArmSpan,
            category: Category::Overall,
            rule: Rule::SegmentSum(vec![
                (LeftShoulder, RightShoulder),
                (LeftShoulder, LeftElbow),
                (LeftElbow, LeftWrist),
                (RightShoulder, RightElbow),
                (RightElbow, RightWrist),
            ]),
        },
        MeasurementSpec {
            kind: MeasurementKind::ShoulderWidth,
            category: Category::Overall,
            rule: Rule::Segment(LeftShoulder, RightShoulder),
        },
        MeasurementSpec {
            kind: MeasurementKind::WaistWidth,
            category: Category::Overall,
            rule: Rule::Segment(LeftHip, RightHip),
        },
        MeasurementSpec {
            kind: MeasurementKind::TorsoLength,
            category: Category::Overall,
            rule: Rule::VerticalFromEyes(LeftHip, RightHip),
        },
    ];

    for side in [Side::Left, Side::Right] {
        specs.push(MeasurementSpec {
            kind: MeasurementKind::ArmLength(side),
            category: Category::Arms,
            rule: Rule::Segment(Landmark::shoulder(side), Landmark::wrist(side)),
        });
        specs.push(MeasurementSpec {
            kind: MeasurementKind::UpperArm(side),
            category: Category::Arms,
            rule: Rule::Segment(Landmark::shoulder(side), Landmark::elbow(side)),
        });
        specs.push(MeasurementSpec {
            kind: MeasurementKind::Forearm(side),
            category: Category::Arms,
            rule: Rule::Segment(Landmark::elbow(side), Landmark::wrist(side)),
        });
        specs.push(MeasurementSpec {
            kind: MeasurementKind::HandLength(side),
            category: Category::Arms,
            rule: Rule::Proportion {
                of: MeasurementKind::Forearm(side),
                ratio: HAND_TO_FOREARM_RATIO,
            },
        });
    }

    for side in [Side::Left, Side::Right] {
        specs.push(MeasurementSpec {
            kind: MeasurementKind::LegLength(side),
            category: Category::Legs,
            rule: Rule::Segment(Landmark::hip(side), Landmark::ankle(side)),
        });
        specs.push(MeasurementSpec {
            kind: MeasurementKind::Thigh(side),
            category: Category::Legs,
            rule: Rule::Segment(Landmark::hip(side), Landmark::knee(side)),
        });
        specs.push(MeasurementSpec {
            kind: MeasurementKind::Shin(side),
            category: Category::Legs,
            rule: Rule::Segment(Landmark::knee(side), Landmark::ankle(side)),
        });
    }

    specs
});

/// The full measurement catalog in display order.
pub fn catalog() -> &'static [MeasurementSpec] {
    &CATALOG
}

/// Outcome of a single catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementOutcome {
    /// Measured (or estimated) value in centimeters.
    Centimeters(f64),
    /// The measurement could not be computed; carries the missing-keypoint
    /// error that explains why.
    Unavailable(MeasureError),
}

impl MeasurementOutcome {
    /// The value in centimeters, if available.
    pub fn value(&self) -> Option<f64> {
        match self {
            MeasurementOutcome::Centimeters(v) => Some(*v),
            MeasurementOutcome::Unavailable(_) => None,
        }
    }
}

/// One row of the measurement report.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub kind: MeasurementKind,
    pub category: Category,
    pub outcome: MeasurementOutcome,
}

/// Full measurement report for one analysis run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct MeasurementReport {
    entries: Vec<ReportEntry>,
}

impl MeasurementReport {
    /// All entries in catalog order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Value of a specific measurement, if it was computed.
    pub fn get(&self, kind: MeasurementKind) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .and_then(|e| e.outcome.value())
    }

    /// Number of entries that produced a value.
    pub fn available_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.value().is_some())
            .count()
    }

    /// Entries in a display category, in catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }
}

/// Compute the full catalog against a keypoint set and a valid scale.
///
/// Direct measurements are evaluated first, then proportion estimates against
/// their already-computed references. Per-entry failures are recorded in the
/// report instead of aborting the run.
pub fn compute_report(keypoints: &KeypointSet, scale: Scale) -> MeasurementReport {
    let mut computed: HashMap<MeasurementKind, Result<f64, MeasureError>> = HashMap::new();

    // Direct rules first.
    for spec in catalog() {
        if matches!(spec.rule, Rule::Proportion { .. }) {
            continue;
        }
        let result = evaluate_px(&spec.rule, keypoints).map(|px| scale.to_cm(px));
        computed.insert(spec.kind, result);
    }

    // Then estimates that reference a direct measurement.
    for spec in catalog() {
        if let Rule::Proportion { of, ratio } = spec.rule {
            let result = match computed.get(&of) {
                Some(Ok(reference_cm)) => Ok(ratio * reference_cm),
                Some(Err(e)) => Err(e.clone()),
                None => Err(MeasureError::MissingReference(of)),
            };
            computed.insert(spec.kind, result);
        }
    }

    let entries = catalog()
        .iter()
        .map(|spec| {
            let outcome = match computed.remove(&spec.kind) {
                Some(Ok(cm)) => MeasurementOutcome::Centimeters(cm),
                Some(Err(e)) => MeasurementOutcome::Unavailable(e),
                None => MeasurementOutcome::Unavailable(MeasureError::MissingReference(spec.kind)),
            };
            ReportEntry {
                kind: spec.kind,
                category: spec.category,
                outcome,
            }
        })
        .collect();

    MeasurementReport { entries }
}

/// Evaluate a direct rule to a pixel distance.
fn evaluate_px(rule: &Rule, keypoints: &KeypointSet) -> Result<f64, MeasureError> {
    match rule {
        Rule::Segment(a, b) => {
            keypoints.get(*a).ok_or(MeasureError::MissingKeypoint(*a))?;
            keypoints.get(*b).ok_or(MeasureError::MissingKeypoint(*b))?;
            Ok(keypoints.segment_px(*a, *b).unwrap_or(0.0))
        }
        Rule::SegmentSum(segments) => {
            let mut total = 0.0;
            let mut resolved = 0usize;
            for (a, b) in segments {
                if let Some(px) = keypoints.segment_px(*a, *b) {
                    total += px;
                    resolved += 1;
                }
            }
            if resolved == 0 {
                let (first, _) = segments[0];
                return Err(MeasureError::MissingKeypoint(first));
            }
            Ok(total)
        }
        Rule::VerticalFromEyes(lower_left, lower_right) => {
            let eye_y = eye_level_y(keypoints)?;
            let lower_y = lower_level_y(keypoints, *lower_left, *lower_right)?;
            Ok((eye_y - lower_y).abs())
        }
        Rule::Stature => {
            let eye_y = eye_level_y(keypoints)?;
            let ankle_y = lower_level_y(keypoints, Landmark::LeftAnkle, Landmark::RightAnkle)?;
            let body_px = (eye_y - ankle_y).abs();
            Ok(body_px + head_top_to_eye_px(keypoints, eye_y).unwrap_or(0.0))
        }
        Rule::Proportion { .. } => unreachable!("proportions are evaluated against the report"),
    }
}

/// Eye level: mean of both eye y positions, or the single detected eye.
fn eye_level_y(keypoints: &KeypointSet) -> Result<f64, MeasureError> {
    let left = keypoints.get(Landmark::eye(Side::Left));
    let right = keypoints.get(Landmark::eye(Side::Right));
    match (left, right) {
        (Some(l), Some(r)) => Ok((l.y + r.y) / 2.0),
        (Some(l), None) => Ok(l.y),
        (None, Some(r)) => Ok(r.y),
        (None, None) => Err(MeasureError::MissingKeypoint(Landmark::eye(Side::Left))),
    }
}

/// Lowest y of a detected left/right landmark pair.
fn lower_level_y(
    keypoints: &KeypointSet,
    left: Landmark,
    right: Landmark,
) -> Result<f64, MeasureError> {
    let l = keypoints.get(left);
    let r = keypoints.get(right);
    match (l, r) {
        (Some(l), Some(r)) => Ok(l.y.max(r.y)),
        (Some(l), None) => Ok(l.y),
        (None, Some(r)) => Ok(r.y),
        (None, None) => Err(MeasureError::MissingKeypoint(left)),
    }
}

/// Estimated head-top-to-eye pixel distance from the eye-nose vertical gap.
/// `None` when the nose was not detected.
fn head_top_to_eye_px(keypoints: &KeypointSet, eye_y: f64) -> Option<f64> {
    let nose = keypoints.get(Landmark::Nose)?;
    Some(HEAD_TOP_TO_EYE_RATIO * (eye_y - nose.y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;

    /// Front-facing figure with straight-down arms and legs.
    fn full_figure() -> KeypointSet {
        use Landmark::*;
        [
            (Nose, (120.0, 220.0)),
            (RightEye, (100.0, 200.0)),
            (LeftEye, (140.0, 200.0)),
            (RightShoulder, (60.0, 300.0)),
            (LeftShoulder, (180.0, 300.0)),
            (RightElbow, (60.0, 400.0)),
            (LeftElbow, (180.0, 400.0)),
            (RightWrist, (60.0, 500.0)),
            (LeftWrist, (180.0, 500.0)),
            (RightHip, (80.0, 600.0)),
            (LeftHip, (160.0, 600.0)),
            (RightKnee, (80.0, 750.0)),
            (LeftKnee, (160.0, 750.0)),
            (RightAnkle, (80.0, 900.0)),
            (LeftAnkle, (160.0, 900.0)),
        ]
        .into_iter()
        .map(|(lm, (x, y))| (lm, Keypoint::new(x, y, 0.9)))
        .collect()
    }

    fn scale() -> Scale {
        // 40 px between the eyes, 6.5 cm entered -> 0.1625 cm/px.
        Scale::from_eye_distance(&full_figure(), 6.5).unwrap()
    }

    fn assert_cm(report: &MeasurementReport, kind: MeasurementKind, expected: f64) {
        let value = report
            .get(kind)
            .unwrap_or_else(|| panic!("{:?} should be available", kind));
        assert!(
            (value - expected).abs() < 1e-9,
            "{:?}: expected {} cm, got {}",
            kind,
            expected,
            value
        );
    }

    #[test]
    fn test_direct_segments() {
        let report = compute_report(&full_figure(), scale());
        assert_cm(&report, MeasurementKind::ShoulderWidth, 120.0 * 0.1625);
        assert_cm(&report, MeasurementKind::WaistWidth, 80.0 * 0.1625);
        assert_cm(
            &report,
            MeasurementKind::Forearm(Side::Left),
            100.0 * 0.1625,
        );
        assert_cm(&report, MeasurementKind::Thigh(Side::Right), 150.0 * 0.1625);
        assert_cm(
            &report,
            MeasurementKind::LegLength(Side::Left),
            300.0 * 0.1625,
        );
    }

    #[test]
    fn test_arm_span_sums_all_segments() {
        // Shoulder width 120 + two upper arms 100 each + two forearms 100 each.
        let report = compute_report(&full_figure(), scale());
        assert_cm(&report, MeasurementKind::ArmSpan, 520.0 * 0.1625);
    }

    #[test]
    fn test_height_includes_head_estimate() {
        // Eye level 200 to ankle 900 is 700 px; eye-nose vertical gap is 20 px,
        // so the head-top estimate adds 2.0 * 20 = 40 px.
        let report = compute_report(&full_figure(), scale());
        assert_cm(&report, MeasurementKind::Height, 740.0 * 0.1625);
    }

    #[test]
    fn test_torso_is_vertical_eye_to_hip() {
        let report = compute_report(&full_figure(), scale());
        assert_cm(&report, MeasurementKind::TorsoLength, 400.0 * 0.1625);
    }

    #[test]
    fn test_hand_length_is_exact_fraction_of_forearm() {
        let report = compute_report(&full_figure(), scale());
        let forearm = report.get(MeasurementKind::Forearm(Side::Left)).unwrap();
        let hand = report.get(MeasurementKind::HandLength(Side::Left)).unwrap();
        assert_eq!(hand, HAND_TO_FOREARM_RATIO * forearm);
        // A 200 px forearm at 0.1625 cm/px.
        let s = Scale::new(6.5, 40.0).unwrap();
        assert!((s.to_cm(200.0) - 32.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_landmark_fails_only_dependents() {
        let mut keypoints = full_figure();
        let mut without_knee = KeypointSet::new();
        for (lm, kp) in keypoints.iter() {
            if lm != Landmark::LeftKnee {
                without_knee.insert(lm, *kp);
            }
        }
        keypoints = without_knee;

        let report = compute_report(&keypoints, scale());

        // Thigh and shin on the left depend on the knee and fail.
        let thigh = report
            .entries()
            .iter()
            .find(|e| e.kind == MeasurementKind::Thigh(Side::Left))
            .unwrap();
        assert_eq!(
            thigh.outcome,
            MeasurementOutcome::Unavailable(MeasureError::MissingKeypoint(Landmark::LeftKnee))
        );
        assert!(report.get(MeasurementKind::Shin(Side::Left)).is_none());

        // Everything not touching the left knee still computes correctly.
        assert_cm(&report, MeasurementKind::ShoulderWidth, 120.0 * 0.1625);
        assert_cm(
            &report,
            MeasurementKind::LegLength(Side::Left),
            300.0 * 0.1625,
        );
        assert_cm(&report, MeasurementKind::Thigh(Side::Right), 150.0 * 0.1625);
    }

    #[test]
    fn test_arm_span_tolerates_missing_segment() {
        let mut keypoints = KeypointSet::new();
        for (lm, kp) in full_figure().iter() {
            if lm != Landmark::LeftElbow {
                keypoints.insert(lm, *kp);
            }
        }
        // Left upper arm and forearm drop out; the remaining three segments sum.
        let report = compute_report(&keypoints, scale());
        assert_cm(&report, MeasurementKind::ArmSpan, 320.0 * 0.1625);
        // The left-side segment measurements themselves are unavailable.
        assert!(report.get(MeasurementKind::UpperArm(Side::Left)).is_none());
        assert!(report.get(MeasurementKind::Forearm(Side::Left)).is_none());
        assert!(report
            .get(MeasurementKind::HandLength(Side::Left))
            .is_none());
    }

    #[test]
    fn test_hand_estimate_carries_reference_failure() {
        let mut keypoints = KeypointSet::new();
        for (lm, kp) in full_figure().iter() {
            if lm != Landmark::LeftWrist {
                keypoints.insert(lm, *kp);
            }
        }
        let report = compute_report(&keypoints, scale());

        // The estimate names the landmark that broke its reference, not some
        // unrelated one.
        let hand = report
            .entries()
            .iter()
            .find(|e| e.kind == MeasurementKind::HandLength(Side::Left))
            .unwrap();
        assert_eq!(
            hand.outcome,
            MeasurementOutcome::Unavailable(MeasureError::MissingKeypoint(Landmark::LeftWrist))
        );
    }

    #[test]
    fn test_stature_without_nose_omits_head_estimate() {
        let mut keypoints = KeypointSet::new();
        for (lm, kp) in full_figure().iter() {
            if lm != Landmark::Nose {
                keypoints.insert(lm, *kp);
            }
        }
        let report = compute_report(&keypoints, scale());
        assert_cm(&report, MeasurementKind::Height, 700.0 * 0.1625);
    }

    #[test]
    fn test_report_order_groups_categories() {
        let report = compute_report(&full_figure(), scale());
        assert_eq!(report.entries().len(), catalog().len());
        assert_eq!(report.by_category(Category::Overall).count(), 5);
        assert_eq!(report.by_category(Category::Arms).count(), 8);
        assert_eq!(report.by_category(Category::Legs).count(), 6);
        assert_eq!(report.available_count(), catalog().len());
    }
}
