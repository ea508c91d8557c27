//! Anatomical landmark vocabulary and detected keypoint sets.
//!
//! The detection workflow labels keypoints with generic class names
//! (`new-point-0` through `new-point-16`); this module maps them onto the
//! fixed 17-landmark body vocabulary and stores detected positions as an
//! immutable mapping. A landmark the model failed to detect is simply absent
//! from the set — lookups return `Option` rather than a zeroed coordinate.

use std::collections::HashMap;
use std::fmt;

/// Body side for paired landmarks and measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Display prefix ("Left" / "Right").
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named anatomical landmark produced by the detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Nose,
    RightEye,
    LeftEye,
    RightEar,
    LeftEar,
    RightShoulder,
    LeftShoulder,
    RightElbow,
    LeftElbow,
    RightWrist,
    LeftWrist,
    RightHip,
    LeftHip,
    RightKnee,
    LeftKnee,
    RightAnkle,
    LeftAnkle,
}

impl Landmark {
    /// All landmarks in the workflow's class-index order.
    pub const ALL: [Landmark; 17] = [
        Landmark::Nose,
        Landmark::RightEye,
        Landmark::LeftEye,
        Landmark::RightEar,
        Landmark::LeftEar,
        Landmark::RightShoulder,
        Landmark::LeftShoulder,
        Landmark::RightElbow,
        Landmark::LeftElbow,
        Landmark::RightWrist,
        Landmark::LeftWrist,
        Landmark::RightHip,
        Landmark::LeftHip,
        Landmark::RightKnee,
        Landmark::LeftKnee,
        Landmark::RightAnkle,
        Landmark::LeftAnkle,
    ];

    /// Resolve a landmark from the workflow's class index.
    ///
    /// The workflow numbers keypoints `new-point-0` .. `new-point-16` with
    /// right-side landmarks on odd indices.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolve a landmark from the workflow's class name (`new-point-N`).
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        let index: usize = class_name.strip_prefix("new-point-")?.parse().ok()?;
        Self::from_index(index)
    }

    /// Human-readable name, e.g. "Left Shoulder".
    pub fn name(&self) -> &'static str {
        match self {
            Landmark::Nose => "Nose",
            Landmark::RightEye => "Right Eye",
            Landmark::LeftEye => "Left Eye",
            Landmark::RightEar => "Right Ear",
            Landmark::LeftEar => "Left Ear",
            Landmark::RightShoulder => "Right Shoulder",
            Landmark::LeftShoulder => "Left Shoulder",
            Landmark::RightElbow => "Right Elbow",
            Landmark::LeftElbow => "Left Elbow",
            Landmark::RightWrist => "Right Wrist",
            Landmark::LeftWrist => "Left Wrist",
            Landmark::RightHip => "Right Hip",
            Landmark::LeftHip => "Left Hip",
            Landmark::RightKnee => "Right Knee",
            Landmark::LeftKnee => "Left Knee",
            Landmark::RightAnkle => "Right Ankle",
            Landmark::LeftAnkle => "Left Ankle",
        }
    }

    /// Eye landmark for the given side.
    pub fn eye(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftEye,
            Side::Right => Landmark::RightEye,
        }
    }

    /// Shoulder landmark for the given side.
    pub fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftShoulder,
            Side::Right => Landmark::RightShoulder,
        }
    }

    /// Elbow landmark for the given side.
    pub fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftElbow,
            Side::Right => Landmark::RightElbow,
        }
    }

    /// Wrist landmark for the given side.
    pub fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftWrist,
            Side::Right => Landmark::RightWrist,
        }
    }

    /// Hip landmark for the given side.
    pub fn hip(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftHip,
            Side::Right => Landmark::RightHip,
        }
    }

    /// Knee landmark for the given side.
    pub fn knee(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftKnee,
            Side::Right => Landmark::RightKnee,
        }
    }

    /// Ankle landmark for the given side.
    pub fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftAnkle,
            Side::Right => Landmark::RightAnkle,
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected keypoint: pixel position plus model confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl Keypoint {
    /// Create a keypoint at the given pixel position.
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }

    /// Euclidean pixel distance to another keypoint.
    pub fn distance_to(&self, other: &Keypoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Immutable mapping from landmark to detected keypoint.
///
/// Built once per analysis run from the workflow response and discarded after
/// the report is rendered.
#[derive(Debug, Clone, Default)]
pub struct KeypointSet {
    points: HashMap<Landmark, Keypoint>,
}

impl KeypointSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keypoint. Later detections for the same landmark win.
    pub fn insert(&mut self, landmark: Landmark, keypoint: Keypoint) {
        self.points.insert(landmark, keypoint);
    }

    /// Look up a landmark. `None` means the model did not detect it.
    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.points.get(&landmark)
    }

    /// Number of detected landmarks.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no landmarks were detected.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Euclidean pixel distance between two detected landmarks, if both exist.
    pub fn segment_px(&self, a: Landmark, b: Landmark) -> Option<f64> {
        Some(self.get(a)?.distance_to(self.get(b)?))
    }

    /// Iterate detected keypoints in the fixed landmark order.
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &Keypoint)> {
        Landmark::ALL
            .iter()
            .filter_map(|lm| self.points.get(lm).map(|kp| (*lm, kp)))
    }
}

impl FromIterator<(Landmark, Keypoint)> for KeypointSet {
    fn from_iter<T: IntoIterator<Item = (Landmark, Keypoint)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Skeleton edges connecting landmarks, used for annotation overlays.
pub const SKELETON: [(Landmark, Landmark); 19] = [
    (Landmark::Nose, Landmark::LeftEye),
    (Landmark::Nose, Landmark::RightEye),
    (Landmark::LeftEye, Landmark::RightEye),
    (Landmark::LeftEye, Landmark::LeftEar),
    (Landmark::RightEye, Landmark::RightEar),
    (Landmark::LeftEar, Landmark::LeftShoulder),
    (Landmark::RightEar, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightElbow, Landmark::RightWrist),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightKnee, Landmark::RightAnkle),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_mapping() {
        assert_eq!(Landmark::from_class_name("new-point-0"), Some(Landmark::Nose));
        assert_eq!(
            Landmark::from_class_name("new-point-2"),
            Some(Landmark::LeftEye)
        );
        assert_eq!(
            Landmark::from_class_name("new-point-16"),
            Some(Landmark::LeftAnkle)
        );
        assert_eq!(Landmark::from_class_name("new-point-17"), None);
        assert_eq!(Landmark::from_class_name("something-else"), None);
    }

    #[test]
    fn test_right_side_on_odd_indices() {
        assert_eq!(Landmark::from_index(1), Some(Landmark::RightEye));
        assert_eq!(Landmark::from_index(5), Some(Landmark::RightShoulder));
        assert_eq!(Landmark::from_index(6), Some(Landmark::LeftShoulder));
    }

    #[test]
    fn test_keypoint_distance() {
        let a = Keypoint::new(100.0, 200.0, 0.9);
        let b = Keypoint::new(140.0, 200.0, 0.9);
        assert!((a.distance_to(&b) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_landmark_is_none() {
        let mut set = KeypointSet::new();
        set.insert(Landmark::Nose, Keypoint::new(10.0, 20.0, 0.8));
        assert!(set.get(Landmark::Nose).is_some());
        assert!(set.get(Landmark::LeftAnkle).is_none());
        assert_eq!(set.segment_px(Landmark::Nose, Landmark::LeftAnkle), None);
    }

    #[test]
    fn test_skeleton_edges_are_within_vocabulary() {
        for (a, b) in SKELETON {
            assert!(Landmark::ALL.contains(&a));
            assert!(Landmark::ALL.contains(&b));
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_iter_follows_class_order() {
        let mut set = KeypointSet::new();
        set.insert(Landmark::LeftAnkle, Keypoint::new(0.0, 0.0, 1.0));
        set.insert(Landmark::Nose, Keypoint::new(1.0, 1.0, 1.0));
        let order: Vec<Landmark> = set.iter().map(|(lm, _)| lm).collect();
        assert_eq!(order, vec![Landmark::Nose, Landmark::LeftAnkle]);
    }
}
