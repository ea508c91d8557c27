//! Local keypoint annotation for the processed-image pane.
//!
//! Used when the workflow response carries no rendered visualization: draws
//! the skeleton edges and keypoint markers directly on the source photo.

use std::io::Cursor;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::keypoint::{KeypointSet, SKELETON};

const EDGE_COLOR: Rgb<u8> = Rgb([50u8, 220u8, 120u8]);
const MARKER_COLOR: Rgb<u8> = Rgb([255u8, 50u8, 50u8]);
const MARKER_RING: Rgb<u8> = Rgb([255u8, 255u8, 255u8]);

/// Draw skeleton edges and keypoint markers over the source image.
pub fn annotate_keypoints(image: &DynamicImage, keypoints: &KeypointSet) -> RgbImage {
    let mut img = image.to_rgb8();

    // Marker size follows image resolution so overlays stay visible on large photos.
    let radius = ((img.width().min(img.height()) as f64) * 0.008).max(3.0) as i32;

    for (a, b) in SKELETON {
        if let (Some(from), Some(to)) = (keypoints.get(a), keypoints.get(b)) {
            draw_line_segment_mut(
                &mut img,
                (from.x as f32, from.y as f32),
                (to.x as f32, to.y as f32),
                EDGE_COLOR,
            );
        }
    }

    for (_, kp) in keypoints.iter() {
        let center = (kp.x as i32, kp.y as i32);
        draw_filled_circle_mut(&mut img, center, radius, MARKER_COLOR);
        draw_hollow_circle_mut(&mut img, center, radius + 1, MARKER_RING);
    }

    img
}

/// PNG-encode an annotated image for display or saving.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::{Keypoint, Landmark};

    #[test]
    fn test_annotation_marks_keypoint_pixels() {
        let base = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 200, Rgb([0, 0, 0])));
        let mut keypoints = KeypointSet::new();
        keypoints.insert(Landmark::LeftEye, Keypoint::new(60.0, 50.0, 0.9));
        keypoints.insert(Landmark::RightEye, Keypoint::new(140.0, 50.0, 0.9));

        let annotated = annotate_keypoints(&base, &keypoints);

        assert_eq!(*annotated.get_pixel(60, 50), MARKER_COLOR);
        assert_eq!(*annotated.get_pixel(140, 50), MARKER_COLOR);
        // The eye-to-eye edge passes through the midpoint.
        assert_eq!(*annotated.get_pixel(100, 50), EDGE_COLOR);
    }

    #[test]
    fn test_annotation_skips_missing_landmarks() {
        let base = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([0, 0, 0])));
        let annotated = annotate_keypoints(&base, &KeypointSet::new());
        // Nothing detected, nothing drawn.
        assert!(annotated.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_encode_png_magic() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
