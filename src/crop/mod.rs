//! Crop geometry: display frame fitting, crop rectangle sizing, clamping and
//! focal point conversion. Everything here is pure.

mod aspect;
mod rect;

pub use crate::geometry::{FocalPoint, ImageSize, Point, Rect, Size};
pub use aspect::{AspectPreset, AspectRatio, AspectRatioError};
pub use rect::CropRect;

use crate::geometry::clamp_percent;
use thiserror::Error;

/// Share of the display frame the crop rectangle occupies along its limiting axis.
pub const DEFAULT_CROP_FILL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("image has degenerate natural size {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },
    #[error("container bounds {width}x{height} cannot hold an image")]
    DegenerateBounds { width: f64, height: f64 },
    #[error("display frame {width}x{height} cannot hold a crop rectangle")]
    DegenerateFrame { width: f64, height: f64 },
    #[error("target aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f64),
    #[error("crop fill factor must be in (0, 1], got {0}")]
    InvalidFillFactor(f64),
}

/// Fits a `natural` image into the editor bounds, preserving its aspect ratio.
///
/// Landscape images take the full width bound, everything else takes the
/// full height bound.
pub fn compute_display_frame(natural: ImageSize, bounds: Size) -> Result<Size, GeometryError> {
    if natural.width == 0 || natural.height == 0 {
        return Err(GeometryError::DegenerateImage {
            width: natural.width,
            height: natural.height,
        });
    }
    if !bounds.is_drawable() {
        return Err(GeometryError::DegenerateBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }

    let image_aspect = natural.to_size().aspect();
    let frame = if image_aspect > 1.0 {
        Size::new(bounds.width, bounds.width / image_aspect)
    } else {
        Size::new(bounds.height * image_aspect, bounds.height)
    };
    tracing::debug!(
        natural_width = natural.width,
        natural_height = natural.height,
        frame_width = frame.width,
        frame_height = frame.height,
        "computed display frame"
    );
    Ok(frame)
}

/// Largest rectangle of `target` aspect ratio that fits the frame at the
/// default fill factor.
pub fn compute_crop_size(frame: Size, target: AspectRatio) -> Result<Size, GeometryError> {
    compute_crop_size_with_fill(frame, target.value(), DEFAULT_CROP_FILL)
}

pub fn compute_crop_size_with_fill(
    frame: Size,
    target_ratio: f64,
    fill: f64,
) -> Result<Size, GeometryError> {
    if !frame.is_drawable() {
        return Err(GeometryError::DegenerateFrame {
            width: frame.width,
            height: frame.height,
        });
    }
    if !target_ratio.is_finite() || target_ratio <= 0.0 {
        return Err(GeometryError::InvalidAspectRatio(target_ratio));
    }
    if !fill.is_finite() || fill <= 0.0 || fill > 1.0 {
        return Err(GeometryError::InvalidFillFactor(fill));
    }

    let mut size = if target_ratio > frame.aspect() {
        let width = frame.width * fill;
        Size::new(width, width / target_ratio)
    } else {
        let height = frame.height * fill;
        Size::new(height * target_ratio, height)
    };

    if size.width > frame.width {
        size = Size::new(frame.width, frame.width / target_ratio);
    }
    if size.height > frame.height {
        size = Size::new(frame.height * target_ratio, frame.height);
    }
    Ok(size)
}

/// Keeps a rectangle of `rect_size` fully inside `frame`.
pub fn clamp_position(position: Point, frame: Size, rect_size: Size) -> Point {
    let max_x = frame.width - rect_size.width;
    let max_y = frame.height - rect_size.height;
    Point::new(position.x.min(max_x).max(0.0), position.y.min(max_y).max(0.0))
}

pub fn centered_position(frame: Size, rect_size: Size) -> Point {
    Point::new(
        (frame.width - rect_size.width) / 2.0,
        (frame.height - rect_size.height) / 2.0,
    )
}

/// Top-left corner that puts the rectangle's center on `center`, clamped.
pub fn position_for_center(center: Point, frame: Size, rect_size: Size) -> Point {
    clamp_position(
        Point::new(
            center.x - rect_size.width / 2.0,
            center.y - rect_size.height / 2.0,
        ),
        frame,
        rect_size,
    )
}

/// Center of the crop rectangle as a percentage of the frame.
pub fn to_focal_percent(position: Point, rect_size: Size, frame: Size) -> FocalPoint {
    let center = Rect::from_parts(position, rect_size).center();
    FocalPoint {
        x: clamp_percent(center.x / frame.width * 100.0),
        y: clamp_percent(center.y / frame.height * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_close;

    const TOLERANCE: f64 = 1e-6;

    const NATURAL_SIZES: [(u32, u32); 7] = [
        (1600, 900),
        (900, 1600),
        (1000, 1000),
        (1, 5000),
        (5000, 1),
        (3024, 4032),
        (640, 480),
    ];
    const BOUNDS: [(f64, f64); 4] = [(800.0, 600.0), (800.0, 350.0), (320.0, 900.0), (1.0, 1.0)];
    const RATIOS: [f64; 6] = [16.0 / 9.0, 21.0 / 9.0, 4.0 / 3.0, 1.0, 9.0 / 16.0, 0.05];

    #[test]
    fn scenario_a_landscape_image_takes_full_width() {
        let frame = compute_display_frame(ImageSize::new(1600, 900), Size::new(800.0, 600.0))
            .expect("frame should compute");
        assert_eq!(frame, Size::new(800.0, 450.0));
    }

    #[test]
    fn portrait_and_square_images_take_full_height() {
        let portrait = compute_display_frame(ImageSize::new(900, 1600), Size::new(800.0, 600.0))
            .expect("frame should compute");
        assert_close(portrait.height, 600.0, TOLERANCE);
        assert_close(portrait.width, 337.5, TOLERANCE);

        let square = compute_display_frame(ImageSize::new(500, 500), Size::new(800.0, 420.0))
            .expect("frame should compute");
        assert_eq!(square, Size::new(420.0, 420.0));
    }

    #[test]
    fn display_frame_preserves_image_aspect() {
        for (w, h) in NATURAL_SIZES {
            for (bw, bh) in BOUNDS {
                let natural = ImageSize::new(w, h);
                let frame = compute_display_frame(natural, Size::new(bw, bh))
                    .expect("frame should compute");
                let expected = f64::from(w) / f64::from(h);
                assert!(
                    (frame.aspect() - expected).abs() <= TOLERANCE * expected.max(1.0),
                    "{w}x{h} in {bw}x{bh} gave {frame:?}"
                );
                assert!(frame.width == bw || frame.height == bh);
            }
        }
    }

    #[test]
    fn display_frame_refuses_degenerate_inputs() {
        assert_eq!(
            compute_display_frame(ImageSize::new(0, 10), Size::new(800.0, 600.0)),
            Err(GeometryError::DegenerateImage {
                width: 0,
                height: 10
            })
        );
        assert!(matches!(
            compute_display_frame(ImageSize::new(10, 10), Size::new(0.0, 600.0)),
            Err(GeometryError::DegenerateBounds { .. })
        ));
        assert!(matches!(
            compute_display_frame(ImageSize::new(10, 10), Size::new(800.0, f64::NAN)),
            Err(GeometryError::DegenerateBounds { .. })
        ));
    }

    #[test]
    fn scenario_b_wider_target_sizes_by_width() {
        let size = compute_crop_size(
            Size::new(800.0, 450.0),
            AspectPreset::Ratio21x9.into(),
        )
        .expect("crop size should compute");
        assert_close(size.width, 640.0, TOLERANCE);
        assert_close(size.height, 640.0 / (21.0 / 9.0), TOLERANCE);
        assert_close(size.height, 274.285_714, 1e-5);
    }

    #[test]
    fn narrower_target_sizes_by_height() {
        let size = compute_crop_size(Size::new(800.0, 450.0), AspectPreset::Ratio4x3.into())
            .expect("crop size should compute");
        assert_close(size.height, 360.0, TOLERANCE);
        assert_close(size.width, 480.0, TOLERANCE);
    }

    #[test]
    fn crop_size_fits_frame_and_keeps_target_ratio() {
        let frames = [
            Size::new(800.0, 450.0),
            Size::new(337.5, 600.0),
            Size::new(420.0, 420.0),
            Size::new(800.0, 0.16),
        ];
        for frame in frames {
            for ratio in RATIOS {
                for fill in [0.5, DEFAULT_CROP_FILL, 1.0] {
                    let size = compute_crop_size_with_fill(frame, ratio, fill)
                        .expect("crop size should compute");
                    assert!(
                        size.width <= frame.width + TOLERANCE
                            && size.height <= frame.height + TOLERANCE,
                        "{size:?} exceeds {frame:?} for ratio {ratio}"
                    );
                    assert!((size.aspect() - ratio).abs() <= TOLERANCE * ratio.max(1.0));
                }
            }
        }
    }

    #[test]
    fn crop_size_rejects_bad_inputs() {
        let frame = Size::new(800.0, 450.0);
        assert_eq!(
            compute_crop_size_with_fill(frame, 0.0, DEFAULT_CROP_FILL),
            Err(GeometryError::InvalidAspectRatio(0.0))
        );
        assert_eq!(
            compute_crop_size_with_fill(frame, 1.0, 1.5),
            Err(GeometryError::InvalidFillFactor(1.5))
        );
        assert!(matches!(
            compute_crop_size_with_fill(Size::new(0.0, 450.0), 1.0, DEFAULT_CROP_FILL),
            Err(GeometryError::DegenerateFrame { .. })
        ));
    }

    #[test]
    fn scenario_d_out_of_bounds_drag_is_clamped() {
        let frame = Size::new(800.0, 450.0);
        let rect = Size::new(640.0, 640.0 / (21.0 / 9.0));
        let clamped = clamp_position(Point::new(900.0, -50.0), frame, rect);
        assert_close(clamped.x, 160.0, TOLERANCE);
        assert_eq!(clamped.y, 0.0);
    }

    #[test]
    fn clamp_position_is_idempotent() {
        let frame = Size::new(800.0, 450.0);
        let rect = Size::new(640.0, 274.3);
        for x in [-1000.0, -0.5, 0.0, 80.0, 159.9, 160.0, 700.0] {
            for y in [-50.0, 0.0, 88.0, 175.7, 176.0, 1e9] {
                let once = clamp_position(Point::new(x, y), frame, rect);
                let twice = clamp_position(once, frame, rect);
                assert_eq!(once, twice);
                assert!(once.x >= 0.0 && once.x <= frame.width - rect.width);
                assert!(once.y >= 0.0 && once.y <= frame.height - rect.height);
            }
        }
    }

    #[test]
    fn scenario_c_focal_point_from_rect_center() {
        let focal = to_focal_percent(
            Point::new(80.0, 88.0),
            Size::new(640.0, 274.3),
            Size::new(800.0, 450.0),
        );
        assert_close(focal.x, 50.0, TOLERANCE);
        assert_close(focal.y, 50.033_333, 1e-5);
    }

    #[test]
    fn focal_percent_stays_in_range_for_unclamped_positions() {
        let frame = Size::new(800.0, 450.0);
        let rect = Size::new(640.0, 274.3);
        for x in [-5000.0, -320.0, 0.0, 400.0, 800.0, 9000.0] {
            for y in [-5000.0, -137.0, 0.0, 225.0, 450.0, 9000.0] {
                let focal = to_focal_percent(Point::new(x, y), rect, frame);
                assert!((0.0..=100.0).contains(&focal.x), "x out of range: {focal:?}");
                assert!((0.0..=100.0).contains(&focal.y), "y out of range: {focal:?}");
            }
        }
    }

    #[test]
    fn focal_point_round_trips_to_rect_center() {
        let frame = Size::new(800.0, 450.0);
        let rect = Size::new(480.0, 360.0);
        for (x, y) in [(0.0, 0.0), (160.0, 45.0), (320.0, 90.0), (12.5, 77.25)] {
            let position = Point::new(x, y);
            let focal = to_focal_percent(position, rect, frame);
            let center = focal.to_frame_point(frame);
            let expected = Rect::from_parts(position, rect).center();
            assert_close(center.x, expected.x, TOLERANCE);
            assert_close(center.y, expected.y, TOLERANCE);

            let restored = position_for_center(center, frame, rect);
            assert_close(restored.x, x, TOLERANCE);
            assert_close(restored.y, y, TOLERANCE);
        }
    }

    #[test]
    fn centered_position_splits_margins_evenly() {
        let position = centered_position(Size::new(800.0, 450.0), Size::new(640.0, 274.3));
        assert_close(position.x, 80.0, TOLERANCE);
        assert_close(position.y, 87.85, TOLERANCE);
    }
}
