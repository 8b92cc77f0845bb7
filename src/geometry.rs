use imageproc::point::Point;

use crate::types::TARGET_SIZE;

/// The resize-and-pad transform for one source image.
///
/// One `CanvasTransform` is computed per image and threaded into both the
/// photo resize and every polygon of that image. The masks stay aligned
/// pixel-for-pixel with the photo only because both sides consume the same
/// scale, so the transform is never recomputed downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub scale: f64,
    pub target_size: u32,
}

impl CanvasTransform {
    /// Fit a source image into the default square canvas: the long side maps
    /// onto `TARGET_SIZE` and the short side keeps its aspect ratio.
    pub fn fit(origin_width: u32, origin_height: u32) -> Self {
        Self::fit_into(origin_width, origin_height, TARGET_SIZE)
    }

    pub fn fit_into(origin_width: u32, origin_height: u32, target_size: u32) -> Self {
        let long_side = origin_width.max(origin_height);
        Self {
            scale: f64::from(target_size) / f64::from(long_side),
            target_size,
        }
    }

    /// Dimensions of the resized image before padding, rounded to nearest.
    pub fn scaled_dims(&self, origin_width: u32, origin_height: u32) -> (u32, u32) {
        let new_width = (f64::from(origin_width) * self.scale).round() as u32;
        let new_height = (f64::from(origin_height) * self.scale).round() as u32;
        (new_width, new_height)
    }
}

/// Scale a flat (x0, y0, x1, y1, ...) coordinate list into integer pixel
/// vertices on the normalized canvas.
///
/// Each coordinate is multiplied by the scale factor and truncated by the
/// integer cast; a trailing unpaired coordinate is dropped. The output is
/// consumed as a closed-polygon vertex list, so no vertex-count or winding
/// validation happens here.
pub fn scale_points(points: &[f64], scale: f64) -> Vec<Point<i32>> {
    points
        .chunks_exact(2)
        .map(|pair| Point::new((pair[0] * scale) as i32, (pair[1] * scale) as i32))
        .collect()
}
