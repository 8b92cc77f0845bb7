use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use std::path::Path;

use crate::geometry::CanvasTransform;

/// Load a photo and apply any embedded EXIF orientation before its pixels
/// are used. Phone cameras routinely store landscape pixels with a rotation
/// tag, and the manifest dimensions describe the displayed image.
pub fn load_oriented(path: &Path) -> image::ImageResult<DynamicImage> {
    let mut decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Resize a photo with the shared transform and paste it onto a black
/// square canvas, anchored at the top-left corner. The right and/or bottom
/// margin stays background unless the source is already square.
///
/// `origin_width`/`origin_height` come from the manifest, which is the
/// authority on the coordinate space the annotations were drawn in.
pub fn normalize_image(
    image: &DynamicImage,
    origin_width: u32,
    origin_height: u32,
    transform: &CanvasTransform,
) -> RgbImage {
    let (new_width, new_height) = transform.scaled_dims(origin_width, origin_height);
    let resized = image.resize_exact(new_width, new_height, FilterType::CatmullRom);

    let mut canvas = RgbImage::from_pixel(transform.target_size, transform.target_size, Rgb([0, 0, 0]));
    imageops::replace(&mut canvas, &resized.to_rgb8(), 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_stays_black() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([200, 10, 10])));
        let transform = CanvasTransform::fit_into(40, 20, 64);
        let canvas = normalize_image(&source, 40, 20, &transform);

        assert_eq!(canvas.dimensions(), (64, 64));
        // resized content covers 64x32, the bottom half is padding
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([200, 10, 10]));
        assert_eq!(canvas.get_pixel(63, 31), &Rgb([200, 10, 10]));
        assert_eq!(canvas.get_pixel(0, 32), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(63, 63), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_square_source_covers_canvas() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 255, 0])));
        let transform = CanvasTransform::fit_into(10, 10, 32);
        let canvas = normalize_image(&source, 10, 10, &transform);

        assert_eq!(canvas.get_pixel(31, 31), &Rgb([0, 255, 0]));
    }
}
