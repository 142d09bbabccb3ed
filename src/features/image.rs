//! Image preprocessing for the tumor classifier
//!
//! bytes → RGB → S×S bicubic resize → [0,1] → NHWC `[1, S, S, 3]`

use image::imageops::FilterType;
use ndarray::Array4;

use super::PreprocessingError;

/// Default square input edge
pub const DEFAULT_IMAGE_SIZE: u32 = 299;

/// Decode an uploaded image into a normalized batch of one
pub fn preprocess(bytes: &[u8], size: u32) -> Result<Array4<f32>, PreprocessingError> {
    if bytes.is_empty() {
        return Err(PreprocessingError("image payload is empty".to_string()));
    }
    if size == 0 {
        return Err(PreprocessingError("target image size must be positive".to_string()));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PreprocessingError(format!("cannot decode image: {}", e)))?;

    tracing::debug!(
        "Decoded image {}x{} ({:?})",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    let edge = size as usize;
    Ok(Array4::from_shape_fn((1, edge, edge, 3), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    }))
}

/// All-zero input used to warm the model up after loading
pub fn blank_batch(size: u32) -> Array4<f32> {
    let edge = size as usize;
    Array4::zeros((1, edge, edge, 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_shape_and_range() {
        let img = RgbImage::from_fn(40, 20, |x, _| Rgb([(x * 6) as u8, 128, 255]));
        let batch = preprocess(&encode(DynamicImage::ImageRgb8(img)), 32).unwrap();

        assert_eq!(batch.shape(), &[1, 32, 32, 3]);
        assert!(batch.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((batch[[0, 5, 5, 2]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_grayscale_forced_to_three_channels() {
        let img = GrayImage::from_pixel(8, 8, Luma([51]));
        let batch = preprocess(&encode(DynamicImage::ImageLuma8(img)), 4).unwrap();

        assert_eq!(batch.shape(), &[1, 4, 4, 3]);
        for c in 0..3 {
            assert!((batch[[0, 1, 1, c]] - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = preprocess(b"definitely not an image", 299).unwrap_err();
        assert!(err.0.contains("cannot decode"));
    }

    #[test]
    fn test_empty_bytes_fail() {
        assert!(preprocess(&[], 299).is_err());
    }

    #[test]
    fn test_blank_batch() {
        let batch = blank_batch(DEFAULT_IMAGE_SIZE);
        assert_eq!(batch.shape(), &[1, 299, 299, 3]);
        assert_eq!(batch.sum(), 0.0);
    }
}
