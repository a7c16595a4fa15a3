use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Process raw image bytes (JPEG / PNG / WEBP / …) into binarized PNG bytes
/// ready for OCR: grayscale, then a global Otsu threshold.
pub fn prepare_for_ocr(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(binarize(img))
}

/// Grayscale + Otsu binarization.
fn binarize(img: DynamicImage) -> DynamicImage {
    let gray: GrayImage = img.to_luma8();
    let threshold = otsu_threshold(&gray);

    let thresholded: GrayImage = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0];
        Luma([if p > threshold { 255 } else { 0 }])
    });

    DynamicImage::ImageLuma8(thresholded)
}

/// Otsu's method: pick the threshold maximizing between-class variance of
/// the grayscale histogram.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 127;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(v, &n)| v as f64 * n as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_variance = 0.0f64;
    let mut background_count = 0u64;
    let mut background_sum = 0.0f64;

    for t in 0..256usize {
        background_count += histogram[t];
        if background_count == 0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0 {
            break;
        }

        background_sum += t as f64 * histogram[t] as f64;
        let mean_bg = background_sum / background_count as f64;
        let mean_fg = (weighted_sum - background_sum) / foreground_count as f64;

        let variance = background_count as f64 * foreground_count as f64
            * (mean_bg - mean_fg)
            * (mean_bg - mean_fg);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(width, height, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn binarize_produces_only_black_and_white() {
        let img: GrayImage = ImageBuffer::from_fn(64, 1, |x, _| Luma([(x * 4) as u8]));
        let result = binarize(DynamicImage::ImageLuma8(img));
        let gray = result.to_luma8();
        assert!(gray.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn otsu_separates_bimodal_histogram() {
        // Half dark (20), half light (220) — threshold must land in between.
        let img: GrayImage =
            ImageBuffer::from_fn(10, 10, |x, _| Luma([if x < 5 { 20 } else { 220 }]));
        let t = otsu_threshold(&img);
        assert!(t >= 20 && t < 220, "threshold was {t}");
    }

    #[test]
    fn uniform_image_does_not_panic() {
        let result = binarize(solid_gray(8, 8, 128));
        assert_eq!(result.width(), 8);
    }

    #[test]
    fn prepare_for_ocr_emits_png() {
        let result = prepare_for_ocr(&png_bytes(&solid_gray(4, 4, 100))).unwrap();
        // PNG magic bytes
        assert_eq!(&result[..4], b"\x89PNG");
    }

    #[test]
    fn prepare_for_ocr_rejects_garbage() {
        assert!(matches!(
            prepare_for_ocr(b"not an image"),
            Err(PreprocessError::Load(_))
        ));
    }
}
