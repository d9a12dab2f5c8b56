//! Perceptual hashing for near-duplicate detection.
//!
//! Three independent 64-bit hashes are computed over the same decoded image
//! and concatenated into one colon-separated fingerprint:
//!
//! 1. Mean hash: each cell of an 8x8 grayscale grid compared to the grid
//!    mean. Robust against rescaling and recompression.
//! 2. Gradient hash: horizontal neighbour comparison on a 9x8 grid. Robust
//!    against brightness shifts.
//! 3. Column hash: vertical neighbour comparison on an 8x9 grid, the
//!    transposed complement of the gradient hash.
//!
//! Similarity between fingerprints is the average Hamming distance across
//! the three components, mapped into [0, 1] by `similarity::visual_similarity`.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// A 64-bit perceptual hash value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerceptualHash(pub u64);

impl PerceptualHash {
    /// Hamming distance in bits
    pub fn distance(&self, other: &PerceptualHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// Compute the composite three-part fingerprint for a decoded image
pub fn fingerprint(img: &DynamicImage) -> String {
    let mean = mean_hash(img);
    let gradient = gradient_hash(img);
    let column = column_hash(img);
    format!("{:016x}:{:016x}:{:016x}", mean.0, gradient.0, column.0)
}

/// Mean hash: bit set where the cell is brighter than the grid average
pub fn mean_hash(img: &DynamicImage) -> PerceptualHash {
    let pixels = luma_grid(img, 8, 8);

    let mut sum = 0.0;
    for &p in &pixels {
        sum += p;
    }
    let mean = sum / pixels.len() as f32;

    let mut hash: u64 = 0;
    for (bit, &p) in pixels.iter().enumerate() {
        if p > mean {
            hash |= 1u64 << bit;
        }
    }
    PerceptualHash(hash)
}

/// Gradient hash: bit set where a cell is brighter than its right neighbour
pub fn gradient_hash(img: &DynamicImage) -> PerceptualHash {
    let pixels = luma_grid(img, 9, 8);

    let mut hash: u64 = 0;
    let mut bit = 0;
    for y in 0..8 {
        for x in 0..8 {
            let left = pixels[y * 9 + x];
            let right = pixels[y * 9 + x + 1];
            if left > right {
                hash |= 1u64 << bit;
            }
            bit += 1;
        }
    }
    PerceptualHash(hash)
}

/// Column hash: bit set where a cell is brighter than the cell below it
pub fn column_hash(img: &DynamicImage) -> PerceptualHash {
    let pixels = luma_grid(img, 8, 9);

    let mut hash: u64 = 0;
    let mut bit = 0;
    for y in 0..8 {
        for x in 0..8 {
            let upper = pixels[y * 8 + x];
            let lower = pixels[(y + 1) * 8 + x];
            if upper > lower {
                hash |= 1u64 << bit;
            }
            bit += 1;
        }
    }
    PerceptualHash(hash)
}

/// Downsample to `width` x `height` and convert to a grayscale grid.
///
/// Grayscale formula: 0.299*R + 0.587*G + 0.114*B
fn luma_grid(img: &DynamicImage, width: u32, height: u32) -> Vec<f32> {
    let small = img.resize_exact(width, height, FilterType::Triangle);

    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let pixel = small.get_pixel(x, y);
            let gray =
                0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
            pixels.push(gray);
        }
    }
    pixels
}

// -- Tests --
