//! Contrast boost and two-pass sharpening applied before the square search.
//!
//! Both convolutions go through `imageproc::filter::Kernel::filter`, which
//! replicates border pixels for taps that fall outside the raster. Every
//! output channel is rounded and clamped to `0..=255`.

use image::{Pixel, Rgb, RgbImage};
use imageproc::filter::Kernel;
use tracing::instrument;

use crate::{error::ensure_non_empty, Result};

const CONTRAST_GAIN: f32 = 1.1;

#[rustfmt::skip]
const SHARPEN_KERNEL: [f32; 9] = [
     0.0, -1.0,  0.0,
    -1.0,  5.0, -1.0,
     0.0, -1.0,  0.0,
];

#[rustfmt::skip]
const UNSHARP_KERNEL: [f32; 25] = [
    -0.125, -0.125, -0.125, -0.125, -0.125,
    -0.125,  0.25,   0.25,   0.25,  -0.125,
    -0.125,  0.25,   1.0,    0.25,  -0.125,
    -0.125,  0.25,   0.25,   0.25,  -0.125,
    -0.125, -0.125, -0.125, -0.125, -0.125,
];

/// Returns a new raster of the same size; the input is left untouched.
#[instrument(level = "debug", skip(image), fields(width = image.width(), height = image.height()))]
pub fn enhance(image: &RgbImage) -> Result<RgbImage> {
    ensure_non_empty(image.width(), image.height())?;

    let boosted = boost_contrast(image, CONTRAST_GAIN);
    let sharpened = convolve(&boosted, Kernel::new(&SHARPEN_KERNEL, 3, 3));
    let enhanced = convolve(&sharpened, Kernel::new(&UNSHARP_KERNEL, 5, 5));
    log::trace!("Enhanced {}x{} raster", enhanced.width(), enhanced.height());
    Ok(enhanced)
}

fn convolve(image: &RgbImage, kernel: Kernel<f32>) -> RgbImage {
    kernel.filter::<_, _, Rgb<u8>>(image, |channel, acc: f32| {
        *channel = acc.round().clamp(0.0, 255.0) as u8
    })
}

fn boost_contrast(image: &RgbImage, gain: f32) -> RgbImage {
    let mut image = image.clone();
    for pixel in image.pixels_mut() {
        *pixel = pixel.map(|c| (c as f32 * gain).round().min(255.0) as u8);
    }
    image
}
