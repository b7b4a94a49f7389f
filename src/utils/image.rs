//! Image helpers.
//!
//! This module provides [`PackedBitmap`], a bitmap of packed `0xAARRGGBB`
//! pixels, [`PixelSource`] implementations for the `image` crate's buffers,
//! and helpers for loading a picture from disk and fitting it to the model
//! input size.

use crate::core::constants::{DIM_IMG_SIZE_X, DIM_IMG_SIZE_Y};
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::traits::PixelSource;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Rgba, RgbImage, RgbaImage};

/// Packs 8-bit channels into a `0xAARRGGBB` value.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// A bitmap stored as packed `0xAARRGGBB` pixels in row-major order.
///
/// This is the layout a platform bitmap hands out through a `getPixels` style
/// call, which makes it the natural type for hosts that already have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PackedBitmap {
    /// Wraps row-major packed pixels.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::InvalidInput`] when `pixels.len()` is not
    /// `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> DetectorResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DetectorError::invalid_input(format!(
                "bitmap of {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A bitmap where every pixel has the same colour.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// A bitmap whose pixel at (`x`, `y`) is `f(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Sets the pixel at (`x`, `y`); out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Row-major packed pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

impl PixelSource for PackedBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        pack_argb(a, r, g, b)
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        let [r, g, b] = self.get_pixel(x, y).0;
        pack_argb(0xFF, r, g, b)
    }
}

impl PixelSource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        let [v] = self.get_pixel(x, y).0;
        pack_argb(0xFF, v, v, v)
    }
}

impl PixelSource for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::dimensions(self).0
    }

    fn height(&self) -> u32 {
        GenericImageView::dimensions(self).1
    }

    fn packed_pixel(&self, x: u32, y: u32) -> u32 {
        let Rgba([r, g, b, a]) = GenericImageView::get_pixel(self, x, y);
        pack_argb(a, r, g, b)
    }
}

/// Loads an image file in any format the `image` crate understands.
///
/// # Errors
///
/// Returns [`DetectorError::ImageLoad`] if the file cannot be read or decoded.
pub fn load_image(path: &std::path::Path) -> DetectorResult<DynamicImage> {
    image::open(path).map_err(DetectorError::ImageLoad)
}

/// Composites the image onto a white background and scales it to 28x28.
///
/// Transparent regions of a drawing become paper, not ink. The resize uses
/// Lanczos3 and ignores the aspect ratio.
pub fn fit_to_model_input(image: &DynamicImage) -> RgbaImage {
    let mut flattened = image.to_rgba8();
    for pixel in flattened.pixels_mut() {
        *pixel = flatten_on_white(*pixel);
    }
    image::imageops::resize(
        &flattened,
        DIM_IMG_SIZE_X as u32,
        DIM_IMG_SIZE_Y as u32,
        FilterType::Lanczos3,
    )
}

fn flatten_on_white(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let alpha = u32::from(a);
    let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
    Rgba([blend(r), blend(g), blend(b), 0xFF])
}
