//! Pixel primitives for layered pin composites.
//!
//! A composite is a foreground image laid over a tinted copy of a background
//! template. The template is shared between composites, so [`tint`] always
//! works on a fresh copy; no two composites ever alias mutable pixel state.

use image::Rgba;
use image::RgbaImage;
use image::imageops;
use image::imageops::FilterType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("insets leave no room for the foreground on a {width}x{height} background")]
    DegenerateInsets { width: u32, height: u32 },
}

/// Per-edge insets of the foreground box within the background, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn uniform(px: u32) -> Self {
        Self {
            left: px,
            top: px,
            right: px,
            bottom: px,
        }
    }
}

/// Returns a tinted copy of `template`, multiplying each pixel's color
/// channels by `color` and leaving alpha untouched.
pub fn tint(template: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut tinted = template.clone();
    for pixel in tinted.pixels_mut() {
        pixel.0[0] = multiply_channel(pixel.0[0], color.0[0]);
        pixel.0[1] = multiply_channel(pixel.0[1], color.0[1]);
        pixel.0[2] = multiply_channel(pixel.0[2], color.0[2]);
    }
    tinted
}

fn multiply_channel(base: u8, tint: u8) -> u8 {
    ((u16::from(base) * u16::from(tint)) / 255) as u8
}

/// Alpha-composites `foreground` over `background` inside the box left by
/// `insets`, scaling the foreground to fill that box.
pub fn overlay_inset(
    background: &RgbaImage,
    foreground: &RgbaImage,
    insets: Insets,
) -> Result<RgbaImage, ComposeError> {
    let (width, height) = background.dimensions();
    let box_width = width.saturating_sub(insets.left + insets.right);
    let box_height = height.saturating_sub(insets.top + insets.bottom);
    if box_width == 0 || box_height == 0 {
        return Err(ComposeError::DegenerateInsets { width, height });
    }
    let mut composed = background.clone();
    let scaled = if foreground.dimensions() == (box_width, box_height) {
        foreground.clone()
    } else {
        imageops::resize(foreground, box_width, box_height, FilterType::Nearest)
    };
    imageops::overlay(
        &mut composed,
        &scaled,
        i64::from(insets.left),
        i64::from(insets.top),
    );
    Ok(composed)
}

/// Builds a pin composite: the background template tinted with `tint_color`,
/// with `foreground` inset above it.
pub fn compose_pin(
    template: &RgbaImage,
    foreground: &RgbaImage,
    tint_color: Rgba<u8>,
    insets: Insets,
) -> Result<RgbaImage, ComposeError> {
    let background = tint(template, tint_color);
    overlay_inset(&background, foreground, insets)
}
