#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The layout of the pixel buffer held by an
/// [`IconImage`](crate::IconImage).  `Rgba8` (32-bit straight alpha) is the
/// canonical format; every other format is converted to it during
/// normalization.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum PixelFormat {
    /// 8-bit grayscale, one byte per pixel.
    Gray8,
    /// 8-bit grayscale with an 8-bit alpha channel, two bytes per pixel.
    GrayAlpha8,
    /// 8-bit red/green/blue, three bytes per pixel.
    Rgb8,
    /// 8-bit red/green/blue/alpha with straight (non-premultiplied) alpha,
    /// four bytes per pixel.
    Rgba8,
    /// 8-bit blue/green/red/alpha with straight alpha, four bytes per pixel.
    Bgra8,
}

impl PixelFormat {
    /// Returns the color depth of this format, in bits per pixel.
    pub fn bits_per_pixel(&self) -> u16 {
        match *self {
            PixelFormat::Gray8 => 8,
            PixelFormat::GrayAlpha8 => 16,
            PixelFormat::Rgb8 => 24,
            PixelFormat::Rgba8 => 32,
            PixelFormat::Bgra8 => 32,
        }
    }

    /// Returns the number of bytes used by one pixel in this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match *self {
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Bgra8 => 4,
        }
    }
}

//===========================================================================//


//===========================================================================//
