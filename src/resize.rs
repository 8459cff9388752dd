use crate::image::IconImage;
use crate::pixelfmt::PixelFormat;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// The most memory a single resize target is allowed to address, in bytes.
#[cfg(target_pointer_width = "64")]
const MEMORY_LIMIT: f64 = 2_147_483_648.0; // 2^31
#[cfg(not(target_pointer_width = "64"))]
const MEMORY_LIMIT: f64 = 1_073_741_824.0; // 2^30

//===========================================================================//

/// The resampling policy used when redrawing an image, fixing the
/// interpolation algorithm and edge-sampling behavior together.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ResizeQuality {
    /// Bicubic interpolation with mirrored (tile-flip) edge sampling.
    AntiAlias,
    /// Bicubic interpolation with mirrored (tile-flip) edge sampling.
    HighQuality,
    /// Nearest-neighbor sampling, trading quality for speed.
    HighSpeed,
}

//===========================================================================//

/// Returns the largest size indicator (the greater of width and height)
/// that an image with the given pixel format may be resized to without
/// exceeding the memory safety bound.
pub fn max_size_indicator(format: PixelFormat) -> u32 {
    let bytes_per_pixel = (format.bits_per_pixel() as f64) * 0.125;
    (MEMORY_LIMIT / bytes_per_pixel).sqrt().floor() as u32
}

/// Returns true if the given size indicator is within the allowed range for
/// the given pixel format.
pub fn size_is_valid(indicator: u32, format: PixelFormat) -> bool {
    indicator >= 1 && indicator <= max_size_indicator(format)
}

//===========================================================================//

/// Redraws the image at exactly `target_width` x `target_height` pixels in
/// the canonical `Rgba8` format.  If either target dimension is zero, or the
/// larger one exceeds the memory safety bound for 32-bit pixels, the
/// original image is returned unchanged rather than surfacing an error.
pub fn resize(
    image: &IconImage,
    target_width: u32,
    target_height: u32,
    quality: ResizeQuality,
) -> IconImage {
    let indicator = target_width.max(target_height);
    if target_width == 0
        || target_height == 0
        || !size_is_valid(indicator, PixelFormat::Rgba8)
    {
        return image.clone();
    }
    if target_width == image.width()
        && target_height == image.height()
        && image.format() == PixelFormat::Rgba8
    {
        return image.clone();
    }
    let source = image.to_rgba();
    match quality {
        ResizeQuality::AntiAlias | ResizeQuality::HighQuality => {
            resample_bicubic(&source, target_width, target_height)
        }
        ResizeQuality::HighSpeed => {
            resample_nearest(&source, target_width, target_height)
        }
    }
}

/// Redraws the image so that both dimensions fit within `indicator`,
/// preserving aspect ratio approximately.  If both dimensions already fit
/// (or `indicator` is zero), the image is returned unchanged.  Otherwise
/// the larger dimension is scaled via an integer percentage,
/// `floor(100 / larger * indicator)`, and both dimensions are multiplied by
/// that percentage with truncation, which can drift slightly from an exact
/// proportional scale.
pub fn resize_to_fit(
    image: &IconImage,
    indicator: u32,
    quality: ResizeQuality,
) -> IconImage {
    let mut size = [image.width() as i64, image.height() as i64];
    let indicator = indicator as i64;
    if indicator <= 0 || (indicator >= size[0] && indicator >= size[1]) {
        return image.clone();
    }
    for i in 0..2 {
        if size[i] <= indicator {
            continue;
        }
        let percent = (100.0 / (size[i] as f64) * (indicator as f64)).floor();
        size[i] = ((size[i] as f64) * (percent / 100.0)) as i64;
        let other = if i == 0 { 1 } else { 0 };
        size[other] = ((size[other] as f64) * (percent / 100.0)) as i64;
        break;
    }
    resize(image, size[0] as u32, size[1] as u32, quality)
}

//===========================================================================//

// Catmull-Rom cubic kernel (a = -0.5); weights for the four taps around a
// sample point sum to one.
fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

// Maps an out-of-range sample index back into [0, len) by mirroring across
// the image edges with period 2*len (tile-flip).
fn mirror(index: i64, len: u32) -> usize {
    let len = len as i64;
    let period = 2 * len;
    let mut index = index % period;
    if index < 0 {
        index += period;
    }
    if index >= len {
        index = period - 1 - index;
    }
    index as usize
}

fn clamp_channel(value: f64) -> u8 {
    value.round().max(0.0).min(255.0) as u8
}

fn resample_bicubic(
    source: &IconImage,
    target_width: u32,
    target_height: u32,
) -> IconImage {
    let src_width = source.width();
    let src_height = source.height();
    let data = source.data();
    let scale_x = (src_width as f64) / (target_width as f64);
    let scale_y = (src_height as f64) / (target_height as f64);
    let num_bytes = (target_width as usize) * (target_height as usize) * 4;
    let mut output = Vec::<u8>::with_capacity(num_bytes);
    for row in 0..target_height {
        // Half-pixel offsets keep sample points at pixel centers.
        let sample_y = ((row as f64) + 0.5) * scale_y - 0.5;
        let base_y = sample_y.floor() as i64;
        let frac_y = sample_y - (base_y as f64);
        let weights_y = [
            cubic_weight(1.0 + frac_y),
            cubic_weight(frac_y),
            cubic_weight(1.0 - frac_y),
            cubic_weight(2.0 - frac_y),
        ];
        for col in 0..target_width {
            let sample_x = ((col as f64) + 0.5) * scale_x - 0.5;
            let base_x = sample_x.floor() as i64;
            let frac_x = sample_x - (base_x as f64);
            let weights_x = [
                cubic_weight(1.0 + frac_x),
                cubic_weight(frac_x),
                cubic_weight(1.0 - frac_x),
                cubic_weight(2.0 - frac_x),
            ];
            let mut channels = [0.0f64; 4];
            for (j, &weight_y) in weights_y.iter().enumerate() {
                let src_row = mirror(base_y - 1 + (j as i64), src_height);
                for (i, &weight_x) in weights_x.iter().enumerate() {
                    let src_col = mirror(base_x - 1 + (i as i64), src_width);
                    let weight = weight_y * weight_x;
                    let start =
                        4 * (src_row * (src_width as usize) + src_col);
                    for channel in 0..4 {
                        channels[channel] +=
                            weight * (data[start + channel] as f64);
                    }
                }
            }
            for &channel in channels.iter() {
                output.push(clamp_channel(channel));
            }
        }
    }
    IconImage::from_rgba_data(target_width, target_height, output)
}

fn resample_nearest(
    source: &IconImage,
    target_width: u32,
    target_height: u32,
) -> IconImage {
    let src_width = source.width();
    let src_height = source.height();
    let data = source.data();
    let scale_x = (src_width as f64) / (target_width as f64);
    let scale_y = (src_height as f64) / (target_height as f64);
    let num_bytes = (target_width as usize) * (target_height as usize) * 4;
    let mut output = Vec::<u8>::with_capacity(num_bytes);
    for row in 0..target_height {
        let src_row = ((((row as f64) + 0.5) * scale_y).floor() as i64)
            .clamp(0, (src_height as i64) - 1) as usize;
        for col in 0..target_width {
            let src_col = ((((col as f64) + 0.5) * scale_x).floor() as i64)
                .clamp(0, (src_width as i64) - 1) as usize;
            let start = 4 * (src_row * (src_width as usize) + src_col);
            output.extend_from_slice(&data[start..][..4]);
        }
    }
    IconImage::from_rgba_data(target_width, target_height, output)
}

//===========================================================================//


//===========================================================================//
