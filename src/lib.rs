//! A library for packaging raster images into multi-resolution ICO files.
//!
//! Sources in any supported pixel format are normalized to 32-bit
//! straight-alpha RGBA on a square canvas, resampled to each requested
//! size, and serialized as an ICO container: a 6-byte header, a 16-byte
//! directory entry per image, and the image payloads at the offsets the
//! directory promises.  Payloads can be raw bitmaps (see
//! [`convert`]) or embedded PNG streams (see [`save`]), which keep large
//! icons small.
//!
//! ```no_run
//! let file = std::fs::File::open("icon.png").unwrap();
//! let image = icopack::IconImage::read_png(file).unwrap();
//! let mut sink = std::io::Cursor::new(Vec::new());
//! icopack::save(image, icopack::SizeProfile::Application, &mut sink)
//!     .unwrap();
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod factory;
mod icondir;
mod image;
mod layout;
mod pixelfmt;
mod resize;
mod select;

pub use crate::factory::{convert, save, save_file, save_images};
pub use crate::icondir::{IconDir, IconDirEntry};
pub use crate::image::IconImage;
pub use crate::layout::{SizeProfile, TargetSizes, MAX_SIZE, MIN_SIZE};
pub use crate::pixelfmt::PixelFormat;
pub use crate::resize::{
    max_size_indicator, resize, resize_to_fit, size_is_valid, ResizeQuality,
};
pub use crate::select::best_source;

//===========================================================================//
