use crate::layout::{MAX_SIZE, MIN_SIZE};
use crate::pixelfmt::PixelFormat;
use crate::resize::{self, ResizeQuality};
use std::io::{self, Read, Write};

//===========================================================================//

/// A decoded image: dimensions, pixel format, and an owned pixel buffer.
#[derive(Clone)]
pub struct IconImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl IconImage {
    /// Creates a new image with the given dimensions, format, and pixel
    /// data.  The `width` and `height` must be nonzero, and `data` must have
    /// `width * height * format.bytes_per_pixel()` bytes, in row-major order
    /// from top to bottom.  Panics if the dimensions are zero or if `data`
    /// is the wrong length.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> IconImage {
        if width == 0 {
            panic!("Invalid width (was {}, but must be nonzero)", width);
        }
        if height == 0 {
            panic!("Invalid height (was {}, but must be nonzero)", height);
        }
        let expected_data_len = (width as u64)
            * (height as u64)
            * (format.bytes_per_pixel() as u64);
        if (data.len() as u64) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} \
                 {:?} image)",
                data.len(),
                expected_data_len,
                width,
                height,
                format
            );
        }
        IconImage { width, height, format, data }
    }

    /// Creates a new image in the canonical 32-bit straight-alpha RGBA
    /// format.  Panics under the same conditions as [`IconImage::new`].
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> IconImage {
        IconImage::new(width, height, PixelFormat::Rgba8, rgba_data)
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel format of the image data.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the pixel data for this image, in row-major order from top
    /// to bottom.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns this image in the canonical `Rgba8` format, converting the
    /// pixel data onto a fresh buffer if necessary.
    pub fn to_rgba(&self) -> IconImage {
        let num_pixels = (self.width as usize) * (self.height as usize);
        let rgba = match self.format {
            PixelFormat::Rgba8 => return self.clone(),
            PixelFormat::Gray8 => {
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for &gray in self.data.iter() {
                    rgba.push(gray);
                    rgba.push(gray);
                    rgba.push(gray);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            PixelFormat::GrayAlpha8 => {
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for i in 0..num_pixels {
                    let gray = self.data[2 * i];
                    let alpha = self.data[2 * i + 1];
                    rgba.push(gray);
                    rgba.push(gray);
                    rgba.push(gray);
                    rgba.push(alpha);
                }
                rgba
            }
            PixelFormat::Rgb8 => {
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for i in 0..num_pixels {
                    rgba.extend_from_slice(&self.data[(3 * i)..][..3]);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            PixelFormat::Bgra8 => {
                let mut rgba = Vec::with_capacity(num_pixels * 4);
                for i in 0..num_pixels {
                    let blue = self.data[4 * i];
                    let green = self.data[4 * i + 1];
                    let red = self.data[4 * i + 2];
                    let alpha = self.data[4 * i + 3];
                    rgba.push(red);
                    rgba.push(green);
                    rgba.push(blue);
                    rgba.push(alpha);
                }
                rgba
            }
        };
        IconImage::from_rgba_data(self.width, self.height, rgba)
    }

    /// Canonicalizes this image for icon packing.  Returns `None` when
    /// either dimension is below [`MIN_SIZE`](crate::MIN_SIZE).  Otherwise
    /// the image is converted to `Rgba8` if needed, and redrawn onto a
    /// square canvas: images wider or taller than
    /// [`MAX_SIZE`](crate::MAX_SIZE) are stretched to exactly 256x256, and
    /// non-square images within range are stretched to
    /// `max(width, height)` square.  Already-canonical images pass through
    /// unchanged, so normalization is idempotent.
    pub fn normalize(self) -> Option<IconImage> {
        if self.width < MIN_SIZE || self.height < MIN_SIZE {
            return None;
        }
        let image = match self.format {
            PixelFormat::Rgba8 => self,
            _ => self.to_rgba(),
        };
        let image = if image.width > MAX_SIZE || image.height > MAX_SIZE {
            resize::resize(
                &image,
                MAX_SIZE,
                MAX_SIZE,
                ResizeQuality::HighQuality,
            )
        } else if image.width != image.height {
            let side = image.width.max(image.height);
            resize::resize(&image, side, side, ResizeQuality::HighQuality)
        } else {
            image
        };
        Some(image)
    }

    /// Applies [`IconImage::normalize`] to each image in turn, dropping
    /// rejected images and preserving the order of the rest.
    pub fn normalize_all(images: Vec<IconImage>) -> Vec<IconImage> {
        images.into_iter().filter_map(IconImage::normalize).collect()
    }

    pub(crate) fn read_png_info<R: Read>(
        reader: R,
    ) -> io::Result<png::Reader<R>> {
        let decoder = png::Decoder::new(reader);
        let png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        let info = png_reader.info();
        if info.width == 0 || info.height == 0 {
            invalid_data!(
                "Invalid PNG dimensions ({}x{})",
                info.width,
                info.height
            );
        }
        if info.bit_depth != png::BitDepth::Eight {
            invalid_data!("Unsupported PNG bit depth: {:?}", info.bit_depth);
        }
        Ok(png_reader)
    }

    /// Decodes an image from a PNG file, keeping the source color type as
    /// the image's pixel format.  Returns an error if the PNG data is
    /// malformed or can't be decoded.
    pub fn read_png<R: Read>(reader: R) -> io::Result<IconImage> {
        let mut png_reader = IconImage::read_png_info(reader)?;
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        match png_reader.next_frame(&mut buffer) {
            Ok(_) => {}
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        }
        let format = match png_reader.info().color_type {
            png::ColorType::Rgba => PixelFormat::Rgba8,
            png::ColorType::Rgb => PixelFormat::Rgb8,
            png::ColorType::GrayscaleAlpha => PixelFormat::GrayAlpha8,
            png::ColorType::Grayscale => PixelFormat::Gray8,
            png::ColorType::Indexed => {
                invalid_data!(
                    "Unsupported PNG color type: {:?}",
                    png_reader.info().color_type
                );
            }
        };
        Ok(IconImage::new(
            png_reader.info().width,
            png_reader.info().height,
            format,
            buffer,
        ))
    }

    /// Encodes the image as a PNG file in the canonical 32-bit RGBA form.
    pub fn write_png<W: Write>(&self, writer: W) -> io::Result<()> {
        let _bits_per_pixel = self.write_png_internal(writer)?;
        Ok(())
    }

    /// Encodes the image as a PNG file and returns the bits-per-pixel.
    pub(crate) fn write_png_internal<W: Write>(
        &self,
        writer: W,
    ) -> io::Result<u16> {
        match self.write_png_internal_enc(writer) {
            Ok(bits_per_pixel) => Ok(bits_per_pixel),
            Err(png::EncodingError::IoError(error)) => Err(error),
            Err(png::EncodingError::Format(error)) => {
                invalid_input!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                invalid_input!("PNG limits exceeded");
            }
            Err(png::EncodingError::Parameter(error)) => {
                invalid_input!("PNG parameter error: {}", error);
            }
        }
    }

    fn write_png_internal_enc<W: Write>(
        &self,
        writer: W,
    ) -> Result<u16, png::EncodingError> {
        let rgba = self.to_rgba();
        let mut encoder = png::Encoder::new(writer, rgba.width, rgba.height);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_color(png::ColorType::Rgba);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba.data)?;
        Ok(32)
    }
}

//===========================================================================//


//===========================================================================//
