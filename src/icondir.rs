use crate::image::IconImage;
use crate::layout::{
    BMP_HEADER_LEN, DIR_ENTRY_LEN, HEADER_LEN, ICON_RESOURCE_TYPE,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

/// A collection of images; the contents of a single ICO file.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty icon collection.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Adds an entry to the collection.
    pub fn add_entry(&mut self, entry: IconDirEntry) {
        self.entries.push(entry);
    }

    /// Reads an ICO file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_RESOURCE_TYPE {
            invalid_data!(
                "Invalid resource type (was {}, but must be {})",
                restype,
                ICON_RESOURCE_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        let mut spans = Vec::<(u32, u32)>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let _num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let _color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            // A width/height byte of zero stands in for 256; the byte can't
            // represent the full dimension range.
            let width = if width_byte == 0 { 256 } else { width_byte as u32 };
            let height =
                if height_byte == 0 { 256 } else { height_byte as u32 };
            spans.push((data_offset, data_size));
            entries.push(IconDirEntry {
                width,
                height,
                bits_per_pixel,
                data: Vec::new(),
            });
        }
        for (index, &(data_offset, data_size)) in spans.iter().enumerate() {
            reader.seek(SeekFrom::Start(data_offset as u64))?;
            let mut data = vec![0u8; data_size as usize];
            reader.read_exact(&mut data)?;
            entries[index].data = data;
        }
        // Prefer the dimensions recorded in the payload itself, since the
        // directory bytes saturate at 256.  If a payload is malformed, keep
        // the directory's guess and defer the error until decode.
        for entry in entries.iter_mut() {
            if let Ok((width, height)) = entry.decode_size() {
                entry.width = width;
                entry.height = height;
            }
        }
        Ok(IconDir { entries })
    }

    /// Writes an ICO file to the given sink, committing the header,
    /// directory, and payloads strictly sequentially.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        self.write_header_and_directory(&mut writer)?;
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Writes an ICO file to the given sink, committing the header and
    /// directory sequentially and then each payload with a seek to its
    /// precomputed offset.  The output bytes are identical to
    /// [`IconDir::write`]; this form exists for sinks that are populated
    /// out of order.
    pub fn write_seeking<W: Write + Seek>(
        &self,
        mut writer: W,
    ) -> io::Result<()> {
        self.write_header_and_directory(&mut writer)?;
        let mut data_offset =
            HEADER_LEN + DIR_ENTRY_LEN * (self.entries.len() as u32);
        for entry in self.entries.iter() {
            writer.seek(SeekFrom::Start(data_offset as u64))?;
            writer.write_all(&entry.data)?;
            data_offset += entry.data.len() as u32;
        }
        Ok(())
    }

    fn write_header_and_directory<W: Write>(
        &self,
        writer: &mut W,
    ) -> io::Result<()> {
        if self.entries.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many entries in IconDir (was {}, but max is {})",
                self.entries.len(),
                u16::MAX
            );
        }
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        let mut data_offset =
            HEADER_LEN + DIR_ENTRY_LEN * (self.entries.len() as u32);
        for entry in self.entries.iter() {
            // A width/height byte of zero indicates a size of 256 or more.
            let width = if entry.width > 255 { 0 } else { entry.width as u8 };
            writer.write_u8(width)?;
            let height =
                if entry.height > 255 { 0 } else { entry.height as u8 };
            writer.write_u8(height)?;
            writer.write_u8(0)?; // color count
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(1)?; // color planes
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            let data_size = entry.data.len() as u32;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
            data_offset += data_size;
        }
        Ok(())
    }
}

impl Default for IconDir {
    fn default() -> IconDir {
        IconDir::new()
    }
}

//===========================================================================//

/// One entry in an ICO file; a single image payload and its directory
/// metadata.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bits-per-pixel (color depth) of the image.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns true if the payload is a PNG stream, or false if it is a raw
    /// bitmap.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encodes an image as a raw bitmap payload: a 40-byte bitmap info
    /// header (with the height field doubled, per the icon convention)
    /// followed by one 4-byte BGRA pixel per sample, written row-major from
    /// the top row down.
    pub fn encode_as_bmp(image: &IconImage) -> io::Result<IconDirEntry> {
        let rgba = image.to_rgba();
        let width = rgba.width();
        let height = rgba.height();
        let image_size = (width as u64) * (height as u64) * 4;
        if image_size > (u32::MAX as u64) - (BMP_HEADER_LEN as u64) {
            invalid_input!(
                "Image too large for a bitmap payload ({}x{})",
                width,
                height
            );
        }
        let image_size = image_size as u32;
        let mut data =
            Vec::<u8>::with_capacity((BMP_HEADER_LEN + image_size) as usize);
        data.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;
        data.write_u32::<LittleEndian>(width)?;
        data.write_u32::<LittleEndian>(height * 2)?;
        data.write_u16::<LittleEndian>(1)?; // planes
        data.write_u16::<LittleEndian>(32)?; // bit count
        data.write_u32::<LittleEndian>(0)?; // compression
        data.write_u32::<LittleEndian>(image_size)?;
        data.write_i32::<LittleEndian>(0)?; // horz ppm
        data.write_i32::<LittleEndian>(0)?; // vert ppm
        data.write_u32::<LittleEndian>(0)?; // colors used
        data.write_u32::<LittleEndian>(0)?; // colors important
        debug_assert_eq!(data.len(), BMP_HEADER_LEN as usize);
        for pixel in rgba.data().chunks_exact(4) {
            data.write_u8(pixel[2])?;
            data.write_u8(pixel[1])?;
            data.write_u8(pixel[0])?;
            data.write_u8(pixel[3])?;
        }
        debug_assert_eq!(data.len(), (BMP_HEADER_LEN + image_size) as usize);
        Ok(IconDirEntry {
            width,
            height,
            bits_per_pixel: rgba.format().bits_per_pixel(),
            data,
        })
    }

    /// Encodes an image as a PNG payload in the canonical 32-bit RGBA form.
    pub fn encode_as_png(image: &IconImage) -> io::Result<IconDirEntry> {
        let mut data = Vec::new();
        let bits_per_pixel = image.write_png_internal(&mut data)?;
        Ok(IconDirEntry {
            width: image.width(),
            height: image.height(),
            bits_per_pixel,
            data,
        })
    }

    /// Decodes just enough of the payload to determine its dimensions.
    pub(crate) fn decode_size(&self) -> io::Result<(u32, u32)> {
        if self.is_png() {
            let png_reader = IconImage::read_png_info(self.data.as_slice())?;
            Ok((png_reader.info().width, png_reader.info().height))
        } else {
            read_bmp_size(&mut self.data.as_slice())
        }
    }

    /// Decodes this entry back into an image.  Returns an error if the
    /// payload is malformed or its dimensions disagree with the directory.
    pub fn decode(&self) -> io::Result<IconImage> {
        let image = if self.is_png() {
            IconImage::read_png(self.data.as_slice())?
        } else {
            read_bmp(&mut self.data.as_slice())?
        };
        if image.width() != self.width || image.height() != self.height {
            invalid_data!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {}x{})",
                image.width(),
                image.height(),
                self.width,
                self.height
            );
        }
        Ok(image)
    }
}

//===========================================================================//

fn read_bmp_size<R: Read>(reader: &mut R) -> io::Result<(u32, u32)> {
    let header_size = reader.read_u32::<LittleEndian>()?;
    if header_size != BMP_HEADER_LEN {
        invalid_data!(
            "Invalid bitmap header size (was {}, must be {})",
            header_size,
            BMP_HEADER_LEN
        );
    }
    let width = reader.read_i32::<LittleEndian>()?;
    if width <= 0 {
        invalid_data!("Invalid bitmap width ({})", width);
    }
    let height = reader.read_i32::<LittleEndian>()?;
    if height <= 0 || height % 2 != 0 {
        // The height field counts both the color rows and the mask rows, so
        // it must be positive and divisible by 2.
        invalid_data!(
            "Invalid height field in bitmap header \
             (was {}, but must be positive and divisible by 2)",
            height
        );
    }
    Ok((width as u32, (height / 2) as u32))
}

// Decodes the 32-bpp uncompressed payload form produced by
// `IconDirEntry::encode_as_bmp` (top-to-bottom BGRA rows, no mask).
fn read_bmp<R: Read>(reader: &mut R) -> io::Result<IconImage> {
    let (width, height) = read_bmp_size(reader)?;
    let _planes = reader.read_u16::<LittleEndian>()?;
    let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
    if bits_per_pixel != 32 {
        invalid_data!(
            "Unsupported bitmap bits-per-pixel ({})",
            bits_per_pixel
        );
    }
    let compression = reader.read_u32::<LittleEndian>()?;
    if compression != 0 {
        invalid_data!(
            "Unsupported bitmap compression ({})",
            compression
        );
    }
    let _image_size = reader.read_u32::<LittleEndian>()?;
    let _horz_ppm = reader.read_i32::<LittleEndian>()?;
    let _vert_ppm = reader.read_i32::<LittleEndian>()?;
    let _colors_used = reader.read_u32::<LittleEndian>()?;
    let _colors_important = reader.read_u32::<LittleEndian>()?;
    let num_pixels = match width.checked_mul(height) {
        Some(num) => num as usize,
        None => invalid_data!("Width * Height is too large"),
    };
    let mut bgra = vec![0u8; num_pixels * 4];
    reader.read_exact(&mut bgra)?;
    let mut rgba = Vec::<u8>::with_capacity(num_pixels * 4);
    for pixel in bgra.chunks_exact(4) {
        rgba.push(pixel[2]);
        rgba.push(pixel[1]);
        rgba.push(pixel[0]);
        rgba.push(pixel[3]);
    }
    Ok(IconImage::from_rgba_data(width, height, rgba))
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{IconDir, IconDirEntry};
    use crate::image::IconImage;
    use std::io::Cursor;

    #[test]
    fn write_empty_icon_set() {
        let icondir = IconDir::new();
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn read_empty_icon_set() {
        let input = b"\x00\x00\x01\x00\x00\x00";
        let icondir = IconDir::read(Cursor::new(input)).unwrap();
        assert_eq!(icondir.entries().len(), 0);
    }

    #[test]
    fn read_rejects_cursor_files() {
        let input = b"\x00\x00\x02\x00\x00\x00";
        assert!(IconDir::read(Cursor::new(input)).is_err());
    }

    #[test]
    fn bmp_entry_layout() {
        let image = IconImage::from_rgba_data(
            2,
            1,
            vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80],
        );
        let entry = IconDirEntry::encode_as_bmp(&image).unwrap();
        assert!(!entry.is_png());
        assert_eq!(entry.bits_per_pixel(), 32);
        assert_eq!(entry.data().len(), 40 + 2 * 1 * 4);
        // Doubled height field.
        assert_eq!(&entry.data()[8..12], &[2, 0, 0, 0]);
        // First pixel, in B,G,R,A order.
        assert_eq!(&entry.data()[40..44], &[0x30, 0x20, 0x10, 0x40]);
    }

    #[test]
    fn bmp_entry_round_trip() {
        let mut rgba = Vec::new();
        for index in 0..(6 * 4) {
            rgba.extend_from_slice(&[
                index as u8,
                (index * 3) as u8,
                (index * 7) as u8,
                0x80,
            ]);
        }
        let image = IconImage::from_rgba_data(6, 4, rgba.clone());
        let entry = IconDirEntry::encode_as_bmp(&image).unwrap();
        let decoded = entry.decode().unwrap();
        assert_eq!(decoded.width(), 6);
        assert_eq!(decoded.height(), 4);
        assert_eq!(decoded.data(), rgba.as_slice());
    }

    #[test]
    fn png_entry_round_trip() {
        let mut rgba = Vec::new();
        for index in 0..(8 * 8) {
            rgba.extend_from_slice(&[index as u8, 0, 0, 0xff]);
        }
        let image = IconImage::from_rgba_data(8, 8, rgba.clone());
        let entry = IconDirEntry::encode_as_png(&image).unwrap();
        assert!(entry.is_png());
        assert_eq!(entry.bits_per_pixel(), 32);
        let decoded = entry.decode().unwrap();
        assert_eq!(decoded.data(), rgba.as_slice());
    }

    #[test]
    fn directory_offsets_are_contiguous() {
        let mut icondir = IconDir::new();
        for side in [2u32, 3, 4] {
            let image = IconImage::from_rgba_data(
                side,
                side,
                vec![0u8; (side * side * 4) as usize],
            );
            icondir.add_entry(IconDirEntry::encode_as_bmp(&image).unwrap());
        }
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let mut expected_offset = 6 + 16 * 3;
        for (index, entry) in icondir.entries().iter().enumerate() {
            let base = 6 + 16 * index;
            let offset_bytes: [u8; 4] =
                output[base + 12..base + 16].try_into().unwrap();
            assert_eq!(u32::from_le_bytes(offset_bytes), expected_offset);
            let size_bytes: [u8; 4] =
                output[base + 8..base + 12].try_into().unwrap();
            assert_eq!(
                u32::from_le_bytes(size_bytes),
                entry.data().len() as u32
            );
            expected_offset += entry.data().len() as u32;
        }
        assert_eq!(output.len() as u32, expected_offset);
    }

    #[test]
    fn seeking_write_matches_sequential_write() {
        let mut icondir = IconDir::new();
        for side in [16u32, 8] {
            let image = IconImage::from_rgba_data(
                side,
                side,
                vec![0x5au8; (side * side * 4) as usize],
            );
            icondir.add_entry(IconDirEntry::encode_as_png(&image).unwrap());
        }
        let mut sequential = Vec::<u8>::new();
        icondir.write(&mut sequential).unwrap();
        let mut seeking = Cursor::new(Vec::<u8>::new());
        icondir.write_seeking(&mut seeking).unwrap();
        assert_eq!(seeking.into_inner(), sequential);
    }

    #[test]
    fn size_sentinel_round_trips() {
        let image =
            IconImage::from_rgba_data(256, 256, vec![0u8; 256 * 256 * 4]);
        let mut icondir = IconDir::new();
        icondir.add_entry(IconDirEntry::encode_as_bmp(&image).unwrap());
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        // Width and height bytes both use the 256 -> 0 sentinel.
        assert_eq!(output[6], 0);
        assert_eq!(output[7], 0);
        let icondir = IconDir::read(Cursor::new(&output)).unwrap();
        assert_eq!(icondir.entries()[0].width(), 256);
        assert_eq!(icondir.entries()[0].height(), 256);
    }
}

//===========================================================================//
