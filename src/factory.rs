use crate::icondir::{IconDir, IconDirEntry};
use crate::image::IconImage;
use crate::layout::{SizeProfile, TargetSizes};
use crate::resize::{self, ResizeQuality};
use crate::select;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

//===========================================================================//

/// Packs a set of source images into an ICO container with raw bitmap
/// payloads, writing the result sequentially to `sink`.
///
/// Every source is normalized first; images below the minimum size are
/// silently dropped.  When `sizes` is given, one entry is produced per
/// target size, rendered from the smallest source at least as wide as the
/// target (falling back to the largest source when all are narrower).  When
/// `sizes` is `None`, the normalized images are packed as-is, in order.  An
/// input set with no usable images yields a valid container with zero
/// entries.
pub fn convert<W: Write>(
    images: Vec<IconImage>,
    sizes: Option<&TargetSizes>,
    sink: &mut W,
) -> io::Result<()> {
    let mut candidates = IconImage::normalize_all(images);
    let rendered = match sizes {
        Some(sizes) => {
            candidates.sort_by(select::ascending);
            let mut rendered = Vec::with_capacity(sizes.sizes().len());
            for &target in sizes.sizes() {
                if let Some(source) =
                    select::best_source(&candidates, target)
                {
                    rendered.push(resize::resize(
                        source,
                        target,
                        target,
                        ResizeQuality::HighQuality,
                    ));
                }
            }
            rendered
        }
        None => candidates,
    };
    let mut icondir = IconDir::new();
    for image in rendered.iter() {
        icondir.add_entry(IconDirEntry::encode_as_bmp(image)?);
    }
    icondir.write(sink)
}

/// Renders a single source image at every size in `profile` that does not
/// exceed the source's own larger dimension (sizes are never upscaled), and
/// packs the renditions into an ICO container with PNG payloads.
///
/// The payloads are committed by seeking to their precomputed offsets, so
/// the sink must support seeking.  The caller keeps ownership of the sink.
pub fn save<W: Write + Seek>(
    image: IconImage,
    profile: SizeProfile,
    sink: &mut W,
) -> io::Result<()> {
    let rendered = match image.normalize() {
        Some(source) => {
            let side = source.width().max(source.height());
            profile
                .sizes()
                .iter()
                .filter(|&&size| size <= side)
                .map(|&size| {
                    resize::resize(
                        &source,
                        size,
                        size,
                        ResizeQuality::HighQuality,
                    )
                })
                .collect()
        }
        None => Vec::new(),
    };
    save_images(rendered, sink)
}

/// Packs a pre-built image list into an ICO container with PNG payloads,
/// seek-writing each payload at its precomputed offset.  Images are
/// normalized (dropping undersized ones) and sorted descending by width,
/// then height, before encoding.
pub fn save_images<W: Write + Seek>(
    images: Vec<IconImage>,
    sink: &mut W,
) -> io::Result<()> {
    let mut images = IconImage::normalize_all(images);
    images.sort_by(|a, b| select::ascending(b, a));
    let mut icondir = IconDir::new();
    for image in images.iter() {
        icondir.add_entry(IconDirEntry::encode_as_png(image)?);
    }
    icondir.write_seeking(sink)
}

/// Like [`save`], but writes to a file path with truncate-create
/// semantics.  The file handle is owned here and closed on return.
pub fn save_file<P: AsRef<Path>>(
    image: IconImage,
    profile: SizeProfile,
    path: P,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    save(image, profile, &mut file)
}

//===========================================================================//


//===========================================================================//
