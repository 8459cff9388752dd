use crate::image::IconImage;
use std::cmp::Ordering;

//===========================================================================//

// Candidate ordering used when choosing a source for a target size.
pub(crate) fn ascending(a: &IconImage, b: &IconImage) -> Ordering {
    a.width().cmp(&b.width()).then(a.height().cmp(&b.height()))
}

/// Chooses the best source image for a target size from candidates sorted
/// ascending by width, then height.  Returns the first candidate at least
/// `target` wide (the smallest source that needs no upscaling), or the
/// largest candidate when every source is narrower than the target.
/// Returns `None` only when `sorted` is empty.
pub fn best_source(sorted: &[IconImage], target: u32) -> Option<&IconImage> {
    for image in sorted.iter() {
        if image.width() >= target {
            return Some(image);
        }
    }
    sorted.last()
}

//===========================================================================//


//===========================================================================//
