#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// The size of the ICONDIR header, in bytes.
pub(crate) const HEADER_LEN: u32 = 6;

// The size of one ICONDIRENTRY record, in bytes.
pub(crate) const DIR_ENTRY_LEN: u32 = 16;

// The size of a BITMAPINFOHEADER struct, in bytes.
pub(crate) const BMP_HEADER_LEN: u32 = 40;

// The resource type field value for icon files.
pub(crate) const ICON_RESOURCE_TYPE: u16 = 1;

/// The smallest width/height of an image that can be stored in an icon.
pub const MIN_SIZE: u32 = 2;

/// The largest width/height of an image that can be stored in an icon.
pub const MAX_SIZE: u32 = 256;

const APPLICATION_SIZES: &[u32] = &[256, 128, 64, 48, 32, 24, 16];

const GENERIC_SIZES: &[u32] =
    &[256, 128, 96, 64, 48, 40, 32, 24, 22, 20, 16, 14, 10, 8];

//===========================================================================//

/// A named, predefined list of target icon dimensions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum SizeProfile {
    /// Sizes used by desktop shells for application icons.
    Application,
    /// The broader size list used for file-type icons.
    Generic,
}

impl SizeProfile {
    /// Returns the dimensions in this profile, largest first.
    pub fn sizes(self) -> &'static [u32] {
        match self {
            SizeProfile::Application => APPLICATION_SIZES,
            SizeProfile::Generic => GENERIC_SIZES,
        }
    }
}

//===========================================================================//

/// An ordered, duplicate-free set of target icon dimensions.  Every value
/// must be within `[MIN_SIZE, MAX_SIZE]`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TargetSizes {
    sizes: Vec<u32>,
}

impl TargetSizes {
    /// Creates a target size set from explicit dimensions, preserving the
    /// order of first occurrence and collapsing duplicates.  Returns an
    /// error if any value is outside `[MIN_SIZE, MAX_SIZE]`.
    pub fn new(values: &[u32]) -> std::io::Result<TargetSizes> {
        let mut sizes = Vec::<u32>::with_capacity(values.len());
        for &value in values {
            if value < MIN_SIZE || value > MAX_SIZE {
                invalid_input!(
                    "Invalid target size (was {}, but must be from {} to {})",
                    value,
                    MIN_SIZE,
                    MAX_SIZE
                );
            }
            if !sizes.contains(&value) {
                sizes.push(value);
            }
        }
        Ok(TargetSizes { sizes })
    }

    /// Creates a target size set from a named profile.
    pub fn from_profile(profile: SizeProfile) -> TargetSizes {
        TargetSizes { sizes: profile.sizes().to_vec() }
    }

    /// Returns the dimensions in this set, in order.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }
}

//===========================================================================//


//===========================================================================//
