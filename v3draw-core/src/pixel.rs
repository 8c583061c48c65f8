//! Pixel types supported by the `.v3draw` format.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample encoding of a volume.
///
/// `Rgb` is not a distinct on-disk encoding: it is stored as three 8-bit
/// channels holding the red, green and blue components in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PixelType {
    /// Unsigned 8-bit grayscale.
    Gray8,
    /// Unsigned 16-bit grayscale.
    Gray16,
    /// 32-bit IEEE-754 float grayscale.
    Gray32Float,
    /// 8-bit RGB, split into three channel planes.
    Rgb,
}

impl PixelType {
    /// Bytes per stored sample.
    #[must_use]
    pub const fn unit_size(self) -> u16 {
        match self {
            Self::Gray8 | Self::Rgb => 1,
            Self::Gray16 => 2,
            Self::Gray32Float => 4,
        }
    }

    /// Channel count implied by the pixel type, if any.
    #[must_use]
    pub const fn implied_channels(self) -> Option<u32> {
        match self {
            Self::Rgb => Some(3),
            _ => None,
        }
    }

    /// Maps a host bit depth onto a pixel type.
    ///
    /// Hosts that describe images by bit depth report 8, 16, 24 (packed RGB)
    /// or 32 (float).
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPixelType`] for any other depth.
    pub fn from_bit_depth(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(Self::Gray8),
            16 => Ok(Self::Gray16),
            24 => Ok(Self::Rgb),
            32 => Ok(Self::Gray32Float),
            other => Err(Error::UnsupportedPixelType(format!("{other}-bit samples"))),
        }
    }

    /// Short lowercase name used in logs and CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray8 => "gray8",
            Self::Gray16 => "gray16",
            Self::Gray32Float => "gray32-float",
            Self::Rgb => "rgb",
        }
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_size() {
        assert_eq!(PixelType::Gray8.unit_size(), 1);
        assert_eq!(PixelType::Gray16.unit_size(), 2);
        assert_eq!(PixelType::Gray32Float.unit_size(), 4);
        assert_eq!(PixelType::Rgb.unit_size(), 1);
    }

    #[test]
    fn test_from_bit_depth() {
        assert_eq!(PixelType::from_bit_depth(16).unwrap(), PixelType::Gray16);
        assert_eq!(PixelType::from_bit_depth(24).unwrap(), PixelType::Rgb);
        assert!(matches!(
            PixelType::from_bit_depth(12),
            Err(Error::UnsupportedPixelType(_))
        ));
    }
}
