//! Native-typed plane buffers.

use crate::PixelType;
use std::borrow::Cow;

/// One plane of samples in its native in-memory type.
///
/// Buffers are either borrowed from the host image or owned by the plane,
/// so sources can hand out views without copying.
#[derive(Debug, Clone, PartialEq)]
pub enum Plane<'a> {
    /// Unsigned 8-bit samples.
    Gray8(Cow<'a, [u8]>),
    /// Unsigned 16-bit samples.
    Gray16(Cow<'a, [u16]>),
    /// 32-bit float samples.
    Gray32Float(Cow<'a, [f32]>),
    /// Three same-length component buffers of one RGB slice.
    Rgb {
        red: Cow<'a, [u8]>,
        green: Cow<'a, [u8]>,
        blue: Cow<'a, [u8]>,
    },
}

impl<'a> Plane<'a> {
    /// Splits interleaved `RGBRGB...` bytes into an RGB plane.
    ///
    /// Trailing bytes that do not form a whole pixel are ignored.
    #[must_use]
    pub fn from_interleaved_rgb(pixels: &[u8]) -> Plane<'static> {
        let n = pixels.len() / 3;
        let mut red = Vec::with_capacity(n);
        let mut green = Vec::with_capacity(n);
        let mut blue = Vec::with_capacity(n);
        for px in pixels.chunks_exact(3) {
            red.push(px[0]);
            green.push(px[1]);
            blue.push(px[2]);
        }
        Plane::Rgb {
            red: Cow::Owned(red),
            green: Cow::Owned(green),
            blue: Cow::Owned(blue),
        }
    }

    /// Splits packed `0x00RRGGBB` pixels into an RGB plane.
    #[must_use]
    pub fn from_packed_rgb(pixels: &[u32]) -> Plane<'static> {
        let [red, green, blue] = [16, 8, 0].map(|shift| {
            pixels
                .iter()
                .map(|&px| ((px >> shift) & 0xFF) as u8)
                .collect::<Vec<u8>>()
        });
        Plane::Rgb {
            red: Cow::Owned(red),
            green: Cow::Owned(green),
            blue: Cow::Owned(blue),
        }
    }

    /// The pixel type this plane carries.
    #[must_use]
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::Gray8(_) => PixelType::Gray8,
            Self::Gray16(_) => PixelType::Gray16,
            Self::Gray32Float(_) => PixelType::Gray32Float,
            Self::Rgb { .. } => PixelType::Rgb,
        }
    }

    /// Number of samples per component buffer.
    ///
    /// For RGB this is the red buffer length; the encoder checks the others.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Gray8(s) => s.len(),
            Self::Gray16(s) => s.len(),
            Self::Gray32Float(s) => s.len(),
            Self::Rgb { red, .. } => red.len(),
        }
    }

    /// Returns true if the plane holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows this plane without copying its buffers.
    #[must_use]
    pub fn view(&self) -> Plane<'_> {
        match self {
            Self::Gray8(s) => Plane::Gray8(Cow::Borrowed(&**s)),
            Self::Gray16(s) => Plane::Gray16(Cow::Borrowed(&**s)),
            Self::Gray32Float(s) => Plane::Gray32Float(Cow::Borrowed(&**s)),
            Self::Rgb { red, green, blue } => Plane::Rgb {
                red: Cow::Borrowed(&**red),
                green: Cow::Borrowed(&**green),
                blue: Cow::Borrowed(&**blue),
            },
        }
    }

    /// Converts into a plane that owns its buffers.
    #[must_use]
    pub fn into_owned(self) -> Plane<'static> {
        match self {
            Self::Gray8(s) => Plane::Gray8(Cow::Owned(s.into_owned())),
            Self::Gray16(s) => Plane::Gray16(Cow::Owned(s.into_owned())),
            Self::Gray32Float(s) => Plane::Gray32Float(Cow::Owned(s.into_owned())),
            Self::Rgb { red, green, blue } => Plane::Rgb {
                red: Cow::Owned(red.into_owned()),
                green: Cow::Owned(green.into_owned()),
                blue: Cow::Owned(blue.into_owned()),
            },
        }
    }
}

impl From<Vec<u8>> for Plane<'static> {
    fn from(samples: Vec<u8>) -> Self {
        Plane::Gray8(Cow::Owned(samples))
    }
}

impl From<Vec<u16>> for Plane<'static> {
    fn from(samples: Vec<u16>) -> Self {
        Plane::Gray16(Cow::Owned(samples))
    }
}

impl From<Vec<f32>> for Plane<'static> {
    fn from(samples: Vec<f32>) -> Self {
        Plane::Gray32Float(Cow::Owned(samples))
    }
}

impl<'a> From<&'a [u8]> for Plane<'a> {
    fn from(samples: &'a [u8]) -> Self {
        Plane::Gray8(Cow::Borrowed(samples))
    }
}

impl<'a> From<&'a [u16]> for Plane<'a> {
    fn from(samples: &'a [u16]) -> Self {
        Plane::Gray16(Cow::Borrowed(samples))
    }
}

impl<'a> From<&'a [f32]> for Plane<'a> {
    fn from(samples: &'a [f32]) -> Self {
        Plane::Gray32Float(Cow::Borrowed(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved_rgb() {
        let plane = Plane::from_interleaved_rgb(&[10, 30, 50, 20, 40, 60]);
        assert_eq!(
            plane,
            Plane::Rgb {
                red: Cow::Owned(vec![10, 20]),
                green: Cow::Owned(vec![30, 40]),
                blue: Cow::Owned(vec![50, 60]),
            }
        );
        assert_eq!(plane.len(), 2);
    }

    #[test]
    fn test_from_packed_rgb() {
        let plane = Plane::from_packed_rgb(&[0x000A_1E32, 0xFF14_283C]);
        let Plane::Rgb { red, green, blue } = plane else {
            panic!("expected rgb plane");
        };
        assert_eq!(&*red, &[10, 20]);
        assert_eq!(&*green, &[30, 40]);
        assert_eq!(&*blue, &[50, 60]);
    }

    #[test]
    fn test_view_borrows() {
        let owned = Plane::from(vec![1u16, 2, 3]);
        let view = owned.view();
        assert!(matches!(view, Plane::Gray16(Cow::Borrowed(_))));
        assert_eq!(view.pixel_type(), PixelType::Gray16);
        assert_eq!(view.len(), 3);
    }
}
