//! Big-endian plane encoding.
//!
//! Every pixel type goes through the same path: check the plane against
//! the expected sample count, pick the sample buffer for the requested
//! channel, and write each sample most-significant byte first.

use crate::{Error, FileLayout, Plane, PlaneCoordinate, Result};

/// A sample that can be stored big-endian.
pub trait BigEndianSample: Copy {
    /// Bytes per encoded sample.
    const WIDTH: usize;

    /// Writes the sample into `out`, which is exactly `WIDTH` bytes long.
    fn write_be(self, out: &mut [u8]);
}

impl BigEndianSample for u8 {
    const WIDTH: usize = 1;

    #[inline]
    fn write_be(self, out: &mut [u8]) {
        out[0] = self;
    }
}

impl BigEndianSample for u16 {
    const WIDTH: usize = 2;

    #[inline]
    fn write_be(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_be_bytes());
    }
}

impl BigEndianSample for f32 {
    const WIDTH: usize = 4;

    #[inline]
    fn write_be(self, out: &mut [u8]) {
        // NaNs are stored in canonical form.
        let bits = if self.is_nan() { 0x7FC0_0000 } else { self.to_bits() };
        out.copy_from_slice(&bits.to_be_bytes());
    }
}

/// Encodes a sample slice into `out`, preserving element order.
///
/// # Errors
/// Returns [`Error::MalformedPlane`] if `out` is not `samples.len() * T::WIDTH` bytes.
pub fn encode_samples<T: BigEndianSample>(samples: &[T], out: &mut [u8]) -> Result<()> {
    if out.len() != samples.len() * T::WIDTH {
        return Err(Error::malformed(format!(
            "{} samples need {} bytes, destination holds {}",
            samples.len(),
            samples.len() * T::WIDTH,
            out.len()
        )));
    }
    for (&s, dst) in samples.iter().zip(out.chunks_exact_mut(T::WIDTH)) {
        s.write_be(dst);
    }
    Ok(())
}

fn check_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "{what} holds {actual} samples, expected {expected}"
        )))
    }
}

/// Encodes the samples of `channel` from `plane` into `out`.
///
/// `out` must be exactly one plane long: `expected_samples * unit_size`
/// bytes. For grayscale planes `channel` only labels the plane; for RGB it
/// selects the component (0 red, 1 green, 2 blue).
///
/// # Errors
/// Returns [`Error::MalformedPlane`] if any buffer length differs from
/// `expected_samples`, the RGB component index is above 2, or `out` has the
/// wrong size. Nothing is written to `out` on error.
pub fn encode_plane_into(
    plane: &Plane<'_>,
    channel: u32,
    expected_samples: usize,
    out: &mut [u8],
) -> Result<()> {
    match plane {
        Plane::Gray8(s) => {
            check_len("gray8 plane", s.len(), expected_samples)?;
            encode_samples(&**s, out)
        }
        Plane::Gray16(s) => {
            check_len("gray16 plane", s.len(), expected_samples)?;
            encode_samples(&**s, out)
        }
        Plane::Gray32Float(s) => {
            check_len("gray32-float plane", s.len(), expected_samples)?;
            encode_samples(&**s, out)
        }
        Plane::Rgb { red, green, blue } => {
            check_len("red component", red.len(), expected_samples)?;
            check_len("green component", green.len(), expected_samples)?;
            check_len("blue component", blue.len(), expected_samples)?;
            let component = match channel {
                0 => red,
                1 => green,
                2 => blue,
                other => {
                    return Err(Error::malformed(format!(
                        "rgb plane has no component for channel {other}"
                    )))
                }
            };
            encode_samples(&**component, out)
        }
    }
}

/// Encodes the samples of `channel` from `plane` into a new buffer.
///
/// # Errors
/// See [`encode_plane_into`].
pub fn encode_plane(plane: &Plane<'_>, channel: u32, expected_samples: usize) -> Result<Vec<u8>> {
    let unit = usize::from(plane.pixel_type().unit_size());
    let mut out = vec![0u8; expected_samples * unit];
    encode_plane_into(plane, channel, expected_samples, &mut out)?;
    Ok(out)
}

impl FileLayout {
    /// Checks a plane against this layout and encodes it into `out`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCoordinate`] for coordinates outside the
    /// volume and [`Error::MalformedPlane`], tagged with `at`, when the plane
    /// type or length does not match the layout.
    pub fn encode_plane_into(&self, at: PlaneCoordinate, plane: &Plane<'_>, out: &mut [u8]) -> Result<()> {
        if !self.contains(at) {
            return Err(Error::InvalidCoordinate {
                z: at.z,
                channel: at.channel,
            });
        }
        if plane.pixel_type() != self.pixel_type {
            return Err(Error::malformed(format!(
                "{} plane supplied for a {} volume",
                plane.pixel_type(),
                self.pixel_type
            ))
            .at(at));
        }
        encode_plane_into(plane, at.channel, self.plane_len(), out).map_err(|e| e.at(at))
    }

    /// Checks a plane against this layout and encodes it into a new buffer.
    ///
    /// # Errors
    /// See [`FileLayout::encode_plane_into`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_plane(&self, at: PlaneCoordinate, plane: &Plane<'_>) -> Result<Vec<u8>> {
        // plane_bytes fits in usize, checked in `plan`.
        let mut out = vec![0u8; self.plane_bytes as usize];
        self.encode_plane_into(at, plane, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelType, VolumeDescriptor};
    use approx::assert_relative_eq;
    use std::borrow::Cow;

    #[test]
    fn test_gray8_identity() {
        let plane = Plane::from(vec![0u8, 7, 255]);
        assert_eq!(encode_plane(&plane, 0, 3).unwrap(), vec![0, 7, 255]);
    }

    #[test]
    fn test_gray16_big_endian() {
        let plane = Plane::from(vec![0x1234u16, 0xABCD]);
        assert_eq!(
            encode_plane(&plane, 0, 2).unwrap(),
            vec![0x12, 0x34, 0xAB, 0xCD]
        );
        let bytes = encode_plane(&Plane::from(vec![0x1234u16]), 0, 1).unwrap();
        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), 0x1234);
    }

    #[test]
    fn test_gray32_float_bit_pattern() {
        let plane = Plane::from(vec![1.0f32, -2.5]);
        let bytes = encode_plane(&plane, 0, 2).unwrap();
        assert_eq!(&bytes[..4], &[0x3F, 0x80, 0x00, 0x00]);
        let back = f32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_relative_eq!(back, -2.5);
    }

    #[test]
    fn test_gray32_float_canonical_nan() {
        let samples: Vec<f32> = [0x7FC0_0001u32, 0xFFC0_0000, 0x7F80_0001, 0x7F80_0000]
            .into_iter()
            .map(f32::from_bits)
            .collect();
        let bytes = encode_plane(&Plane::from(samples), 0, 4).unwrap();
        for nan in bytes[..12].chunks_exact(4) {
            assert_eq!(nan, &[0x7F, 0xC0, 0x00, 0x00]);
        }
        // Infinity is not a NaN and keeps its bits.
        assert_eq!(&bytes[12..], &[0x7F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_rgb_component_selection() {
        let plane = Plane::Rgb {
            red: Cow::Owned(vec![10, 20]),
            green: Cow::Owned(vec![30, 40]),
            blue: Cow::Owned(vec![50, 60]),
        };
        assert_eq!(encode_plane(&plane, 0, 2).unwrap(), vec![10, 20]);
        assert_eq!(encode_plane(&plane, 1, 2).unwrap(), vec![30, 40]);
        assert_eq!(encode_plane(&plane, 2, 2).unwrap(), vec![50, 60]);
        assert!(matches!(
            encode_plane(&plane, 3, 2),
            Err(Error::MalformedPlane { .. })
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let plane = Plane::from(vec![1u16, 2, 3]);
        assert!(matches!(
            encode_plane(&plane, 0, 4),
            Err(Error::MalformedPlane { .. })
        ));
    }

    #[test]
    fn test_rgb_component_mismatch_rejected() {
        let plane = Plane::Rgb {
            red: Cow::Owned(vec![1, 2]),
            green: Cow::Owned(vec![3, 4]),
            blue: Cow::Owned(vec![5]),
        };
        // Even channel 0 fails: the whole slice is malformed.
        assert!(encode_plane(&plane, 0, 2).is_err());
    }

    #[test]
    fn test_encode_into_leaves_buffer_on_error() {
        let plane = Plane::from(vec![0xFFFFu16; 3]);
        let mut out = [0u8; 8];
        assert!(encode_plane_into(&plane, 0, 4, &mut out).is_err());
        assert_eq!(out, [0u8; 8]);
    }

    #[test]
    fn test_layout_rejects_type_mismatch() {
        let desc = VolumeDescriptor::new(2, 1, 1, 1, PixelType::Gray16);
        let layout = FileLayout::plan(&desc).unwrap();
        let err = layout
            .encode_plane(PlaneCoordinate::new(0, 0), &Plane::from(vec![1u8, 2]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedPlane {
                coordinate: Some(PlaneCoordinate::new(0, 0)),
                reason: "gray8 plane supplied for a gray16 volume".to_string(),
            }
        );
    }

    #[test]
    fn test_layout_encodes_rgb_channel() {
        let desc = VolumeDescriptor::new(2, 1, 1, 1, PixelType::Rgb);
        let layout = FileLayout::plan(&desc).unwrap();
        let plane = Plane::from_interleaved_rgb(&[10, 30, 50, 20, 40, 60]);
        assert_eq!(
            layout.encode_plane(PlaneCoordinate::new(0, 1), &plane).unwrap(),
            vec![30, 40]
        );
        assert!(matches!(
            layout.encode_plane(PlaneCoordinate::new(1, 0), &plane),
            Err(Error::InvalidCoordinate { z: 1, channel: 0 })
        ));
    }
}
