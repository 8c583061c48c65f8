//! File layout planning.
//!
//! A `.v3draw` body is channel-major: all z-slices of channel 0, then all
//! z-slices of channel 1, and so on. Every plane therefore has a fixed
//! offset that depends only on its coordinate, which lets writers place
//! planes in any order.

use crate::{Error, PixelType, PlaneCoordinate, Result, VolumeDescriptor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the fixed header in bytes.
pub const HEADER_LEN: u64 = 43;

/// Byte layout of one `.v3draw` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileLayout {
    /// Width in samples.
    pub width: u32,
    /// Height in samples.
    pub height: u32,
    /// Number of z-slices.
    pub depth: u32,
    /// Number of stored channels.
    pub channels: u32,
    /// Sample encoding.
    pub pixel_type: PixelType,
    /// Bytes per sample.
    pub unit_size: u16,
    /// Bytes per plane (`width * height * unit_size`).
    pub plane_bytes: u64,
    /// Bytes per channel (`plane_bytes * depth`).
    pub color_offset: u64,
    /// Total file length including the header.
    pub total_len: u64,
}

impl FileLayout {
    /// Plans the layout for a descriptor.
    ///
    /// # Errors
    /// - [`Error::UnsupportedDimensionality`] if the frame count is not 1.
    /// - [`Error::EmptyDimension`] if any axis is zero.
    /// - [`Error::LayoutOverflow`] if the file length does not fit in `u64`
    ///   or a plane does not fit in memory on this platform.
    pub fn plan(descriptor: &VolumeDescriptor) -> Result<Self> {
        if descriptor.frame_count() != 1 {
            return Err(Error::UnsupportedDimensionality {
                frames: descriptor.frame_count(),
            });
        }

        let width = descriptor.width();
        let height = descriptor.height();
        let depth = descriptor.depth();
        let channels = descriptor.channel_count();
        for (axis, value) in [
            ("width", width),
            ("height", height),
            ("depth", depth),
            ("channel count", channels),
        ] {
            if value == 0 {
                return Err(Error::EmptyDimension(axis));
            }
        }

        let pixel_type = descriptor.pixel_type();
        let unit_size = pixel_type.unit_size();

        let plane_bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|n| n.checked_mul(u64::from(unit_size)))
            .ok_or(Error::LayoutOverflow)?;
        // Planes are encoded through in-memory buffers.
        usize::try_from(plane_bytes).map_err(|_| Error::LayoutOverflow)?;

        let color_offset = plane_bytes
            .checked_mul(u64::from(depth))
            .ok_or(Error::LayoutOverflow)?;
        let total_len = color_offset
            .checked_mul(u64::from(channels))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .ok_or(Error::LayoutOverflow)?;

        Ok(Self {
            width,
            height,
            depth,
            channels,
            pixel_type,
            unit_size,
            plane_bytes,
            color_offset,
            total_len,
        })
    }

    /// Number of samples in one plane (per component for RGB).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn plane_len(&self) -> usize {
        // Checked against usize in `plan`.
        (u64::from(self.width) * u64::from(self.height)) as usize
    }

    /// Length of the pixel body in bytes.
    #[must_use]
    pub fn body_len(&self) -> u64 {
        self.total_len - HEADER_LEN
    }

    /// Returns true if the coordinate lies inside the volume.
    #[must_use]
    pub fn contains(&self, at: PlaneCoordinate) -> bool {
        at.z < self.depth && at.channel < self.channels
    }

    /// Byte offset of the plane for `channel` and `z`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCoordinate`] if the coordinate is out of range.
    pub fn offset_of(&self, channel: u32, z: u32) -> Result<u64> {
        let at = PlaneCoordinate::new(z, channel);
        if !self.contains(at) {
            return Err(Error::InvalidCoordinate { z, channel });
        }
        // Bounded by total_len, which was checked in `plan`.
        Ok(HEADER_LEN
            + u64::from(channel) * self.color_offset
            + u64::from(z) * self.plane_bytes)
    }

    /// Byte range occupied by a plane.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCoordinate`] if the coordinate is out of range.
    pub fn plane_range(&self, at: PlaneCoordinate) -> Result<std::ops::Range<u64>> {
        let start = self.offset_of(at.channel, at.z)?;
        Ok(start..start + self.plane_bytes)
    }

    /// All plane coordinates in on-disk order: channel outer, z inner.
    pub fn coordinates(&self) -> impl Iterator<Item = PlaneCoordinate> {
        let depth = self.depth;
        (0..self.channels)
            .flat_map(move |channel| (0..depth).map(move |z| PlaneCoordinate::new(z, channel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray16(width: u32, height: u32, depth: u32, channels: u32) -> VolumeDescriptor {
        VolumeDescriptor::new(width, height, depth, channels, PixelType::Gray16)
    }

    #[test]
    fn test_plan_basic() {
        let layout = FileLayout::plan(&gray16(3, 2, 4, 2)).unwrap();
        assert_eq!(layout.unit_size, 2);
        assert_eq!(layout.plane_bytes, 12);
        assert_eq!(layout.color_offset, 48);
        assert_eq!(layout.total_len, 43 + 96);
        assert_eq!(layout.body_len(), 96);
        assert_eq!(layout.plane_len(), 6);
    }

    #[test]
    fn test_offsets_are_channel_major() {
        let layout = FileLayout::plan(&gray16(3, 2, 4, 2)).unwrap();
        assert_eq!(layout.offset_of(0, 0).unwrap(), 43);
        assert_eq!(layout.offset_of(0, 1).unwrap(), 43 + 12);
        assert_eq!(layout.offset_of(1, 0).unwrap(), 43 + 48);
        assert_eq!(layout.offset_of(1, 3).unwrap(), 43 + 48 + 36);
    }

    #[test]
    fn test_offsets_partition_body() {
        for desc in [
            gray16(3, 2, 4, 2),
            VolumeDescriptor::new(5, 1, 3, 1, PixelType::Gray32Float),
            VolumeDescriptor::new(2, 2, 2, 1, PixelType::Rgb),
            VolumeDescriptor::new(1, 1, 1, 7, PixelType::Gray8),
        ] {
            let layout = FileLayout::plan(&desc).unwrap();
            let mut cursor = HEADER_LEN;
            for at in layout.coordinates() {
                let range = layout.plane_range(at).unwrap();
                assert_eq!(range.start, cursor);
                assert_eq!(range.end - range.start, layout.plane_bytes);
                cursor = range.end;
            }
            assert_eq!(cursor, layout.total_len);
        }
    }

    #[test]
    fn test_rgb_layout() {
        let desc = VolumeDescriptor::new(2, 1, 1, 1, PixelType::Rgb);
        let layout = FileLayout::plan(&desc).unwrap();
        assert_eq!(layout.channels, 3);
        assert_eq!(layout.color_offset, 2);
        assert_eq!(layout.offset_of(2, 0).unwrap(), 43 + 4);
    }

    #[test]
    fn test_large_volume_uses_64_bit_offsets() {
        let layout = FileLayout::plan(&VolumeDescriptor::new(
            4096,
            4096,
            1024,
            3,
            PixelType::Gray32Float,
        ))
        .unwrap();
        assert_eq!(layout.color_offset, 4096 * 4096 * 1024 * 4);
        assert_eq!(layout.offset_of(2, 0).unwrap(), 43 + 2 * (1u64 << 36));
    }

    #[test]
    fn test_rejects_multiple_frames() {
        let err = FileLayout::plan(&gray16(2, 2, 2, 1).with_frames(2)).unwrap_err();
        assert_eq!(err, Error::UnsupportedDimensionality { frames: 2 });
    }

    #[test]
    fn test_rejects_empty_axes() {
        assert_eq!(
            FileLayout::plan(&gray16(0, 2, 2, 1)).unwrap_err(),
            Error::EmptyDimension("width")
        );
        assert_eq!(
            FileLayout::plan(&gray16(2, 2, 0, 1)).unwrap_err(),
            Error::EmptyDimension("depth")
        );
        assert_eq!(
            FileLayout::plan(&gray16(2, 2, 2, 0)).unwrap_err(),
            Error::EmptyDimension("channel count")
        );
    }

    #[test]
    fn test_rejects_overflow() {
        let desc = VolumeDescriptor::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX, PixelType::Gray8);
        assert_eq!(FileLayout::plan(&desc).unwrap_err(), Error::LayoutOverflow);
    }

    #[test]
    fn test_offset_out_of_range() {
        let layout = FileLayout::plan(&gray16(2, 2, 2, 1)).unwrap();
        assert_eq!(
            layout.offset_of(1, 0).unwrap_err(),
            Error::InvalidCoordinate { z: 0, channel: 1 }
        );
        assert!(layout.offset_of(0, 2).is_err());
    }
}
