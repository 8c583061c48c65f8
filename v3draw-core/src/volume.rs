//! Volume descriptor and plane coordinates.

use crate::PixelType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape and sample type of the volume to be written.
///
/// The descriptor is not validated on construction; [`crate::FileLayout::plan`]
/// rejects descriptors that cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeDescriptor {
    width: u32,
    height: u32,
    depth: u32,
    channels: u32,
    frames: u32,
    pixel_type: PixelType,
}

impl VolumeDescriptor {
    /// Creates a single-frame descriptor.
    ///
    /// For [`PixelType::Rgb`] the channel count is always reported as 3,
    /// whatever is passed here.
    #[must_use]
    pub fn new(width: u32, height: u32, depth: u32, channels: u32, pixel_type: PixelType) -> Self {
        Self {
            width,
            height,
            depth,
            channels,
            frames: 1,
            pixel_type,
        }
    }

    /// Sets the frame count reported by the host.
    #[must_use]
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Width in samples.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of z-slices.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of stored channels.
    #[must_use]
    pub fn channel_count(&self) -> u32 {
        self.pixel_type.implied_channels().unwrap_or(self.channels)
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    /// Sample encoding.
    #[must_use]
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Bytes per stored sample.
    #[must_use]
    pub fn unit_size(&self) -> u16 {
        self.pixel_type.unit_size()
    }
}

/// Identifies one `width x height` plane of the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneCoordinate {
    /// Z-slice index.
    pub z: u32,
    /// Channel index.
    pub channel: u32,
}

impl PlaneCoordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub fn new(z: u32, channel: u32) -> Self {
        Self { z, channel }
    }
}
