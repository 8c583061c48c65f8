//! Plane sources.
//!
//! A source hands out the native sample buffer for one `(z, channel)`
//! coordinate. Hosts store their planes in different orders; the writers
//! only ever ask by coordinate, so the host order never shows up in the
//! output.

use crate::{Error, Result};
use v3draw_core::{FileLayout, PixelType, Plane, PlaneCoordinate, VolumeDescriptor};

/// Supplies planes of a volume by coordinate.
///
/// For RGB volumes the returned plane is the whole [`Plane::Rgb`] slice;
/// the writer selects the component for the requested channel.
/// [`crate::write_volume`] asks once per RGB slice, but
/// [`crate::write_volume_mapped`] encodes each channel range on its own and
/// asks once per channel, so an RGB slice is requested three times there.
/// Sources that decode on demand should hand out cheap views or cache.
pub trait PlaneSource {
    /// Returns the plane at `at`.
    ///
    /// # Errors
    /// Returns an error if the plane cannot be produced.
    fn plane(&self, at: PlaneCoordinate) -> Result<Plane<'_>>;
}

impl<S: PlaneSource + ?Sized> PlaneSource for &S {
    fn plane(&self, at: PlaneCoordinate) -> Result<Plane<'_>> {
        (**self).plane(at)
    }
}

/// Adapts a closure into a [`PlaneSource`].
pub struct FnSource<F>(pub F);

impl<F> FnSource<F>
where
    F: Fn(PlaneCoordinate) -> Result<Plane<'static>>,
{
    /// Wraps `f`, which is called once per requested plane.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> PlaneSource for FnSource<F>
where
    F: Fn(PlaneCoordinate) -> Result<Plane<'static>>,
{
    fn plane(&self, at: PlaneCoordinate) -> Result<Plane<'_>> {
        (self.0)(at)
    }
}

/// Order in which a host keeps the planes of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    /// All slices of channel 0, then channel 1, ... (index `c * depth + z`).
    ChannelMajor,
    /// All channels of slice 0, then slice 1, ... (index `z * channels + c`).
    #[default]
    SliceMajor,
}

/// In-memory stack of planes.
///
/// Grayscale stacks hold `depth * channels` planes in `order`. RGB stacks
/// hold one [`Plane::Rgb`] per slice and ignore `order`.
#[derive(Debug, Clone)]
pub struct VolumeStack {
    descriptor: VolumeDescriptor,
    order: StackOrder,
    planes: Vec<Plane<'static>>,
}

impl VolumeStack {
    /// Creates a stack after checking every plane against the descriptor.
    ///
    /// # Errors
    /// Returns a core error if the descriptor cannot be planned, the plane
    /// count does not match, or a plane has the wrong type or length.
    pub fn new(
        descriptor: VolumeDescriptor,
        order: StackOrder,
        planes: Vec<Plane<'static>>,
    ) -> Result<Self> {
        let layout = FileLayout::plan(&descriptor)?;
        let expected = if layout.pixel_type == PixelType::Rgb {
            layout.depth as usize
        } else {
            layout.depth as usize * layout.channels as usize
        };
        if planes.len() != expected {
            return Err(v3draw_core::Error::malformed(format!(
                "stack holds {} planes, expected {expected}",
                planes.len()
            ))
            .into());
        }

        let plane_len = layout.plane_len();
        for (index, plane) in planes.iter().enumerate() {
            if plane.pixel_type() != layout.pixel_type {
                return Err(v3draw_core::Error::malformed(format!(
                    "stack plane {index} is {}, volume is {}",
                    plane.pixel_type(),
                    layout.pixel_type
                ))
                .into());
            }
            let lengths = match plane {
                Plane::Rgb { red, green, blue } => [red.len(), green.len(), blue.len()],
                other => [other.len(); 3],
            };
            if lengths.iter().any(|&n| n != plane_len) {
                return Err(v3draw_core::Error::malformed(format!(
                    "stack plane {index} holds {lengths:?} samples, expected {plane_len}"
                ))
                .into());
            }
        }

        Ok(Self {
            descriptor,
            order,
            planes,
        })
    }

    /// The volume this stack describes.
    #[must_use]
    pub fn descriptor(&self) -> &VolumeDescriptor {
        &self.descriptor
    }

    /// Host ordering of the stored planes.
    #[must_use]
    pub fn order(&self) -> StackOrder {
        self.order
    }

    /// Number of stored planes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Returns true if the stack holds no planes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    fn index_of(&self, at: PlaneCoordinate) -> Option<usize> {
        let depth = self.descriptor.depth();
        let channels = self.descriptor.channel_count();
        if at.z >= depth || at.channel >= channels {
            return None;
        }
        let (z, c) = (at.z as usize, at.channel as usize);
        let index = match (self.descriptor.pixel_type(), self.order) {
            (PixelType::Rgb, _) => z,
            (_, StackOrder::ChannelMajor) => c * depth as usize + z,
            (_, StackOrder::SliceMajor) => z * channels as usize + c,
        };
        Some(index)
    }
}

impl PlaneSource for VolumeStack {
    fn plane(&self, at: PlaneCoordinate) -> Result<Plane<'_>> {
        self.index_of(at)
            .and_then(|i| self.planes.get(i))
            .map(Plane::view)
            .ok_or(Error::Core(v3draw_core::Error::InvalidCoordinate {
                z: at.z,
                channel: at.channel,
            }))
    }
}
