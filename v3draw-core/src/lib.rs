//! v3draw-core: Volume model, layout planning and plane encoding for `.v3draw` files.
//!
//! This crate has no I/O. It describes an image volume, plans where every
//! plane lands inside the output file, and turns native sample buffers into
//! the big-endian bytes the format stores.
//!

pub mod encode;
pub mod error;
pub mod header;
pub mod layout;
pub mod pixel;
pub mod plane;
pub mod volume;

pub use encode::{encode_plane, encode_plane_into, BigEndianSample};
pub use error::{Error, Result};
pub use header::{encode_header, VolumeHeader, ENDIANNESS_FLAG, FORMAT_KEY};
pub use layout::{FileLayout, HEADER_LEN};
pub use pixel::PixelType;
pub use plane::Plane;
pub use volume::{PlaneCoordinate, VolumeDescriptor};
