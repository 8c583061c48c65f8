//! v3draw-io: `.v3draw` file writers.
//!
//! This crate connects plane sources to output sinks. [`write_volume`]
//! writes through any `Write + Seek` sink one plane at a time;
//! [`write_volume_mapped`] preallocates the file, memory-maps it via
//! memmap2 and encodes planes in parallel.
//!

mod error;
pub mod mapped;
pub mod source;
mod writer;

pub use error::{Error, Result};
pub use mapped::{write_volume_mapped, WriterConfig};
pub use source::{FnSource, PlaneSource, StackOrder, VolumeStack};
pub use writer::{write_volume, V3drawFileWriter};

pub use v3draw_core::{FileLayout, PixelType, Plane, PlaneCoordinate, VolumeDescriptor};
