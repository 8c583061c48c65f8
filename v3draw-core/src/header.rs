//! Fixed-length `.v3draw` header.
//!
//! ```text
//! offset  size  field
//!      0    24  format key "raw_image_stack_by_hpeng"
//!     24     1  endianness flag 'B'
//!     25     2  unit size        (BE u16)
//!     27     4  width            (BE u32)
//!     31     4  height           (BE u32)
//!     35     4  depth            (BE u32)
//!     39     4  channel count    (BE u32)
//! ```

use crate::{FileLayout, Result, VolumeDescriptor, HEADER_LEN};

/// ASCII format identifier at the start of every file.
pub const FORMAT_KEY: &[u8; 24] = b"raw_image_stack_by_hpeng";

/// Endianness flag. Only big-endian files are produced.
pub const ENDIANNESS_FLAG: u8 = b'B';

#[allow(clippy::cast_possible_truncation)]
const HEADER_SIZE: usize = HEADER_LEN as usize;

const _: () = assert!(FORMAT_KEY.len() + 1 + 2 + 4 * 4 == HEADER_SIZE);

/// Header fields of a `.v3draw` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeHeader {
    /// Bytes per sample.
    pub unit_size: u16,
    /// Dimensions in file order: width, height, depth, channel count.
    pub dims: [u32; 4],
}

impl VolumeHeader {
    /// Builds the header for a planned layout.
    #[must_use]
    pub fn from_layout(layout: &FileLayout) -> Self {
        Self {
            unit_size: layout.unit_size,
            dims: [layout.width, layout.height, layout.depth, layout.channels],
        }
    }

    /// Serializes the header into its 43-byte on-disk form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let key_len = FORMAT_KEY.len();
        out[..key_len].copy_from_slice(FORMAT_KEY);
        out[key_len] = ENDIANNESS_FLAG;
        out[key_len + 1..key_len + 3].copy_from_slice(&self.unit_size.to_be_bytes());
        for (i, dim) in self.dims.iter().enumerate() {
            let start = key_len + 3 + i * 4;
            out[start..start + 4].copy_from_slice(&dim.to_be_bytes());
        }
        out
    }
}

/// Encodes the header for a descriptor.
///
/// # Errors
/// Returns the planning error if the descriptor cannot be written
/// (see [`FileLayout::plan`]).
pub fn encode_header(descriptor: &VolumeDescriptor) -> Result<[u8; HEADER_SIZE]> {
    let layout = FileLayout::plan(descriptor)?;
    Ok(VolumeHeader::from_layout(&layout).to_bytes())
}
