//! Parallel memory-mapped `.v3draw` writer.
//!
//! Every plane owns a fixed, disjoint byte range of the file, so the body
//! can be split into per-plane `&mut [u8]` chunks of a writable mapping and
//! encoded concurrently without any locking. The bytes produced are the
//! same as those of [`crate::write_volume`].

use crate::source::PlaneSource;
use crate::{Error, Result};
use log::{debug, info};
use memmap2::MmapMut;
use rayon::prelude::*;
use std::fs::OpenOptions;
use std::path::Path;
use v3draw_core::{FileLayout, PlaneCoordinate, VolumeDescriptor, VolumeHeader, HEADER_LEN};

/// Configuration for the memory-mapped writer.
#[derive(Clone, Debug, Default)]
pub struct WriterConfig {
    /// Number of worker threads. `None` uses the global rayon pool.
    pub parallelism: Option<usize>,
}

impl WriterConfig {
    /// Set the number of worker threads.
    ///
    /// Values less than 1 are clamped to 1. Use [`Self::try_with_parallelism`]
    /// to surface invalid values as an error instead.
    #[must_use]
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads.max(1));
        self
    }

    /// Fallible variant of [`Self::with_parallelism`].
    ///
    /// # Errors
    /// Returns an error if `threads` is 0.
    pub fn try_with_parallelism(mut self, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }
        self.parallelism = Some(threads);
        Ok(self)
    }
}

/// Writes a volume to `path` through a writable memory mapping.
///
/// The file is created (or truncated), sized to the full layout length and
/// mapped. The header is copied in, then planes are fetched and encoded
/// straight into their mapped ranges in parallel. The mapping is flushed
/// before returning.
///
/// Validation errors are returned before the file is created. A failure
/// while encoding leaves a file of full length with unspecified contents;
/// the caller must discard it.
///
/// # Errors
/// Same as [`crate::write_volume`], plus [`Error::ThreadPool`] if a
/// dedicated pool was requested and could not be built.
pub fn write_volume_mapped<P, S>(
    path: P,
    descriptor: &VolumeDescriptor,
    source: &S,
    config: &WriterConfig,
) -> Result<FileLayout>
where
    P: AsRef<Path>,
    S: PlaneSource + Sync + ?Sized,
{
    let layout = FileLayout::plan(descriptor)?;
    usize::try_from(layout.total_len).map_err(|_| v3draw_core::Error::LayoutOverflow)?;
    #[allow(clippy::cast_possible_truncation)]
    let plane_bytes = layout.plane_bytes as usize;
    #[allow(clippy::cast_possible_truncation)]
    let header_len = HEADER_LEN as usize;

    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(layout.total_len)?;

    // SAFETY: The file was just created by us and is not shared; nothing
    // else resizes or writes it while the mapping is alive.
    #[allow(unsafe_code)]
    let mut mmap = unsafe { MmapMut::map_mut(&file)? };

    let (header, body) = mmap.split_at_mut(header_len);
    header.copy_from_slice(&VolumeHeader::from_layout(&layout).to_bytes());

    // The body is channel-major, so consecutive chunks follow the same
    // order as `coordinates()`.
    let coordinates: Vec<PlaneCoordinate> = layout.coordinates().collect();
    debug!(
        "mapped write of {} planes ({} bytes each) to {}",
        coordinates.len(),
        plane_bytes,
        path.display()
    );

    let mut encode = move || {
        body.par_chunks_mut(plane_bytes)
            .zip(coordinates.par_iter())
            .try_for_each(|(dst, &at)| -> Result<()> {
                let plane = source.plane(at)?;
                layout.encode_plane_into(at, &plane, dst)?;
                Ok(())
            })
    };

    match config.parallelism {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            pool.install(encode)?;
        }
        None => encode()?,
    }

    mmap.flush()?;
    info!("saved {} ({} bytes)", path.display(), layout.total_len);
    Ok(layout)
}
