//! Sequential `.v3draw` writer.

use crate::source::PlaneSource;
use crate::Result;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use v3draw_core::{FileLayout, PixelType, Plane, PlaneCoordinate, VolumeDescriptor, VolumeHeader};

/// Writes a volume to a seekable sink.
///
/// The header goes to offset 0, then every plane is fetched, encoded and
/// written at its planned offset, channel by channel and slice by slice.
/// RGB slices are fetched once and their three components written to the
/// three channel ranges. The sink is flushed before returning.
///
/// Validation errors are returned before the sink is touched. Any later
/// error aborts the write and leaves a partial file; truncating or deleting
/// it is up to the caller, who opened the sink.
///
/// # Errors
/// Returns a core error for descriptors that cannot be written or planes
/// that do not match the descriptor, the source's error if a plane cannot
/// be fetched, and [`crate::Error::Io`] if the sink fails.
pub fn write_volume<W, S>(sink: &mut W, descriptor: &VolumeDescriptor, source: &S) -> Result<FileLayout>
where
    W: Write + Seek,
    S: PlaneSource + ?Sized,
{
    let layout = FileLayout::plan(descriptor)?;
    debug!(
        "v3draw layout: {}x{}x{} x{} channels, {} ({} bytes)",
        layout.width, layout.height, layout.depth, layout.channels, layout.pixel_type, layout.total_len
    );

    sink.seek(SeekFrom::Start(0))?;
    sink.write_all(&VolumeHeader::from_layout(&layout).to_bytes())?;

    if layout.pixel_type == PixelType::Rgb {
        for z in 0..layout.depth {
            let plane = source.plane(PlaneCoordinate::new(z, 0))?;
            for channel in 0..layout.channels {
                write_plane(sink, &layout, PlaneCoordinate::new(z, channel), &plane)?;
            }
        }
    } else {
        for at in layout.coordinates() {
            let plane = source.plane(at)?;
            write_plane(sink, &layout, at, &plane)?;
            if at.z + 1 == layout.depth {
                debug!("channel {} written", at.channel);
            }
        }
    }

    sink.flush()?;
    Ok(layout)
}

fn write_plane<W: Write + Seek>(
    sink: &mut W,
    layout: &FileLayout,
    at: PlaneCoordinate,
    plane: &Plane<'_>,
) -> Result<()> {
    let bytes = layout.encode_plane(at, plane)?;
    sink.seek(SeekFrom::Start(layout.offset_of(at.channel, at.z)?))?;
    sink.write_all(&bytes)?;
    Ok(())
}

/// Writer for `.v3draw` files on disk.
pub struct V3drawFileWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl V3drawFileWriter {
    /// Creates (or truncates) the output file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(&path)?;
        let writer = BufWriter::with_capacity(1024 * 1024, file);
        Ok(Self {
            writer,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Path of the output file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the volume and flushes the file.
    ///
    /// The file is cut to the volume's length afterwards, so writing a
    /// smaller volume over a larger one leaves no trailing bytes.
    ///
    /// # Errors
    /// See [`write_volume`].
    pub fn write<S: PlaneSource + ?Sized>(
        &mut self,
        descriptor: &VolumeDescriptor,
        source: &S,
    ) -> Result<FileLayout> {
        let layout = write_volume(&mut self.writer, descriptor, source)?;
        self.writer.get_ref().set_len(layout.total_len)?;
        info!("saved {} ({} bytes)", self.path.display(), layout.total_len);
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FnSource, StackOrder, VolumeStack};
    use crate::Error;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_gray16_to_cursor() {
        let desc = VolumeDescriptor::new(2, 1, 2, 1, PixelType::Gray16);
        let planes = vec![
            Plane::from(vec![0x0102u16, 0x0304]),
            Plane::from(vec![0x0506u16, 0x0708]),
        ];
        let stack = VolumeStack::new(desc, StackOrder::SliceMajor, planes).unwrap();

        let mut cursor = Cursor::new(Vec::new());
        let layout = write_volume(&mut cursor, &desc, &stack).unwrap();
        let data = cursor.into_inner();

        assert_eq!(data.len() as u64, layout.total_len);
        assert_eq!(&data[43..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_file_writer_creates_file() {
        let file = NamedTempFile::new().unwrap();
        let desc = VolumeDescriptor::new(3, 1, 1, 1, PixelType::Gray8);
        let source = FnSource::new(|_| Ok(Plane::from(vec![9u8, 8, 7])));

        let mut writer = V3drawFileWriter::create(file.path()).unwrap();
        writer.write(&desc, &source).unwrap();
        drop(writer);

        let data = std::fs::read(file.path()).unwrap();
        assert_eq!(data.len(), 46);
        assert_eq!(&data[..24], b"raw_image_stack_by_hpeng");
        assert_eq!(&data[43..], &[9, 8, 7]);
    }

    #[test]
    fn test_source_error_propagates() {
        let desc = VolumeDescriptor::new(1, 1, 2, 1, PixelType::Gray8);
        let source = FnSource::new(|at: v3draw_core::PlaneCoordinate| {
            if at.z == 1 {
                Err(Error::Source("slice unavailable".to_string()))
            } else {
                Ok(Plane::from(vec![1u8]))
            }
        });
        let mut cursor = Cursor::new(Vec::new());
        let err = write_volume(&mut cursor, &desc, &source).unwrap_err();
        assert!(matches!(err, Error::Source(ref msg) if msg == "slice unavailable"));
    }

    #[test]
    fn test_file_writer_rewrite_truncates() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = V3drawFileWriter::create(file.path()).unwrap();

        let large = VolumeDescriptor::new(4, 4, 1, 1, PixelType::Gray8);
        writer
            .write(&large, &FnSource::new(|_| Ok(Plane::from(vec![0xAAu8; 16]))))
            .unwrap();
        let small = VolumeDescriptor::new(1, 1, 1, 1, PixelType::Gray8);
        let layout = writer
            .write(&small, &FnSource::new(|_| Ok(Plane::from(vec![5u8]))))
            .unwrap();
        drop(writer);

        let data = std::fs::read(file.path()).unwrap();
        assert_eq!(layout.total_len, 44);
        assert_eq!(data.len(), 44);
        assert_eq!(&data[..43], &v3draw_core::encode_header(&small).unwrap());
        assert_eq!(data[43], 5);
    }

    #[test]
    fn test_rgb_slice_fetched_once() {
        let fetches = Cell::new(0u32);
        let desc = VolumeDescriptor::new(2, 1, 3, 3, PixelType::Rgb);
        let source = FnSource::new(|at: PlaneCoordinate| {
            fetches.set(fetches.get() + 1);
            #[allow(clippy::cast_possible_truncation)]
            let z = at.z as u8;
            Ok(Plane::from_interleaved_rgb(&[z, 10 + z, 20 + z, z, 10 + z, 20 + z]))
        });

        let mut cursor = Cursor::new(Vec::new());
        let layout = write_volume(&mut cursor, &desc, &source).unwrap();
        assert_eq!(fetches.get(), 3);

        let data = cursor.into_inner();
        for z in 0..3u32 {
            for channel in 0..3u32 {
                #[allow(clippy::cast_possible_truncation)]
                let start = layout.offset_of(channel, z).unwrap() as usize;
                #[allow(clippy::cast_possible_truncation)]
                let expected = (channel * 10 + z) as u8;
                assert_eq!(&data[start..start + 2], &[expected; 2]);
            }
        }
    }
}
