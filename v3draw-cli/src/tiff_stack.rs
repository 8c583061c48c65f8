//! Multi-page TIFF input.

use crate::{CliError, Result};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;
use v3draw_core::{PixelType, Plane, VolumeDescriptor};
use v3draw_io::{StackOrder, VolumeStack};

/// Decodes one TIFF page into a plane.
fn decode_page(color: ColorType, image: DecodingResult) -> Result<Plane<'static>> {
    match (color, image) {
        (ColorType::RGB(8), DecodingResult::U8(pixels)) => Ok(Plane::from_interleaved_rgb(&pixels)),
        (ColorType::Gray(8), DecodingResult::U8(samples)) => Ok(Plane::from(samples)),
        (ColorType::Gray(16), DecodingResult::U16(samples)) => Ok(Plane::from(samples)),
        (ColorType::Gray(32), DecodingResult::F32(samples)) => Ok(Plane::from(samples)),
        (color, _) => Err(v3draw_core::Error::UnsupportedPixelType(format!("TIFF {color:?}")).into()),
    }
}

/// Reads every page of a TIFF file into a volume stack.
///
/// Pages are taken as `depth * channels` planes in `order`. RGB pages are
/// one slice each and split into three channels, so `channels` is ignored
/// for them.
///
/// # Errors
/// Returns an error if the file cannot be decoded, pages differ in size or
/// type, `channels` is 0 for a grayscale stack, the page count is not a multiple of `channels`, or the sample type
/// has no `.v3draw` encoding.
pub fn load_tiff_stack(path: &Path, channels: u32, order: StackOrder) -> Result<VolumeStack> {
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let (width, height) = decoder.dimensions()?;

    let mut planes = Vec::new();
    let mut pixel_type = None;
    loop {
        let dims = decoder.dimensions()?;
        if dims != (width, height) {
            return Err(CliError::InvalidInput(format!(
                "page {} is {}x{}, first page is {width}x{height}",
                planes.len(),
                dims.0,
                dims.1
            )));
        }
        let color = decoder.colortype()?;
        let plane = decode_page(color, decoder.read_image()?)?;
        match pixel_type {
            None => pixel_type = Some(plane.pixel_type()),
            Some(t) if t != plane.pixel_type() => {
                return Err(CliError::InvalidInput(format!(
                    "page {} is {}, first page is {t}",
                    planes.len(),
                    plane.pixel_type()
                )));
            }
            Some(_) => {}
        }
        planes.push(plane);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    let pixel_type = pixel_type.ok_or_else(|| CliError::InvalidInput("no pages".to_string()))?;
    let channels = match (pixel_type, channels) {
        (PixelType::Rgb, _) => 1,
        (_, 0) => {
            return Err(CliError::InvalidInput(
                "channel count must be at least 1".to_string(),
            ))
        }
        (_, n) => n,
    };
    let pages = u32::try_from(planes.len())
        .map_err(|_| CliError::InvalidInput("too many pages".to_string()))?;
    if pages % channels != 0 {
        return Err(CliError::InvalidInput(format!(
            "{pages} pages cannot be split into {channels} channels"
        )));
    }
    debug!(
        "{}: {pages} pages of {width}x{height} {pixel_type}",
        path.display()
    );

    let descriptor = VolumeDescriptor::new(width, height, pages / channels, channels, pixel_type);
    Ok(VolumeStack::new(descriptor, order, planes)?)
}
