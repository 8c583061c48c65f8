//! v3draw CLI
//!
//! Converts TIFF stacks into `.v3draw` files and prints planned layouts.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]

mod tiff_stack;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use v3draw_core::{FileLayout, PixelType, VolumeDescriptor};
use v3draw_io::{write_volume_mapped, StackOrder, V3drawFileWriter, WriterConfig};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("write error: {0}")]
    Write(#[from] v3draw_io::Error),

    #[error("volume error: {0}")]
    Core(#[from] v3draw_core::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Host ordering of the pages in the input stack.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    /// Channels interleaved per slice (c0z0, c1z0, c0z1, ...)
    SliceMajor,
    /// All slices of one channel before the next (c0z0, c0z1, ..., c1z0, ...)
    ChannelMajor,
}

impl From<Order> for StackOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::SliceMajor => StackOrder::SliceMajor,
            Order::ChannelMajor => StackOrder::ChannelMajor,
        }
    }
}

/// Pixel type selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PixelKind {
    Gray8,
    Gray16,
    Gray32Float,
    Rgb,
}

impl From<PixelKind> for PixelType {
    fn from(kind: PixelKind) -> Self {
        match kind {
            PixelKind::Gray8 => PixelType::Gray8,
            PixelKind::Gray16 => PixelType::Gray16,
            PixelKind::Gray32Float => PixelType::Gray32Float,
            PixelKind::Rgb => PixelType::Rgb,
        }
    }
}

/// Writer for Vaa3D .v3draw raw image stacks.
#[derive(Parser)]
#[command(name = "v3draw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a multi-page TIFF into a .v3draw file
    Convert {
        /// Input TIFF file
        input: PathBuf,

        /// Output file path (".v3draw" is appended when it has no extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Number of channels interleaved in the page sequence
        #[arg(short, long, default_value = "1")]
        channels: u32,

        /// Page ordering of the input
        #[arg(long, value_enum, default_value = "slice-major")]
        order: Order,

        /// Write through a memory mapping with parallel plane encoding
        #[arg(long)]
        mapped: bool,

        /// Worker threads for --mapped (default: all cores)
        #[arg(long, requires = "mapped")]
        threads: Option<usize>,
    },

    /// Print the file layout for a volume shape as JSON
    Layout {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(long)]
        depth: u32,

        #[arg(long, default_value = "1")]
        channels: u32,

        #[arg(long, value_enum)]
        pixel_type: PixelKind,
    },
}

fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("v3draw")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            channels,
            order,
            mapped,
            threads,
        } => {
            let output = output_path(&output);
            let start = Instant::now();

            info!("reading {}", input.display());
            let stack = tiff_stack::load_tiff_stack(&input, channels, order.into())?;
            let descriptor = *stack.descriptor();

            let layout = if mapped {
                let mut config = WriterConfig::default();
                if let Some(threads) = threads {
                    config = config.try_with_parallelism(threads)?;
                }
                write_volume_mapped(&output, &descriptor, &stack, &config)?
            } else {
                let mut writer = V3drawFileWriter::create(&output)?;
                writer.write(&descriptor, &stack)?
            };

            println!(
                "Wrote {} in {:.2}s",
                output.display(),
                start.elapsed().as_secs_f64()
            );
            println!(
                "Volume: {}x{}x{}, {} channel(s), {}",
                layout.width, layout.height, layout.depth, layout.channels, layout.pixel_type
            );
            println!(
                "Size: {} bytes ({:.2} MB)",
                layout.total_len,
                layout.total_len as f64 / 1_000_000.0
            );
        }

        Commands::Layout {
            width,
            height,
            depth,
            channels,
            pixel_type,
        } => {
            let descriptor = VolumeDescriptor::new(width, height, depth, channels, pixel_type.into());
            let layout = FileLayout::plan(&descriptor)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }

    Ok(())
}
