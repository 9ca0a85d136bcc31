//! Chunked "quilt" rendering.
//!
//! A large image is cut into square chunks that are rendered independently
//! and each written to its own PNG named `{x}_{y}.png` after its top-left
//! corner. An `info.txt` next to them holds the full width and height. A
//! later stitch step reads everything back into one image, so an interrupted
//! render can be resumed chunk by chunk.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;
use thiserror::Error;

use crate::renderer::{color_to_rgba, PixelSource};

/// Name of the file holding the full image size.
pub const INFO_FILE: &str = "info.txt";

/// Default chunk edge in pixels.
pub const DEFAULT_CHUNK_SIZE: u32 = 100;

/// Appended to the quilt directory name for the stitched image.
pub const FINISHED_SUFFIX: &str = "_FINISHED.png";

/// Errors that can occur while writing or stitching a quilt.
#[derive(Error, Debug)]
pub enum QuiltError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Malformed info.txt: {0}")]
    InvalidInfo(String),

    #[error("No chunk images in {}", .0.display())]
    NoChunks(PathBuf),

    #[error("Not a quilt directory: {}", .0.display())]
    InvalidDirectory(PathBuf),
}

pub type QuiltResult<T> = Result<T, QuiltError>;

/// Quilt render settings.
#[derive(Debug, Clone)]
pub struct QuiltConfig {
    /// Chunk edge in pixels
    pub chunk_size: u32,
    /// Leave chunks that already have an image on disk alone
    pub skip_existing: bool,
}

impl Default for QuiltConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_existing: false,
        }
    }
}

impl QuiltConfig {
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }
}

/// A rectangular region of the image saved as one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// X coordinate of chunk's top-left corner
    pub x: u32,
    /// Y coordinate of chunk's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this chunk in render order
    pub index: usize,
}

impl Chunk {
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.x, self.y)
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Cut an image into chunks, column by column. Edge chunks are trimmed.
pub fn chunks(width: u32, height: u32, chunk_size: u32) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();

    let mut x = 0;
    while x < width {
        let mut y = 0;
        while y < height {
            chunks.push(Chunk {
                x,
                y,
                width: chunk_size.min(width - x),
                height: chunk_size.min(height - y),
                index: chunks.len(),
            });
            y += chunk_size;
        }
        x += chunk_size;
    }

    chunks
}

/// Write `info.txt` with the full image size.
pub fn write_info(dir: &Path, width: u32, height: u32) -> QuiltResult<()> {
    fs::write(dir.join(INFO_FILE), format!("{} {}", width, height))?;
    Ok(())
}

/// Read the full image size back from `info.txt`.
pub fn read_info(dir: &Path) -> QuiltResult<(u32, u32)> {
    let text = fs::read_to_string(dir.join(INFO_FILE))?;
    let values = text
        .split_whitespace()
        .map(|v| v.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| QuiltError::InvalidInfo(e.to_string()))?;

    match values[..] {
        [width, height] => Ok((width, height)),
        _ => Err(QuiltError::InvalidInfo(format!(
            "expected \"width height\", got {:?}",
            text.trim()
        ))),
    }
}

/// Render one chunk to an image of the chunk's size.
pub fn render_chunk<S: PixelSource>(source: &S, chunk: &Chunk) -> RgbaImage {
    RgbaImage::from_fn(chunk.width, chunk.height, |local_x, local_y| {
        image::Rgba(color_to_rgba(
            source.get_color(chunk.x + local_x, chunk.y + local_y),
        ))
    })
}

/// Render every chunk of `source` into `dir`, in parallel.
///
/// Returns the number of chunks written.
pub fn render_quilt<S: PixelSource + Sync>(
    source: &S,
    dir: &Path,
    config: &QuiltConfig,
) -> QuiltResult<usize> {
    fs::create_dir_all(dir)?;
    write_info(dir, source.width(), source.height())?;

    let pending: Vec<Chunk> = chunks(source.width(), source.height(), config.chunk_size)
        .into_iter()
        .filter(|chunk| !(config.skip_existing && dir.join(chunk.file_name()).exists()))
        .collect();

    log::info!(
        "Rendering {} chunks of {}px into {}",
        pending.len(),
        config.chunk_size,
        dir.display()
    );

    pending.par_iter().try_for_each(|chunk| -> QuiltResult<()> {
        let image = render_chunk(source, chunk);
        image.save(dir.join(chunk.file_name()))?;
        log::debug!("{} completed", chunk.file_name());
        Ok(())
    })?;

    Ok(pending.len())
}

/// Parse a chunk file name like `"200_100.png"` into its offset.
///
/// Any image extension is accepted.
pub fn parse_chunk_name(name: &str) -> Option<(u32, u32)> {
    let (stem, _extension) = name.rsplit_once('.')?;
    let (x, y) = stem.split_once('_')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// Assemble all chunks in `dir` into one image.
pub fn stitch(dir: &Path) -> QuiltResult<RgbaImage> {
    let (width, height) = read_info(dir)?;
    let mut canvas = RgbaImage::new(width, height);

    let mut placed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some((x, y)) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_chunk_name)
        else {
            continue;
        };

        if x >= width || y >= height {
            log::warn!("Chunk {} lies outside the {}x{} image", path.display(), width, height);
            continue;
        }
        let chunk = image::open(&path)?.to_rgba8();
        image::imageops::replace(&mut canvas, &chunk, x as i64, y as i64);
        placed += 1;
    }

    if placed == 0 {
        return Err(QuiltError::NoChunks(dir.to_path_buf()));
    }
    log::info!("Stitched {} chunks into {}x{}", placed, width, height);
    Ok(canvas)
}

/// Path the stitched image of `dir` is written to: a sibling named
/// `<dir>_FINISHED.png`.
pub fn finished_path(dir: &Path) -> QuiltResult<PathBuf> {
    let name = dir
        .file_name()
        .ok_or_else(|| QuiltError::InvalidDirectory(dir.to_path_buf()))?;
    let mut finished = name.to_os_string();
    finished.push(FINISHED_SUFFIX);
    Ok(dir.with_file_name(finished))
}

/// Stitch `dir` and save the result next to it.
pub fn stitch_to_file(dir: &Path) -> QuiltResult<PathBuf> {
    let image = stitch(dir)?;
    let path = finished_path(dir)?;
    image.save(&path)?;
    Ok(path)
}
