use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use image::ImageFormat;

/// Image formats accepted from the picker.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Outcome of one pass through the image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(PathBuf),
    /// Nothing usable was chosen; the caller re-prompts.
    NoneSelected,
    /// Input is exhausted; no further prompts can be answered.
    Closed,
}

/// Whether `path` carries one of the accepted image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        && matches!(
            ImageFormat::from_extension(&ext),
            Some(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Gif)
        )
}

/// Console stand-in for a file picker: ask for a path and validate it.
pub fn prompt_for_image(input: &mut impl BufRead, output: &mut impl Write) -> Result<Selection> {
    write!(
        output,
        "Select a tooth image ({}): ",
        ACCEPTED_EXTENSIONS
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(" ")
    )?;
    output.flush()?;

    let Some(line) = read_raw_line(input).context("failed to read image path")? else {
        return Ok(Selection::Closed);
    };

    let raw = strip_quotes(trim_ascii(&line));
    if raw.is_empty() {
        return Ok(Selection::NoneSelected);
    }

    let Some(path) = path_from_bytes(raw) else {
        tracing::info!("Selected path is not representable on this platform");
        return Ok(Selection::NoneSelected);
    };
    if !path.is_file() {
        tracing::info!(path = %path.display(), "Selected path is not a file");
        return Ok(Selection::NoneSelected);
    }
    if !is_supported_image(&path) {
        tracing::info!(path = %path.display(), "Selected file is not a supported image");
        return Ok(Selection::NoneSelected);
    }
    Ok(Selection::Selected(path))
}

/// Read one line as raw bytes, newline included. Unlike `read_line` this
/// never rejects input that is not UTF-8. `None` once input is exhausted.
pub fn read_raw_line(input: &mut impl BufRead) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn strip_quotes(mut bytes: &[u8]) -> &[u8] {
    while let [b'"' | b'\'', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b'"' | b'\''] = bytes {
        bytes = rest;
    }
    bytes
}

// File names on unix are arbitrary bytes; elsewhere they must be UTF-8.
#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(|s| PathBuf::from(OsStr::new(s)))
}

/// File name a copied image is stored under: `teeth_<YYYYMMDD_HHMMSS><.ext>`.
pub fn staged_file_name(source: &Path, at: NaiveDateTime) -> String {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("teeth_{}{ext}", at.format("%Y%m%d_%H%M%S"))
}

/// Copy `source` into `upload_dir` (created if absent) under a timestamped
/// name. The original file is left in place.
pub fn stage_image(source: &Path, upload_dir: &Path, at: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(upload_dir)
        .with_context(|| format!("failed to create {}", upload_dir.display()))?;

    let destination = upload_dir.join(staged_file_name(source, at));
    std::fs::copy(source, &destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;

    tracing::info!(from = %source.display(), to = %destination.display(), "Image staged");
    Ok(destination)
}
