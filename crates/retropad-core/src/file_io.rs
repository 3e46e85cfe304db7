//! Loading and saving documents.

use crate::encoding::{self, TextEncoding};
use crate::line_ending::{LineEnding, normalize_newlines};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File I/O errors.
#[derive(Debug, Error)]
pub enum FileError {
    /// Reading or writing the file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A UTF-16 file had an odd number of payload bytes.
    #[error("{}: invalid {encoding} file (odd byte count)", path.display())]
    OddUtf16Length {
        /// File that was being read.
        path: PathBuf,
        /// Encoding announced by the byte-order mark.
        encoding: TextEncoding,
    },
}

/// A document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// LF-normalized text.
    pub text: String,
    /// Encoding detected from the byte-order mark (or its absence).
    pub encoding: TextEncoding,
    /// Line ending detected in the original bytes.
    pub line_ending: LineEnding,
}

/// Read `path`, detecting its encoding and line ending.
pub fn load(path: &Path) -> Result<LoadedFile, FileError> {
    let bytes = fs::read(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (raw, encoding) =
        encoding::decode(&bytes).map_err(|err| FileError::OddUtf16Length {
            path: path.to_path_buf(),
            encoding: err.encoding,
        })?;

    let line_ending = LineEnding::detect_in_text(&raw);
    log::info!(
        "loaded {} ({} bytes, {encoding}, {})",
        path.display(),
        bytes.len(),
        line_ending.label()
    );

    Ok(LoadedFile {
        text: normalize_newlines(&raw),
        encoding,
        line_ending,
    })
}

/// Write LF-normalized `text` to `path` using `encoding` and `line_ending`.
///
/// Returns the encoding actually written, which differs from `encoding` only when ANSI text
/// contains characters outside Windows-1252.
pub fn save(
    path: &Path,
    text: &str,
    encoding: TextEncoding,
    line_ending: LineEnding,
) -> Result<TextEncoding, FileError> {
    let on_disk = line_ending.apply_to_text(text);
    let (bytes, written) = encoding::encode(&on_disk, encoding);

    fs::write(path, &bytes).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("saved {} ({} bytes, {written})", path.display(), bytes.len());
    Ok(written)
}
