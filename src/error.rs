// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Per-file errors (`UnreadableImage`, `DateUnavailable`, `WriteFailure`) are
//! caught at the task boundary by the batch and export drivers and turned into
//! outcomes; only directory validation and usage errors stop a run.

use std::path::PathBuf;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// A `#`-prefixed color that is not exactly `#RRGGBB`.
    #[error("invalid color format: {0:?} (expected #RRGGBB or a color name)")]
    InvalidColorFormat(String),

    /// The file could not be decoded as an image.
    #[error("cannot read image {}: {reason}", .path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    /// Neither EXIF nor the filesystem provided a date.
    #[error("no date available for {}", .0.display())]
    DateUnavailable(PathBuf),

    #[error("cannot write {}: {reason}", .path.display())]
    WriteFailure { path: PathBuf, reason: String },

    /// Only produced while walking the font candidate list; rendering falls
    /// back to the bitmap font instead of surfacing it.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    #[error("input directory {} {reason}", .path.display())]
    InvalidInputDirectory { path: PathBuf, reason: &'static str },

    #[error("refusing to export into source directory {}", .0.display())]
    OutputConflict(PathBuf),

    #[error("Template Error: {0}")]
    Template(String),

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Process exit code for errors that end a CLI run.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<pico_args::Error> for Error {
    fn from(err: pico_args::Error) -> Self {
        Error::Usage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
