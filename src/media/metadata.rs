// SPDX-License-Identifier: MPL-2.0
//! Capture date extraction for date watermarks.
//!
//! EXIF date tags are read in priority order; when none yields a parsable
//! date, the file's modification time (local time) is used instead.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// EXIF tags consulted for the capture date, highest priority first.
const DATE_TAGS: [exif::Tag; 3] = [
    exif::Tag::DateTimeOriginal,
    exif::Tag::DateTime,
    exif::Tag::DateTimeDigitized,
];

/// Display format of watermark dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where a capture date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif(exif::Tag),
    ModifiedTime,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::Exif(tag) => write!(f, "EXIF {tag}"),
            DateSource::ModifiedTime => f.write_str("file modification time"),
        }
    }
}

/// A resolved capture date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl CaptureDate {
    /// The watermark text, e.g. `2024-05-01`.
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Resolves the capture date of `path`.
///
/// # Errors
///
/// Returns [`Error::DateUnavailable`] when neither EXIF nor the filesystem
/// provides a date.
pub fn capture_date<P: AsRef<Path>>(path: P) -> Result<CaptureDate> {
    let path = path.as_ref();

    if let Some((date, tag)) = exif_date(path) {
        return Ok(CaptureDate {
            date,
            source: DateSource::Exif(tag),
        });
    }

    match modified_date(path) {
        Some(date) => {
            tracing::debug!(file = %path.display(), "no EXIF date, using modification time");
            Ok(CaptureDate {
                date,
                source: DateSource::ModifiedTime,
            })
        }
        None => Err(Error::DateUnavailable(path.to_path_buf())),
    }
}

/// Reads the first parsable EXIF date, returning the tag it came from.
///
/// Files without EXIF, or with only malformed date values, yield `None`.
pub fn exif_date<P: AsRef<Path>>(path: P) -> Option<(NaiveDate, exif::Tag)> {
    let file = File::open(path.as_ref()).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    DATE_TAGS.into_iter().find_map(|tag| {
        let field = exif.get_field(tag, exif::In::PRIMARY)?;
        let exif::Value::Ascii(ref values) = field.value else {
            return None;
        };
        values
            .iter()
            .filter_map(|raw| std::str::from_utf8(raw).ok())
            .find_map(parse_exif_date)
            .map(|date| (date, tag))
    })
}

/// Modification time of `path` as a local calendar date.
pub fn modified_date<P: AsRef<Path>>(path: P) -> Option<NaiveDate> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}

/// Parses `YYYY:MM:DD[ HH:MM:SS]`, the EXIF date layout.
///
/// Dash-separated dates are accepted as well since some writers use them.
#[must_use]
pub fn parse_exif_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().trim_end_matches('\0').split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%Y:%m:%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y-%m-%d"))
        .ok()
}
