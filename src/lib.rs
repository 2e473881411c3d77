// SPDX-License-Identifier: MPL-2.0
//! `photo_watermark` stamps raster images with a text watermark.
//!
//! The default text is the capture date read from EXIF, falling back to the
//! file modification time. The engine is exposed as a batch command-line tool
//! ([`app`], [`batch`]) and as an editor-session API for a desktop front end
//! ([`editor`]).

#![doc(html_root_url = "https://docs.rs/photo_watermark/0.1.0")]

pub mod app;
pub mod batch;
pub mod config;
pub mod directory_scanner;
pub mod domain;
pub mod editor;
pub mod error;
pub mod media;
pub mod watermark;
