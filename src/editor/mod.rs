// SPDX-License-Identifier: MPL-2.0
//! Everything a desktop editor needs short of widgets: the live session
//! (preview, drag, templates) and the multi-file export driver.

pub mod export;
pub mod session;

pub use export::{export_images, ExportRequest};
pub use session::EditorSession;
