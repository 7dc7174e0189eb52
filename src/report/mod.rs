//! Markdown rendering and writing of the summary document.

pub mod render;
pub mod writer;

pub use render::{DetailSection, Summaries, render_document};
pub use writer::{report_file_name, write_report};
