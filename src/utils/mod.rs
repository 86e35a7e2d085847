//! Presentation helpers shared by the store consumers.

pub mod color;
pub mod date;
pub mod text;

pub use color::{priority_color, status_color};
pub use date::{format_date, parse_due_date};
pub use text::truncate_text;
