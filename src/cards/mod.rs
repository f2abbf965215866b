//! Card input parsing and field formatting

pub mod formatter;
pub mod yaml;

pub use formatter::format_fields;
pub use yaml::NoteRecord;
