pub mod codeblock;
pub mod content;
pub mod filename;
pub mod note_parser;

pub use codeblock::{CodeblockConfig, CodeblockError, parse_codeblock, parse_flexible_date};
pub use content::{ContentSpan, first_tag, has_attachment, tokenize_content};
pub use filename::date_from_filename;
pub use note_parser::parse_note_tasks;
