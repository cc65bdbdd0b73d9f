//! Input parsing: OCR word grouping and TSV interchange.

mod tsv;
mod words;

pub use tsv::{read_lines_tsv, read_word_tsv, write_lines_tsv, TsvKind, TsvRead};
pub use words::{group_words, WordRecord};
