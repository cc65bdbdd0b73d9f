//! Document model types for scanned-page content.
//!
//! This module defines the intermediate representation that bridges OCR
//! line extraction and document rendering: pixel-space lines on the input
//! side, ordered structural blocks on the output side.

mod block;
mod document;
mod line;

pub use block::Block;
pub use document::{Document, Metadata};
pub use line::{BBox, ClassifiedLine, Line, LineClass};
