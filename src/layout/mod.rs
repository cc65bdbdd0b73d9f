//! Layout reassembly: ordered lines with pixel boxes → structural blocks.

mod geometry;
mod reassembler;

pub use geometry::{
    definition_gap_limit, in_definition_window, in_indent_range, mean_line_height, vertical_gap,
};
pub use reassembler::{reassemble_pages, Reassembler};
