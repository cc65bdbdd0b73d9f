//! Rendering: structural blocks → styled output.

mod odt;
mod styles;
mod text;

pub use odt::{render_odt, write_odt_file, OdtRenderer};
pub use styles::{StyleKind, StyleTable};
pub use text::to_text;
