//! Observer hooks for assembly progress and diagnostics.
//!
//! The pipeline reports notable events through this trait instead of a
//! global side channel, so callers can surface progress bars or collect
//! diagnostics in tests without capturing process-wide log state. All
//! methods default to no-ops.

use std::path::Path;

use crate::error::Error;
use crate::model::Block;

/// Trait for observing document assembly.
pub trait AssemblyObserver: Send {
    /// Called when a page's lines enter the reassembler.
    fn page_started(&mut self, page: u32, line_count: usize) {
        let _ = (page, line_count);
    }

    /// Called for every structural block appended to the document.
    fn block_emitted(&mut self, block: &Block) {
        let _ = block;
    }

    /// Called when a malformed input record is dropped.
    fn record_dropped(&mut self, page: u32, reason: &str) {
        let _ = (page, reason);
    }

    /// Called when a whole page fails and is skipped.
    fn page_failed(&mut self, source: &Path, error: &Error) {
        let _ = (source, error);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl AssemblyObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        pages: Vec<u32>,
        blocks: usize,
        drops: Vec<String>,
    }

    impl AssemblyObserver for Recording {
        fn page_started(&mut self, page: u32, _line_count: usize) {
            self.pages.push(page);
        }

        fn block_emitted(&mut self, _block: &Block) {
            self.blocks += 1;
        }

        fn record_dropped(&mut self, _page: u32, reason: &str) {
            self.drops.push(reason.to_string());
        }
    }

    #[test]
    fn test_default_methods_are_noops() {
        let mut observer = NullObserver;
        observer.page_started(1, 10);
        observer.block_emitted(&Block::Spacer);
        observer.record_dropped(1, "bad bbox");
    }

    #[test]
    fn test_custom_observer_records() {
        let mut observer = Recording::default();
        observer.page_started(1, 3);
        observer.page_started(2, 0);
        observer.block_emitted(&Block::PageBreak);
        observer.record_dropped(2, "missing field");

        assert_eq!(observer.pages, vec![1, 2]);
        assert_eq!(observer.blocks, 1);
        assert_eq!(observer.drops, vec!["missing field"]);
    }
}
