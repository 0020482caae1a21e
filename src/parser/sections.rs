//! Section open/close tracking.
//!
//! Titles arrive as a flat sequence with levels; the tracker decides which
//! open sections a new title closes. A deeper title closes nothing, a title
//! at the same level closes its sibling, and a shallower title closes every
//! open section before the new one begins.

use crate::nodes::SectionInfo;

#[derive(Debug, Default)]
pub struct SectionTracker {
    open: Vec<SectionInfo>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new title and return the sections it closes,
    /// innermost first.
    pub fn transition(&mut self, next: &SectionInfo) -> Vec<SectionInfo> {
        let mut closed = Vec::new();

        if let Some(last) = self.open.last() {
            if next.level < last.level {
                while let Some(info) = self.open.pop() {
                    closed.push(info);
                }
            } else if next.level == last.level {
                if let Some(info) = self.open.pop() {
                    closed.push(info);
                }
            }
        }

        self.open.push(next.clone());
        closed
    }

    /// Sections still open, outermost first. Kept open at end of input;
    /// renderers close their own output structure.
    pub fn open_sections(&self) -> &[SectionInfo] {
        &self.open
    }
}
