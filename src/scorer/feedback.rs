use std::collections::BTreeMap;

use super::types::OverlayShape;

/// Accumulates feedback lines and the overlays attached to them.
///
/// Overlays are keyed by the index of their feedback line; the builder owns
/// the indices so a later `insert_front` keeps every overlay attached to the
/// line it was created for.
#[derive(Debug, Default)]
pub struct FeedbackBuilder {
    lines: Vec<String>,
    overlays: BTreeMap<usize, Vec<OverlayShape>>,
}

impl FeedbackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feedback line and return its index.
    pub fn push(&mut self, text: impl Into<String>) -> usize {
        self.lines.push(text.into());
        self.lines.len() - 1
    }

    /// Attach an overlay to an existing feedback line.
    pub fn attach(&mut self, line_idx: usize, shape: OverlayShape) {
        debug_assert!(line_idx < self.lines.len());
        self.overlays.entry(line_idx).or_default().push(shape);
    }

    /// Prepend a summary line, shifting overlay keys so they stay attached.
    pub fn insert_front(&mut self, text: impl Into<String>) {
        self.lines.insert(0, text.into());
        self.overlays = std::mem::take(&mut self.overlays)
            .into_iter()
            .map(|(idx, shapes)| (idx + 1, shapes))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, BTreeMap<usize, Vec<OverlayShape>>) {
        (self.lines, self.overlays)
    }
}
