//! Per-section text accumulator: one of the fixed set of buffers a document
//! extraction routes text into.
//!
//! `String`'s own amortized-doubling growth already gives the
//! capacity/offset semantics a hand-rolled C buffer would need by hand; we
//! just need `append`'s single-space-separator rule and a `reset` that
//! clears the logical length without releasing the allocation, so repeated
//! use across thousands of pages doesn't re-allocate per document.

#[derive(Debug, Default, Clone)]
pub struct SectionBuffer {
    data: String,
}

impl SectionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, inserting a single space separator when the buffer is
    /// already non-empty.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push_str(text);
    }

    pub fn append_line_break(&mut self) {
        self.data.push('\n');
    }

    /// Reset the logical offset to zero between documents; the backing
    /// allocation (capacity) is retained and reused.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.data.trim()
    }

    pub fn into_string(self) -> String {
        self.data.trim().to_string()
    }
}
