//! Shared accumulator threaded through every dispatch handler.
//!
//! A single owning record passed by `&mut` to every handler, rather than a
//! set of module-level globals, so nothing about extracting one page can
//! leak into extracting the next.

use crate::extract::buffer::SectionBuffer;
use crate::types::{Document, Section};

#[derive(Debug, Default)]
pub struct SectionBuffers {
    pub description: SectionBuffer,
    pub library: SectionBuffer,
    pub synopsis: SectionBuffer,
    pub return_values: SectionBuffer,
    pub environment: SectionBuffer,
    pub files: SectionBuffer,
    pub exit_status: SectionBuffer,
    pub diagnostics: SectionBuffer,
    pub errors: SectionBuffer,
}

impl SectionBuffers {
    /// The buffer routed to for `section`, or `None` for `Section::Name`
    /// (name/name_desc are captured separately, not through this table).
    pub fn buffer_mut(&mut self, section: Section) -> Option<&mut SectionBuffer> {
        match section {
            Section::Description | Section::None => Some(&mut self.description),
            Section::Library => Some(&mut self.library),
            Section::Synopsis => Some(&mut self.synopsis),
            Section::ReturnValues => Some(&mut self.return_values),
            Section::Environment => Some(&mut self.environment),
            Section::Files => Some(&mut self.files),
            Section::ExitStatus => Some(&mut self.exit_status),
            Section::Diagnostics => Some(&mut self.diagnostics),
            Section::Errors => Some(&mut self.errors),
            Section::Name => None,
        }
    }
}

pub struct ExtractState {
    pub name: SectionBuffer,
    pub name_desc: SectionBuffer,
    pub buffers: SectionBuffers,
    pub links: Vec<String>,
    pub machine: Option<String>,
    /// The `-l` "names only" limit: when set, every section buffer other
    /// than name/name_desc is a no-op.
    pub names_only: bool,
}

impl ExtractState {
    pub fn new(names_only: bool) -> Self {
        Self {
            name: SectionBuffer::new(),
            name_desc: SectionBuffer::new(),
            buffers: SectionBuffers::default(),
            links: Vec::new(),
            machine: None,
            names_only,
        }
    }

    /// Route `text` into the buffer for `section`; a no-op under the limit
    /// flag, and a no-op for `Section::Name` (handled by dedicated macros).
    pub fn route_text(&mut self, text: &str, section: Section) {
        if self.names_only || text.is_empty() {
            return;
        }
        if let Some(buf) = self.buffers.buffer_mut(section) {
            buf.append(text);
        }
    }

    pub fn route_newline(&mut self, section: Section) {
        if self.names_only {
            return;
        }
        if let Some(buf) = self.buffers.buffer_mut(section) {
            buf.append_line_break();
        }
    }

    pub fn finish(self, section_char: String) -> (Document, Vec<String>, Option<String>) {
        let document = Document {
            section: section_char,
            name: self.name.into_string(),
            name_desc: self.name_desc.into_string(),
            description: self.buffers.description.into_string(),
            library: self.buffers.library.into_string(),
            synopsis: self.buffers.synopsis.into_string(),
            return_values: self.buffers.return_values.into_string(),
            environment: self.buffers.environment.into_string(),
            files: self.buffers.files.into_string(),
            exit_status: self.buffers.exit_status.into_string(),
            diagnostics: self.buffers.diagnostics.into_string(),
            errors: self.buffers.errors.into_string(),
        };
        (document, self.links, self.machine)
    }
}
