//! SectionExtractor (C3): `extract(path) -> Document | ParseFailed`.

mod buffer;
mod man;
mod mdoc;
mod state;

use std::fs;
use std::path::Path;

use crate::ast::{self, ManPageAst};
use crate::error::{Error, Result};
use crate::types::Document;

/// The result of a successful extraction: the document plus its links and
/// (mdoc-only) machine architecture, both destined for the links table.
pub struct Extracted {
    pub document: Document,
    pub links: Vec<String>,
    pub machine: Option<String>,
}

/// Parse `path` and route its text into section buffers.
///
/// `names_only` implements the `-l` limit flag: when set, only
/// `name`/`name_desc` are populated.
pub fn extract(path: &Path, names_only: bool) -> Result<Extracted> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (document, links, machine) = match ast::parse(&source) {
        ManPageAst::Mdoc(doc) => mdoc::extract(&doc, names_only),
        ManPageAst::Man(doc) => man::extract(&doc, names_only),
        ManPageAst::NotAManualPage => {
            return Err(Error::ParseFailed {
                path: path.to_path_buf(),
                reason: "not a manual page".to_string(),
            });
        }
    };

    // I5: a document whose name, name_desc, or section would be empty is
    // never persisted.
    if !document.is_complete() {
        return Err(Error::ParseFailed {
            path: path.to_path_buf(),
            reason: "missing name, name_desc, or section".to_string(),
        });
    }

    Ok(Extracted {
        document,
        links,
        machine,
    })
}
