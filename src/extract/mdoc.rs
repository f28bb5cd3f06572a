//! Dispatch over the structured (`mdoc`) dialect.
//!
//! A fixed, small set of macro tokens has a non-null handler; everything
//! else recurses into its children. `match` on the macro token compiles to
//! the same jump table a hand-written dispatch array would give, while
//! keeping the handler for each token next to its name.

use crate::ast::{MdocDoc, MdocNode};
use crate::extract::buffer::SectionBuffer;
use crate::extract::state::ExtractState;
use crate::types::Section;

pub fn extract(doc: &MdocDoc, names_only: bool) -> (crate::types::Document, Vec<String>, Option<String>) {
    let mut state = ExtractState::new(names_only);
    state.machine = doc.architecture.clone();

    for node in &doc.nodes {
        if let MdocNode::Macro { tok, children } = node {
            if tok == "Sh" {
                dispatch_section(children, &mut state);
            }
        }
    }

    split_name_and_links(&mut state);

    state.finish(doc.section.clone().unwrap_or_default())
}

/// Multiple `.Nm` macros inside NAME all append to one buffer, space
/// separated ("strcpy strncpy"). The first token is the document's
/// canonical name; every token after it is an alternate name, recorded as a
/// link the way a comma-separated NAME line in the presentational dialect
/// already is (see `extract::man::extract_name_section`).
fn split_name_and_links(state: &mut ExtractState) {
    let full = state.name.as_str().to_string();
    let mut parts = full.split_whitespace();
    let Some(first) = parts.next() else { return };

    let mut canonical = SectionBuffer::new();
    canonical.append(first.trim_end_matches(','));
    state.name = canonical;

    for rest in parts {
        let link = rest.trim_matches(',');
        if !link.is_empty() {
            state.links.push(link.to_string());
        }
    }
}

/// The `Sh` handler: the first child is the heading, the rest is the body,
/// routed to the section it names.
fn dispatch_section(children: &[MdocNode], state: &mut ExtractState) {
    let heading = match children.first() {
        Some(MdocNode::Text(t)) => t.as_str(),
        _ => "",
    };
    let section = Section::from_header(heading);

    for child in &children[1..] {
        dispatch_node(child, section, state);
    }
}

fn dispatch_node(node: &MdocNode, section: Section, state: &mut ExtractState) {
    match node {
        MdocNode::Text(t) => state.route_text(t, section),
        MdocNode::Macro { tok, children } => match tok.as_str() {
            "Nm" => dispatch_nm(children, section, state),
            "Nd" => dispatch_nd(children, state),
            "Xr" => dispatch_xr(children, section, state),
            "Pp" => state.route_newline(section),
            _ => {
                for child in children {
                    dispatch_node(child, section, state);
                }
            }
        },
    }
}

/// Name macro: in NAME, append each text child to `name`. Elsewhere, its
/// arguments are substituted with the previously captured name rather than
/// re-extracted — `.Nm` inside DESCRIPTION means "the program's name", not
/// whatever (if anything) follows it on that line.
fn dispatch_nm(children: &[MdocNode], section: Section, state: &mut ExtractState) {
    if section == Section::Name {
        for child in children {
            if let MdocNode::Text(t) = child {
                state.name.append(t);
            }
        }
    } else {
        let name = state.name.as_str().to_string();
        state.route_text(&name, section);
    }
}

/// One-line-description macro: concatenate all text descendants, space
/// joined, into `name_desc`.
fn dispatch_nd(children: &[MdocNode], state: &mut ExtractState) {
    let joined = collect_text(children);
    state.name_desc.append(&joined);
}

/// Cross-reference macro: `<ref> <section>` becomes the literal
/// `ref(section)`. Only the first two text tokens of its child list are
/// consumed, per spec.
fn dispatch_xr(children: &[MdocNode], section: Section, state: &mut ExtractState) {
    let mut texts = children.iter().filter_map(as_text);
    if let (Some(reference), Some(sec)) = (texts.next(), texts.next()) {
        state.route_text(&format!("{reference}({sec})"), section);
    }
}

fn as_text(node: &MdocNode) -> Option<&str> {
    match node {
        MdocNode::Text(t) => Some(t.as_str()),
        MdocNode::Macro { .. } => None,
    }
}

fn collect_text(nodes: &[MdocNode]) -> String {
    fn walk(node: &MdocNode, out: &mut Vec<String>) {
        match node {
            MdocNode::Text(t) => out.push(t.clone()),
            MdocNode::Macro { children, .. } => {
                for child in children {
                    walk(child, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    for node in nodes {
        walk(node, &mut out);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;

    #[test]
    fn extracts_name_and_description() {
        let src = ".Dd January 1, 2024\n.Dt LS 1\n.Os\n\
                   .Sh NAME\n.Nm ls\n.Nd list directory contents\n\
                   .Sh DESCRIPTION\nThe\n.Nm\nutility lists files.\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Mdoc(doc) => doc,
            _ => panic!("expected mdoc"),
        };
        let (document, links, _machine) = extract(&doc, false);
        assert_eq!(document.name, "ls");
        assert_eq!(document.name_desc, "list directory contents");
        assert!(document.description.contains("ls utility lists files."));
        assert!(links.is_empty());
    }

    #[test]
    fn multiple_nm_in_name_splits_into_canonical_name_and_links() {
        let src = ".Dd January 1, 2024\n.Dt STRCPY 3\n.Os\n\
                   .Sh NAME\n.Nm strcpy ,\n.Nm strncpy\n.Nd copy a string\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Mdoc(doc) => doc,
            _ => panic!("expected mdoc"),
        };
        let (document, links, _machine) = extract(&doc, false);
        assert_eq!(document.name, "strcpy");
        assert_eq!(links, vec!["strncpy".to_string()]);
    }

    #[test]
    fn xr_emits_ref_paren_section() {
        let src = ".Dd d\n.Dt FOO 1\n.Os\n.Sh SEE ALSO\n.Xr malloc 3\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Mdoc(doc) => doc,
            _ => panic!("expected mdoc"),
        };
        let (document, _links, _machine) = extract(&doc, false);
        // SEE ALSO is not in the routing table, so it falls back to description.
        assert_eq!(document.description, "malloc(3)");
    }

    #[test]
    fn names_only_skips_everything_but_name_fields() {
        let src = ".Dd d\n.Dt LS 1\n.Os\n.Sh NAME\n.Nm ls\n.Nd list files\n\
                   .Sh DESCRIPTION\nExtended description text.\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Mdoc(doc) => doc,
            _ => panic!("expected mdoc"),
        };
        let (document, _links, _machine) = extract(&doc, true);
        assert_eq!(document.name, "ls");
        assert_eq!(document.name_desc, "list files");
        assert!(document.description.is_empty());
    }
}
