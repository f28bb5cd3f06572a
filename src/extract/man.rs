//! Section routing for the presentational (`man`) dialect.

use crate::ast::{ManDoc, ManNode};
use crate::extract::state::ExtractState;
use crate::types::Section;

pub fn extract(doc: &ManDoc, names_only: bool) -> (crate::types::Document, Vec<String>, Option<String>) {
    let mut state = ExtractState::new(names_only);

    for node in &doc.nodes {
        if let ManNode::Section { head, body } = node {
            let header = collect_text(head);
            let section = Section::from_header(&header);
            if section == Section::Name {
                extract_name_section(body, &mut state);
            } else {
                let text = collect_text(body);
                state.route_text(&text, section);
            }
        }
    }

    state.finish(doc.section.clone().unwrap_or_default())
}

/// NAME is parsed specially: the first comma-separated word becomes `name`;
/// remaining comma-separated words become `links`; text following a
/// standalone `-` separator becomes `name_desc`.
fn extract_name_section(body: &[ManNode], state: &mut ExtractState) {
    let line = collect_text(body);
    let (names_part, desc_part) = split_on_dash(&line);

    let mut names = names_part
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(first) = names.next() {
        state.name.append(first);
    }
    for link in names {
        state.links.push(link.to_string());
    }

    if let Some(desc) = desc_part {
        state.name_desc.append(desc.trim());
    }
}

/// Split on a standalone `-` separator (the `\-` escape is stripped to a
/// bare `-` upstream by the tokenizer).
fn split_on_dash(line: &str) -> (&str, Option<&str>) {
    if let Some(idx) = line.find(" - ") {
        (&line[..idx], Some(&line[idx + 3..]))
    } else {
        (line, None)
    }
}

fn collect_text(nodes: &[ManNode]) -> String {
    fn walk(node: &ManNode, out: &mut Vec<String>) {
        match node {
            ManNode::Text(t) => out.push(t.clone()),
            ManNode::Section { head, body } => {
                for n in head.iter().chain(body.iter()) {
                    walk(n, out);
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
    fn parses_name_section_with_links_and_description() {
        let src = ".TH LS 1\n.SH NAME\nls, dir, vdir \\- list directory contents\n\
                   .SH DESCRIPTION\nLists files in a directory.\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Man(doc) => doc,
            _ => panic!("expected man"),
        };
        let (document, links, _machine) = extract(&doc, false);
        assert_eq!(document.name, "ls");
        assert_eq!(links, vec!["dir".to_string(), "vdir".to_string()]);
        assert_eq!(document.name_desc, "list directory contents");
        assert!(document.description.contains("Lists files in a directory."));
    }

    #[test]
    fn unmatched_header_routes_to_description() {
        let src = ".TH FOO 1\n.SH NAME\nfoo \\- does a thing\n.SH BUGS\nSome bugs.\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Man(doc) => doc,
            _ => panic!("expected man"),
        };
        let (document, _links, _machine) = extract(&doc, false);
        assert_eq!(document.description, "Some bugs.");
    }

    #[test]
    fn two_line_return_value_header_is_recognized() {
        let src = ".TH FOO 3\n.SH NAME\nfoo \\- thing\n.SH \"RETURN VALUE(S)\"\nZero on success.\n";
        let doc = match ast::parse(src) {
            ast::ManPageAst::Man(doc) => doc,
            _ => panic!("expected man"),
        };
        let (document, _links, _machine) = extract(&doc, false);
        assert_eq!(document.return_values, "Zero on success.");
    }
}
