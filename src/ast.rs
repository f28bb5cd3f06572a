//! A minimal stand-in for a real `mdoc(7)`/`man(7)` parser.
//!
//! No published Rust crate parses either roff dialect, so this module plays
//! that role just well enough to exercise `SectionExtractor` end to end: it
//! recognizes the two dialects' header macros and builds the node shapes the
//! extractor's dispatch table expects. It is deliberately thin — full
//! macro-language coverage is out of scope; only the subset the extractor
//! dispatches on is implemented.

/// A node in the structured (`mdoc`) dialect's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdocNode {
    /// A macro call: `tok` is the macro name (`"Sh"`, `"Nm"`, `"Xr"`, ...),
    /// `children` are its text arguments and/or nested macro calls, in order.
    Macro { tok: String, children: Vec<MdocNode> },
    Text(String),
}

/// The structured dialect's document: header metadata plus top-level nodes
/// (almost always a sequence of `Sh` section macros).
#[derive(Debug, Clone, Default)]
pub struct MdocDoc {
    pub section: Option<String>,
    pub architecture: Option<String>,
    pub nodes: Vec<MdocNode>,
}

/// A node in the presentational (`man`) dialect's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManNode {
    /// A `.SH`/`.SS` block: `head` is the heading text, `body` its content.
    Section { head: Vec<ManNode>, body: Vec<ManNode> },
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct ManDoc {
    pub section: Option<String>,
    pub nodes: Vec<ManNode>,
}

/// At most one of these is ever populated: a page is either mdoc, man, or
/// neither (in which case it isn't a manual page at all).
#[derive(Debug, Clone)]
pub enum ManPageAst {
    Mdoc(MdocDoc),
    Man(ManDoc),
    NotAManualPage,
}

/// Classify `source` by its header macro and build the matching tree.
pub fn parse(source: &str) -> ManPageAst {
    let mut is_mdoc = false;
    let mut is_man = false;
    for raw_line in source.lines() {
        let line = raw_line.trim_start();
        if line.starts_with(".Dd") || line.starts_with(".Dt") || line.starts_with(".Os") {
            is_mdoc = true;
        }
        if line.starts_with(".TH") {
            is_man = true;
        }
    }

    if is_mdoc {
        ManPageAst::Mdoc(parse_mdoc(source))
    } else if is_man {
        ManPageAst::Man(parse_man(source))
    } else {
        ManPageAst::NotAManualPage
    }
}

/// Split a macro line into its token and quote-aware arguments, so headers
/// like `.SH "RETURN VALUE(S)"` come through as one argument, not three.
fn tokenize_macro_line(line: &str) -> (String, Vec<String>) {
    let mut args = Vec::new();
    let mut chars = line[1..].chars().peekable();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }

    if args.is_empty() {
        (String::new(), Vec::new())
    } else {
        let tok = args.remove(0);
        (tok, args)
    }
}

fn parse_mdoc(source: &str) -> MdocDoc {
    let mut doc = MdocDoc::default();
    let mut sh_index: Option<usize> = None;

    for raw_line in source.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('.') || line.starts_with('\'') {
            let (tok, args) = tokenize_macro_line(line);
            match tok.as_str() {
                "Dt" => {
                    if let Some(sec) = args.get(1) {
                        doc.section = Some(sec.clone());
                    }
                    if let Some(arch) = args.get(2) {
                        doc.architecture = Some(arch.clone());
                    }
                }
                "Dd" | "Os" => {}
                "Sh" => {
                    doc.nodes.push(MdocNode::Macro {
                        tok: "Sh".to_string(),
                        children: vec![MdocNode::Text(args.join(" "))],
                    });
                    sh_index = Some(doc.nodes.len() - 1);
                }
                _ => {
                    let node = MdocNode::Macro {
                        tok,
                        children: args.into_iter().map(MdocNode::Text).collect(),
                    };
                    push_mdoc_content(&mut doc.nodes, sh_index, node);
                }
            }
        } else {
            push_mdoc_content(&mut doc.nodes, sh_index, MdocNode::Text(line.to_string()));
        }
    }

    doc
}

fn push_mdoc_content(root: &mut [MdocNode], sh_index: Option<usize>, node: MdocNode) {
    let Some(idx) = sh_index else {
        return;
    };
    if let MdocNode::Macro { children, .. } = &mut root[idx] {
        children.push(node);
    }
}

struct Building {
    head: Vec<ManNode>,
    body: Vec<ManNode>,
}

fn parse_man(source: &str) -> ManDoc {
    let mut section = None;
    let mut sections: Vec<Building> = Vec::new();

    for raw_line in source.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('.') || line.starts_with('\'') {
            let (tok, args) = tokenize_macro_line(line);
            match tok.as_str() {
                "TH" => {
                    if let Some(sec) = args.get(1) {
                        section = Some(sec.clone());
                    }
                }
                "SH" | "SS" => {
                    sections.push(Building {
                        head: vec![ManNode::Text(strip_escapes(&args.join(" ")))],
                        body: Vec::new(),
                    });
                }
                _ => {
                    let text = strip_escapes(&args.join(" "));
                    if !text.is_empty() {
                        push_man_text(&mut sections, text);
                    }
                }
            }
        } else {
            push_man_text(&mut sections, strip_escapes(line));
        }
    }

    ManDoc {
        section,
        nodes: sections
            .into_iter()
            .map(|b| ManNode::Section {
                head: b.head,
                body: b.body,
            })
            .collect(),
    }
}

fn push_man_text(sections: &mut [Building], text: String) {
    if let Some(last) = sections.last_mut() {
        last.body.push(ManNode::Text(text));
    }
}

/// Escape prefixes stripped: `\&` (zero-width break) and `\fX...` font
/// changes (we drop the font-change escape itself, not its argument text).
fn strip_escapes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('&') => {
                    chars.next();
                }
                Some('f') => {
                    chars.next();
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}
