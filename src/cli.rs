//! CLI argument shapes for the two binaries.

use clap::Parser;

/// `makemandb [-flo]`
#[derive(Parser, Debug)]
#[command(name = "makemandb", about = "Build or update the manual-page search index", version)]
pub struct MakemandbArgs {
    /// Force a full rebuild: remove the existing index file before opening,
    /// and skip pruning at the end of the run.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Limit indexing to the NAME section only.
    #[arg(short = 'l', long = "names-only")]
    pub names_only: bool,

    /// Run a post-commit optimization pass on the index.
    #[arg(short = 'o', long = "optimize")]
    pub optimize: bool,
}

/// `apropos [-123456789p] query`
#[derive(Parser, Debug)]
#[command(name = "apropos", about = "Search the manual-page index", version)]
pub struct AproposArgs {
    #[arg(short = '1')]
    pub section_1: bool,
    #[arg(short = '2')]
    pub section_2: bool,
    #[arg(short = '3')]
    pub section_3: bool,
    #[arg(short = '4')]
    pub section_4: bool,
    #[arg(short = '5')]
    pub section_5: bool,
    #[arg(short = '6')]
    pub section_6: bool,
    #[arg(short = '7')]
    pub section_7: bool,
    #[arg(short = '8')]
    pub section_8: bool,
    #[arg(short = '9')]
    pub section_9: bool,

    /// Pipe results to a pager instead of limiting to 10 and highlighting.
    #[arg(short = 'p')]
    pub paged: bool,

    /// The search terms, joined with spaces.
    #[arg(trailing_var_arg = true, required = true)]
    pub query: Vec<String>,
}

impl AproposArgs {
    /// The section codes selected by digit flags, in ascending order.
    pub fn sections(&self) -> Vec<char> {
        let flags = [
            (self.section_1, '1'),
            (self.section_2, '2'),
            (self.section_3, '3'),
            (self.section_4, '4'),
            (self.section_5, '5'),
            (self.section_6, '6'),
            (self.section_7, '7'),
            (self.section_8, '8'),
            (self.section_9, '9'),
        ];
        flags.into_iter().filter(|(set, _)| *set).map(|(_, c)| c).collect()
    }

    pub fn raw_query(&self) -> String {
        self.query.join(" ")
    }
}
