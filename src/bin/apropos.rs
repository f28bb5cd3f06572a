//! `apropos [-123456789p] query` — search the manual-page index.

use std::path::PathBuf;
use std::process::{Command, ExitCode, Stdio};

use clap::Parser;

use mandb::cli::AproposArgs;
use mandb::display;
use mandb::store::OpenMode;
use mandb::types::SearchHit;
use mandb::{Error, QueryEngine, Store, DEFAULT_INDEX_PATH};

fn main() -> ExitCode {
    let args = AproposArgs::parse();
    match run(&args) {
        Ok(hits) => {
            if args.paged {
                if !page(&hits) {
                    eprintln!("apropos: more: pipe failed");
                    return ExitCode::FAILURE;
                }
            } else {
                print_hits(&hits);
            }
            ExitCode::SUCCESS
        }
        Err(Error::NoRelevantTerms) => {
            eprintln!("apropos: query reduced to no relevant terms; try more specific keywords");
            ExitCode::FAILURE
        }
        Err(Error::NotFound) => {
            eprintln!("Sorry, no relevant results could be obtained");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("apropos: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &AproposArgs) -> mandb::Result<Vec<SearchHit>> {
    let db_path = PathBuf::from(DEFAULT_INDEX_PATH);
    let store = Store::open(&db_path, OpenMode::ReadOnly)?;
    let engine = QueryEngine::new(&store)?;

    let plain = args.paged || !display::use_color();
    engine.search(&args.raw_query(), &args.sections(), args.paged, plain)
}

fn print_hits(hits: &[SearchHit]) {
    for hit in hits {
        println!("{}({}) - {}", hit.name, hit.section, hit.name_desc);
        println!("    {}", hit.snippet);
    }
}

/// Pipe formatted results to the external `more` pager. If the pager can't
/// be spawned, the query aborts: returns `false` so `main` can report
/// failure instead of silently falling back to unpaged output.
fn page(hits: &[SearchHit]) -> bool {
    let Ok(mut child) = Command::new("more").stdin(Stdio::piped()).spawn() else {
        return false;
    };

    if let Some(stdin) = child.stdin.take() {
        use std::io::Write;
        let mut stdin = stdin;
        for hit in hits {
            let _ = writeln!(stdin, "{}({}) - {}", hit.name, hit.section, hit.name_desc);
            let _ = writeln!(stdin, "    {}", hit.snippet);
        }
    }
    let _ = child.wait();
    true
}
