//! `makemandb [-flo]` — build or update the manual-page search index.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mandb::cli::MakemandbArgs;
use mandb::indexer::{self, Summary};
use mandb::store::{OpenMode, Store};
use mandb::DEFAULT_INDEX_PATH;

fn main() -> ExitCode {
    let args = MakemandbArgs::parse();
    match run(&args) {
        Ok(summary) => {
            println!(
                "makemandb: total={} new={} link={} err={}",
                summary.total, summary.new, summary.link, summary.err
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("makemandb: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &MakemandbArgs) -> mandb::Result<Summary> {
    let db_path = PathBuf::from(DEFAULT_INDEX_PATH);

    if args.force && db_path.exists() {
        std::fs::remove_file(&db_path).map_err(|source| mandb::Error::Io {
            path: db_path.clone(),
            source,
        })?;
    }

    let mode = if args.force || !db_path.exists() {
        OpenMode::Create
    } else {
        OpenMode::Write
    };
    let store = Store::open(&db_path, mode)?;

    let directories = indexer::man_path_directories()?;
    let (summary, cache) = indexer::index_roots(&store, &directories, args.names_only)?;

    if !args.force {
        store.prune_absent(&cache)?;
    }

    if args.optimize {
        store.optimize()?;
    }

    Ok(summary)
}
