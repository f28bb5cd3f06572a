//! Ranker (C5): the `rank_func` SQL scalar behind `ORDER BY rank DESC`.
//!
//! `fts4`'s `matchinfo(tbl, "pclxn")` returns one blob per row, a flat array
//! of native-endian `u32`s:
//!
//! ```text
//! [nphrase][ncol][doclen x ncol][hits: nphrase x ncol x 3][ndoc]
//! ```
//!
//! `hits` is itself a triple per (phrase, column): `(hits in this row, hits
//! across the whole table, rows containing at least one hit)`. Column 0 is
//! `section`, which is excluded from ranking, so the loops below start at 1.

use std::cell::Cell;
use std::rc::Rc;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::error::Result;
use crate::types::SECTION_NAMES;

/// Per-column weights, in the order `SECTION_NAMES` declares them.
pub const WEIGHTS: [f64; 11] = [
    2.0,   // name
    2.0,   // name_desc
    0.55,  // description
    0.25,  // library
    0.10,  // synopsis
    0.001, // return_values
    0.20,  // environment
    0.01,  // files
    0.001, // exit_status
    2.0,   // diagnostics
    0.05,  // errors
];

const K: f64 = 3.75;

/// IDF depends on the whole table, not on any one row, so it is computed
/// once per query and cached rather than recomputed for every matching row.
/// The caller must call `reset` before issuing a new `MATCH` query.
#[derive(Default)]
pub struct IdfCache {
    value: Cell<f64>,
    computed: Cell<bool>,
}

impl IdfCache {
    pub fn reset(&self) {
        self.value.set(0.0);
        self.computed.set(false);
    }
}

/// Register `rank_func(blob)` on `conn`, returning the cache the caller owns
/// for the lifetime of the connection.
///
/// Not marked `SQLITE_DETERMINISTIC`: its output depends on table-wide
/// statistics (document frequency), which can change between calls even for
/// an identical input blob within the same process lifetime.
pub fn register(conn: &Connection) -> Result<Rc<IdfCache>> {
    let idf = Rc::new(IdfCache::default());
    let idf_for_closure = Rc::clone(&idf);

    conn.create_scalar_function("rank_func", 1, FunctionFlags::SQLITE_UTF8, move |ctx| {
        let blob: Vec<u8> = ctx.get(0)?;
        Ok(score(&blob, &idf_for_closure))
    })?;

    Ok(idf)
}

fn read_u32(blob: &[u8], idx: usize) -> u32 {
    let start = idx * 4;
    u32::from_ne_bytes(blob[start..start + 4].try_into().expect("matchinfo blob word"))
}

/// Decode one row's `"pclxn"` blob into a TF/IDF score.
///
/// `tf = sum(hits_in_row * weight / (hits_global * doclen))`, accumulated
/// across every matched phrase and column. `idf` is `sum(log(ndoc /
/// docs_with_hit) * weight)`, computed once per query and cached. The final
/// score is `tf * idf / (k + tf)`, a saturating curve so one wildly common
/// term can't dominate a row that also matches rarer terms.
fn score(blob: &[u8], idf: &IdfCache) -> f64 {
    let nphrase = read_u32(blob, 0) as usize;
    let ncol = read_u32(blob, 1) as usize;
    let hits_offset = 2 + ncol;
    let ndoc_offset = hits_offset + 3 * ncol * nphrase;
    let ndoc = read_u32(blob, ndoc_offset) as f64;

    let mut tf = 0.0;
    let mut idf_sum = 0.0;

    for iphrase in 0..nphrase {
        for icol in 1..ncol.min(SECTION_NAMES.len() + 1) {
            let base = hits_offset + iphrase * ncol * 3 + icol * 3;
            let hits_in_row = f64::from(read_u32(blob, base));
            let hits_global = f64::from(read_u32(blob, base + 1));
            let docs_with_hit = f64::from(read_u32(blob, base + 2));
            let doclen = f64::from(read_u32(blob, 2 + icol));
            let weight = WEIGHTS[icol - 1];

            if !idf.computed.get() && docs_with_hit > 0.0 && ndoc > 0.0 {
                idf_sum += (ndoc / docs_with_hit).ln() * weight;
            }
            if hits_global > 0.0 && hits_in_row > 0.0 && doclen > 0.0 {
                tf += (hits_in_row * weight) / (hits_global * doclen);
            }
        }
    }

    if !idf.computed.get() {
        idf.value.set(idf_sum);
        idf.computed.set(true);
    }

    (tf * idf.value.get()) / (K + tf)
}
