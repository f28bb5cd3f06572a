//! QueryEngine (C6): turns a raw query string into ranked `SearchHit`s.

use std::rc::Rc;

use rusqlite::params_from_iter;

use crate::error::{Error, Result};
use crate::scoring::IdfCache;
use crate::store::Store;
use crate::stopwords;
use crate::types::SearchHit;

/// Bold-on/bold-off markers wrapped around matched terms in `apropos`'s
/// snippet output. Suppressed entirely when output isn't going to a
/// terminal, or when the `-p` (paging-friendly) flag is set.
const HIGHLIGHT_OPEN: &str = "\u{1b}[1m";
const HIGHLIGHT_CLOSE: &str = "\u{1b}[0m";

const RESULT_LIMIT: usize = 10;

pub struct QueryEngine<'a> {
    store: &'a Store,
    idf: Rc<IdfCache>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a Store) -> Result<QueryEngine<'a>> {
        let idf = store.register_ranker()?;
        Ok(QueryEngine { store, idf })
    }

    /// Run one query. `sections` restricts results to those one-character
    /// section codes (empty means unrestricted). `plain` suppresses ANSI
    /// highlighting (matching `-p` or a non-terminal stdout); `paged`
    /// matches the `-p` flag itself: when set, the row cap is lifted because
    /// output is destined for an external pager instead of a fixed-height
    /// terminal page.
    pub fn search(&self, raw_query: &str, sections: &[char], paged: bool, plain: bool) -> Result<Vec<SearchHit>> {
        let filtered = stopwords::filter_stopwords(raw_query);
        if filtered.is_empty() {
            return Err(Error::NoRelevantTerms);
        }

        let (open, close) = if plain { ("", "") } else { (HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE) };

        let mut sql = String::from(
            "SELECT section, name, name_desc, snippet(mandb, ?, ?, '...'), rank_func(matchinfo(mandb, 'pclxn')) AS rank \
             FROM mandb WHERE mandb MATCH ?",
        );

        let mut bind: Vec<String> = vec![open.to_string(), close.to_string(), filtered];

        if !sections.is_empty() {
            sql.push_str(" AND (");
            let clauses: Vec<&str> = sections.iter().map(|_| "section LIKE ?").collect();
            sql.push_str(&clauses.join(" OR "));
            sql.push(')');
            bind.extend(sections.iter().map(|c| c.to_string()));
        }

        sql.push_str(" ORDER BY rank DESC");
        if !paged {
            sql.push_str(" LIMIT ?");
            bind.push(RESULT_LIMIT.to_string());
        }

        self.idf.reset();
        let mut stmt = self.store.connection().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind.iter()), |row| {
            Ok(SearchHit {
                section: row.get(0)?,
                name: row.get(1)?,
                name_desc: row.get(2)?,
                snippet: row.get(3)?,
                score: row.get(4)?,
            })
        })?;

        let hits: Vec<SearchHit> = rows.collect::<rusqlite::Result<_>>()?;
        if hits.is_empty() {
            return Err(Error::NotFound);
        }
        Ok(hits)
    }
}
