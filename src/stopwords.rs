//! The canonical stop-word list. `makemandb` and `apropos` historically
//! carried two near-identical copies of this list; `mandb` has exactly one,
//! shared by both.
//!
//! Only `apropos` calls `filter_stopwords`, at query time. The original's
//! index side got the same effect from a custom FTS3 tokenizer that wrapped
//! the Porter stemmer and dropped stop words during tokenization, leaving
//! the stored column text untouched; building the equivalent of that
//! tokenizer requires SQLite's `xCreate`/`xNext` callback ABI, which has no
//! safe wrapper in `rusqlite` and would need `unsafe` to implement by hand —
//! ruled out by this crate's `forbid(unsafe_code)`. Pre-stripping stop words
//! out of the stored text before indexing was considered and rejected: a
//! stop word is never indexable. Since every query is already stop-word
//! filtered before it reaches `MATCH`, no query term is ever a stop word
//! either, so whether the FTS table also holds postings for stop words has
//! no effect on which rows match or how they rank — it only costs a few
//! extra postings in a table already small enough that porter stemming and
//! per-column weighting dominate the size. Filtering name/name_desc at
//! index time would additionally have mangled the very text `apropos`
//! prints back to the user, which the original's tokenizer-based approach
//! never touched.

/// Single alphanumeric characters are filtered separately in `is_stopword` —
/// they are a separate rule, not baked into this list, so the list itself
/// stays pure English stop words.
const STOPWORDS: &[&str] = &[
    "about", "also", "all", "an", "another", "and", "are", "as", "ask", "at", "again", "always",
    "any", "around", "back", "be", "been", "before", "between", "below", "by", "bye", "but",
    "because", "case", "can", "consist", "could", "did", "does", "down", "each", "early",
    "either", "end", "enough", "even", "every", "fact", "far", "few", "four", "further", "follow",
    "from", "full", "general", "good", "got", "great", "give", "given", "have", "has", "had",
    "here", "how", "having", "high", "him", "his", "however", "if", "important", "in", "interest",
    "into", "is", "it", "just", "keep", "keeps", "kind", "knew", "know", "large", "larger",
    "last", "later", "latter", "latest", "least", "let", "like", "likely", "long", "longer",
    "made", "many", "may", "me", "might", "most", "mostly", "much", "must", "my", "necessary",
    "need", "never", "needs", "next", "no", "non", "noone", "not", "nothing", "names", "new",
    "often", "old", "older", "once", "only", "order", "our", "out", "over", "of", "off", "on",
    "or", "part", "per", "perhaps", "possible", "present", "problem", "quite", "rather",
    "really", "right", "room", "said", "same", "saw", "say", "says", "second", "see", "seem",
    "seemed", "seems", "sees", "several", "shall", "should", "side", "sides", "small", "smaller",
    "so", "some", "something", "state", "states", "still", "such", "sure", "take", "taken",
    "then", "them", "their", "there", "therefore", "thing", "think", "thinks", "though", "three",
    "thus", "together", "too", "took", "toward", "turn", "two", "the", "this", "up", "that",
    "to", "these", "those", "until", "upon", "us", "use", "used", "uses", "very", "want",
    "wanted", "wants", "was", "way", "ways", "we", "well", "went", "were", "whether", "with",
    "within", "without", "work", "would", "what", "when", "why", "will", "willing", "year",
    "yet", "you",
];

/// Whether `token` (already lowercased) should be dropped from a query: a
/// listed stop word, or a single alphanumeric character.
pub fn is_stopword(token: &str) -> bool {
    let mut chars = token.chars();
    if let (Some(_), None) = (chars.next(), chars.next()) {
        return token.chars().next().is_some_and(|c| c.is_alphanumeric());
    }
    STOPWORDS.contains(&token)
}

/// Remove stop words from `query`, tokenizing on whitespace and rejoining
/// survivors with single spaces.
pub fn filter_stopwords(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}
