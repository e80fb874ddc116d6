//! Query compilation and corpus matching

use crate::cache::PatternCache;
use crate::error::QueryError;
use crate::letters::{
    is_left_no_join, is_no_join, strip_marks, LetterClass, ALL_LETTERS, BEH_JOINED, DUAL_JOIN,
    LEFT_NO_JOIN, NO_JOIN,
};
use crate::words::{Corpus, WordRecord};
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default number of compiled patterns kept by the engine cache.
const DEFAULT_PATTERN_CAPACITY: usize = 64;

/// Joining form of the query's final letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterForm {
    Isolated,
    Initial,
    Medial,
    Final,
}

/// One search invocation. Built fresh per search, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    /// Compare against the fully marked text instead of the base text.
    #[serde(default)]
    pub use_marks: bool,
    /// Expand letters to their equivalence classes.
    #[serde(default)]
    pub use_classes: bool,
    /// Joining forms to match. Empty means match at any position.
    #[serde(default)]
    pub forms: Vec<LetterForm>,
}

impl QueryRequest {
    pub fn has_form(&self, form: LetterForm) -> bool {
        self.forms.contains(&form)
    }

    pub fn has_any_form(&self) -> bool {
        !self.forms.is_empty()
    }

    /// Form toggles in fixed isolated/initial/medial/final order.
    pub(crate) fn form_flags(&self) -> [bool; 4] {
        [
            self.has_form(LetterForm::Isolated),
            self.has_form(LetterForm::Initial),
            self.has_form(LetterForm::Medial),
            self.has_form(LetterForm::Final),
        ]
    }
}

/// Matched records in corpus order, plus their count.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'a> {
    pub query: String,
    pub total_hits: usize,
    pub results: Vec<&'a WordRecord>,
    pub elapsed_ms: u64,
}

/// A query compiled down to a matching decision per record.
#[derive(Debug)]
pub enum CompiledQuery {
    /// Empty query: every record matches.
    All,
    /// No requested joining form is satisfiable: no record matches.
    Nothing,
    /// Scan each record's comparison field with this pattern.
    Pattern(Regex),
}

impl CompiledQuery {
    pub fn matches(&self, text: &str) -> Result<bool, QueryError> {
        match self {
            CompiledQuery::All => Ok(true),
            CompiledQuery::Nothing => Ok(false),
            CompiledQuery::Pattern(re) => {
                re.is_match(text).map_err(|e| QueryError::Match(e.to_string()))
            }
        }
    }
}

/// Compile a request into a matching decision.
///
/// Raw query characters outside the letter classes are inserted into the
/// pattern unescaped, so pattern syntax typed by the user is live; an
/// unbalanced expression comes back as `QueryError::InvalidQuery`.
pub fn compile(request: &QueryRequest) -> Result<CompiledQuery, QueryError> {
    if request.text.trim().is_empty() {
        return Ok(CompiledQuery::All);
    }

    let effective = if request.use_marks {
        request.text.clone()
    } else {
        strip_marks(&request.text)
    };

    let body = if request.use_classes {
        expand_classes(&effective)
    } else {
        effective.clone()
    };

    // Positional forms only apply to unmarked matching.
    let pattern = if !request.use_marks && request.has_any_form() {
        positional_alternation(&body, effective.chars().last(), request)
    } else {
        body
    };

    if pattern.is_empty() {
        return Ok(CompiledQuery::Nothing);
    }

    tracing::debug!(%pattern, "compiled query pattern");
    let regex = Regex::new(&pattern).map_err(|e| QueryError::InvalidQuery(e.to_string()))?;
    Ok(CompiledQuery::Pattern(regex))
}

/// Substitute each class letter with an alternation over its class.
///
/// The beh group is the one asymmetry: its letters share the initial and
/// medial shape with the wider `BEH_JOINED` group, but only when a letter
/// follows. The expansion is therefore "`BEH_JOINED` letter followed by a
/// letter, or a plain beh-class letter", not the bare three-letter class.
fn expand_classes(text: &str) -> String {
    let mut expanded = String::new();
    for c in text.chars() {
        match LetterClass::of(c) {
            Some(LetterClass::Beh) => {
                let beh = LetterClass::Beh.members();
                expanded.push_str(&format!("(?:[{BEH_JOINED}](?=[{ALL_LETTERS}])|[{beh}])"));
            }
            Some(class) => {
                expanded.push('[');
                expanded.push_str(class.members());
                expanded.push(']');
            }
            None => expanded.push(c),
        }
    }
    expanded
}

/// Wrap the body with boundary assertions for every requested joining form
/// and join the satisfiable ones into one alternation. Returns an empty
/// string when no form is satisfiable for the query's last letter.
fn positional_alternation(body: &str, last: Option<char>, request: &QueryRequest) -> String {
    // A query whose letters all stripped away has no last letter; it then
    // counts as a member of every boundary table.
    let last_left = last.map_or(true, is_left_no_join);
    let last_no = last.map_or(true, is_no_join);

    // (leading, trailing) context per form; an empty trailing context
    // means no trailing assertion at all.
    let mut contexts: Vec<(String, String)> = Vec::new();

    if request.has_form(LetterForm::Isolated) {
        // The trailing assertion is vacuous when the last letter cannot
        // join forward, and is dropped.
        let trailing = if last_left {
            String::new()
        } else {
            format!("$|[{NO_JOIN}]")
        };
        contexts.push((format!("^|[{LEFT_NO_JOIN}]"), trailing));
    }
    if request.has_form(LetterForm::Initial) && !last_left {
        contexts.push((format!("^|[{LEFT_NO_JOIN}]"), format!("$|[{ALL_LETTERS}]")));
    }
    if request.has_form(LetterForm::Medial) && !last_left {
        contexts.push((format!("[{DUAL_JOIN}]"), format!("[{ALL_LETTERS}]")));
    }
    if request.has_form(LetterForm::Final) && !last_no {
        let trailing = if last_left { String::new() } else { "$".to_string() };
        contexts.push((format!("[{DUAL_JOIN}]"), trailing));
    }

    contexts
        .iter()
        .map(|(leading, trailing)| {
            let mut sub = format!("(?<={leading}){body}");
            if !trailing.is_empty() {
                sub.push_str(&format!("(?={trailing})"));
            }
            sub
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Match a compiled query against every record, in corpus order.
fn scan<'c>(
    corpus: &'c Corpus,
    compiled: &CompiledQuery,
    use_marks: bool,
) -> Result<Vec<&'c WordRecord>, QueryError> {
    let mut matched = Vec::new();
    for word in corpus.words() {
        let text = if use_marks {
            &word.search_text
        } else {
            &word.base_text
        };
        if compiled.matches(text)? {
            matched.push(word);
        }
    }
    Ok(matched)
}

fn into_results<'c>(
    request: &QueryRequest,
    results: Vec<&'c WordRecord>,
    start: Instant,
) -> SearchResults<'c> {
    let total_hits = results.len();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(total_hits, elapsed_ms, "scan complete");
    SearchResults {
        query: request.text.clone(),
        total_hits,
        results,
        elapsed_ms,
    }
}

/// Search the corpus. Pure function of its two inputs; repeated calls are
/// independent and leave the corpus untouched.
pub fn search<'c>(
    corpus: &'c Corpus,
    request: &QueryRequest,
) -> Result<SearchResults<'c>, QueryError> {
    let start = Instant::now();
    let compiled = compile(request)?;
    let results = scan(corpus, &compiled, request.use_marks)?;
    Ok(into_results(request, results, start))
}

/// Owns the corpus and a compiled-pattern cache.
///
/// Searches are read-only; the cache is transparent and a hit returns the
/// same results a fresh compile would.
pub struct SearchEngine {
    corpus: Corpus,
    patterns: PatternCache,
}

impl SearchEngine {
    pub fn new(corpus: Corpus) -> Self {
        Self::with_pattern_capacity(corpus, DEFAULT_PATTERN_CAPACITY)
    }

    pub fn with_pattern_capacity(corpus: Corpus, capacity: usize) -> Self {
        Self {
            corpus,
            patterns: PatternCache::new(capacity),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn search(&self, request: &QueryRequest) -> Result<SearchResults<'_>, QueryError> {
        let start = Instant::now();
        let compiled = self.patterns.get_or_compile(request)?;
        let results = scan(&self.corpus, &compiled, request.use_marks)?;
        Ok(into_results(request, results, start))
    }
}
