//! Corpus loading from the SQLite layout database

use crate::words::{Corpus, WordRecord};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Words joined to their page and line in the layout table, in mushaf
/// order. Layout rows cover ayah ranges of the running word number.
const CORPUS_QUERY: &str = "\
    SELECT l.page, l.line, w.qpc_v1, w.dk_v1 \
      FROM words w \
     INNER JOIN qpc_v1_layout l \
        ON l.type = 'ayah' \
       AND l.range_start <= w.word_number_all \
       AND l.range_end >= w.word_number_all \
     ORDER BY w.word_number_all";

/// Load the full word corpus. `base_text` is derived here, once per
/// record; searches only ever read it.
pub fn load_corpus(db_path: &Path) -> Result<Corpus> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open corpus db at {:?}", db_path))?;

    let mut stmt = conn.prepare(CORPUS_QUERY)?;
    let words = stmt
        .query_map([], |row| {
            Ok(WordRecord::new(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read corpus rows")?;

    tracing::info!(words = words.len(), "corpus loaded");
    Ok(Corpus::new(words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE words (
                word_number_all INTEGER PRIMARY KEY,
                qpc_v1 TEXT NOT NULL,
                dk_v1 TEXT NOT NULL
            );
            CREATE TABLE qpc_v1_layout (
                page INTEGER NOT NULL,
                line INTEGER NOT NULL,
                type TEXT NOT NULL,
                range_start INTEGER NOT NULL,
                range_end INTEGER NOT NULL
            );
            INSERT INTO words VALUES (1, 'g1', 'بِسْمِ');
            INSERT INTO words VALUES (2, 'g2', 'ٱللَّهِ');
            INSERT INTO qpc_v1_layout VALUES (1, 2, 'ayah', 1, 2);
            INSERT INTO qpc_v1_layout VALUES (9, 9, 'surah_name', 1, 2);
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_corpus_joins_and_derives_bases() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("corpus.sqlite");
        seed_db(&db_path);

        let corpus = load_corpus(&db_path).unwrap();
        assert_eq!(corpus.len(), 2);

        let first = &corpus.words()[0];
        assert_eq!((first.page, first.line), (1, 2));
        assert_eq!(first.display_text, "g1");
        assert_eq!(first.search_text, "بِسْمِ");
        assert_eq!(first.base_text, "بسم");

        let second = &corpus.words()[1];
        assert_eq!(second.base_text, "ٱلله");
    }
}
