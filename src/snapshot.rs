//! Flat-file corpus snapshots for faster startup

use crate::words::{Corpus, WordRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk corpus image: the joined, base-derived word rows plus the time
/// they were written.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub words: Vec<WordRecord>,
}

/// Write the corpus as a JSON snapshot.
pub fn write_snapshot(path: &Path, corpus: &Corpus) -> Result<()> {
    let snapshot = Snapshot {
        saved_at: Utc::now(),
        words: corpus.words().to_vec(),
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create snapshot at {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), &snapshot)
        .with_context(|| format!("Failed to write snapshot at {:?}", path))?;
    tracing::info!(words = snapshot.words.len(), path = %path.display(), "snapshot written");
    Ok(())
}

/// Load a corpus back from a JSON snapshot. Stored `base_text` is trusted;
/// the snapshot was written from records that derived it at load time.
pub fn read_snapshot(path: &Path) -> Result<Corpus> {
    let file =
        File::open(path).with_context(|| format!("Failed to open snapshot at {:?}", path))?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse snapshot at {:?}", path))?;
    tracing::info!(words = snapshot.words.len(), "snapshot loaded");
    Ok(Corpus::new(snapshot.words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip_preserves_order_and_bases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        let corpus = Corpus::new(vec![
            WordRecord::new(1, 1, "g1".into(), "بِسْمِ".into()),
            WordRecord::new(1, 2, "g2".into(), "ٱللَّهِ".into()),
        ]);
        write_snapshot(&path, &corpus).unwrap();

        let reloaded = read_snapshot(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.words()[0].base_text, "بسم");
        assert_eq!(reloaded.words()[1].search_text, "ٱللَّهِ");
    }

    #[test]
    fn test_read_snapshot_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_snapshot(&path).is_err());
    }
}
