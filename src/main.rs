//! rasm - script-aware word search over the mushaf text
//! Command line front end: corpus loading, snapshot export, one-shot search

use anyhow::{bail, Result};
use rasm::{
    load_corpus, read_snapshot, write_snapshot, LetterForm, QueryError, QueryRequest, SearchEngine,
};
use std::path::PathBuf;

struct Args {
    corpus: PathBuf,
    query: Option<String>,
    use_marks: bool,
    use_classes: bool,
    forms: Vec<LetterForm>,
    snapshot: Option<PathBuf>,
}

fn usage() -> ! {
    eprintln!(
        "Usage: rasm [OPTIONS] <CORPUS> [QUERY]

  CORPUS  corpus database (.db/.sqlite) or JSON snapshot (.json)
  QUERY   search text; omit to only load (and optionally snapshot)

Options:
  --marks            match against fully marked text
  --classes          expand letters to their equivalence classes
  --isolated         match the isolated form of the final letter
  --initial          match the initial form
  --medial           match the medial form
  --final            match the final form
  --snapshot <PATH>  write the loaded corpus as a JSON snapshot"
    );
    std::process::exit(2);
}

fn parse_args() -> Result<Args> {
    let mut corpus = None;
    let mut query = None;
    let mut use_marks = false;
    let mut use_classes = false;
    let mut forms = Vec::new();
    let mut snapshot = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--marks" => use_marks = true,
            "--classes" => use_classes = true,
            "--isolated" => forms.push(LetterForm::Isolated),
            "--initial" => forms.push(LetterForm::Initial),
            "--medial" => forms.push(LetterForm::Medial),
            "--final" => forms.push(LetterForm::Final),
            "--snapshot" => match args.next() {
                Some(path) => snapshot = Some(PathBuf::from(path)),
                None => bail!("--snapshot needs a path"),
            },
            "--help" | "-h" => usage(),
            _ if arg.starts_with("--") => bail!("unknown option {arg}"),
            _ if corpus.is_none() => corpus = Some(PathBuf::from(arg)),
            _ if query.is_none() => query = Some(arg),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    let Some(corpus) = corpus else { usage() };
    Ok(Args {
        corpus,
        query,
        use_marks,
        use_classes,
        forms,
        snapshot,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = parse_args()?;

    let is_snapshot_file = args
        .corpus
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let corpus = if is_snapshot_file {
        read_snapshot(&args.corpus)?
    } else {
        load_corpus(&args.corpus)?
    };

    if let Some(path) = &args.snapshot {
        write_snapshot(path, &corpus)?;
        println!("snapshot written to {}", path.display());
    }

    let Some(text) = args.query else {
        return Ok(());
    };

    let engine = SearchEngine::new(corpus);
    let request = QueryRequest {
        text,
        use_marks: args.use_marks,
        use_classes: args.use_classes,
        forms: args.forms,
    };

    match engine.search(&request) {
        Ok(results) => {
            for word in &results.results {
                println!("{}\t{}\t{}", word.page, word.line, word.display_text);
            }
            println!("{} words found", results.total_hits);
        }
        Err(QueryError::InvalidQuery(msg)) => {
            eprintln!("Invalid query: {msg}");
            println!("0 words found");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
