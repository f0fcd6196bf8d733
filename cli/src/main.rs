use anyhow::{bail, ensure, Result};
use clap::{Parser, Subcommand};
use memsearch_core::config::{DEFAULT_FIRST_DOC_ID, DEFAULT_TOP_K, LOADER_FIRST_DOC_ID, MAX_SUGGESTIONS};
use memsearch_core::tokenizer::{normalize, tokenize};
use memsearch_core::{BooleanOp, DocId, DocumentInfo, InvertedIndex, PhraseBooleanEngine, RankingEngine, TrieEngine};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod display;
mod loader;

use display::Highlighter;
use loader::{collect_files, load_lines};

#[derive(Parser)]
#[command(name = "memsearch")]
#[command(about = "Index plain-text documents in memory and query them", long_about = None)]
#[command(subcommand_precedence_over_arg = true)]
struct Cli {
    /// Files or directories to index; every file is one document
    #[arg(long, short, num_args = 1.., conflicts_with = "lines")]
    input: Vec<PathBuf>,
    /// Index each non-empty line of this file as its own document
    #[arg(long)]
    lines: Option<PathBuf>,
    /// First document id (default 0 for --input, 1 for --lines)
    #[arg(long)]
    first_id: Option<DocId>,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise the built index
    Stats,
    /// TF-IDF ranked keyword search
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, short = 'k', default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Document count used for idf (defaults to the number indexed)
        #[arg(long)]
        total: Option<usize>,
    },
    /// Documents containing the words as an exact, contiguous phrase
    Phrase {
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
    },
    /// Flat boolean query, applied left to right: `apple and banana not mango`
    Boolean {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Documents containing every term
    And {
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
    /// Documents containing any term
    Or {
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
    /// Ids in 0..total whose document lacks the term
    Not {
        term: String,
        /// Size of the id universe (defaults to one past the last id)
        #[arg(long)]
        total: Option<DocId>,
    },
    /// Words starting with a prefix
    Complete {
        prefix: String,
        #[arg(long, default_value_t = MAX_SUGGESTIONS)]
        limit: usize,
    },
}

struct Corpus {
    index: InvertedIndex,
    trie: TrieEngine,
    from_files: bool,
}

#[derive(Serialize)]
struct Hit {
    doc_id: DocId,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    source: Option<String>,
}

#[derive(Serialize)]
struct Stats<'a> {
    documents: usize,
    terms: usize,
    first_doc_id: DocId,
    vocabulary: usize,
    docs: Vec<&'a DocumentInfo>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let corpus = build_corpus(&cli)?;
    let stdout = io::stdout();
    run(&cli, &corpus, &mut stdout.lock())
}

fn build_corpus(cli: &Cli) -> Result<Corpus> {
    if let Some(path) = &cli.lines {
        let first = cli.first_id.unwrap_or(LOADER_FIRST_DOC_ID);
        let mut index = InvertedIndex::with_first_doc_id(first);
        let mut trie = TrieEngine::new();
        for doc in load_lines(path, first)? {
            let id = index.add_text(&doc.text);
            ensure!(id == doc.id, "loader assigned id {} but index assigned {}", doc.id, id);
            trie.insert_text(&doc.text);
        }
        return Ok(Corpus { index, trie, from_files: false });
    }

    if cli.input.is_empty() {
        bail!("no documents: pass --input <PATH>... or --lines <FILE>");
    }
    let mut index = InvertedIndex::with_first_doc_id(cli.first_id.unwrap_or(DEFAULT_FIRST_DOC_ID));
    let files = collect_files(&cli.input);
    let mut failed = 0usize;
    for file in &files {
        // a bad source is reported and the batch carries on
        if let Err(err) = index.add_file(file) {
            failed += 1;
            tracing::error!(error = %err, "skipping document");
        }
    }
    tracing::info!(docs = index.doc_count(), failed, terms = index.term_count(), "index built");

    let mut trie = TrieEngine::new();
    for term in index.terms() {
        trie.insert(term);
    }
    Ok(Corpus { index, trie, from_files: true })
}

/// One past the last assigned id, so `0..universe` covers every document
/// whatever the id origin.
fn default_universe(index: &InvertedIndex) -> DocId {
    index.doc_ids().last().map_or(0, |id| id.saturating_add(1))
}

fn run<W: Write>(cli: &Cli, corpus: &Corpus, out: &mut W) -> Result<()> {
    let index = &corpus.index;
    match &cli.command {
        Commands::Stats => {
            let stats = Stats {
                documents: index.doc_count(),
                terms: index.term_count(),
                first_doc_id: index.first_doc_id(),
                vocabulary: corpus.trie.len(),
                docs: index.doc_infos(),
            };
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                writeln!(out, "documents: {}", stats.documents)?;
                writeln!(out, "terms:     {}", stats.terms)?;
                writeln!(out, "first id:  {}", stats.first_doc_id)?;
                for doc in &stats.docs {
                    writeln!(out, "  {:>5}  {:>7} tokens  {}", doc.doc_id, doc.length, one_line(&doc.source, 60))?;
                }
            }
        }
        Commands::Search { query, top_k, total } => {
            let terms = tokenize(&query.join(" "));
            let engine = match total {
                Some(n) => RankingEngine::new(index, *n),
                None => RankingEngine::from_index(index),
            };
            let hits: Vec<Hit> = engine
                .keyword_search(&terms, *top_k)
                .into_iter()
                .map(|r| hit(corpus, r.doc_id, Some(r.score)))
                .collect();
            print_hits(cli, corpus, &hits, &terms, out)?;
        }
        Commands::Phrase { phrase } => {
            let terms = tokenize(&phrase.join(" "));
            let ids = PhraseBooleanEngine::new(index).phrase_search(&terms);
            print_ids(cli, corpus, &ids, &terms, out)?;
        }
        Commands::Boolean { query } => {
            let query = query.join(" ");
            let ids = PhraseBooleanEngine::new(index).boolean_search(&query);
            let terms: Vec<String> =
                tokenize(&query).into_iter().filter(|t| BooleanOp::parse(t).is_none()).collect();
            print_ids(cli, corpus, &ids, &terms, out)?;
        }
        Commands::And { terms } => {
            let terms = tokenize(&terms.join(" "));
            let ids = PhraseBooleanEngine::new(index).boolean_and(&terms);
            print_ids(cli, corpus, &ids, &terms, out)?;
        }
        Commands::Or { terms } => {
            let terms = tokenize(&terms.join(" "));
            let ids = PhraseBooleanEngine::new(index).boolean_or(&terms);
            print_ids(cli, corpus, &ids, &terms, out)?;
        }
        Commands::Not { term, total } => {
            let total = total.unwrap_or_else(|| default_universe(index));
            let ids = PhraseBooleanEngine::new(index).boolean_not(&normalize(term), total);
            print_ids(cli, corpus, &ids, &[], out)?;
        }
        Commands::Complete { prefix, limit } => {
            let words = corpus.trie.autocomplete_limited(&prefix.to_ascii_lowercase(), *limit);
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&words)?)?;
            } else if words.is_empty() {
                writeln!(out, "no suggestions")?;
            } else {
                for w in words {
                    writeln!(out, "{w}")?;
                }
            }
        }
    }
    Ok(())
}

fn hit(corpus: &Corpus, doc_id: DocId, score: Option<f64>) -> Hit {
    Hit { doc_id, score, source: corpus.index.filename(doc_id).map(str::to_string) }
}

fn print_ids<W: Write>(cli: &Cli, corpus: &Corpus, ids: &[DocId], terms: &[String], out: &mut W) -> Result<()> {
    let hits: Vec<Hit> = ids.iter().map(|&id| hit(corpus, id, None)).collect();
    print_hits(cli, corpus, &hits, terms, out)
}

fn print_hits<W: Write>(cli: &Cli, corpus: &Corpus, hits: &[Hit], terms: &[String], out: &mut W) -> Result<()> {
    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(hits)?)?;
        return Ok(());
    }
    if hits.is_empty() {
        writeln!(out, "no documents found")?;
        return Ok(());
    }
    let highlighter = Highlighter::new(terms)?;
    for (rank, h) in hits.iter().enumerate() {
        match h.score {
            Some(score) => writeln!(out, "{:>3}. doc {}  score {:.4}", rank + 1, h.doc_id, score)?,
            None => writeln!(out, "{:>3}. doc {}", rank + 1, h.doc_id)?,
        }
        if let Some(text) = document_text(corpus, h) {
            writeln!(out, "     {}", highlighter.snippet(&text))?;
        }
    }
    Ok(())
}

/// File documents are re-read for display; line documents carry their text.
fn document_text(corpus: &Corpus, hit: &Hit) -> Option<String> {
    let source = hit.source.as_deref()?;
    if !corpus.from_files {
        return Some(source.to_string());
    }
    match fs::read(source) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            tracing::warn!(path = source, error = %err, "cannot re-read document for display");
            Some(source.to_string())
        }
    }
}

fn one_line(s: &str, max: usize) -> String {
    let flat: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{cut}...")
    }
}
