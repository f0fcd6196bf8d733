use memsearch_core::InvertedIndex;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn with_logs<F: FnOnce()>(f: F) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn document_text_never_reaches_the_log() {
    let logs = with_logs(|| {
        let mut idx = InvertedIndex::new();
        idx.add_text("patient ssn confidential");
        idx.add_named_text("label", "private memo body");
    });
    assert!(logs.contains("indexed document"));
    assert!(!logs.contains("confidential"));
    assert!(!logs.contains("private memo"));
    assert!(!logs.contains("label"));
}

#[test]
fn indexing_logs_at_debug() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        InvertedIndex::new().add_text("quiet at info");
    });
    assert!(captured.text().is_empty());
}

#[test]
fn file_documents_log_their_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "secret words").unwrap();
    let logs = with_logs(|| {
        InvertedIndex::new().add_file(&path).unwrap();
    });
    assert!(logs.contains("notes.txt"));
    assert!(!logs.contains("secret"));
}
