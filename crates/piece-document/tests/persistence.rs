use piece_document::{Document, DocumentError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");

    let mut doc = Document::new("line one\nline two");
    doc.insert(8, " and a half");
    doc.remove(0, 5);
    doc.save_to_file(&path).unwrap();

    let loaded = Document::load_from_file(&path).unwrap();
    assert_eq!(loaded.to_string(), doc.to_string());
    assert_eq!(loaded.line_count(), doc.line_count());
}

#[test]
fn test_missing_file_loads_empty_document() {
    let dir = TempDir::new().unwrap();
    let doc = Document::load_from_file(dir.path().join("does-not-exist.txt")).unwrap();

    assert!(doc.is_empty());
    assert_eq!(doc.line_count(), 1);
}

#[test]
fn test_bytes_preserved_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("raw.bin");
    let raw = vec![b'a', b'\r', b'\n', 0xff, 0x00, b'b'];
    std::fs::write(&path, &raw).unwrap();

    let mut doc = Document::load_from_file(&path).unwrap();
    assert_eq!(doc.bytes(), raw);

    doc.save_to_file(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), raw);
}

#[test]
fn test_save_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "a much longer previous content").unwrap();

    let mut doc = Document::new("short");
    doc.save_to_file(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
}

#[test]
fn test_save_marks_unmodified() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");

    let mut doc = Document::empty();
    doc.insert(0, "draft");
    assert!(doc.is_modified());

    doc.save_to_file(&path).unwrap();
    assert!(!doc.is_modified());

    doc.insert(5, "!");
    doc.undo();
    assert!(!doc.is_modified());
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("doc.txt");

    let mut doc = Document::empty();
    doc.insert(0, "content");
    let err = doc.save_to_file(&path).unwrap_err();

    assert!(matches!(err, DocumentError::Open { .. }));
    assert!(err.to_string().contains("no-such-dir"));
    assert!(doc.is_modified());
}

#[test]
fn test_loading_a_directory_fails() {
    let dir = TempDir::new().unwrap();
    let err = Document::load_from_file(dir.path()).unwrap_err();

    assert!(matches!(
        err,
        DocumentError::Open { .. } | DocumentError::Read { .. }
    ));
}

#[test]
fn test_write_to_streams_pieces() {
    let mut doc = Document::new("world");
    doc.insert(0, "hello ");

    let mut out = Vec::new();
    doc.write_to(&mut out).unwrap();
    assert_eq!(out, b"hello world");
}
