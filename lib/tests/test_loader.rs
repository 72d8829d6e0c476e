use rdf_parser_jsonld::{
    DocumentLoader, FsDocumentLoader, JsonLdParser, LoadError, ParserOptions, StaticDocumentLoader,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_context(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write context file");
    path
}

#[test]
fn test_fs_loader_from_map_types() {
    let mut map = HashMap::new();
    map.insert("http://example.org/a".to_string(), PathBuf::from("a.jsonld"));
    let from_hash_map = FsDocumentLoader::new(map);
    assert_eq!(from_hash_map.len(), 1);

    let mut tree = BTreeMap::new();
    tree.insert("http://example.org/a", "a.jsonld");
    tree.insert("http://example.org/b", "b.jsonld");
    let from_btree_map = FsDocumentLoader::new(tree);
    assert_eq!(from_btree_map.len(), 2);

    let from_pairs = FsDocumentLoader::new(vec![("http://example.org/b", "b.jsonld")]);
    assert_eq!(
        from_pairs.get("http://example.org/b"),
        Some(PathBuf::from("b.jsonld").as_path())
    );
    assert!(from_pairs.get("http://example.org/a").is_none());
    assert!(FsDocumentLoader::default().is_empty());
}

#[tokio::test]
async fn test_fs_loader_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_context(
        &dir,
        "context.jsonld",
        r#"{ "@context": { "name": "http://schema.org/name" } }"#,
    );
    let loader = FsDocumentLoader::new([("http://example.org/context", path)]);
    let document = loader.load("http://example.org/context").await.unwrap();
    assert_eq!(
        document,
        json!({ "@context": { "name": "http://schema.org/name" } })
    );
}

#[tokio::test]
async fn test_fs_loader_unknown_url() {
    let loader = FsDocumentLoader::new([("http://example.org/context", "context.jsonld")]);
    match loader.load("http://example.org/other").await {
        Err(LoadError::UnknownDocumentUrl(url)) => assert_eq!(url, "http://example.org/other"),
        other => panic!("expected an unknown url error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fs_loader_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.jsonld");
    let loader = FsDocumentLoader::new([("http://example.org/context", path.clone())]);
    match loader.load("http://example.org/context").await {
        Err(LoadError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected an io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fs_loader_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_context(&dir, "broken.jsonld", "{ not json");
    let loader = FsDocumentLoader::new([("http://example.org/context", path)]);
    assert!(matches!(
        loader.load("http://example.org/context").await,
        Err(LoadError::Json { .. })
    ));
}

#[tokio::test]
async fn test_static_loader() {
    let mut loader = StaticDocumentLoader::default();
    assert!(loader.is_empty());
    loader.insert("http://example.org/context", json!({ "@context": {} }));
    assert_eq!(loader.len(), 1);
    assert_eq!(
        loader.load("http://example.org/context").await.unwrap(),
        json!({ "@context": {} })
    );
    assert!(loader.load("http://example.org/other").await.is_err());
}

#[tokio::test]
async fn test_parse_with_fs_loader() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let vocab = write_context(
        &dir,
        "vocab.jsonld",
        r#"{ "@context": { "@vocab": "http://example.org/vocab#" } }"#,
    );
    let people = write_context(
        &dir,
        "people.jsonld",
        r#"{ "@context": [ "vocab.jsonld", { "knows": { "@type": "@id" } } ] }"#,
    );
    let loader = FsDocumentLoader::new([
        ("http://example.org/contexts/vocab.jsonld", vocab),
        ("http://example.org/contexts/people.jsonld", people),
    ]);
    let options = ParserOptions::builder()
        .document_loader(loader)
        .build()
        .unwrap();
    let document = json!({
        "@context": "http://example.org/contexts/people.jsonld",
        "@id": "http://example.org/alice",
        "knows": "http://example.org/bob"
    });
    let parsed = JsonLdParser::with_options(options)
        .import(Cursor::new(document.to_string().into_bytes()))
        .collect_quads()
        .await
        .unwrap();
    assert_eq!(parsed.quads.len(), 1);
    let quad = &parsed.quads[0];
    assert_eq!(quad.predicate.value(), "http://example.org/vocab#knows");
    assert_eq!(quad.object.value(), "http://example.org/bob");
    // a remote context declares no prefixes of the document itself
    assert!(parsed.prefixes.is_empty());
}
