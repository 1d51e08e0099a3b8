use cfgtext::{
    from_reader, from_str, from_str_with_options, load_file, save_file, to_string,
    to_string_with_formatting, CommentPolicy, Document, Element, Error, Formatting, KeyComparer,
    LoadOptions,
};
use std::io::Cursor;

const APP_CONFIG: &str = "\
# Application settings
Name=Alice
Tags=[red, green, \"blue,purple\"]

# Network
Server {
\tPort=8080
\tHosts[alpha, beta]
\tTls {
\t\tEnabled=true
\t}
}
";

#[test]
fn test_concrete_scenario() {
    let doc = from_str("Name=Alice\nTags=[red, green, \"blue,purple\"]\nServer {\n  Port=8080\n}\n")
        .unwrap();
    let root = doc.root();

    assert!(matches!(root["Name"], Element::String(_)));
    assert_eq!(root["Name"], "Alice");

    let tags = root["Tags"].as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags.values().collect::<Vec<_>>(), vec!["red", "green", "blue,purple"]);
    assert_eq!(tags["2"], "blue,purple");

    assert!(root["Server"].is_section());
    assert_eq!(root.find("Server:Port").unwrap(), "8080");
}

#[test]
fn test_entries_keep_file_order() {
    let doc = from_str(APP_CONFIG).unwrap();
    let keys: Vec<_> = doc.root().children().keys().collect();
    assert_eq!(keys, vec!["Name", "Tags", "Server"]);

    let server = doc.root()["Server"].as_section().unwrap();
    assert_eq!(
        server.children().keys().collect::<Vec<_>>(),
        vec!["Port", "Hosts", "Tls"]
    );
}

#[test]
fn test_comments_survive_save_and_load() {
    let doc = from_str(APP_CONFIG).unwrap();
    assert_eq!(doc.root()["Name"].comments().unwrap(), [" Application settings"]);
    assert_eq!(doc.root()["Server"].comments().unwrap(), [" Network"]);

    let saved = to_string(&doc).unwrap();
    let reloaded = from_str(&saved).unwrap();
    assert_eq!(reloaded, doc);
}

#[test]
fn test_default_formatting_reproduces_file() {
    let doc = from_str(APP_CONFIG).unwrap();
    let expected = "\
# Application settings
Name=Alice

Tags=[red, green, \"blue,purple\"]

# Network
Server {
\tPort=8080

\tHosts=[alpha, beta]

\tTls {
\t\tEnabled=true
\t}
}
";
    assert_eq!(to_string(&doc).unwrap(), expected);
}

#[test]
fn test_array_indexing() {
    let mut doc = Document::new();
    doc.root_mut().add_array("Letters", ["a", "b", "c"]).unwrap();

    let loaded = from_str(&to_string(&doc).unwrap()).unwrap();
    let letters = loaded.root()["Letters"].as_array().unwrap();
    let keys: Vec<_> = letters.elements().map(|e| e.key()).collect();
    assert_eq!(keys, vec!["0", "1", "2"]);
    assert_eq!(letters["1"], "b");
    assert_eq!(loaded.get("Letters:1"), Some("b"));
}

#[test]
fn test_path_addressing() {
    let doc = from_str("outer {\n inner {\n  leaf=X\n }\n}\n").unwrap();
    let root = doc.root();

    assert_eq!(root.find("outer:inner:leaf").unwrap(), "X");
    assert!(root.find("outer:").is_err());
    assert!(root.try_find("outer:").is_invalid());
    assert!(root.try_find("outer:missing:leaf").is_invalid());
    assert!(matches!(
        root.find("outer:missing"),
        Err(Error::KeyNotFound { ref path }) if path == "outer:missing"
    ));
}

#[test]
fn test_duplicate_rejection() {
    let text = "Port=80\nPort=81\n";
    assert!(matches!(from_str(text), Err(Error::DuplicateKey { ref path }) if path == "Port"));

    let mixed_case = "Port=80\nPORT=81\n";
    assert!(from_str(mixed_case).is_ok());

    let options = LoadOptions::new().with_comparer(KeyComparer::IgnoreCase);
    assert!(matches!(
        from_str_with_options(mixed_case, &options),
        Err(Error::DuplicateKey { .. })
    ));
}

#[test]
fn test_balanced_nesting() {
    assert!(matches!(from_str("a {\n b {\n }\n"), Err(Error::Format { .. })));
    assert!(matches!(from_str("a {\n}\n}\n"), Err(Error::Format { .. })));
    assert!(from_str("a {\n b {\n }\n}\n").is_ok());
}

#[test]
fn test_format_error_reports_position() {
    match from_str("a=1\nb c\nd=2\n") {
        Err(Error::Format { line, msg, .. }) => {
            assert_eq!(line, 3);
            assert!(msg.contains("b c"));
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_unterminated_quote() {
    let err = from_str("Key=\"never closed\n").unwrap_err();
    assert!(err.to_string().contains("end quote"));
}

#[test]
fn test_quoted_keys_and_values() {
    let doc = from_str("'Display Name'=`Main \"primary\" server`\n\" padded \"=' x '\n").unwrap();
    assert_eq!(doc.get("Display Name"), Some("Main \"primary\" server"));
    assert_eq!(doc.get(" padded "), Some(" x "));

    let reloaded = from_str(&to_string(&doc).unwrap()).unwrap();
    assert_eq!(reloaded, doc);
}

#[test]
fn test_value_may_start_on_next_line() {
    let doc = from_str("Key=\n    value\n").unwrap();
    assert_eq!(doc.get("Key"), Some("value"));
}

#[test]
fn test_crlf_and_bom() {
    let doc = from_str("\u{feff}a=1\r\nb {\r\n\tc=2\r\n}\r\n").unwrap();
    assert_eq!(doc.get("a"), Some("1"));
    assert_eq!(doc.get("b:c"), Some("2"));
}

#[test]
fn test_ignore_comments() {
    let options = LoadOptions::new().with_comments(CommentPolicy::Ignore);
    let doc = from_str_with_options(APP_CONFIG, &options).unwrap();
    assert!(doc.root()["Name"].comments().unwrap().is_empty());
    assert!(!to_string(&doc).unwrap().contains('#'));
}

#[test]
fn test_multiline_comment_splits_into_lines() {
    let mut doc = Document::new();
    doc.root_mut()
        .add_string("Key", "v")
        .unwrap()
        .comments_mut()
        .push("first\r\nsecond".to_string());

    let text = to_string(&doc).unwrap();
    assert_eq!(text, "#first\n#second\nKey=v\n");
    assert_eq!(from_str(&text).unwrap().root()["Key"].comments().unwrap(), ["first", "second"]);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.cfg");

    let doc = from_str(APP_CONFIG).unwrap();
    save_file(&path, &doc, &Formatting::compact()).unwrap();

    let loaded = load_file(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_file(dir.path().join("missing.cfg"), &LoadOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_from_reader() {
    let doc = from_reader(Cursor::new(APP_CONFIG.as_bytes())).unwrap();
    assert_eq!(doc.get("Server:Tls:Enabled"), Some("true"));
}

#[test]
fn test_flatten_and_merge() {
    let base = from_str(APP_CONFIG).unwrap();
    let local = from_str("Server {\n\tPort=9090\n}\n").unwrap();

    let flat = base.to_map();
    assert_eq!(flat["Tags:2"], "blue,purple");
    assert_eq!(flat["Server:Hosts:1"], "beta");

    let merged = Document::merge_maps([&base, &local], true).unwrap();
    assert_eq!(merged["Server:Port"], "9090");
    assert_eq!(merged.len(), flat.len());

    assert!(matches!(
        Document::merge_maps([&base, &local], false),
        Err(Error::DuplicateKey { ref path }) if path == "Server:Port"
    ));
}

#[test]
fn test_serialize_to_json() {
    let doc = from_str(APP_CONFIG).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(
        json,
        r#"{"Name":"Alice","Tags":["red","green","blue,purple"],"Server":{"Port":"8080","Hosts":["alpha","beta"],"Tls":{"Enabled":"true"}}}"#
    );
}

#[test]
fn test_build_and_save() {
    let mut doc = Document::new();
    let mut root = doc.root_mut();
    root.add_string("Title", "  spaced  ").unwrap();
    let mut db = root.add_section("Database").unwrap();
    db.add_string("Url", "postgres://localhost/app").unwrap();
    db.add_array("Replicas", Vec::<String>::new()).unwrap();

    let text = to_string_with_formatting(&doc, &Formatting::compact()).unwrap();
    assert_eq!(
        text,
        "Title=\"  spaced  \"\nDatabase {\n\tUrl=postgres://localhost/app\n\tReplicas=[]\n}\n"
    );
    assert_eq!(from_str(&text).unwrap(), doc);
}

#[test]
fn test_edits_keep_document_loadable() {
    let mut doc = from_str("A=1\nB=2\nTags=[x, y]\n").unwrap();
    let mut root = doc.root_mut();
    root.get_mut("A").unwrap().set_value("swapped").unwrap();
    let mut tags = root.get_mut("Tags").and_then(|e| e.into_array()).unwrap();
    tags.get_mut(0).unwrap().set_value("z");
    tags.push("w");
    assert!(tags.get_mut(3).is_none());

    assert_eq!(doc.root()["A"].path().unwrap(), "A");
    assert_eq!(
        doc.leaves().collect::<Vec<_>>(),
        vec![("A", "swapped"), ("B", "2"), ("Tags:0", "z"), ("Tags:1", "y"), ("Tags:2", "w")]
    );

    let text = to_string(&doc).unwrap();
    assert_eq!(text, "A=swapped\n\nB=2\n\nTags=[z, y, w]\n");
    assert_eq!(from_str(&text).unwrap(), doc);
}
