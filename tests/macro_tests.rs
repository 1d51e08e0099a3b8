use cfgtext::{config, from_str, to_string, Element, Error};

#[test]
fn test_macro_matches_loaded_text() {
    let built = config!({
        "Name": "Alice",
        "Tags": ["red", "green", "blue,purple"],
        "Server": {
            "Port": "8080"
        }
    })
    .unwrap();

    let loaded =
        from_str("Name=Alice\nTags=[red, green, \"blue,purple\"]\nServer {\n  Port=8080\n}\n")
            .unwrap();
    assert_eq!(built, loaded);
}

#[test]
fn test_macro_output_roundtrips() {
    let doc = config!({
        "Empty": "",
        "Padded": "  x  ",
        "Nested": {
            "Deeper": {
                "List": ["a", "b,c", ""]
            },
            "Sibling": "s"
        }
    })
    .unwrap();

    let text = to_string(&doc).unwrap();
    assert_eq!(from_str(&text).unwrap(), doc);
}

#[test]
fn test_macro_accepts_expressions() {
    let port = 8080.to_string();
    let hosts = ["alpha", "beta"];
    let doc = config!({
        "Port": port,
        "Hosts": [hosts[0], hosts[1]],
        "Owner": (format!("{}-{}", "team", 7))
    })
    .unwrap();

    assert_eq!(doc.get("Port"), Some("8080"));
    assert_eq!(doc.get("Hosts:1"), Some("beta"));
    assert_eq!(doc.get("Owner"), Some("team-7"));
}

#[test]
fn test_macro_paths_are_assigned() {
    let doc = config!({ "a": { "b": { "c": "1" } } }).unwrap();
    let leaf = doc.root().find("a:b:c").unwrap();
    assert!(matches!(leaf, Element::String(_)));
    assert_eq!(leaf.path().unwrap(), "a:b:c");
}

#[test]
fn test_macro_reports_duplicates() {
    let result = config!({
        "Server": { "Port": "1" },
        "Server": { "Port": "2" }
    });
    assert!(matches!(result, Err(Error::DuplicateKey { ref path }) if path == "Server"));
}
