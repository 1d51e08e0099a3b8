/// Builds a [`Document`](crate::Document) from a literal tree.
///
/// Keys are string literals. A value is a string (any single-token expression that
/// converts into `String`), an array of strings in `[...]`, or a nested section in
/// `{...}`. Entries keep the order they are written in.
///
/// Evaluates to `Result<Document>`, since keys are checked the same way
/// [`SectionElement::add`](crate::SectionElement::add) checks them.
///
/// # Examples
///
/// ```rust
/// use cfgtext::config;
///
/// let doc = config!({
///     "Name": "Alice",
///     "Tags": ["red", "green"],
///     "Server": {
///         "Port": "8080"
///     }
/// })
/// .unwrap();
///
/// assert_eq!(doc.get("Server:Port"), Some("8080"));
/// assert_eq!(doc["Tags"]["1"], "green");
///
/// assert!(config!({ "a": "1", "a": "2" }).is_err());
/// ```
#[macro_export]
macro_rules! config {
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut document = $crate::Document::new();
        (|| -> $crate::Result<$crate::Document> {
            {
                #[allow(unused_mut, unused_variables)]
                let mut root = document.root_mut();
                $( $crate::config!(@entry root, $key, $value); )*
            }
            Ok(document)
        })()
    }};

    // Array of strings
    (@entry $section:expr, $key:literal, [ $($item:expr),* $(,)? ]) => {{
        let values: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::String::from($item)),*];
        $section.add_array($key, values)?;
    }};

    // Nested section
    (@entry $section:expr, $key:literal, { $($k:literal : $v:tt),* $(,)? }) => {{
        #[allow(unused_variables, unused_mut)]
        let mut child = $section.add_section($key)?;
        $( $crate::config!(@entry child, $k, $v); )*
    }};

    (@entry $section:expr, $key:literal, $value:expr) => {{
        $section.add_string($key, $value)?;
    }};
}
