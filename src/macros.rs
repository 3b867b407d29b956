/// Shape of a single word, shared by the tokenizer and by compiled
/// decomposition patterns: letters joined by internal apostrophes (straight or
/// curly), or a run of digits.
macro_rules! word_pattern {
    () => {
        r"(?:\p{L}+(?:['’]\p{L}+)*|\p{Nd}+)"
    };
}

/// Process-wide, lazily compiled `Regex` for a pattern known at compile time.
macro_rules! regex {
    ($pat:expr) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("static pattern is valid"));
        &*RE
    }};
}
