//! Input text utilities: clause splitting and word tokenization.

/// Split raw input into clause-like fragments.
///
/// A fragment ends at a run of sentence punctuation (`. ? ! , : ;`) that is
/// followed by whitespace. Punctuation not followed by whitespace stays in the
/// fragment; the tokenizer drops it later. Fragments are trimmed and empty
/// ones are skipped.
pub fn split_clauses(input: &str) -> Vec<&str> {
    regex!(r"[.?!,:;]+\s").split(input).map(str::trim).filter(|part| !part.is_empty()).collect()
}

/// Tokenize a fragment into uppercase words.
///
/// Words keep internal apostrophes (`DON'T`, `Y’ALL`) and any Unicode letters;
/// runs of digits are words too. Everything else is a separator.
pub fn tokenize(fragment: &str) -> Vec<String> {
    let upper = fragment.to_uppercase();
    regex!(word_pattern!()).find_iter(&upper).map(|m| m.as_str().to_string()).collect()
}
