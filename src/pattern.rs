//! Decomposition and reassembly compilers.
//!
//! A rule has two halves. The *decomposition* is a tiny pattern language over
//! words; it compiles to an anchored, case-insensitive `Regex` with exactly one
//! capture group per pattern token, so capture `n` is the text matched by the
//! `n`-th token. The *reassembly* is response text whose bare integers refer
//! back to those captures; it compiles to a positional `Template`.
//!
//! ```text
//! decomposition  0 YOUR (/ FAMILY) 0
//!                │  │      │       └ group 4: zero or more words, lazy
//!                │  │      └ group 3: one word from category FAMILY
//!                │  └ group 2: the literal word YOUR
//!                └ group 1: zero or more words, lazy
//!
//! reassembly     TELL ME MORE ABOUT YOUR 3       -> "TELL ME MORE ABOUT YOUR {}"  [3]
//! ```
//!
//! Matching is always whole-string: the compiled matcher is anchored at both
//! ends, so `HELLO` never matches `OH HELLO THERE`.

use crate::script::CategoryTable;
use regex::Regex;
use std::fmt;
use tracing::warn;

/// Word shape used by the compiled wildcards.
pub(crate) const WORD: &str = word_pattern!();

/// One token of a decomposition pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// `0` matches zero or more words lazily, `N` matches exactly `N` words.
    Count(usize),
    /// A literal word, matched case-insensitively as a whole word.
    Literal(String),
    /// `(* A B C)`: exactly one word equal to any of the alternatives.
    AnyOf(Vec<String>),
    /// `(/ TAG ...)`: exactly one word that is a member of any listed category.
    Category(Vec<String>),
}

/// A validated decomposition pattern together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    source: String,
    tokens: Vec<PatternToken>,
}

impl Decomposition {
    /// Validate and tokenize a flattened decomposition such as
    /// `0 (* WANT NEED) 0`.
    ///
    /// Returns `None` when the pattern is empty, contains something other than
    /// counts, words and `(...)` groups, nests groups, or puts two counts next
    /// to each other (`0 1` has no single reading).
    pub fn parse(text: &str) -> Option<Self> {
        let lexer = regex!(r"\(([^()]*)\)|([^\s()]+)");
        let mut tokens: Vec<PatternToken> = Vec::new();
        let mut last_end = 0;

        for caps in lexer.captures_iter(text) {
            let whole = caps.get(0)?;
            if !text[last_end..whole.start()].trim().is_empty() {
                return None;
            }
            last_end = whole.end();

            let token = match (caps.get(1), caps.get(2)) {
                (Some(group), _) => parse_group(group.as_str())?,
                (None, Some(atom)) => parse_atom(atom.as_str())?,
                (None, None) => return None,
            };
            if matches!((tokens.last(), &token), (Some(PatternToken::Count(_)), PatternToken::Count(_))) {
                return None;
            }
            tokens.push(token);
        }

        if tokens.is_empty() || !text[last_end..].trim().is_empty() {
            return None;
        }
        Some(Decomposition { source: text.trim().to_string(), tokens })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Translate into regex source, resolving category references against
    /// `categories` as they stand now.
    pub fn to_regex(&self, categories: &CategoryTable) -> String {
        let parts: Vec<String> = self
            .tokens
            .iter()
            .map(|token| match token {
                PatternToken::Count(0) => format!(r"(?:\b({WORD}(?:\s+{WORD})*?)\b)?"),
                PatternToken::Count(1) => format!(r"\b({WORD})\b"),
                PatternToken::Count(n) => format!(r"\b({WORD}(?:\s+{WORD}){{{}}})\b", n - 1),
                PatternToken::Literal(word) => format!(r"\b({})\b", regex::escape(word)),
                PatternToken::AnyOf(words) => alternatives(words.iter().map(String::as_str)),
                PatternToken::Category(tags) => {
                    let mut members: Vec<&str> = Vec::new();
                    for tag in tags {
                        match categories.members(tag) {
                            Some(found) => members.extend(found.iter().map(String::as_str)),
                            None => warn!(tag = %tag, pattern = %self.source, "category is never declared"),
                        }
                    }
                    alternatives(members.into_iter())
                }
            })
            .collect();

        format!(r"(?i)^\s*{}\s*$", parts.join(r"\s*"))
    }

    /// Compile into a full-string `Matcher`.
    pub fn compile(&self, categories: &CategoryTable) -> Result<Matcher, regex::Error> {
        let regex = Regex::new(&self.to_regex(categories))?;
        Ok(Matcher { regex })
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_atom(atom: &str) -> Option<PatternToken> {
    if atom.bytes().all(|b| b.is_ascii_digit()) {
        return atom.parse().ok().map(PatternToken::Count);
    }
    is_word(atom).then(|| PatternToken::Literal(atom.to_uppercase()))
}

fn parse_group(inner: &str) -> Option<PatternToken> {
    let inner = inner.trim_start();
    let (is_category, rest) = match inner.chars().next() {
        Some('*') => (false, &inner[1..]),
        Some('/') => (true, &inner[1..]),
        _ => (false, inner),
    };

    let words: Vec<String> = rest.split_whitespace().map(str::to_uppercase).collect();
    if words.is_empty() || !words.iter().all(|w| is_word(w)) {
        return None;
    }
    Some(if is_category { PatternToken::Category(words) } else { PatternToken::AnyOf(words) })
}

fn is_word(text: &str) -> bool {
    regex!(r"^\p{L}+(?:['’]\p{L}+)*$").is_match(text)
}

/// One capture group matching a single whole word out of `words`. An empty
/// set yields a group that can never match.
fn alternatives<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = words.map(regex::escape).collect();
    if escaped.is_empty() {
        return r"(\b\B)".to_string();
    }
    format!(r"\b({})\b", escaped.join("|"))
}

/// Compiled decomposition: an anchored, case-insensitive regex.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Full-match `text` and return one entry per pattern token.
    ///
    /// Runs of whitespace inside a capture collapse to single spaces, and a
    /// `0` that matched nothing yields an empty string.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| collapse_whitespace(m.as_str())).unwrap_or_default())
                .collect(),
        )
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn collapse_whitespace(text: &str) -> String {
    regex!(r"\s+").replace_all(text.trim(), " ").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(usize),
}

/// Compiled reassembly: literal text interleaved with numbered capture slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Replace every bare integer in `text` with a slot referring to that
    /// decomposition capture (1-based).
    pub fn compile(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for m in regex!(r"\b\d+\b").find_iter(text) {
            let Ok(index) = m.as_str().parse::<usize>() else {
                continue;
            };
            if m.start() > last_end {
                segments.push(Segment::Text(text[last_end..m.start()].to_string()));
            }
            segments.push(Segment::Slot(index));
            last_end = m.end();
        }
        if last_end < text.len() {
            segments.push(Segment::Text(text[last_end..].to_string()));
        }

        Template { source: text.to_string(), segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The template with every slot shown as `{}`.
    pub fn format_string(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.as_str(),
                Segment::Slot(_) => "{}",
            })
            .collect()
    }

    /// Capture indices in slot order, repeats included.
    pub fn indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Slot(index) => Some(*index),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Fill the slots from `captures` (as returned by [`Matcher::captures`]).
    /// Slot `0` or a slot past the last capture renders as empty text.
    pub fn render(&self, captures: &[String]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(index) => {
                    if let Some(captured) = index.checked_sub(1).and_then(|i| captures.get(i)) {
                        out.push_str(captured);
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pattern: &str) -> Matcher {
        matcher_with(pattern, &CategoryTable::default())
    }

    fn matcher_with(pattern: &str, categories: &CategoryTable) -> Matcher {
        Decomposition::parse(pattern).unwrap().compile(categories).unwrap()
    }

    #[test]
    fn decomposition_matching() {
        let cases: Vec<(&str, &str, bool)> = vec![
            ("0 YOUR 0", "YOUR", true),
            ("0 YOUR 0", "YOUR NAME", true),
            ("0 YOUR 0", "MY YOUR NAME", true),
            ("0 YOUR 0", "MYYOUR", false),
            ("0 YOUR 0", "    YOUR    ", true),
            ("HELLO", "HELLO", true),
            ("HELLO", "hello", true),
            ("HELLO", "HELLOTHERE", false),
            ("HELLO", "OH HELLO THERE", false),
            ("MAY DAY", "MAY DAY", true),
            ("MAY DAY", "MAY     DAY", true),
            ("MAY DAY", "MAYDAY", false),
            ("MAY DAY", "SOME MAY DAY PARADE", false),
            ("0 YOU 0 I 0", "YOU SEE I KNOW", true),
            ("0 YOU 0 I 0", "I KNOW YOU SEE", false),
            ("0 YOU 0 I 0", "WITH YOU I LEARN A LOT", true),
            ("0", "", true),
            ("0", "SOMETHING", true),
            ("0", "I HAVE SOMETHING TO SAY", true),
            ("1", "ONEWORD", true),
            ("1", "TWO WORDS", false),
            ("1", "", false),
            ("1 AND 1", "A AND B", true),
            ("1 AND 1", "AB", false),
            ("YOU 1 ME", "YOU LOVE ME", true),
            ("YOU 1 ME", "YOU DONT LOVE ME", false),
            ("YOU WANT 1", "YOU WANT ME", true),
            ("YOU WANT 1", "YOU WANT ME NOT", false),
            ("2", "TWO WORDS", true),
            ("2", "JUST THREE WORDS", false),
            ("2", "ONE", false),
            ("2", "THREE WORD THING", false),
            ("YOU 2 ME", "YOU REALLY LOVE ME", true),
            ("YOU 2 ME", "YOU HATE ME", false),
            ("2 YOU WANT", "WHAT DO YOU WANT", true),
            ("2 YOU WANT", "SO WHAT DO YOU WANT", false),
            ("0 (* WANT NEED) 0", "I NEED A HUG", true),
            ("0 (* WANT NEED) 0", "I WISH FOR A HUG", false),
            ("I (*WANT NEED) 1", "i want tea", true),
            ("1", "DON'T", true),
            ("I HAVE 1 CATS", "I HAVE 2 CATS", true),
        ];

        for (pattern, text, expected) in cases {
            assert_eq!(matcher(pattern).is_match(text), expected, "pattern {pattern:?} on {text:?}");
        }
    }

    #[test]
    fn decomposition_captures() {
        let cases: Vec<(&str, &str, Vec<&str>)> = vec![
            ("0 I 0", "What did I say", vec!["What did", "I", "say"]),
            ("0 I 0", "I tell you", vec!["", "I", "tell you"]),
            ("0 ARE 0", "You ARE nice", vec!["You", "ARE", "nice"]),
            ("0 HELLO", "Well HELLO", vec!["Well", "HELLO"]),
            ("HELLO 0", "HELLO again friend", vec!["HELLO", "again friend"]),
            ("HELLO 0", "HELLO   again    friend", vec!["HELLO", "again friend"]),
            ("0 (* WANT NEED) 0", "I NEED A HUG", vec!["I", "NEED", "A HUG"]),
            ("2 THEN 0", "ONE TWO THEN THREE", vec!["ONE TWO", "THEN", "THREE"]),
        ];

        for (pattern, text, expected) in cases {
            assert_eq!(matcher(pattern).captures(text).unwrap(), expected, "pattern {pattern:?} on {text:?}");
        }
    }

    #[test]
    fn category_references_resolve_at_compile_time() {
        let mut categories = CategoryTable::default();
        categories.add("FAMILY", "MOTHER");
        categories.add("FAMILY", "FATHER");

        let m = matcher_with("0 YOUR (/FAMILY) 0", &categories);
        assert_eq!(m.captures("TELL YOUR FATHER HELLO").unwrap(), vec!["TELL", "YOUR", "FATHER", "HELLO"]);
        assert!(!m.is_match("TELL YOUR DOG HELLO"));

        let spaced = matcher_with("0 (/ FAMILY) 0", &categories);
        assert!(spaced.is_match("mother knows"));
    }

    #[test]
    fn unknown_category_never_matches() {
        let m = matcher("0 (/ NOWHERE) 0");
        assert!(!m.is_match("ANYTHING AT ALL"));
        assert!(!m.is_match(""));
    }

    #[test]
    fn invalid_decompositions_are_rejected() {
        let cases = ["", "   ", "0 1", "WORD 0 1", "1.0", "(A (B))", "(*)", "(* 1)", "HELLO)", "(HELLO", "A-B"];
        for case in cases {
            assert!(Decomposition::parse(case).is_none(), "{case:?} should be rejected");
        }
    }

    #[test]
    fn valid_decompositions_tokenize() {
        let d = Decomposition::parse("0 YOUR (* A B) (/ FAMILY) 3").unwrap();
        assert_eq!(
            d.tokens(),
            &[
                PatternToken::Count(0),
                PatternToken::Literal("YOUR".into()),
                PatternToken::AnyOf(vec!["A".into(), "B".into()]),
                PatternToken::Category(vec!["FAMILY".into()]),
                PatternToken::Count(3),
            ]
        );
        assert_eq!(d.source(), "0 YOUR (* A B) (/ FAMILY) 3");
    }

    #[test]
    fn reassembly_templates() {
        let cases: Vec<(&str, &str, Vec<usize>)> = vec![
            ("WHAT MAKES YOU THINK I 3", "WHAT MAKES YOU THINK I {}", vec![3]),
            ("DO YOU BELIEVE YOU ARE 4", "DO YOU BELIEVE YOU ARE {}", vec![4]),
            ("WHAT 4", "WHAT {}", vec![4]),
            ("SUPPOSE YOU GOT 0 NOW", "SUPPOSE YOU GOT {} NOW", vec![0]),
            ("NO NUMBERS HERE", "NO NUMBERS HERE", vec![]),
            ("1 2 3 4", "{} {} {} {}", vec![1, 2, 3, 4]),
            ("MIXED 3 with 2 and 7 again 3", "MIXED {} with {} and {} again {}", vec![3, 2, 7, 3]),
        ];

        for (text, format, indices) in cases {
            let template = Template::compile(text);
            assert_eq!(template.format_string(), format);
            assert_eq!(template.indices(), indices);
        }
    }

    #[test]
    fn template_rendering() {
        let captures: Vec<String> = vec!["".into(), "I".into(), "tell you".into()];
        assert_eq!(Template::compile("YOU SAY 3").render(&captures), "YOU SAY tell you");
        assert_eq!(Template::compile("[1]").render(&captures), "[]");
        assert_eq!(Template::compile("2 2 2").render(&captures), "I I I");
        assert_eq!(Template::compile("GOT 0 AND 9").render(&captures), "GOT  AND ");
    }
}
