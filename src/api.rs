use crate::engine::Engine;
use crate::error::Result;
use crate::script::{CategoryTable, Script, ScriptStatistics};
use crate::TurnDetails;
use std::path::Path;

/// Reply used when neither a rule, the memory queue nor the fallback keyword
/// produced anything. Scripts write in upper case without emoticons, so this
/// is easy to tell apart from a scripted answer.
pub const DEFAULT_REPLY: &str = "I should not say this ;)";

/// Options that affect parsing and dialogue behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Rank given to keywords that declare none.
    pub default_rank: u32,
    /// Keywords that never receive the default rank, and so never take part
    /// in input scanning unless the script ranks them explicitly. Compared
    /// ASCII case-insensitively.
    pub unranked_keywords: Vec<String>,
    /// Keyword resolved when the input contains no keyword, and again as a
    /// last resort before [`Options::default_reply`].
    pub fallback_keyword: String,
    /// Maximum number of redirection hops while resolving one keyword.
    pub max_redirections: usize,
    pub default_reply: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_rank: 1,
            unranked_keywords: vec!["NONE".to_string()],
            fallback_keyword: "NONE".to_string(),
            max_redirections: 64,
            default_reply: DEFAULT_REPLY.to_string(),
        }
    }
}

/// A loaded script plus the state of one conversation.
///
/// # Example
/// ```
/// use eliza::Eliza;
///
/// let mut eliza = Eliza::from_script("(YES ((0)(POSITIVE))) (CERTAINLY (=YES))").unwrap();
/// assert_eq!(eliza.get_response("Certainly!").unwrap(), "POSITIVE");
/// ```
#[derive(Debug, Clone)]
pub struct Eliza {
    engine: Engine,
}

impl Eliza {
    /// Parse `text` with default [`Options`].
    pub fn from_script(text: &str) -> Result<Self> {
        Self::from_script_with(text, Options::default())
    }

    pub fn from_script_with(text: &str, options: Options) -> Result<Self> {
        Self::load(Some(text), None, options)
    }

    /// Read and parse the script at `path` with default [`Options`]. A missing
    /// or unreadable file is [`ScriptError::Io`](crate::ScriptError::Io).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, Options::default())
    }

    pub fn from_file_with(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        Self::load(None, Some(path.as_ref()), options)
    }

    /// Build from a file, from text, or both. The file is parsed first and
    /// `text` is merged on top of it. With neither, every turn ends in the
    /// default reply.
    pub fn load(text: Option<&str>, path: Option<&Path>, options: Options) -> Result<Self> {
        let mut script = Script::default();
        if let Some(path) = path {
            script.load_file(path, &options)?;
        }
        if let Some(text) = text {
            script.load_str(text, &options)?;
        }
        Self::with_script(script, options)
    }

    /// Wrap an already parsed (and possibly hand-extended) script.
    pub fn with_script(script: Script, options: Options) -> Result<Self> {
        Ok(Eliza { engine: Engine::new(script, options)? })
    }

    /// Answer one input. Always a non-empty string unless the script itself
    /// is broken (unknown or circular redirections).
    pub fn get_response(&mut self, input: &str) -> Result<String> {
        self.engine.run_turn(input).map(|details| details.response)
    }

    /// Like [`Eliza::get_response`], but also report how the answer was found.
    pub fn get_response_verbose(&mut self, input: &str) -> Result<TurnDetails> {
        self.engine.run_turn(input)
    }

    /// Number of dictionary entries.
    pub fn entry_count(&self) -> usize {
        self.engine.script().len()
    }

    pub fn statistics(&self) -> ScriptStatistics {
        self.engine.script().statistics()
    }

    pub fn categories(&self) -> &CategoryTable {
        self.engine.script().categories()
    }

    pub fn script(&self) -> &Script {
        self.engine.script()
    }

    /// Responses waiting in the memory queue.
    pub fn memory_len(&self) -> usize {
        self.engine.memory_len()
    }

    pub fn options(&self) -> &Options {
        self.engine.options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResponseSource, ScriptError};
    use std::io::Write;

    const SCRIPT: &str = "(HELLO ((0)(HOW DO YOU DO))) (MOTHER DLIST (/FAMILY)) (NONE ((0)(GO ON)))";

    #[test]
    fn file_and_text_are_merged() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let mut eliza = Eliza::load(Some("(HELLO ((0)(HI)))"), Some(file.path()), Options::default()).unwrap();
        assert_eq!(eliza.get_response("hello").unwrap(), "HI");
        assert_eq!(eliza.get_response("what").unwrap(), "GO ON");
        assert_eq!(eliza.entry_count(), 2);
    }

    #[test]
    fn from_file_reads_the_whole_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let mut eliza = Eliza::from_file(file.path()).unwrap();
        assert_eq!(eliza.get_response("Hello there").unwrap(), "HOW DO YOU DO");
        assert_eq!(eliza.categories().to_string(), "FAMILY: MOTHER\n");
    }

    #[test]
    fn missing_file_is_io_not_script_error() {
        let err = Eliza::from_file("/no/such/script.txt").unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
        assert!(!err.is_script_error());
    }

    #[test]
    fn empty_engine_gives_the_default_reply() {
        let mut eliza = Eliza::load(None, None, Options::default()).unwrap();
        let details = eliza.get_response_verbose("anything at all").unwrap();
        assert_eq!(details.response, DEFAULT_REPLY);
        assert_eq!(details.source, ResponseSource::Default);
    }

    #[test]
    fn introspection() {
        let eliza = Eliza::from_script(SCRIPT).unwrap();
        assert_eq!(eliza.entry_count(), 2);
        assert_eq!(eliza.statistics().rules, 2);
        assert_eq!(eliza.memory_len(), 0);
        assert_eq!(eliza.options(), &Options::default());
    }

    #[test]
    fn bundled_doctor_script() {
        let mut eliza = Eliza::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/scripts/doctor.txt")).unwrap();
        assert!(eliza.categories().contains("FAMILY"));

        let cases = vec![
            ("Hello", "HOW DO YOU DO. PLEASE STATE YOUR PROBLEM"),
            ("My mother hates me", "TELL ME MORE ABOUT YOUR FAMILY"),
            ("I am unhappy", "I AM SORRY TO HEAR YOU ARE UNHAPPY"),
            ("The weather is nice", "I AM NOT SURE I UNDERSTAND YOU FULLY"),
            ("maybe", "YOU DON'T SEEM QUITE CERTAIN"),
        ];
        for (input, expected) in cases {
            assert_eq!(eliza.get_response(input).unwrap(), expected, "input: {input}");
        }
        assert_eq!(eliza.memory_len(), 1);
    }

    #[test]
    fn custom_default_reply() {
        let options = Options { default_reply: "Hmm.".into(), ..Options::default() };
        let mut eliza = Eliza::from_script_with("(HELLO ((0)(HI)))", options).unwrap();
        assert_eq!(eliza.get_response("bye").unwrap(), "Hmm.");
    }
}
