use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a script or while resolving a turn against it.
///
/// Parse-time variants (`Syntax`, `MalformedEntry`, `MalformedRule`, `Pattern`)
/// mean the script itself has to be fixed. `UnknownRedirection`,
/// `CircularRedirection` and `MissingEntry` surface lazily, the first time a
/// turn walks the offending path.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("malformed entry: {form}")]
    MalformedEntry { form: String },
    #[error("malformed rule: {form}")]
    MalformedRule { form: String },
    #[error("redirection target '{target}' does not exist")]
    UnknownRedirection { target: String },
    #[error("circular redirection detected: {}", chain.join(" -> "))]
    CircularRedirection { chain: Vec<String> },
    #[error("keyword '{keyword}' does not exist in the dictionary")]
    MissingEntry { keyword: String },
    #[error("failed to read script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decomposition pattern '{pattern}' does not compile: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ScriptError {
    /// True for errors that come from the script text rather than the
    /// environment (everything except `Io`).
    pub fn is_script_error(&self) -> bool {
        !matches!(self, ScriptError::Io { .. })
    }

    pub(crate) fn malformed_entry(form: impl ToString) -> Self {
        ScriptError::MalformedEntry { form: form.to_string() }
    }

    pub(crate) fn malformed_rule(form: impl ToString) -> Self {
        ScriptError::MalformedRule { form: form.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;
