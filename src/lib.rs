//! A script-driven ELIZA dialogue engine.
//!
//! A script is a sequence of symbolic expressions declaring keywords, their
//! rank, substitution aliases, category (`DLIST`) membership, and the
//! decomposition/reassembly rules that turn matching input into a response.
//! [`Eliza`] loads a script and answers one input at a time:
//!
//! ```text
//! input ─ split_clauses ─ tokenize ─ keyword scan ──▶ keystack
//!                                                     │ pop by rank
//!                                                     ▼
//!                          resolve (redirections, NEWKEY, round-robin)
//!                                                     │
//!            response ◀── memory queue ◀── NONE ◀─────┘ (fallbacks)
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod pattern;
mod script;
mod sexp;
mod text;

pub use api::{DEFAULT_REPLY, Eliza, Options};
pub use engine::{Attempt, AttemptOutcome, ResponseSource, TurnDetails};
pub use error::{Result, ScriptError};
pub use pattern::{Decomposition, Matcher, PatternToken, Template};
pub use script::{CategoryTable, DictionaryEntry, EntryPatch, Script, ScriptStatistics, merge};
pub use sexp::{Sexp, read_all};
pub use text::{split_clauses, tokenize};

use std::fmt;

/// Index of a rule in its [`Script`]'s rule arena.
pub type RuleId = usize;

/// The generative half of a pattern rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassembly {
    /// Response text with numbered slots filled from the decomposition.
    Text(Template),
    /// `(=KEY)`: answer with whatever `KEY` answers for the same input.
    Redirect(String),
    /// `(PRE (...) (=KEY))`: render the template, then hand the result to
    /// `KEY` as its input.
    Preformat { template: Template, target: String },
    /// `(NEWKEY)`: give up on this keyword and let the next one on the
    /// keystack try.
    NewKey,
}

impl fmt::Display for Reassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reassembly::Text(template) => write!(f, "{template}"),
            Reassembly::Redirect(target) => write!(f, "={target}"),
            Reassembly::Preformat { template, target } => write!(f, "PRE ({template}) (={target})"),
            Reassembly::NewKey => f.write_str("NEWKEY"),
        }
    }
}

/// Non-empty list of reassemblies consumed round-robin.
///
/// The cursor lives as long as the list: successive matches of the owning rule
/// walk the reassemblies in declaration order and wrap around, across turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassemblyList {
    items: Vec<Reassembly>,
    cursor: usize,
}

impl ReassemblyList {
    /// Returns `None` for an empty list.
    pub fn new(items: Vec<Reassembly>) -> Option<Self> {
        if items.is_empty() { None } else { Some(Self { items, cursor: 0 }) }
    }

    /// Take the reassembly under the cursor and advance it.
    pub fn next(&mut self) -> &Reassembly {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether every reassembly is plain text (the only kind memory rules allow).
    pub fn is_plain_text(&self) -> bool {
        self.items.iter().all(|r| matches!(r, Reassembly::Text(_)))
    }
}

impl fmt::Display for ReassemblyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.items.iter().map(|r| format!("({r})")).collect();
        f.write_str(&parts.join(" "))
    }
}

/// A response or memory rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Decomposition plus the reassemblies it cycles through.
    Pattern { decomposition: Decomposition, reassemblies: ReassemblyList },
    /// Entry-level redirection: the keyword is answered by `target`.
    Redirect { target: String },
}

impl Rule {
    pub fn reassembly_count(&self) -> usize {
        match self {
            Rule::Pattern { reassemblies, .. } => reassemblies.len(),
            Rule::Redirect { .. } => 0,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern { decomposition, reassemblies } => write!(f, "(({decomposition}) {reassemblies})"),
            Rule::Redirect { target } => write!(f, "(={target})"),
        }
    }
}
