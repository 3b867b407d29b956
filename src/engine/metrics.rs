//! Per-turn trace data.
//!
//! Every turn fills a [`TurnDetails`]. `Eliza::get_response` throws it away
//! and keeps the response; `Eliza::get_response_verbose` hands it to the
//! caller (the CLI's `--trace` report is built from it).

use std::fmt;
use std::time::Duration;

/// Where a turn's response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// A response rule of a keyword found in the input.
    Rule,
    /// The oldest entry of the memory queue.
    Memory,
    /// The fallback keyword, resolved after everything else came up empty.
    Fallback,
    /// The fixed default reply.
    Default,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseSource::Rule => "rule",
            ResponseSource::Memory => "memory",
            ResponseSource::Fallback => "fallback",
            ResponseSource::Default => "default",
        })
    }
}

/// Result of resolving one keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A reassembly produced the response.
    Answered,
    /// No rule matched, or the chosen reassembly rendered to nothing.
    NoMatch,
    /// A `NEWKEY` reassembly gave the keyword up.
    NewKey,
    /// A response was already chosen; only memory rules were tried.
    Skipped,
}

/// One keyword popped from the keystack (or the fallback keyword).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub keyword: String,
    /// Keywords visited while resolving, starting with `keyword`. Empty when
    /// the attempt was skipped.
    pub chain: Vec<String>,
    pub outcome: AttemptOutcome,
    /// Whether a memory rule of this keyword matched and queued a response.
    pub memorized: bool,
}

/// Everything observed during one turn.
#[derive(Debug, Clone)]
pub struct TurnDetails {
    pub input: String,
    /// Alias-substituted text the rules were matched against.
    pub reflected: String,
    /// Keystack contents before dispatching, in dispatch order.
    pub keystack: Vec<(String, u32)>,
    pub attempts: Vec<Attempt>,
    pub response: String,
    pub source: ResponseSource,
    pub elapsed: Duration,
}
