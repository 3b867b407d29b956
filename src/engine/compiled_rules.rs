//! Matcher compilation.
//!
//! Parsing only validates decomposition patterns; turning them into regexes
//! needs the complete category table, because a `(/ TAG)` reference may appear
//! before the `DLIST` forms that populate `TAG`. So compilation is a separate
//! pass, run once when the engine is built.
//!
//! ## Invariants
//!
//! - `matchers[id]` belongs to `script.rules()[id]`. The two vectors must stay
//!   aligned, so every arena slot gets an entry, reachable or not.
//! - Entry-level redirections have no decomposition and map to `None`.

use crate::error::{Result, ScriptError};
use crate::pattern::Matcher;
use crate::script::Script;
use crate::{Rule, RuleId};
use tracing::debug;

/// One compiled matcher per rule in a script's arena.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledRules {
    matchers: Vec<Option<Matcher>>,
}

impl CompiledRules {
    pub(crate) fn new(script: &Script) -> Result<Self> {
        let categories = script.categories();
        let mut matchers = Vec::with_capacity(script.rules().len());

        for rule in script.rules() {
            let matcher = match rule {
                Rule::Pattern { decomposition, .. } => Some(decomposition.compile(categories).map_err(|source| {
                    ScriptError::Pattern { pattern: decomposition.source().to_string(), source }
                })?),
                Rule::Redirect { .. } => None,
            };
            matchers.push(matcher);
        }

        debug!(matchers = matchers.iter().flatten().count(), arena = matchers.len(), "compiled decomposition matchers");
        Ok(CompiledRules { matchers })
    }

    /// The matcher for rule `id`, or `None` for redirections and unknown ids.
    pub(crate) fn matcher(&self, id: RuleId) -> Option<&Matcher> {
        self.matchers.get(id).and_then(Option::as_ref)
    }
}
