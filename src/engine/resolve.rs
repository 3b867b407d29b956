//! Keyword resolution.
//!
//! Resolving a keyword walks a chain of entries:
//!
//! - an entry whose first response rule is a redirection hops straight to its
//!   target, before any rule is tried;
//! - otherwise the first rule whose matcher full-matches the text picks its
//!   next reassembly:
//!     - `=KEY` resolves `KEY` with the same text,
//!     - `PRE (...) (=KEY)` renders the template and resolves `KEY` with it,
//!     - `NEWKEY` gives the keyword up,
//!     - plain text renders and answers.
//!
//! When a rule-level hop comes back without an answer, the redirecting entry
//! carries on with its remaining rules. The chain of visited keywords is kept
//! for the whole resolution, failed hops included. Revisiting a keyword, or
//! visiting more than `max_hops + 1` entries, is a circular redirection.

use super::compiled_rules::CompiledRules;
use crate::error::{Result, ScriptError};
use crate::script::Script;
use crate::{Reassembly, Rule, RuleId};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Answer(String),
    NoMatch,
    NewKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) resolution: Resolution,
    /// Keywords visited, in order, starting with the one resolved.
    pub(crate) chain: Vec<String>,
}

pub(crate) fn resolve(
    script: &mut Script,
    compiled: &CompiledRules,
    keyword: &str,
    text: &str,
    max_hops: usize,
) -> Result<Resolved> {
    let mut resolver = Resolver { script, compiled, max_hops, chain: Vec::new() };
    let resolution = resolver.keyword(keyword, text)?;
    Ok(Resolved { resolution, chain: resolver.chain })
}

struct Resolver<'a> {
    script: &'a mut Script,
    compiled: &'a CompiledRules,
    max_hops: usize,
    chain: Vec<String>,
}

impl Resolver<'_> {
    fn keyword(&mut self, keyword: &str, text: &str) -> Result<Resolution> {
        let mut rule_ids = self.enter(keyword)?;
        while let Some(target) = self.entry_redirect(&rule_ids) {
            trace!(from = ?self.chain.last(), to = %target, "entry redirection");
            rule_ids = self.enter(&target)?;
        }

        for id in rule_ids {
            let Some(captures) = self.compiled.matcher(id).and_then(|matcher| matcher.captures(text)) else {
                continue;
            };
            let Some(Rule::Pattern { reassemblies, .. }) = self.script.rule_mut(id) else {
                continue;
            };

            trace!(rule = id, ?captures, "rule matched");
            let (target, next_text) = match reassemblies.next() {
                Reassembly::Text(template) => {
                    let answer = template.render(&captures);
                    return Ok(if answer.trim().is_empty() { Resolution::NoMatch } else { Resolution::Answer(answer) });
                }
                Reassembly::NewKey => return Ok(Resolution::NewKey),
                Reassembly::Redirect(target) => (target.clone(), text.to_string()),
                Reassembly::Preformat { template, target } => (target.clone(), template.render(&captures)),
            };

            trace!(rule = id, to = %target, text = %next_text, "rule redirection");
            match self.keyword(&target, &next_text)? {
                Resolution::Answer(answer) => return Ok(Resolution::Answer(answer)),
                outcome => trace!(rule = id, target = %target, ?outcome, "redirection gave no answer"),
            }
        }

        Ok(Resolution::NoMatch)
    }

    /// Push `keyword` onto the chain and hand back its response rules.
    fn enter(&mut self, keyword: &str) -> Result<Vec<RuleId>> {
        if self.chain.iter().any(|seen| seen == keyword) || self.chain.len() > self.max_hops {
            let mut chain = std::mem::take(&mut self.chain);
            chain.push(keyword.to_string());
            return Err(ScriptError::CircularRedirection { chain });
        }

        let Some(entry) = self.script.entry(keyword) else {
            return Err(if self.chain.is_empty() {
                ScriptError::MissingEntry { keyword: keyword.to_string() }
            } else {
                ScriptError::UnknownRedirection { target: keyword.to_string() }
            });
        };
        let rule_ids = entry.response_rules.clone();
        self.chain.push(keyword.to_string());
        Ok(rule_ids)
    }

    fn entry_redirect(&self, rule_ids: &[RuleId]) -> Option<String> {
        match rule_ids.first().and_then(|id| self.script.rule(*id)) {
            Some(Rule::Redirect { target }) => Some(target.clone()),
            _ => None,
        }
    }
}
