//! The turn state machine.
//!
//! ```text
//! SCANNING ──▶ DISPATCHING ──▶ RESOLVING ──┐
//!                  ▲                        │ no answer / NEWKEY
//!                  └────────────────────────┘
//!                  │ keystack empty
//!                  ▼
//!          memory queue ─▶ fallback keyword ─▶ default reply
//! ```
//!
//! Memory rules ride along with dispatching: every popped keyword gets its
//! memory rules tried until one of them has queued something this turn.
//! Popping continues past the answering keyword only while that memory
//! contribution is still missing.
//!
//! The keystack is cleared after every turn, errors included.

use super::compiled_rules::CompiledRules;
use super::keystack::Keystack;
use super::metrics::{Attempt, AttemptOutcome, ResponseSource, TurnDetails};
use super::resolve::{Resolution, resolve};
use super::scan::scan;
use crate::error::Result;
use crate::script::Script;
use crate::{Options, Reassembly, Rule};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct Engine {
    script: Script,
    compiled: CompiledRules,
    keystack: Keystack,
    memory: VecDeque<String>,
    options: Options,
}

impl Engine {
    pub(crate) fn new(script: Script, options: Options) -> Result<Self> {
        let compiled = CompiledRules::new(&script)?;
        Ok(Engine { script, compiled, keystack: Keystack::default(), memory: VecDeque::new(), options })
    }

    pub(crate) fn script(&self) -> &Script {
        &self.script
    }

    pub(crate) fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Run one turn and report everything it did.
    pub(crate) fn run_turn(&mut self, input: &str) -> Result<TurnDetails> {
        let started = Instant::now();
        let result = self.turn(input, started);
        self.keystack.clear();
        result
    }

    fn turn(&mut self, input: &str, started: Instant) -> Result<TurnDetails> {
        let scanned = scan(&self.script, input, &mut self.keystack);
        let fallback = self.options.fallback_keyword.clone();
        if !scanned.found && self.script.contains(&fallback) {
            self.keystack.push_back(&fallback, 0);
        }
        let snapshot = self.keystack.snapshot();

        let mut attempts = Vec::with_capacity(snapshot.len());
        let mut response = None;
        let mut memorized = false;

        while let Some((keyword, _)) = self.keystack.pop() {
            let mut attempt =
                Attempt { keyword: keyword.clone(), chain: Vec::new(), outcome: AttemptOutcome::Skipped, memorized: false };

            if response.is_none() {
                let (outcome, chain, answer) = self.attempt(&keyword, &scanned.reflected)?;
                attempt.outcome = outcome;
                attempt.chain = chain;
                response = answer;
            }
            if !memorized {
                memorized = self.memorize(&keyword, &scanned.reflected);
                attempt.memorized = memorized;
            }

            debug!(keyword = %attempt.keyword, outcome = ?attempt.outcome, memorized = attempt.memorized, "attempt");
            attempts.push(attempt);
            if response.is_some() && memorized {
                break;
            }
        }

        let (response, source) = match response {
            Some(answer) => (answer, ResponseSource::Rule),
            None => self.fall_back(&scanned.reflected, &mut attempts)?,
        };
        debug!(%response, %source, memory = self.memory.len(), "turn complete");

        Ok(TurnDetails {
            input: input.to_string(),
            reflected: scanned.reflected,
            keystack: snapshot,
            attempts,
            response,
            source,
            elapsed: started.elapsed(),
        })
    }

    fn attempt(&mut self, keyword: &str, text: &str) -> Result<(AttemptOutcome, Vec<String>, Option<String>)> {
        let resolved = resolve(&mut self.script, &self.compiled, keyword, text, self.options.max_redirections)?;
        Ok(match resolved.resolution {
            Resolution::Answer(answer) => (AttemptOutcome::Answered, resolved.chain, Some(answer)),
            Resolution::NoMatch => (AttemptOutcome::NoMatch, resolved.chain, None),
            Resolution::NewKey => (AttemptOutcome::NewKey, resolved.chain, None),
        })
    }

    /// Dispatching produced nothing: memory, then the fallback keyword, then
    /// the default reply.
    fn fall_back(&mut self, text: &str, attempts: &mut Vec<Attempt>) -> Result<(String, ResponseSource)> {
        if let Some(remembered) = self.memory.pop_front() {
            debug!(%remembered, left = self.memory.len(), "answering from memory");
            return Ok((remembered, ResponseSource::Memory));
        }

        let fallback = self.options.fallback_keyword.clone();
        if self.script.contains(&fallback) {
            let (outcome, chain, answer) = self.attempt(&fallback, text)?;
            attempts.push(Attempt { keyword: fallback, chain, outcome, memorized: false });
            if let Some(answer) = answer {
                return Ok((answer, ResponseSource::Fallback));
            }
        }

        Ok((self.options.default_reply.clone(), ResponseSource::Default))
    }

    /// Try `keyword`'s memory rules in order. The first one that matches and
    /// renders non-blank text queues it; returns whether anything was queued.
    fn memorize(&mut self, keyword: &str, text: &str) -> bool {
        let Some(entry) = self.script.entry(keyword) else {
            return false;
        };
        let rule_ids = entry.memory_rules.clone();

        for id in rule_ids {
            let Some(captures) = self.compiled.matcher(id).and_then(|matcher| matcher.captures(text)) else {
                continue;
            };
            let Some(Rule::Pattern { reassemblies, .. }) = self.script.rule_mut(id) else {
                continue;
            };
            let Reassembly::Text(template) = reassemblies.next() else {
                continue;
            };
            let remembered = template.render(&captures);
            if remembered.trim().is_empty() {
                continue;
            }
            debug!(keyword, %remembered, "memorized");
            self.memory.push_back(remembered);
            return true;
        }
        false
    }
}
