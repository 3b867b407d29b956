//! Keyword scanning.
//!
//! Input is split into clauses and each clause is tokenized and checked
//! against the dictionary, in order. The first clause containing a keyword
//! wins: its keywords go onto the keystack and its alias-substituted tokens
//! become the reflected text the rules are matched against. When no clause
//! hits, the last clause examined is reflected.

use super::keystack::Keystack;
use crate::script::Script;
use crate::text::{split_clauses, tokenize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScanOutcome {
    pub(crate) reflected: String,
    pub(crate) found: bool,
}

pub(crate) fn scan(script: &Script, input: &str, keystack: &mut Keystack) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for clause in split_clauses(input) {
        let mut tokens = tokenize(clause);
        let mut found = false;

        for token in tokens.iter_mut() {
            let Some(entry) = script.entry(token) else {
                continue;
            };
            // Unranked entries neither substitute nor trigger.
            let Some(rank) = entry.rank else {
                continue;
            };

            let keyword = token.clone();
            if let Some(alias) = &entry.alias {
                *token = alias.clone();
            }
            if entry.has_response_rules() {
                found = true;
                let pushed = keystack.insert(&keyword, rank);
                trace!(keyword = %keyword, rank, pushed, "keyword hit");
            }
        }

        outcome = ScanOutcome { reflected: tokens.join(" "), found };
        if found {
            break;
        }
    }

    debug!(reflected = %outcome.reflected, found = outcome.found, keystack = ?keystack.snapshot(), "scanned input");
    outcome
}
