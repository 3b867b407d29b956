//! Dictionary entries and the patch/merge rules used while parsing.
//!
//! A keyword may be mentioned by several top-level forms (for example once
//! with its rules and once more under `MEMORY`). Each form produces an
//! [`EntryPatch`]; [`merge`] folds it into whatever is already recorded:
//!
//! - `alias` and `rank`: the patch wins when it carries a value.
//! - `response_rules` and `memory_rules`: a present list *replaces* the old
//!   one. Appending only happens through `Script::append_response_rule`.

use crate::RuleId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub alias: Option<String>,
    /// `None` keeps the keyword out of input scanning.
    pub rank: Option<u32>,
    pub response_rules: Vec<RuleId>,
    pub memory_rules: Vec<RuleId>,
}

impl DictionaryEntry {
    pub fn has_response_rules(&self) -> bool {
        !self.response_rules.is_empty()
    }
}

/// Optional field updates for a [`DictionaryEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub alias: Option<String>,
    pub rank: Option<u32>,
    pub response_rules: Option<Vec<RuleId>>,
    pub memory_rules: Option<Vec<RuleId>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.alias.is_none() && self.rank.is_none() && self.response_rules.is_none() && self.memory_rules.is_none()
    }
}

/// Fold `patch` into `existing`: present values override, absent ones keep
/// what was there.
pub fn merge(existing: DictionaryEntry, patch: EntryPatch) -> DictionaryEntry {
    DictionaryEntry {
        alias: patch.alias.or(existing.alias),
        rank: patch.rank.or(existing.rank),
        response_rules: patch.response_rules.unwrap_or(existing.response_rules),
        memory_rules: patch.memory_rules.unwrap_or(existing.memory_rules),
    }
}
