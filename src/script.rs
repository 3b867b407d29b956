//! Script loading: the keyword dictionary, the category table and the rule
//! arena they index into.
//!
//! ## Layout
//!
//! Rules are owned by one arena (`Script::rules`) and referenced from entries
//! by [`RuleId`]. Compiled matchers are built later in a vector aligned with
//! that arena (see `engine/compiled_rules.rs`), so a rule's identity is its
//! index and never changes once assigned. Replaced rule lists leave their old
//! rules in the arena, unreachable.
//!
//! ## Modules
//!
//! - `category.rs`: the `DLIST` table.
//! - `entry.rs`: dictionary entries, patches and the merge policy.
//! - `parser.rs`: turns symbolic-expression forms into entries and rules.

#[path = "script/category.rs"]
mod category;
#[path = "script/entry.rs"]
mod entry;
#[path = "script/parser.rs"]
mod parser;
#[cfg(test)]
#[path = "script/tests.rs"]
mod tests;

pub use category::CategoryTable;
pub use entry::{DictionaryEntry, EntryPatch, merge};

use crate::error::{Result, ScriptError};
use crate::{Options, Rule, RuleId};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Rule and reassembly totals over every entry (response and memory rules).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptStatistics {
    pub rules: usize,
    pub reassemblies: usize,
}

/// A parsed script.
#[derive(Debug, Clone, Default)]
pub struct Script {
    dictionary: HashMap<String, DictionaryEntry>,
    categories: CategoryTable,
    rules: Vec<Rule>,
}

impl Script {
    /// Parse script text into a fresh `Script`.
    pub fn parse(text: &str, options: &Options) -> Result<Self> {
        let mut script = Script::default();
        script.load_str(text, options)?;
        Ok(script)
    }

    /// Read a whole file and parse it into a fresh `Script`.
    pub fn from_file(path: impl AsRef<Path>, options: &Options) -> Result<Self> {
        let mut script = Script::default();
        script.load_file(path, options)?;
        Ok(script)
    }

    /// Parse more script text into this script. Keywords already present are
    /// merged as described in `entry.rs`.
    pub fn load_str(&mut self, text: &str, options: &Options) -> Result<()> {
        parser::parse_into(self, text, options)?;
        let stats = self.statistics();
        info!(
            entries = self.dictionary.len(),
            rules = stats.rules,
            reassemblies = stats.reassemblies,
            categories = self.categories.len(),
            "script loaded"
        );
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>, options: &Options) -> Result<()> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ScriptError::Io { path: path.to_path_buf(), source })?;
        self.load_str(&text, options)
    }

    pub fn entry(&self, keyword: &str) -> Option<&DictionaryEntry> {
        self.dictionary.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.dictionary.contains_key(keyword)
    }

    /// Number of dictionary entries.
    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.dictionary.keys().map(String::as_str)
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub(crate) fn rule_mut(&mut self, id: RuleId) -> Option<&mut Rule> {
        self.rules.get_mut(id)
    }

    /// The whole rule arena, indexed by [`RuleId`].
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply `patch` to `keyword`'s entry, creating the entry unless the patch
    /// is empty.
    pub fn update_entry(&mut self, keyword: &str, patch: EntryPatch) {
        if patch.is_empty() {
            return;
        }
        let existing = self.dictionary.remove(keyword).unwrap_or_default();
        self.dictionary.insert(keyword.to_string(), merge(existing, patch));
    }

    /// Store `rule` in the arena without attaching it to any entry.
    pub fn add_rule(&mut self, rule: Rule) -> RuleId {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Append `rule` to `keyword`'s response rules, creating the entry (with
    /// no rank) if needed. This is the only way rules accumulate rather than
    /// replace.
    pub fn append_response_rule(&mut self, keyword: &str, rule: Rule) -> RuleId {
        let id = self.add_rule(rule);
        self.dictionary.entry(keyword.to_string()).or_default().response_rules.push(id);
        id
    }

    pub fn add_category_member(&mut self, tag: &str, keyword: &str) {
        self.categories.add(tag, keyword);
    }

    pub fn statistics(&self) -> ScriptStatistics {
        let mut stats = ScriptStatistics::default();
        for entry in self.dictionary.values() {
            for id in entry.response_rules.iter().chain(&entry.memory_rules) {
                stats.rules += 1;
                stats.reassemblies += self.rules.get(*id).map(Rule::reassembly_count).unwrap_or(0);
            }
        }
        stats
    }
}
