//! Category (`DLIST`) table.

use std::collections::BTreeMap;
use std::fmt;

/// Maps a category tag to the keywords declared under it, in declaration
/// order. Filled while a script is parsed and only read afterwards, when
/// decomposition patterns referencing `(/ TAG)` are compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    tags: BTreeMap<String, Vec<String>>,
}

impl CategoryTable {
    /// Record `keyword` as a member of `tag`. Duplicates are kept.
    pub fn add(&mut self, tag: &str, keyword: &str) {
        self.tags.entry(tag.to_string()).or_default().push(keyword.to_string());
    }

    pub fn members(&self, tag: &str) -> Option<&[String]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tags.iter().map(|(tag, members)| (tag.as_str(), members.as_slice()))
    }
}

impl fmt::Display for CategoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, members) in self.iter() {
            writeln!(f, "{tag}: {}", members.join(" "))?;
        }
        Ok(())
    }
}
