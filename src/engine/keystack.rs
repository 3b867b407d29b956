//! The keystack: keywords found in one input, in dispatch order.
//!
//! A keyword is pushed at most once. Insertion compares against the highest
//! rank inserted so far (not the rank currently at the front), so a low-ranked
//! keyword seen after a high one goes to the back while a tie goes to the
//! front:
//!
//! ```text
//! push (YOU,1)    [YOU]
//! push (FRIEND,5) [FRIEND, YOU]
//! push (MY,2)     [FRIEND, YOU, MY]        2 < 5: back
//! push (DOG,5)    [DOG, FRIEND, YOU, MY]   5 >= 5: front
//! ```
//!
//! Popping removes from the front and makes the keyword insertable again.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub(crate) struct Keystack {
    entries: VecDeque<(String, u32)>,
    seen: HashSet<String>,
    top_rank: u32,
}

impl Keystack {
    /// Rank-ordered insert. Returns `false` when `keyword` is already stacked.
    pub(crate) fn insert(&mut self, keyword: &str, rank: u32) -> bool {
        if !self.seen.insert(keyword.to_string()) {
            return false;
        }
        if rank >= self.top_rank {
            self.entries.push_front((keyword.to_string(), rank));
            self.top_rank = rank;
        } else {
            self.entries.push_back((keyword.to_string(), rank));
        }
        true
    }

    /// Append regardless of rank. Used for the fallback keyword.
    pub(crate) fn push_back(&mut self, keyword: &str, rank: u32) -> bool {
        if !self.seen.insert(keyword.to_string()) {
            return false;
        }
        self.entries.push_back((keyword.to_string(), rank));
        true
    }

    pub(crate) fn pop(&mut self) -> Option<(String, u32)> {
        let (keyword, rank) = self.entries.pop_front()?;
        self.seen.remove(&keyword);
        Some((keyword, rank))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
        self.top_rank = 0;
    }

    /// Current contents in dispatch order.
    pub(crate) fn snapshot(&self) -> Vec<(String, u32)> {
        self.entries.iter().cloned().collect()
    }
}
