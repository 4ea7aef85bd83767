//! Insertion-ordered occurrence counting.

use std::collections::HashMap;

/// Counts occurrences of string keys, remembering first-seen order.
///
/// Max-count lookups break ties in favour of the key seen first, so
/// reductions over the same input are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    positions: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments `key` and returns its new count.
    pub fn add(&mut self, key: &str) -> usize {
        if let Some(&pos) = self.positions.get(key) {
            self.entries[pos].1 += 1;
            return self.entries[pos].1;
        }
        self.positions.insert(key.to_string(), self.entries.len());
        self.entries.push((key.to_string(), 1));
        1
    }

    pub fn get(&self, key: &str) -> usize {
        self.positions.get(key).map_or(0, |&pos| self.entries[pos].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.entries.clear();
    }

    /// Keys with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// The key with the highest count. The earliest-seen key wins ties.
    pub fn top(&self) -> Option<(&str, usize)> {
        self.iter()
            .fold(None, |best, (key, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((key, count)),
            })
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
