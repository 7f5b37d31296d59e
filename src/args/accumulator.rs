//! The structured result of a single read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flags, counters, values, positionals and overflow collected by a read.
///
/// Keys appear on first write. Order inside each list is arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    pub flags: BTreeMap<String, bool>,
    pub multiflags: BTreeMap<String, u32>,
    pub singles: BTreeMap<String, String>,
    pub multiples: BTreeMap<String, Vec<String>>,
    pub arguments: BTreeMap<String, Vec<String>>,
    pub rest: Vec<String>,
}

impl Accumulator {
    /// `None` when the flag was never mentioned.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn count(&self, name: &str) -> u32 {
        self.multiflags.get(name).copied().unwrap_or(0)
    }

    pub fn single(&self, name: &str) -> Option<&str> {
        self.singles.get(name).map(String::as_str)
    }

    pub fn multiple(&self, name: &str) -> &[String] {
        self.multiples.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn arguments(&self, name: &str) -> &[String] {
        self.arguments.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
            && self.multiflags.is_empty()
            && self.singles.is_empty()
            && self.multiples.is_empty()
            && self.arguments.is_empty()
            && self.rest.is_empty()
    }

    pub(crate) fn set_flag(&mut self, name: String, value: bool) {
        self.flags.insert(name, value);
    }

    pub(crate) fn bump(&mut self, name: String) {
        *self.multiflags.entry(name).or_insert(0) += 1;
    }

    /// Last write wins.
    pub(crate) fn set_single(&mut self, name: String, value: String) {
        self.singles.insert(name, value);
    }

    pub(crate) fn push_multiple(&mut self, name: String, value: String) {
        self.multiples.entry(name).or_default().push(value);
    }

    pub(crate) fn push_argument(&mut self, name: String, value: String) {
        self.arguments.entry(name).or_default().push(value);
    }

    pub(crate) fn push_rest(&mut self, value: String) {
        self.rest.push(value);
    }
}
