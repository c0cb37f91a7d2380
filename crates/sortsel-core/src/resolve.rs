#![forbid(unsafe_code)]

//! Chip-to-value resolution.
//!
//! The widget keeps an internal results array; each chip's removal control
//! carries the index of the entry it represents. [`ValueResolver`] is the
//! seam the reorder passes use, and [`IndexedResolver`] is its
//! implementation over that index convention.

use crate::chip::{Chip, ChipList};
use crate::value::Value;

/// Adapter from visual chips to the values they represent.
pub trait ValueResolver {
    /// Value represented by `chip`, or `None` if it cannot be resolved.
    ///
    /// Must not fail for chips that are half-removed or whose backing entry
    /// has been detached.
    fn resolve_value(&self, chip: &Chip) -> Option<Value>;

    /// Resolved values of every chip in visual order, skipping unresolvable
    /// chips.
    fn list_visual_values(&self, chips: &ChipList) -> Vec<Value> {
        chips
            .chips()
            .iter()
            .filter_map(|chip| self.resolve_value(chip))
            .collect()
    }
}

impl<R: ValueResolver + ?Sized> ValueResolver for &R {
    fn resolve_value(&self, chip: &Chip) -> Option<Value> {
        (**self).resolve_value(chip)
    }
}

/// One slot of the widget's results array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub value: Value,
    pub text: String,
    pub selected: bool,
}

impl ResultEntry {
    #[must_use]
    pub fn new(value: impl Into<Value>, text: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            selected,
        }
    }
}

/// The widget's internal results array.
///
/// Empty slots model entries that were already detached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsData {
    slots: Vec<Option<ResultEntry>>,
}

impl ResultsData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its slot index.
    pub fn push(&mut self, entry: ResultEntry) -> usize {
        self.slots.push(Some(entry));
        self.slots.len() - 1
    }

    /// Entry at `index`, if the slot exists and is occupied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResultEntry> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable entry at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ResultEntry> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Empty a slot, keeping later indices stable.
    pub fn detach(&mut self, index: usize) -> Option<ResultEntry> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Slot index of the first occupied entry with `value`.
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|entry| entry.value == *value))
    }

    /// Number of slots, occupied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Parse an index attribute with base-10 integer-prefix rules.
///
/// Leading whitespace and one sign are accepted, then the longest run of
/// ASCII digits; anything after it is ignored. No digits, a negative index,
/// or a number too large for `usize` yields `None`. `-0` is index 0.
#[must_use]
pub fn parse_option_index(raw: &str) -> Option<usize> {
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let digits = &rest[..digits_len];
    if negative {
        return digits.bytes().all(|b| b == b'0').then_some(0);
    }
    digits.parse().ok()
}

/// Resolver that follows a chip's close-control index into [`ResultsData`].
#[derive(Debug, Clone, Copy)]
pub struct IndexedResolver<'a> {
    results: &'a ResultsData,
}

impl<'a> IndexedResolver<'a> {
    #[must_use]
    pub const fn new(results: &'a ResultsData) -> Self {
        Self { results }
    }
}

impl ValueResolver for IndexedResolver<'_> {
    fn resolve_value(&self, chip: &Chip) -> Option<Value> {
        let index = parse_option_index(chip.close_index()?)?;
        self.results.get(index).map(|entry| entry.value.clone())
    }
}
