#![forbid(unsafe_code)]

//! Submit-time synchronization of the logical order.
//!
//! The form control serializes its selected entries in document order, so
//! before submission the entries are rearranged to follow the chips. The
//! pass reads the chips' values front to back, then walks that list in
//! reverse moving each matching entry to the front; the first chip's entry
//! therefore ends up frontmost. Entries that no chip claimed keep their
//! relative order behind the moved ones.
//!
//! Duplicate values: each chip value claims the leftmost entry carrying that
//! value that no earlier chip has claimed, preferring selected entries over
//! unselected ones. A value with nothing left to claim is skipped.

use std::collections::HashSet;
use std::fmt;

use crate::chip::ChipList;
use crate::resolve::ValueResolver;
use crate::value::Value;

/// Stable identity of an entry in an [`OptionList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}

/// One selectable entry of the form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub value: Value,
    pub label: String,
    pub selected: bool,
}

impl OptionEntry {
    #[must_use]
    pub fn new(value: impl Into<Value>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// The form control's entries in document order.
///
/// Membership and selection belong to the host form; the reorder pass only
/// moves entries around.
#[derive(Debug, Clone, Default)]
pub struct OptionList {
    entries: Vec<(EntryId, OptionEntry)>,
    next_id: u32,
}

impl OptionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of document order.
    pub fn push(&mut self, entry: OptionEntry) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, entry));
        id
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &OptionEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Values of the selected entries, in document order.
    #[must_use]
    pub fn selected_values(&self) -> Vec<Value> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.selected)
            .map(|(_, entry)| entry.value.clone())
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&OptionEntry> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }

    /// Change an entry's selection state. Host-side only.
    pub fn set_selected(&mut self, id: EntryId, selected: bool) -> bool {
        match self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            Some((_, entry)) => {
                entry.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Move an entry to the front of document order.
    pub fn move_to_front(&mut self, id: EntryId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn claim(&self, value: &Value, claimed: &HashSet<EntryId>) -> Option<EntryId> {
        let unclaimed = |selected: bool| {
            self.entries
                .iter()
                .find(|(id, entry)| {
                    entry.selected == selected && entry.value == *value && !claimed.contains(id)
                })
                .map(|(id, _)| *id)
        };
        unclaimed(true).or_else(|| unclaimed(false))
    }
}

/// Counters describing one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Chips that could not be resolved (only set by [`synchronize`]).
    pub unresolved: usize,
    /// Values read from the chips.
    pub requested: usize,
    /// Entries moved to the front.
    pub moved: usize,
    /// Values with no entry left to claim.
    pub missing: usize,
}

/// Reorder `options` so the entries for `visual` lead, in that order.
///
/// Never adds, removes, or (de)selects an entry.
pub fn sync_order(options: &mut OptionList, visual: &[Value]) -> SyncReport {
    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!(
        "sortsel.sync",
        entries = options.len(),
        requested = visual.len(),
        moved = tracing::field::Empty,
        missing = tracing::field::Empty
    );
    #[cfg(feature = "tracing")]
    let _guard = span.enter();

    let mut report = SyncReport {
        requested: visual.len(),
        ..SyncReport::default()
    };

    let mut claimed_set = HashSet::with_capacity(visual.len());
    let mut claimed = Vec::with_capacity(visual.len());
    for value in visual {
        match options.claim(value, &claimed_set) {
            Some(id) => {
                claimed_set.insert(id);
                claimed.push(id);
            }
            None => report.missing += 1,
        }
    }

    for id in claimed.into_iter().rev() {
        if options.move_to_front(id) {
            report.moved += 1;
        }
    }

    #[cfg(feature = "tracing")]
    {
        span.record("moved", report.moved);
        span.record("missing", report.missing);
    }

    report
}

/// Read the chips' values and write that order into `options`.
pub fn synchronize<R>(options: &mut OptionList, chips: &ChipList, resolver: &R) -> SyncReport
where
    R: ValueResolver + ?Sized,
{
    let visual = resolver.list_visual_values(chips);
    let unresolved = chips.len() - visual.len();
    #[cfg(feature = "tracing")]
    if unresolved > 0 {
        tracing::debug!(message = "sortsel.sync.unresolved", unresolved);
    }
    SyncReport {
        unresolved,
        ..sync_order(options, &visual)
    }
}
