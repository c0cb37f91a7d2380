#![forbid(unsafe_code)]

//! One-shot restore of a saved chip order.
//!
//! Every chip is resolved once into a value → chip map. Then, walking the
//! saved order front to back, each matching chip is moved to sit just before
//! the anchor, so the named chips line up in saved order. The chips that were
//! not named are then moved behind them in their previous relative order.
//! When nothing matches, the list is not touched at all.
//!
//! ```text
//! chips [A, B, C] + saved ["C", "A"]  =>  [C, A, B]
//!                                          ^ named  ^ rest, order kept
//! ```

use std::collections::{HashMap, HashSet};

use crate::chip::{ChipId, ChipList};
use crate::resolve::ValueResolver;
use crate::saved_order::SavedOrder;
use crate::value::Value;

/// Counters describing one restore pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Chips that resolved to a value.
    pub resolved: usize,
    /// Chips that could not be resolved.
    pub unresolved: usize,
    /// Named chips placed in saved order.
    pub moved: usize,
    /// Saved entries that matched nothing (unknown, non-string, or repeated).
    pub ignored: usize,
}

/// Rearrange `chips` so the chips named in `saved` follow its order.
///
/// Never fails. Unresolvable chips and chips whose value is absent from
/// `saved` keep their relative order behind the named ones. A saved value
/// repeated later in the list is a no-op for the repeat. When two chips
/// resolve to the same value the first one in visual order is the named one,
/// which keeps it ahead of its twin on every later pass.
pub fn restore_order<R>(chips: &mut ChipList, resolver: &R, saved: &SavedOrder) -> RestoreReport
where
    R: ValueResolver + ?Sized,
{
    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!(
        "sortsel.restore",
        chips = chips.len(),
        saved_len = saved.len(),
        moved = tracing::field::Empty,
        ignored = tracing::field::Empty
    );
    #[cfg(feature = "tracing")]
    let _guard = span.enter();

    let mut report = RestoreReport::default();
    let mut by_value: HashMap<Value, ChipId> = HashMap::with_capacity(chips.len());
    for chip in chips.chips() {
        match resolver.resolve_value(chip) {
            Some(value) => {
                report.resolved += 1;
                by_value.entry(value).or_insert(chip.id());
            }
            None => report.unresolved += 1,
        }
    }

    let mut moved: HashSet<ChipId> = HashSet::with_capacity(by_value.len());
    for entry in saved.iter() {
        let target = entry
            .and_then(|value| by_value.get(value.as_str()))
            .copied()
            .filter(|id| !moved.contains(id));
        match target {
            Some(id) if chips.move_before_anchor(id) => {
                moved.insert(id);
                report.moved += 1;
            }
            _ => report.ignored += 1,
        }
    }

    if !moved.is_empty() {
        let rest: Vec<ChipId> = chips
            .chip_ids()
            .take(chips.len() - moved.len())
            .collect();
        for id in rest {
            chips.move_before_anchor(id);
        }
    }

    #[cfg(feature = "tracing")]
    {
        span.record("moved", report.moved);
        span.record("ignored", report.ignored);
        if report.unresolved > 0 {
            tracing::debug!(
                message = "sortsel.restore.unresolved",
                unresolved = report.unresolved
            );
        }
    }

    report
}
