#![forbid(unsafe_code)]

//! Order restore and submit-time synchronization for drag-reorderable
//! multiselects.
//!
//! A multiselect shows its selected values twice: as a row of chips the user
//! can drag around (the *visual* order) and as the entries of the underlying
//! form control (the *logical* order, which is what gets submitted). This
//! crate keeps the two in step:
//!
//! - [`restore::restore_order`] rearranges the chips to match a
//!   [`SavedOrder`] once, when the widget becomes ready.
//! - [`sync::synchronize`] rewrites the logical order from the chips right
//!   before submission.
//!
//! Both passes are pure reorder transforms over [`ChipList`] and
//! [`OptionList`]. They never add, remove, or (de)select anything, and they
//! never fail: items that cannot be resolved are simply left where they are.
//! Chip-to-value lookup goes through the [`ValueResolver`] adapter so the
//! algorithms stay independent of any particular widget's bookkeeping.

pub mod chip;
pub mod error;
pub mod resolve;
pub mod restore;
pub mod saved_order;
pub mod sync;
pub mod value;

pub use chip::{Chip, ChipId, ChipList};
pub use error::{Result, SortselError};
pub use resolve::{IndexedResolver, ResultEntry, ResultsData, ValueResolver, parse_option_index};
pub use restore::{RestoreReport, restore_order};
pub use saved_order::SavedOrder;
pub use sync::{EntryId, OptionEntry, OptionList, SyncReport, sync_order, synchronize};
pub use value::Value;
