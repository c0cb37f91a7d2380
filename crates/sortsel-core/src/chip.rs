#![forbid(unsafe_code)]

//! Visual chip container.
//!
//! A [`ChipList`] mirrors the widget's choice list: the selected-value chips
//! in on-screen order, followed by one fixed anchor (the search field) that
//! never moves. Chip creation and removal belong to the host widget; the
//! reorder passes only read chips and reposition them.

use std::fmt;

/// Stable chip identity, independent of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChipId(u32);

impl ChipId {
    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip#{}", self.0)
    }
}

/// One selected-value chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    id: ChipId,
    label: String,
    close_index: Option<String>,
}

impl Chip {
    /// Chip identity.
    #[must_use]
    pub const fn id(&self) -> ChipId {
        self.id
    }

    /// Display text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw index attribute carried by the chip's removal control.
    ///
    /// `None` when the chip has no removal control (for example a disabled
    /// option rendered without a close button).
    #[must_use]
    pub fn close_index(&self) -> Option<&str> {
        self.close_index.as_deref()
    }

    /// Replace the removal control's index attribute.
    pub fn set_close_index(&mut self, close_index: Option<String>) {
        self.close_index = close_index;
    }
}

/// Chips in visual order, followed by a fixed trailing anchor.
#[derive(Debug, Clone, Default)]
pub struct ChipList {
    chips: Vec<Chip>,
    next_id: u32,
}

impl ChipList {
    /// Create an empty list (anchor only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chip just before the anchor and return its identity.
    pub fn push_chip(&mut self, label: impl Into<String>, close_index: Option<String>) -> ChipId {
        let id = ChipId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.chips.push(Chip {
            id,
            label: label.into(),
            close_index,
        });
        id
    }

    /// Detach a chip from the list.
    pub fn remove_chip(&mut self, id: ChipId) -> Option<Chip> {
        let index = self.position(id)?;
        Some(self.chips.remove(index))
    }

    /// Chips in visual order. The anchor is not included.
    #[must_use]
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Chip identities in visual order.
    pub fn chip_ids(&self) -> impl Iterator<Item = ChipId> + '_ {
        self.chips.iter().map(Chip::id)
    }

    /// Look up a chip by identity.
    #[must_use]
    pub fn get(&self, id: ChipId) -> Option<&Chip> {
        self.chips.iter().find(|chip| chip.id == id)
    }

    /// Mutable lookup by identity.
    pub fn get_mut(&mut self, id: ChipId) -> Option<&mut Chip> {
        self.chips.iter_mut().find(|chip| chip.id == id)
    }

    /// Current visual index of a chip.
    #[must_use]
    pub fn position(&self, id: ChipId) -> Option<usize> {
        self.chips.iter().position(|chip| chip.id == id)
    }

    /// Number of chips (the anchor is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Whether the list holds no chips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Index of the anchor among the container's children. Always last.
    #[must_use]
    pub fn anchor_index(&self) -> usize {
        self.chips.len()
    }

    /// Move a chip to sit immediately before the anchor.
    ///
    /// Returns `false` if the chip is not in the list.
    pub fn move_before_anchor(&mut self, id: ChipId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let chip = self.chips.remove(index);
        self.chips.push(chip);
        true
    }

    /// Move the chip at `from` so that it ends up at index `to`.
    ///
    /// `to` is clamped to the last chip slot, so the anchor stays last.
    /// Returns `false` when `from` is out of range or nothing moved.
    pub fn move_chip(&mut self, from: usize, to: usize) -> bool {
        if from >= self.chips.len() {
            return false;
        }
        let to = to.min(self.chips.len() - 1);
        if from == to {
            return false;
        }
        let chip = self.chips.remove(from);
        self.chips.insert(to, chip);
        true
    }
}
