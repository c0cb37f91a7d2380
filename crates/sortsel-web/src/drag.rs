#![forbid(unsafe_code)]

//! Deterministic drag adapter for reordering chips.
//!
//! Bridges browser pointer lifecycle signals into [`ChipList`] reorders.
//! Presses are first classified against the configured `close_control`,
//! `filter`, and `draggable` selectors ([`ChipDragAdapter::classify_press`]),
//! then dispatched while enforcing:
//! - one active pointer at a time,
//! - presses on a chip body start a drag and must not reach the widget
//!   (otherwise it opens its dropdown and steals focus),
//! - presses on a chip's close control pass through so removal still works,
//! - the search field is never draggable and never moves, and
//! - interruption paths (cancel/blur/detached chip) abandon the drag without
//!   touching the list.

use sortsel_core::{ChipId, ChipList};

use crate::config::SortableConfig;
use crate::selector::{PressedElement, Selector};

/// What the pointer was pressed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipPressTarget {
    /// The body of a chip.
    Chip(ChipId),
    /// A chip's removal control.
    CloseControl(ChipId),
    /// The trailing search field.
    SearchField,
    /// Empty container space.
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Whether the host should let the press reach the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    PassThrough,
}

/// Visual feedback command for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipDragFeedback {
    /// Drag armed: add `class` to the placeholder, auto-scroll if asked.
    Ghost {
        chip: ChipId,
        class: String,
        auto_scroll: bool,
    },
    /// Drag over: drop `class` and animate the row into its final order.
    Settle {
        chip: ChipId,
        class: String,
        animation_ms: u32,
    },
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipDragPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Blur,
}

/// Why an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipDragIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    CloseControl,
    FilteredTarget,
    ChipDetached,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipDragOutcome {
    Armed { origin: usize },
    Hovered { index: usize },
    Dropped { from: usize, to: usize },
    DroppedInPlace,
    Cancelled,
    Ignored(ChipDragIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDragLogEntry {
    pub phase: ChipDragPhase,
    pub sequence: u64,
    pub pointer_id: Option<u32>,
    pub chip: Option<ChipId>,
    pub outcome: ChipDragOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipDragDispatch {
    pub propagation: Propagation,
    pub feedback: Option<ChipDragFeedback>,
    pub log: ChipDragLogEntry,
}

impl ChipDragDispatch {
    /// Whether the list was reordered by this dispatch.
    #[must_use]
    pub const fn reordered(&self) -> bool {
        matches!(self.log.outcome, ChipDragOutcome::Dropped { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveDrag {
    pointer_id: u32,
    chip: ChipId,
    button: PointerButton,
    origin: usize,
    hover: usize,
}

/// Pointer-driven chip reordering for one multiselect.
#[derive(Debug, Clone)]
pub struct ChipDragAdapter {
    config: SortableConfig,
    draggable: Option<Selector>,
    filter: Option<Selector>,
    close_control: Option<Selector>,
    active: Option<ActiveDrag>,
    next_sequence: u64,
}

impl ChipDragAdapter {
    /// Selectors that fail to parse match nothing.
    #[must_use]
    pub fn new(config: SortableConfig) -> Self {
        Self {
            draggable: Selector::parse(&config.draggable).ok(),
            filter: Selector::parse(&config.filter).ok(),
            close_control: Selector::parse(&config.close_control).ok(),
            config,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SortableConfig {
        &self.config
    }

    /// Active pointer ID, if a drag is in progress.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    /// Chip being dragged, if any.
    #[must_use]
    pub fn dragged_chip(&self) -> Option<ChipId> {
        self.active.map(|active| active.chip)
    }

    /// Classify a press from the pressed element's ancestry.
    ///
    /// `path` runs from the innermost pressed element outwards, stopping
    /// before the container; `chip` is the chip whose element is on that
    /// path, if any. The nearest element matching `close_control`, `filter`,
    /// or `draggable` (checked in that order per element) decides.
    #[must_use]
    pub fn classify_press(
        &self,
        path: &[PressedElement<'_>],
        chip: Option<ChipId>,
    ) -> ChipPressTarget {
        let hits = |selector: &Option<Selector>, element: &PressedElement<'_>| {
            selector.as_ref().is_some_and(|s| s.matches(element))
        };
        for element in path {
            match chip {
                Some(chip) if hits(&self.close_control, element) => {
                    return ChipPressTarget::CloseControl(chip);
                }
                _ if hits(&self.filter, element) => return ChipPressTarget::SearchField,
                Some(chip) if hits(&self.draggable, element) => {
                    return ChipPressTarget::Chip(chip);
                }
                _ => {}
            }
        }
        ChipPressTarget::Container
    }

    /// Handle a press inside the chip container.
    pub fn pointer_down(
        &mut self,
        chips: &ChipList,
        target: ChipPressTarget,
        pointer_id: u32,
        button: PointerButton,
    ) -> ChipDragDispatch {
        let phase = ChipDragPhase::PointerDown;
        let chip_of_target = match target {
            ChipPressTarget::Chip(chip) | ChipPressTarget::CloseControl(chip) => Some(chip),
            ChipPressTarget::SearchField | ChipPressTarget::Container => None,
        };
        let ignored = |this: &mut Self, reason| {
            this.pass_through(phase, Some(pointer_id), chip_of_target, reason)
        };

        let chip = match target {
            ChipPressTarget::CloseControl(_) => {
                return ignored(self, ChipDragIgnoredReason::CloseControl);
            }
            ChipPressTarget::SearchField | ChipPressTarget::Container => {
                return ignored(self, ChipDragIgnoredReason::FilteredTarget);
            }
            ChipPressTarget::Chip(chip) => chip,
        };
        if pointer_id == 0 {
            return ignored(self, ChipDragIgnoredReason::InvalidPointerId);
        }
        if button != PointerButton::Primary {
            return ignored(self, ChipDragIgnoredReason::ButtonNotAllowed);
        }
        if self.active.is_some() {
            return ignored(self, ChipDragIgnoredReason::ActivePointerAlreadyInProgress);
        }
        let Some(origin) = chips.position(chip) else {
            return ignored(self, ChipDragIgnoredReason::ChipDetached);
        };

        self.active = Some(ActiveDrag {
            pointer_id,
            chip,
            button,
            origin,
            hover: origin,
        });
        let feedback = ChipDragFeedback::Ghost {
            chip,
            class: self.config.ghost_class.clone(),
            auto_scroll: self.config.scroll,
        };
        self.record(
            phase,
            Propagation::Stop,
            Some(feedback),
            Some(pointer_id),
            Some(chip),
            ChipDragOutcome::Armed { origin },
        )
    }

    /// Handle pointer movement over child `over_index` of the container.
    ///
    /// Hovering the search field (or past it) targets the last chip slot.
    pub fn pointer_move(
        &mut self,
        chips: &ChipList,
        pointer_id: u32,
        over_index: usize,
    ) -> ChipDragDispatch {
        let phase = ChipDragPhase::PointerMove;
        let mut active = match self.active_for(pointer_id) {
            Ok(active) => active,
            Err(reason) => return self.pass_through(phase, Some(pointer_id), None, reason),
        };
        let last = chips.len().saturating_sub(1);
        active.hover = over_index.min(last);
        self.active = Some(active);
        self.record(
            phase,
            Propagation::Stop,
            None,
            Some(pointer_id),
            Some(active.chip),
            ChipDragOutcome::Hovered {
                index: active.hover,
            },
        )
    }

    /// Handle release: commit the move to the hovered slot.
    pub fn pointer_up(
        &mut self,
        chips: &mut ChipList,
        pointer_id: u32,
        button: PointerButton,
    ) -> ChipDragDispatch {
        let phase = ChipDragPhase::PointerUp;
        let active = match self.active_for(pointer_id) {
            Ok(active) => active,
            Err(reason) => return self.pass_through(phase, Some(pointer_id), None, reason),
        };
        if active.button != button {
            return self.pass_through(
                phase,
                Some(pointer_id),
                Some(active.chip),
                ChipDragIgnoredReason::ButtonNotAllowed,
            );
        }
        self.active = None;
        let feedback = Some(self.clear_feedback(active.chip));

        // The widget may have removed the chip while it was being dragged.
        let Some(from) = chips.position(active.chip) else {
            return self.record(
                phase,
                Propagation::Stop,
                feedback,
                Some(pointer_id),
                Some(active.chip),
                ChipDragOutcome::Cancelled,
            );
        };
        let to = active.hover.min(chips.len().saturating_sub(1));
        let outcome = if chips.move_chip(from, to) {
            ChipDragOutcome::Dropped { from, to }
        } else {
            ChipDragOutcome::DroppedInPlace
        };
        self.record(
            phase,
            Propagation::Stop,
            feedback,
            Some(pointer_id),
            Some(active.chip),
            outcome,
        )
    }

    /// Handle browser pointer-cancel. `None` cancels whatever is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> ChipDragDispatch {
        self.cancel_active(ChipDragPhase::PointerCancel, pointer_id)
    }

    /// Handle window blur.
    pub fn blur(&mut self) -> ChipDragDispatch {
        self.cancel_active(ChipDragPhase::Blur, None)
    }

    fn cancel_active(&mut self, phase: ChipDragPhase, pointer_id: Option<u32>) -> ChipDragDispatch {
        let Some(active) = self.active else {
            return self.pass_through(
                phase,
                pointer_id,
                None,
                ChipDragIgnoredReason::NoActivePointer,
            );
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return self.pass_through(
                phase,
                Some(id),
                Some(active.chip),
                ChipDragIgnoredReason::PointerMismatch,
            );
        }
        self.active = None;
        let feedback = Some(self.clear_feedback(active.chip));
        self.record(
            phase,
            Propagation::Stop,
            feedback,
            Some(active.pointer_id),
            Some(active.chip),
            ChipDragOutcome::Cancelled,
        )
    }

    fn active_for(&self, pointer_id: u32) -> Result<ActiveDrag, ChipDragIgnoredReason> {
        match self.active {
            None => Err(ChipDragIgnoredReason::NoActivePointer),
            Some(active) if active.pointer_id != pointer_id => {
                Err(ChipDragIgnoredReason::PointerMismatch)
            }
            Some(active) => Ok(active),
        }
    }

    fn clear_feedback(&self, chip: ChipId) -> ChipDragFeedback {
        ChipDragFeedback::Settle {
            chip,
            class: self.config.ghost_class.clone(),
            animation_ms: self.config.animation_ms,
        }
    }

    fn pass_through(
        &mut self,
        phase: ChipDragPhase,
        pointer_id: Option<u32>,
        chip: Option<ChipId>,
        reason: ChipDragIgnoredReason,
    ) -> ChipDragDispatch {
        self.record(
            phase,
            Propagation::PassThrough,
            None,
            pointer_id,
            chip,
            ChipDragOutcome::Ignored(reason),
        )
    }

    fn record(
        &mut self,
        phase: ChipDragPhase,
        propagation: Propagation,
        feedback: Option<ChipDragFeedback>,
        pointer_id: Option<u32>,
        chip: Option<ChipId>,
        outcome: ChipDragOutcome,
    ) -> ChipDragDispatch {
        let log = ChipDragLogEntry {
            phase,
            sequence: self.next_sequence(),
            pointer_id,
            chip,
            outcome,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(
            message = "sortsel.drag",
            phase = ?log.phase,
            sequence = log.sequence,
            pointer_id = ?log.pointer_id,
            chip = ?log.chip,
            outcome = ?log.outcome
        );
        ChipDragDispatch {
            propagation,
            feedback,
            log,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}
