#![forbid(unsafe_code)]

//! Lifecycle hooks the host calls: [`SortselRuntime::on_ready`] once the
//! widgets are initialized, and [`SortselRuntime::on_before_submit`] from a
//! form's pre-submission handler.
//!
//! Neither hook returns an error. Anything that goes wrong (no drag
//! mechanism, a missing or malformed saved order, unresolvable chips) is
//! logged and leaves the page as it was.

use std::collections::HashMap;

use sortsel_core::{RestoreReport, SavedOrder, SyncReport};

use crate::config::SortselConfig;
use crate::drag::ChipDragAdapter;
use crate::host::{Form, Page};
use crate::selector::Selector;

/// Why a select did not get its saved order applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreSkip {
    /// The order attribute is absent.
    NoAttribute,
    /// The order attribute is not a JSON array of values.
    Malformed(String),
}

/// Per-select result of [`SortselRuntime::on_ready`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectReady {
    pub form_id: String,
    pub name: String,
    pub restore: Result<RestoreReport, RestoreSkip>,
}

/// Result of [`SortselRuntime::on_ready`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyReport {
    /// `true` when the drag mechanism was missing and nothing was set up.
    pub drag_unavailable: bool,
    /// Multi-value selects that were made sortable.
    pub attached: Vec<SelectReady>,
    /// Selects skipped because they do not match `select_selector` or are
    /// single-value.
    pub skipped: usize,
}

/// Result of [`SortselRuntime::on_before_submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Sync results per select name, in document order.
    pub synced: Vec<(String, SyncReport)>,
    /// Selects left alone because no drag adapter is attached to them.
    pub unattached: usize,
}

/// Host-facing entry point.
#[derive(Debug, Clone)]
pub struct SortselRuntime {
    config: SortselConfig,
    /// `None` when `select_selector` does not parse; nothing is attached then.
    select_selector: Option<Selector>,
    ready: bool,
    adapters: HashMap<(String, String), ChipDragAdapter>,
}

impl SortselRuntime {
    #[must_use]
    pub fn new(config: SortselConfig) -> Self {
        Self {
            select_selector: Selector::parse(&config.select_selector).ok(),
            config,
            ready: false,
            adapters: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SortselConfig {
        &self.config
    }

    /// Whether [`Self::on_ready`] has completed with the drag mechanism present.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Make every multi-value select on `page` that matches
    /// `select_selector` sortable, and restore saved orders.
    pub fn on_ready(&mut self, page: &mut Page) -> ReadyReport {
        let mut report = ReadyReport::default();
        if !page.drag_available {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "sortsel.ready.drag_unavailable");
            report.drag_unavailable = true;
            return report;
        }

        let Some(selector) = self.select_selector.as_ref() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sortsel.ready.bad_selector",
                selector = %self.config.select_selector
            );
            report.skipped = page.forms.iter().map(|form| form.selects().count()).sum();
            self.ready = true;
            return report;
        };

        for form in &mut page.forms {
            let form_id = form.id().to_owned();
            for select in form.selects_mut() {
                if !select.is_multiple() || !selector.matches(&*select) {
                    report.skipped += 1;
                    continue;
                }

                let restore = match select.attribute(&self.config.order_attribute) {
                    None => Err(RestoreSkip::NoAttribute),
                    Some(raw) => match SavedOrder::parse_attribute(raw) {
                        Ok(saved) => Ok(select.restore(&saved)),
                        Err(err) => Err(RestoreSkip::Malformed(err.to_string())),
                    },
                };

                #[cfg(feature = "tracing")]
                match &restore {
                    Ok(restored) => tracing::debug!(
                        message = "sortsel.ready.restored",
                        form = %form_id,
                        select = select.name(),
                        moved = restored.moved,
                        ignored = restored.ignored
                    ),
                    Err(skip) => tracing::debug!(
                        message = "sortsel.ready.restore_skipped",
                        form = %form_id,
                        select = select.name(),
                        reason = ?skip
                    ),
                }

                self.adapters.insert(
                    (form_id.clone(), select.name().to_owned()),
                    ChipDragAdapter::new(self.config.sortable.clone()),
                );
                report.attached.push(SelectReady {
                    form_id: form_id.clone(),
                    name: select.name().to_owned(),
                    restore,
                });
            }
        }

        self.ready = true;
        report
    }

    /// Flush chip order into every select of `form` that [`Self::on_ready`]
    /// attached a drag adapter to.
    ///
    /// Runs to completion before returning, so the caller can let the
    /// submission proceed immediately afterwards. Does nothing if the runtime
    /// never became ready.
    pub fn on_before_submit(&mut self, form: &mut Form) -> SubmitReport {
        let mut report = SubmitReport::default();
        if !self.ready {
            return report;
        }
        let form_id = form.id().to_owned();
        for select in form.selects_mut() {
            let key = (form_id.clone(), select.name().to_owned());
            if !self.adapters.contains_key(&key) {
                report.unattached += 1;
                continue;
            }
            let synced = select.sync();
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "sortsel.submit.synced",
                form = %form_id,
                select = select.name(),
                moved = synced.moved,
                unresolved = synced.unresolved,
                missing = synced.missing
            );
            report.synced.push((select.name().to_owned(), synced));
        }
        report
    }

    /// Drag adapter attached to select `name` of form `form_id`.
    pub fn drag_adapter_mut(&mut self, form_id: &str, name: &str) -> Option<&mut ChipDragAdapter> {
        self.adapters.get_mut(&(form_id.to_owned(), name.to_owned()))
    }

    /// Number of selects with an attached drag adapter.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.adapters.len()
    }
}

impl Default for SortselRuntime {
    fn default() -> Self {
        Self::new(SortselConfig::default())
    }
}
