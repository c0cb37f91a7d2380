#![forbid(unsafe_code)]

//! In-memory model of the host page: forms, multiselect widgets, and the
//! browser's form serialization.
//!
//! [`Multiselect`] plays the role of the widget instance attached to a
//! select element. It owns the select's entries ([`OptionList`]), the
//! widget's results array ([`ResultsData`]) and the rendered chip row
//! ([`ChipList`]). Membership changes (`select` / `deselect`) happen here, on
//! the host side; the reorder passes only ever reorder.

use std::collections::BTreeMap;

use crate::selector::SelectorTarget;
use sortsel_core::{
    ChipId, ChipList, EntryId, IndexedResolver, OptionEntry, OptionList, RestoreReport,
    ResultEntry, ResultsData, SavedOrder, SyncReport, Value, ValueResolver, restore_order,
    synchronize,
};

/// Marker class of selects the widget was attached to.
pub const CHOSEN_CLASS: &str = "chosen-select";

/// A select element together with its widget state.
#[derive(Debug, Clone)]
pub struct Multiselect {
    name: String,
    multiple: bool,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    options: OptionList,
    results: ResultsData,
    /// Results slot -> backing entry.
    slot_entries: Vec<EntryId>,
    chips: ChipList,
}

impl Multiselect {
    /// Attach a multi-value widget to a select with `entries`.
    ///
    /// One results slot is created per entry in document order, and one chip
    /// per selected entry, each chip's close control carrying its slot index.
    /// The select carries the `chosen-select` class.
    #[must_use]
    pub fn chosen(name: impl Into<String>, entries: impl IntoIterator<Item = OptionEntry>) -> Self {
        Self::build(name.into(), true, entries)
    }

    /// Attach a single-value widget. It renders no chips and is never
    /// reordered.
    #[must_use]
    pub fn single(name: impl Into<String>, entries: impl IntoIterator<Item = OptionEntry>) -> Self {
        Self::build(name.into(), false, entries)
    }

    fn build(name: String, multiple: bool, entries: impl IntoIterator<Item = OptionEntry>) -> Self {
        let mut options = OptionList::new();
        let mut results = ResultsData::new();
        let mut slot_entries = Vec::new();
        let mut chips = ChipList::new();
        for entry in entries {
            let slot = results.push(ResultEntry::new(
                entry.value.clone(),
                entry.label.clone(),
                entry.selected,
            ));
            if multiple && entry.selected {
                chips.push_chip(entry.label.clone(), Some(slot.to_string()));
            }
            slot_entries.push(options.push(entry));
        }
        Self {
            name,
            multiple,
            classes: vec![CHOSEN_CLASS.to_owned()],
            attributes: BTreeMap::new(),
            options,
            results,
            slot_entries,
            chips,
        }
    }

    /// Form field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the widget is in multi-value mode.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Class list of the select element.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Add a class to the select element; duplicates are ignored.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Remove a class from the select element.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|own| own != class);
        self.classes.len() != before
    }

    /// Builder form of [`Self::add_class`].
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Set an attribute on the select element.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder form of [`Self::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Attribute on the select element.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The select's entries in document order.
    #[must_use]
    pub fn options(&self) -> &OptionList {
        &self.options
    }

    /// The rendered chip row.
    #[must_use]
    pub fn chips(&self) -> &ChipList {
        &self.chips
    }

    /// Mutable chip row, for the drag mechanism.
    pub fn chips_mut(&mut self) -> &mut ChipList {
        &mut self.chips
    }

    /// The widget's results array.
    #[must_use]
    pub fn results(&self) -> &ResultsData {
        &self.results
    }

    /// Mutable results array, for simulating widget bookkeeping.
    pub fn results_mut(&mut self) -> &mut ResultsData {
        &mut self.results
    }

    /// Resolver over this widget's results array.
    #[must_use]
    pub fn resolver(&self) -> IndexedResolver<'_> {
        IndexedResolver::new(&self.results)
    }

    /// Chip values in visual order.
    #[must_use]
    pub fn visual_values(&self) -> Vec<Value> {
        self.resolver().list_visual_values(&self.chips)
    }

    /// Selected values in document order (what a submission sends).
    #[must_use]
    pub fn selected_values(&self) -> Vec<Value> {
        self.options.selected_values()
    }

    /// Select the first unselected entry with `value`, appending its chip.
    ///
    /// Returns the new chip, or `None` if nothing was selectable.
    pub fn select(&mut self, value: &str) -> Option<ChipId> {
        let slot = self.slot_entries.iter().enumerate().find_map(|(slot, id)| {
            let entry = self.options.get(*id)?;
            (entry.value == *value && !entry.selected).then_some(slot)
        })?;
        let entry_id = self.slot_entries[slot];
        self.options.set_selected(entry_id, true);
        let label = match self.results.get_mut(slot) {
            Some(result) => {
                result.selected = true;
                result.text.clone()
            }
            None => value.to_owned(),
        };
        if !self.multiple {
            return None;
        }
        Some(self.chips.push_chip(label, Some(slot.to_string())))
    }

    /// Deselect through a chip's close control, removing the chip.
    ///
    /// Returns the value that was deselected.
    pub fn deselect_chip(&mut self, chip: ChipId) -> Option<Value> {
        let removed = self.chips.remove_chip(chip)?;
        let slot = sortsel_core::parse_option_index(removed.close_index()?)?;
        let result = self.results.get_mut(slot)?;
        result.selected = false;
        let value = result.value.clone();
        if let Some(&entry_id) = self.slot_entries.get(slot) {
            self.options.set_selected(entry_id, false);
        }
        Some(value)
    }

    /// Deselect the first chip showing `value`.
    pub fn deselect(&mut self, value: &str) -> Option<Value> {
        let resolver = self.resolver();
        let chip = self
            .chips
            .chips()
            .iter()
            .find(|chip| resolver.resolve_value(chip).is_some_and(|v| v == *value))
            .map(|chip| chip.id())?;
        self.deselect_chip(chip)
    }

    /// Run the restore pass against this widget's chips.
    pub fn restore(&mut self, saved: &SavedOrder) -> RestoreReport {
        let resolver = IndexedResolver::new(&self.results);
        restore_order(&mut self.chips, &resolver, saved)
    }

    /// Run the sync pass, writing chip order into the select's entries.
    pub fn sync(&mut self) -> SyncReport {
        let resolver = IndexedResolver::new(&self.results);
        synchronize(&mut self.options, &self.chips, &resolver)
    }
}

impl SelectorTarget for Multiselect {
    fn tag(&self) -> &str {
        "select"
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|own| own == class)
    }

    fn has_attribute(&self, name: &str) -> bool {
        match name {
            "multiple" => self.multiple,
            "name" => true,
            _ => self.attributes.contains_key(name),
        }
    }
}

/// One control inside a form, in document order.
#[derive(Debug, Clone)]
pub enum FormField {
    Select(Multiselect),
    Hidden { name: String, value: String },
}

/// A form and its controls.
#[derive(Debug, Clone)]
pub struct Form {
    id: String,
    fields: Vec<FormField>,
}

impl Form {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Append a select control.
    #[must_use]
    pub fn with_select(mut self, select: Multiselect) -> Self {
        self.push_select(select);
        self
    }

    /// Append a select control to an existing form.
    pub fn push_select(&mut self, select: Multiselect) {
        self.fields.push(FormField::Select(select));
    }

    /// Append a hidden input.
    #[must_use]
    pub fn with_hidden(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Hidden {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Select controls in document order.
    pub fn selects(&self) -> impl Iterator<Item = &Multiselect> + '_ {
        self.fields.iter().filter_map(|field| match field {
            FormField::Select(select) => Some(select),
            FormField::Hidden { .. } => None,
        })
    }

    /// Mutable select controls in document order.
    pub fn selects_mut(&mut self) -> impl Iterator<Item = &mut Multiselect> + '_ {
        self.fields.iter_mut().filter_map(|field| match field {
            FormField::Select(select) => Some(select),
            FormField::Hidden { .. } => None,
        })
    }

    /// Select control by field name.
    #[must_use]
    pub fn select(&self, name: &str) -> Option<&Multiselect> {
        self.selects().find(|select| select.name() == name)
    }

    /// Mutable select control by field name.
    pub fn select_mut(&mut self, name: &str) -> Option<&mut Multiselect> {
        self.selects_mut().find(|select| select.name() == name)
    }

    /// Name/value pairs a browser would submit, in document order.
    ///
    /// A multi-value select contributes one pair per selected entry, in the
    /// entries' document order.
    #[must_use]
    pub fn serialize(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for field in &self.fields {
            match field {
                FormField::Hidden { name, value } => pairs.push((name.clone(), value.clone())),
                FormField::Select(select) => {
                    for (_, entry) in select.options().entries() {
                        if entry.selected {
                            pairs.push((select.name().to_owned(), entry.value.to_string()));
                        }
                    }
                }
            }
        }
        pairs
    }
}

/// The page hosting one or more forms.
#[derive(Debug, Clone)]
pub struct Page {
    pub forms: Vec<Form>,
    /// Whether the drag mechanism is loaded.
    pub drag_available: bool,
}

impl Page {
    #[must_use]
    pub fn new(drag_available: bool) -> Self {
        Self {
            forms: Vec::new(),
            drag_available,
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }

    #[must_use]
    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|form| form.id() == id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|form| form.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{CHOSEN_CLASS, Form, Multiselect};
    use crate::selector::Selector;
    use pretty_assertions::assert_eq;
    use crate::selector::SelectorTarget;
use sortsel_core::{OptionEntry, Value};

    fn entries(rows: &[(&str, bool)]) -> Vec<OptionEntry> {
        rows.iter()
            .map(|(value, selected)| OptionEntry::new(*value, value.to_uppercase(), *selected))
            .collect()
    }

    fn values(list: &[&str]) -> Vec<Value> {
        list.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn chosen_renders_one_chip_per_selected_entry() {
        let select = Multiselect::chosen("tags", entries(&[("a", true), ("b", false), ("c", true)]));
        assert_eq!(select.chips().len(), 2);
        assert_eq!(select.visual_values(), values(&["a", "c"]));
        let close: Vec<_> = select.chips().chips().iter().map(|c| c.close_index()).collect();
        assert_eq!(close, vec![Some("0"), Some("2")]);
    }

    #[test]
    fn single_select_has_no_chips() {
        let select = Multiselect::single("one", entries(&[("a", true), ("b", false)]));
        assert!(!select.is_multiple());
        assert!(select.chips().is_empty());
        assert_eq!(select.selected_values(), values(&["a"]));
    }

    #[test]
    fn select_and_deselect_keep_chips_and_entries_in_step() {
        let mut select = Multiselect::chosen("tags", entries(&[("a", true), ("b", false), ("c", false)]));
        assert!(select.select("c").is_some());
        assert!(select.select("c").is_none());
        assert_eq!(select.visual_values(), values(&["a", "c"]));
        assert_eq!(select.selected_values(), values(&["a", "c"]));

        assert_eq!(select.deselect("a"), Some(Value::from("a")));
        assert_eq!(select.visual_values(), values(&["c"]));
        assert_eq!(select.selected_values(), values(&["c"]));
        assert_eq!(select.deselect("zz"), None);
    }

    #[test]
    fn serialize_follows_document_order() {
        let form = Form::new("f")
            .with_hidden("csrf", "t0k")
            .with_select(Multiselect::chosen(
                "tags",
                entries(&[("a", true), ("b", false), ("c", true)]),
            ))
            .with_hidden("after", "1");
        assert_eq!(
            form.serialize(),
            vec![
                ("csrf".to_owned(), "t0k".to_owned()),
                ("tags".to_owned(), "a".to_owned()),
                ("tags".to_owned(), "c".to_owned()),
                ("after".to_owned(), "1".to_owned()),
            ]
        );
    }

    #[test]
    fn attributes_round_trip() {
        let select = Multiselect::chosen("tags", entries(&[]))
            .with_attribute("data-values-order", r#"["a"]"#);
        assert_eq!(select.attribute("data-values-order"), Some(r#"["a"]"#));
        assert_eq!(select.attribute("missing"), None);
    }

    #[test]
    fn select_matches_stock_selector_by_class_and_multiple() {
        let selector = Selector::parse("select.chosen-select[multiple]").expect("valid selector");
        let multi = Multiselect::chosen("tags", entries(&[("a", true)]));
        let single = Multiselect::single("one", entries(&[("a", true)]));
        assert_eq!(multi.classes(), [CHOSEN_CLASS.to_owned()]);
        assert!(selector.matches(&multi));
        assert!(!selector.matches(&single));

        let mut plain = multi.clone().with_class("wide").with_attribute("data-kind", "x");
        assert!(selector.matches(&plain));
        assert!(Selector::parse("select.wide[data-kind]").expect("valid").matches(&plain));
        assert!(plain.remove_class(CHOSEN_CLASS));
        assert!(!plain.remove_class(CHOSEN_CLASS));
        assert!(!selector.matches(&plain));
    }
}
