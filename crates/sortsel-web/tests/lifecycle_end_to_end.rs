#![forbid(unsafe_code)]

//! Load → drag → submit flows through the lifecycle hooks.

use pretty_assertions::assert_eq;
use sortsel_core::{OptionEntry, Value};
use sortsel_web::{
    CHOSEN_CLASS, ChipDragOutcome, ChipPressTarget, Form, Multiselect, Page, PointerButton,
    PressedElement, Propagation, RestoreSkip, SortselConfig, SortselRuntime,
};

fn entries(rows: &[(&str, bool)]) -> Vec<OptionEntry> {
    rows.iter()
        .map(|(value, selected)| OptionEntry::new(*value, value.to_uppercase(), *selected))
        .collect()
}

fn values(list: &[&str]) -> Vec<Value> {
    list.iter().copied().map(Value::from).collect()
}

fn pairs(name: &str, list: &[&str]) -> Vec<(String, String)> {
    list.iter()
        .map(|value| (name.to_owned(), (*value).to_owned()))
        .collect()
}

fn x_page(order_attr: Option<&str>) -> Page {
    let mut select = Multiselect::chosen("items", entries(&[("x1", true), ("x2", true), ("x3", true)]));
    if let Some(raw) = order_attr {
        select.set_attribute("data-values-order", raw);
    }
    Page::new(true).with_form(Form::new("main").with_select(select))
}

/// Drag the chip at `from` to slot `to` with a single pointer gesture.
fn drag(runtime: &mut SortselRuntime, page: &mut Page, from: usize, to: usize) -> ChipDragOutcome {
    let select = page
        .form_mut("main")
        .and_then(|form| form.select_mut("items"))
        .expect("select exists");
    let adapter = runtime
        .drag_adapter_mut("main", "items")
        .expect("adapter attached");
    let chip = select.chips().chips()[from].id();
    let path = [
        PressedElement::new("span", &[]),
        PressedElement::new("li", &["search-choice"]),
    ];
    let target = adapter.classify_press(&path, Some(chip));
    assert_eq!(target, ChipPressTarget::Chip(chip));
    let down = adapter.pointer_down(select.chips(), target, 1, PointerButton::Primary);
    assert_eq!(down.propagation, Propagation::Stop);
    adapter.pointer_move(select.chips(), 1, to);
    adapter
        .pointer_up(select.chips_mut(), 1, PointerButton::Primary)
        .log
        .outcome
}

#[test]
fn load_drag_submit_scenario() {
    let mut page = x_page(Some(r#"["x3","x1"]"#));
    let mut runtime = SortselRuntime::default();

    let ready = runtime.on_ready(&mut page);
    assert!(!ready.drag_unavailable);
    assert_eq!(ready.attached.len(), 1);
    assert!(ready.attached[0].restore.is_ok());

    let select = page.form("main").and_then(|f| f.select("items")).expect("select");
    assert_eq!(select.visual_values(), values(&["x3", "x1", "x2"]));
    // Loading only touches the chips; the entries are still in markup order.
    assert_eq!(select.selected_values(), values(&["x1", "x2", "x3"]));

    // [x3, x1, x2] -> drag x2 to the front -> [x2, x3, x1]
    let outcome = drag(&mut runtime, &mut page, 2, 0);
    assert_eq!(outcome, ChipDragOutcome::Dropped { from: 2, to: 0 });

    let form = page.form_mut("main").expect("form");
    assert_eq!(
        form.select("items").expect("select").visual_values(),
        values(&["x2", "x3", "x1"])
    );

    let submitted = runtime.on_before_submit(form);
    assert_eq!(submitted.synced.len(), 1);
    assert_eq!(submitted.synced[0].1.moved, 3);
    assert_eq!(
        form.select("items").expect("select").selected_values(),
        values(&["x2", "x3", "x1"])
    );
    assert_eq!(form.serialize(), pairs("items", &["x2", "x3", "x1"]));
}

#[test]
fn unselected_entries_stay_behind_after_submit() {
    let select = Multiselect::chosen(
        "letters",
        entries(&[("A", true), ("B", true), ("C", true), ("D", false)]),
    )
    .with_attribute("data-values-order", r#"["B","C","A"]"#);
    let mut page = Page::new(true).with_form(Form::new("f").with_select(select));
    let mut runtime = SortselRuntime::default();
    runtime.on_ready(&mut page);

    let form = page.form_mut("f").expect("form");
    runtime.on_before_submit(form);
    let select = form.select("letters").expect("select");
    let order: Vec<(String, bool)> = select
        .options()
        .entries()
        .map(|(_, entry)| (entry.value.to_string(), entry.selected))
        .collect();
    assert_eq!(
        order,
        vec![
            ("B".to_owned(), true),
            ("C".to_owned(), true),
            ("A".to_owned(), true),
            ("D".to_owned(), false),
        ]
    );
    assert_eq!(form.serialize(), pairs("letters", &["B", "C", "A"]));
}

#[test]
fn missing_drag_mechanism_disables_everything() {
    let mut page = x_page(Some(r#"["x3","x1"]"#));
    page.drag_available = false;
    let mut runtime = SortselRuntime::default();

    let ready = runtime.on_ready(&mut page);
    assert!(ready.drag_unavailable);
    assert!(ready.attached.is_empty());
    assert!(!runtime.is_ready());
    assert!(runtime.drag_adapter_mut("main", "items").is_none());

    let form = page.form_mut("main").expect("form");
    assert_eq!(
        form.select("items").expect("select").visual_values(),
        values(&["x1", "x2", "x3"])
    );
    // Simulate a user reordering chips some other way; submit must not sync.
    form.select_mut("items").expect("select").chips_mut().move_chip(0, 2);
    let submitted = runtime.on_before_submit(form);
    assert!(submitted.synced.is_empty());
    assert_eq!(form.serialize(), pairs("items", &["x1", "x2", "x3"]));
}

#[test]
fn absent_or_malformed_order_skips_restore_only() {
    for (attr, expect_skip) in [
        (None, RestoreSkip::NoAttribute),
        (Some("not json"), RestoreSkip::Malformed(String::new())),
        (Some(r#"{"a":1}"#), RestoreSkip::Malformed(String::new())),
    ] {
        let mut page = x_page(attr);
        let mut runtime = SortselRuntime::default();
        let ready = runtime.on_ready(&mut page);
        let restore = ready.attached[0].restore.clone();
        match (&restore, &expect_skip) {
            (Err(RestoreSkip::NoAttribute), RestoreSkip::NoAttribute) => {}
            (Err(RestoreSkip::Malformed(msg)), RestoreSkip::Malformed(_)) => {
                assert!(!msg.is_empty());
            }
            other => panic!("unexpected restore result {other:?}"),
        }
        assert_eq!(runtime.attached_count(), 1);
        let select = page.form("main").and_then(|f| f.select("items")).expect("select");
        assert_eq!(select.visual_values(), values(&["x1", "x2", "x3"]));
    }
}

#[test]
fn single_value_selects_are_left_alone() {
    let single = Multiselect::single("one", entries(&[("a", false), ("b", true)]))
        .with_attribute("data-values-order", r#"["b","a"]"#);
    let multi = Multiselect::chosen("many", entries(&[("p", true), ("q", true)]))
        .with_attribute("data-values-order", r#"["q"]"#);
    let mut page = Page::new(true).with_form(
        Form::new("f")
            .with_hidden("token", "abc")
            .with_select(single)
            .with_select(multi),
    );
    let mut runtime = SortselRuntime::default();
    let ready = runtime.on_ready(&mut page);
    assert_eq!(ready.skipped, 1);
    assert_eq!(ready.attached.len(), 1);
    assert_eq!(ready.attached[0].name, "many");

    let form = page.form_mut("f").expect("form");
    let submitted = runtime.on_before_submit(form);
    assert_eq!(submitted.synced.len(), 1);
    assert_eq!(
        form.serialize(),
        vec![
            ("token".to_owned(), "abc".to_owned()),
            ("one".to_owned(), "b".to_owned()),
            ("many".to_owned(), "q".to_owned()),
            ("many".to_owned(), "p".to_owned()),
        ]
    );
}

#[test]
fn unresolvable_chip_is_dropped_from_sync_only() {
    let mut page = Page::new(true).with_form(Form::new("f").with_select(Multiselect::chosen(
        "letters",
        entries(&[("A", true), ("B", true), ("C", false)]),
    )));
    let mut runtime = SortselRuntime::default();
    runtime.on_ready(&mut page);

    let form = page.form_mut("f").expect("form");
    let select = form.select_mut("letters").expect("select");
    // Widget shows [B, <dangling>, A].
    select.chips_mut().move_chip(1, 0);
    select.chips_mut().push_chip("ghost", Some("42".into()));
    select.chips_mut().move_chip(2, 1);
    assert_eq!(select.visual_values(), values(&["B", "A"]));
    assert_eq!(select.chips().len(), 3);

    let submitted = runtime.on_before_submit(form);
    let (_, report) = &submitted.synced[0];
    assert_eq!(report.unresolved, 1);
    let select = form.select("letters").expect("select");
    assert_eq!(select.selected_values(), values(&["B", "A"]));
    assert_eq!(select.options().len(), 3);
}

#[test]
fn close_control_press_still_removes_the_chip() {
    let mut page = x_page(None);
    let mut runtime = SortselRuntime::default();
    runtime.on_ready(&mut page);

    let form = page.form_mut("main").expect("form");
    let select = form.select_mut("items").expect("select");
    let chip = select.chips().chips()[1].id();
    let adapter = runtime.drag_adapter_mut("main", "items").expect("adapter");
    let path = [
        PressedElement::new("a", &["search-choice-close"]),
        PressedElement::new("li", &["search-choice"]),
    ];
    let target = adapter.classify_press(&path, Some(chip));
    assert_eq!(target, ChipPressTarget::CloseControl(chip));
    let press = adapter.pointer_down(select.chips(), target, 1, PointerButton::Primary);
    assert_eq!(press.propagation, Propagation::PassThrough);
    // The press reached the widget, which deselects through the close control.
    assert_eq!(select.deselect_chip(chip), Some(Value::from("x2")));

    runtime.on_before_submit(form);
    assert_eq!(form.serialize(), pairs("items", &["x1", "x3"]));
}

#[test]
fn custom_order_attribute_from_config() {
    let config = SortselConfig::from_toml_str(r#"order_attribute = "data-order""#).expect("config");
    let select = Multiselect::chosen("items", entries(&[("x1", true), ("x2", true)]))
        .with_attribute("data-order", r#"["x2"]"#)
        .with_attribute("data-values-order", r#"["x1"]"#);
    let mut page = Page::new(true).with_form(Form::new("main").with_select(select));
    let mut runtime = SortselRuntime::new(config);
    runtime.on_ready(&mut page);
    let select = page.form("main").and_then(|f| f.select("items")).expect("select");
    assert_eq!(select.visual_values(), values(&["x2", "x1"]));
}

#[test]
fn ready_twice_is_stable() {
    let mut page = x_page(Some(r#"["x2"]"#));
    let mut runtime = SortselRuntime::default();
    runtime.on_ready(&mut page);
    runtime.on_ready(&mut page);
    assert_eq!(runtime.attached_count(), 1);
    let select = page.form("main").and_then(|f| f.select("items")).expect("select");
    assert_eq!(select.visual_values(), values(&["x2", "x1", "x3"]));
}

#[test]
fn select_added_after_ready_is_not_synced() {
    let mut page = x_page(None);
    let mut runtime = SortselRuntime::default();
    runtime.on_ready(&mut page);

    let form = page.form_mut("main").expect("form");
    let mut late = Multiselect::chosen("late", entries(&[("p", true), ("q", true)]));
    late.chips_mut().move_chip(0, 1);
    form.push_select(late);
    assert_eq!(
        form.select("late").expect("late select").visual_values(),
        values(&["q", "p"])
    );

    let submitted = runtime.on_before_submit(form);
    assert_eq!(submitted.synced.len(), 1);
    assert_eq!(submitted.synced[0].0, "items");
    assert_eq!(submitted.unattached, 1);
    // The late select still submits in document order.
    assert_eq!(
        form.select("late").expect("late select").selected_values(),
        values(&["p", "q"])
    );
}

#[test]
fn select_selector_decides_which_selects_attach() {
    let tagged = Multiselect::chosen("tagged", entries(&[("a", true), ("b", true)]))
        .with_attribute("data-values-order", r#"["b"]"#);
    let mut untagged = Multiselect::chosen("untagged", entries(&[("c", true), ("d", true)]))
        .with_attribute("data-values-order", r#"["d"]"#);
    untagged.remove_class(CHOSEN_CLASS);
    let page_of = |tagged: &Multiselect, untagged: &Multiselect| {
        Page::new(true).with_form(
            Form::new("f")
                .with_select(tagged.clone())
                .with_select(untagged.clone()),
        )
    };

    let mut page = page_of(&tagged, &untagged);
    let mut runtime = SortselRuntime::default();
    let ready = runtime.on_ready(&mut page);
    assert_eq!(ready.attached.len(), 1);
    assert_eq!(ready.attached[0].name, "tagged");
    assert_eq!(ready.skipped, 1);
    let form = page.form("f").expect("form");
    assert_eq!(form.select("tagged").expect("select").visual_values(), values(&["b", "a"]));
    assert_eq!(form.select("untagged").expect("select").visual_values(), values(&["c", "d"]));

    let config = SortselConfig::from_toml_str(r#"select_selector = "select[multiple]""#)
        .expect("config");
    let mut page = page_of(&tagged, &untagged);
    let mut runtime = SortselRuntime::new(config);
    let ready = runtime.on_ready(&mut page);
    assert_eq!(ready.attached.len(), 2);
    assert_eq!(ready.skipped, 0);
    let form = page.form("f").expect("form");
    assert_eq!(form.select("untagged").expect("select").visual_values(), values(&["d", "c"]));
}

#[test]
fn unparsable_select_selector_attaches_nothing() {
    let config = SortselConfig {
        select_selector: "form > select".into(),
        ..SortselConfig::default()
    };
    let mut page = x_page(Some(r#"["x3"]"#));
    let mut runtime = SortselRuntime::new(config);
    let ready = runtime.on_ready(&mut page);
    assert!(ready.attached.is_empty());
    assert_eq!(ready.skipped, 1);
    assert_eq!(runtime.attached_count(), 0);

    let form = page.form_mut("main").expect("form");
    let submitted = runtime.on_before_submit(form);
    assert!(submitted.synced.is_empty());
    assert_eq!(submitted.unattached, 1);
    assert_eq!(form.serialize(), pairs("items", &["x1", "x2", "x3"]));
}
