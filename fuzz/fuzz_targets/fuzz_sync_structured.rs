#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sortsel_core::{OptionEntry, OptionList, Value, sync_order};

#[derive(Debug, Arbitrary)]
struct Input {
    /// (value id, selected) per entry; ids are folded small to force duplicates.
    entries: Vec<(u8, bool)>,
    visual: Vec<u8>,
}

fn snapshot(list: &OptionList) -> Vec<(String, bool)> {
    let mut items: Vec<(String, bool)> = list
        .entries()
        .map(|(_, entry)| (entry.value.to_string(), entry.selected))
        .collect();
    items.sort();
    items
}

fuzz_target!(|input: Input| {
    let mut options = OptionList::new();
    for (id, selected) in input.entries.iter().take(64) {
        let value = format!("v{}", id % 8);
        options.push(OptionEntry::new(value.as_str(), value.as_str(), *selected));
    }
    let visual: Vec<Value> = input
        .visual
        .iter()
        .take(64)
        .map(|id| Value::new(format!("v{}", id % 8)))
        .collect();

    let before = snapshot(&options);
    let report = sync_order(&mut options, &visual);
    assert_eq!(snapshot(&options), before, "sync changed membership or selection");
    assert_eq!(report.requested, visual.len());
    assert_eq!(report.moved + report.missing, visual.len());
});
