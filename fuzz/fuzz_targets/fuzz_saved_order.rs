#![no_main]

use libfuzzer_sys::fuzz_target;
use sortsel_core::{
    ChipList, IndexedResolver, ResultEntry, ResultsData, SavedOrder, restore_order,
};

fn labels(chips: &ChipList) -> Vec<String> {
    chips.chips().iter().map(|c| c.label().to_owned()).collect()
}

fuzz_target!(|data: &[u8]| {
    // First byte picks the chip count; the rest is attribute text.
    let Some((&count, payload)) = data.split_first() else {
        return;
    };
    let Ok(raw) = std::str::from_utf8(payload) else {
        return;
    };
    let Ok(saved) = SavedOrder::parse_attribute(raw) else {
        return;
    };

    let count = usize::from(count % 16);
    let mut results = ResultsData::new();
    let mut chips = ChipList::new();
    for i in 0..count {
        // Values repeat every five chips; labels stay unique.
        let slot = results.push(ResultEntry::new((i % 5).to_string(), i.to_string(), true));
        chips.push_chip(i.to_string(), Some(slot.to_string()));
    }
    let mut before = labels(&chips);

    let resolver = IndexedResolver::new(&results);
    restore_order(&mut chips, &resolver, &saved);
    let once = labels(&chips);
    restore_order(&mut chips, &resolver, &saved);
    assert_eq!(labels(&chips), once, "restore not idempotent");

    let mut after = once;
    before.sort();
    after.sort();
    assert_eq!(before, after, "restore changed membership");
    assert_eq!(chips.anchor_index(), count, "anchor not last");
});
