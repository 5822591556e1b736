use std::collections::HashMap;

use engine::{
    BetEntry, BetLedger, DigitWidth, EditRequest, EngineError, ExternalId, GroupId,
    ReconcileError, ReconcileRoute, SequentialIds, classify, expand, reconcile,
};

fn expand_group(
    text: &str,
    amount: &str,
    width: DigitWidth,
    ids: &SequentialIds,
) -> Vec<BetEntry> {
    let atom = classify(text, width).unwrap();
    expand(&atom, amount, ids).unwrap()
}

/// Simulates records coming back from the slip store: persisted ids, no
/// stored pattern.
fn as_legacy(entries: Vec<BetEntry>) -> Vec<BetEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| BetEntry {
            external_id: Some(ExternalId(format!("slip-{i}"))),
            pattern: None,
            ..entry
        })
        .collect()
}

fn primaries_per_group(ledger: &BetLedger) -> HashMap<GroupId, usize> {
    let mut counts = HashMap::new();
    for entry in ledger.entries() {
        *counts.entry(entry.group_id).or_insert(0) += usize::from(entry.is_primary);
    }
    counts
}

fn edit(target: &BetEntry, number: &str, amount: u32) -> EditRequest {
    EditRequest {
        target: target.id,
        new_number: number.to_string(),
        new_amount: amount,
    }
}

#[test]
fn inclusion_amount_edit_regenerates_every_member() {
    let ids = SequentialIds::new();
    let members = as_legacy(expand_group("5p", "100", DigitWidth::Two, &ids));
    assert!(members.iter().all(|m| m.summary == "5ပါ"));

    let same_number = members[4].number.to_string();
    let diff = reconcile(&edit(&members[4], &same_number, 250), &members, false, &ids).unwrap();

    assert_eq!(diff.route, ReconcileRoute::Regenerated);
    assert_eq!(diff.keep.len(), members.len());
    assert!(diff.create.is_empty());
    assert!(diff.delete.is_empty());
    for (old, new) in members.iter().zip(&diff.keep) {
        assert_eq!(new.number, old.number);
        assert_eq!(new.amount, 250);
        assert_eq!(new.id, old.id);
        assert_eq!(new.external_id, old.external_id);
        assert_eq!(new.group_id, old.group_id);
    }
}

#[test]
fn single_entry_amount_edit_gets_new_group() {
    let ids = SequentialIds::new();
    let members = expand_group("42", "100", DigitWidth::Two, &ids);

    let diff = reconcile(&edit(&members[0], "42", 300), &members, false, &ids).unwrap();

    assert_eq!(diff.route, ReconcileRoute::SingleItem);
    assert_eq!(diff.keep.len(), 1);
    assert_eq!(diff.keep[0].amount, 300);
    assert_eq!(diff.keep[0].id, members[0].id);
    assert_ne!(diff.keep[0].group_id, members[0].group_id);
}

#[test]
fn locked_three_digit_reverse_group_is_refused() {
    let ids = SequentialIds::new();
    let mut ledger = BetLedger::new();
    ledger.add("123r", "100", DigitWidth::Three, &ids).unwrap();
    let sibling = ledger.entries()[3].id;
    ledger.mark_finalized(sibling);
    let before = ledger.clone();
    let target = ledger.entries()[0].clone();

    let err = ledger.edit(&edit(&target, "123", 500), &ids).unwrap_err();
    assert_eq!(err, EngineError::Reconcile(ReconcileError::LockedSlip));
    assert_eq!(ledger, before);

    let err = ledger.edit(&edit(&target, "456", 100), &ids).unwrap_err();
    assert_eq!(err, EngineError::Reconcile(ReconcileError::LockedSlip));
}

#[test]
fn legacy_wildcard_number_edit_reuses_persisted_ids() {
    let ids = SequentialIds::new();
    let members = as_legacy(expand_group("5*", "100", DigitWidth::Two, &ids));

    let diff = reconcile(&edit(&members[2], "72", 100), &members, false, &ids).unwrap();

    assert_eq!(diff.route, ReconcileRoute::Regenerated);
    let numbers: Vec<String> = diff.keep.iter().map(|e| e.number.to_string()).collect();
    assert_eq!(numbers[0], "70");
    assert_eq!(numbers[9], "79");
    assert!(diff.keep.iter().all(|e| e.summary == "7ထိပ်"));
    assert_eq!(
        diff.keep.iter().map(|e| e.external_id.clone()).collect::<Vec<_>>(),
        members.iter().map(|e| e.external_id.clone()).collect::<Vec<_>>()
    );
    assert!(diff.keep.iter().all(|e| e.pattern.is_some()));
}

#[test]
fn legacy_unknown_summary_falls_back_to_single_replace() {
    let ids = SequentialIds::new();
    let members = as_legacy(expand_group("nk", "100", DigitWidth::Two, &ids));

    let diff = reconcile(&edit(&members[0], "08", 100), &members, false, &ids).unwrap();

    assert_eq!(diff.route, ReconcileRoute::Replaced);
    assert_eq!(diff.keep.len(), 2);
    assert_eq!(diff.keep[0].summary, "08");
    assert_eq!(diff.keep[0].external_id, members[0].external_id);
    assert_eq!(diff.keep[1].external_id, members[1].external_id);
    assert!(diff.keep[1].is_primary);
}

#[test]
fn break_number_edit_regenerates_new_sum() {
    let ids = SequentialIds::new();
    let members = expand_group("3b", "100", DigitWidth::Two, &ids);
    assert_eq!(members[0].number.to_string(), "03");

    let diff = reconcile(&edit(&members[0], "04", 60), &members, false, &ids).unwrap();

    assert_eq!(diff.route, ReconcileRoute::Regenerated);
    assert!(diff.keep.iter().all(|e| e.number.digit_sum() % 10 == 4));
    assert_eq!(diff.keep.len(), members.len());
}

#[test]
fn lock_survives_regeneration_of_a_finalized_group() {
    let ids = SequentialIds::new();
    let mut ledger = BetLedger::new();
    ledger.add("1*3", "100", DigitWidth::Three, &ids).unwrap();
    ledger.add("456r", "100", DigitWidth::Three, &ids).unwrap();
    let finalized = ledger.entries()[1].clone();
    assert_eq!(finalized.number.to_string(), "113");
    ledger.mark_finalized(finalized.id);

    let diff = ledger.edit(&edit(&finalized, "114", 100), &ids).unwrap();
    assert_eq!(diff.route, ReconcileRoute::Regenerated);
    assert!(ledger.is_locked());
    assert!(ledger.entry(finalized.id).is_some_and(|e| e.finalized));

    let reverse = ledger.entries()[10].clone();
    assert_eq!(reverse.summary, "456R");
    let err = ledger.edit(&edit(&reverse, "457", 100), &ids).unwrap_err();
    assert_eq!(err, EngineError::Reconcile(ReconcileError::LockedSlip));
}

#[test]
fn every_group_keeps_exactly_one_primary() {
    let ids = SequentialIds::new();
    let mut ledger = BetLedger::new();
    ledger.add("nk", "100", DigitWidth::Two, &ids).unwrap();
    ledger.add("*5", "100", DigitWidth::Two, &ids).unwrap();

    let nakhat_primary = ledger.entries()[0].clone();
    let diff = ledger.edit(&edit(&nakhat_primary, "07", 300), &ids).unwrap();
    assert_eq!(diff.route, ReconcileRoute::SingleItem);

    let wildcard_primary = ledger.entries()[10].clone();
    assert_eq!(wildcard_primary.number.to_string(), "05");
    let diff = ledger.edit(&edit(&wildcard_primary, "16", 100), &ids).unwrap();
    assert_eq!(diff.route, ReconcileRoute::Replaced);

    let counts = primaries_per_group(&ledger);
    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|count| *count == 1), "{counts:?}");
    assert_eq!(ledger.group(nakhat_primary.group_id).len(), 9);
    assert_eq!(ledger.group(wildcard_primary.group_id).len(), 9);
}

#[test]
fn regenerated_group_always_holds_the_edited_number() {
    let ids = SequentialIds::new();
    let mut ledger = BetLedger::new();
    ledger.add("123rr", "100", DigitWidth::Three, &ids).unwrap();
    let target = ledger.entries()[0].clone();

    let diff = ledger.edit(&edit(&target, "122", 100), &ids).unwrap();
    assert_eq!(diff.route, ReconcileRoute::Replaced);
    let edited = ledger.entry(target.id).unwrap();
    assert_eq!(edited.number.to_string(), "122");

    let target = ledger.entries()[1].clone();
    let diff = ledger.edit(&edit(&target, "214", 100), &ids).unwrap();
    assert_eq!(diff.route, ReconcileRoute::Regenerated);
    assert!(diff.keep.iter().any(|e| e.number.to_string() == "214"));
}
