// ../tests/tests.rs
use basalt_mana::tables::{capacity_for_level, turn_pool_for_level};
use basalt_mana::*;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

#[test]
fn test_max_capacity_matches_tables() {
    for level in MIN_LEVEL..=MAX_LEVEL {
        for blessing in Blessing::iter() {
            for extra in [0, 7, 25] {
                let expected =
                    capacity_for_level(level).expect("Expected a supported level")
                        * blessing.multiplier()
                        + extra;
                assert_eq!(
                    recompute_max_capacity(level, blessing, extra).expect("Expected a capacity"),
                    expected
                );
            }
        }
    }
}

#[test]
fn test_unsupported_level_is_clamped() {
    assert!(matches!(
        recompute_max_capacity(0, Blessing::None, 0),
        Err(ManaError::UnsupportedLevel(0))
    ));
    assert!(matches!(
        turn_pool_for_level(MAX_LEVEL + 1),
        Err(ManaError::UnsupportedLevel(11))
    ));

    let ledger = ManaLedger::new(42, Blessing::None, 0);
    assert_eq!(ledger.level(), MAX_LEVEL);
    assert_eq!(ledger.max_mana(), 100);
}

#[test]
fn test_blessing_tags() {
    assert_eq!(Blessing::Gluttony.to_string(), "gluttony");
    assert_eq!("wisdom".parse::<Blessing>().expect("Expected a blessing"), Blessing::Wisdom);
    assert!(Blessing::Gluttony.is_uncapped());
    assert!(!Blessing::Wisdom.is_uncapped());
}

#[test]
fn test_spend_and_clamped_add() {
    // Step 1: Level 3 without blessing gives a pool of 30
    let mut ledger = ManaLedger::new(3, Blessing::None, 0);
    assert_eq!(ledger.max_mana(), 30);
    assert_eq!(ledger.current_mana(), 30);

    // Step 2: Spend a 12 mana spell
    assert_eq!(ledger.spend(12).expect("Expected enough mana"), 18);

    // Step 3: Adding more than the pool holds stops at the maximum
    assert_eq!(ledger.adjust(50, Direction::Add).expect("Expected an add"), 30);
}

#[test]
fn test_gluttony_lifts_the_upper_bound() {
    let mut ledger = ManaLedger::new(3, Blessing::None, 0);
    assert_eq!(ledger.set_extra_mana_max(10), 40);
    assert_eq!(ledger.current_mana(), 30);

    // Switching blessing never raises the balance
    assert_eq!(ledger.set_blessing(Blessing::Gluttony), 40);
    assert_eq!(ledger.current_mana(), 30);
    assert_eq!(ledger.current_cap(), None);

    assert_eq!(ledger.adjust(1000, Direction::Add).expect("Expected an add"), 1030);

    // Losing the blessing pulls the balance back under the maximum
    ledger.set_blessing(Blessing::None);
    assert_eq!(ledger.current_mana(), 40);
    assert_eq!(ledger.current_cap(), Some(40));
}

#[test]
fn test_overdraw_is_a_no_op() {
    let mut ledger = ManaLedger::new(1, Blessing::None, 0);
    assert_eq!(ledger.current_mana(), 10);

    let result = ledger.adjust(11, Direction::Remove);
    assert!(matches!(
        result,
        Err(ManaError::Overdraw {
            requested: 11,
            available: 10
        })
    ));
    assert_eq!(ledger.current_mana(), 10);

    assert_eq!(ledger.adjust(10, Direction::Remove).expect("Expected a removal"), 0);
}

#[test]
fn test_spend_requires_enough_mana() {
    let mut ledger = ManaLedger::new(2, Blessing::None, 0);
    assert!(!ledger.can_spend(21));
    assert!(matches!(
        ledger.spend(21),
        Err(ManaError::InsufficientMana {
            cost: 21,
            available: 20
        })
    ));
    assert_eq!(ledger.current_mana(), 20);
    assert_eq!(ledger.spend(20).expect("Expected enough mana"), 0);
}

#[test]
fn test_turn_refill_and_reset() {
    let mut ledger = ManaLedger::new(3, Blessing::None, 0);
    ledger.spend(12).expect("Expected enough mana");

    assert_eq!(ledger.refill_for_turn(), 22);
    assert_eq!(ledger.refill_for_turn(), 26);
    assert_eq!(ledger.refill_for_turn(), 30);
    assert_eq!(ledger.refill_for_turn(), 30);

    ledger.spend(25).expect("Expected enough mana");
    assert_eq!(ledger.reset_to_full(), 30);

    let mut gluttonous = ManaLedger::restore(3, Blessing::Gluttony, 0, 30);
    assert_eq!(gluttonous.refill_for_turn(), 34);
}

#[test]
fn test_raw_current_values_are_sanitized() {
    let mut ledger = ManaLedger::new(3, Blessing::None, 0);
    assert_eq!(ledger.set_current(Some(-5)), 0);
    assert_eq!(ledger.set_current(None), 0);
    assert_eq!(ledger.set_current(Some(500)), 30);
    assert_eq!(ledger.set_current(Some(12)), 12);

    ledger.set_blessing(Blessing::Gluttony);
    assert_eq!(ledger.set_current(Some(500)), 500);
}

#[test]
fn test_restore_reclamps_balance() {
    let ledger = ManaLedger::restore(2, Blessing::None, 0, 99);
    assert_eq!(ledger.max_mana(), 20);
    assert_eq!(ledger.current_mana(), 20);

    let ledger = ManaLedger::restore(2, Blessing::Wisdom, 5, 99);
    assert_eq!(ledger.max_mana(), 45);
    assert_eq!(ledger.current_mana(), 45);
}

#[test]
fn test_spell_cost() {
    assert_eq!(compute_cost(1, 0, 0), 0);
    assert_eq!(compute_cost(2, 3, 12), 9);
    assert_eq!(compute_cost(1, 5, 5), 6);
    // Zero patterns count as one
    assert_eq!(compute_cost(0, 5, 0), 5);

    let spec = SpellSpec::new(3, 4, 1);
    assert_eq!(spec.cost_with(&StandardCost), 13);
    let flat = |patterns: u32, base: u32, range: u32| patterns + base + range;
    assert_eq!(spec.cost_with(&flat), 8);
}

#[test]
fn test_changed_fields_reports_only_differences() {
    let old: BTreeMap<&str, Option<i64>> =
        BTreeMap::from([("level", Some(3)), ("extra", None), ("current", Some(10))]);

    assert!(changed_fields(&old, &old.clone()).is_empty());

    let mut new = old.clone();
    new.insert("current", Some(4));
    new.insert("added", None);
    let changes = changed_fields(&old, &new);
    assert_eq!(
        changes,
        BTreeMap::from([("added", None), ("current", Some(4))])
    );

    new.insert("extra", Some(0));
    assert_eq!(changed_fields(&old, &new).get("extra"), Some(&Some(0)));
}

#[test]
fn test_form_diff_between_records() {
    let before = MaxManaForm::default();
    let after = MaxManaForm {
        level: 2,
        max_mana: 20,
        ..before
    };

    let changes = changed_fields(&before.to_values(), &after.to_values());
    assert_eq!(changes.len(), 2);
    assert_eq!(changes.get(&Field::Level), Some(&FieldValue::Number(Some(2))));
    assert_eq!(changes.get(&Field::MaxMana), Some(&FieldValue::Number(Some(20))));
}

#[test]
fn test_capacity_change_only_lowers_balance() {
    let mut ledger = ManaLedger::new(3, Blessing::None, 0);
    ledger.apply_capacity_change(12);
    assert_eq!(ledger.max_mana(), 12);
    assert_eq!(ledger.current_mana(), 12);

    ledger.apply_capacity_change(50);
    assert_eq!(ledger.current_mana(), 12);
    assert_eq!(ledger.recompute_max(), 30);

    // Uncapped pools keep their balance
    let mut ledger = ManaLedger::new(3, Blessing::Gluttony, 0);
    ledger.adjust(100, Direction::Add).expect("Expected an add");
    ledger.apply_capacity_change(20);
    assert_eq!(ledger.current_mana(), 130);

    ledger.set_blessing(Blessing::None);
    assert_eq!(ledger.max_mana(), 30);
    assert_eq!(ledger.current_mana(), 30);
}
