// Grouping Tests
// Triplet formation, splitting, dissolution and bulk return

use dicemesh::game::{AssignedPositions, DiceTable, GroupingEngine, SelectionOutcome};
use dicemesh::protocol::Vec3;

fn table(values: &[u32]) -> DiceTable {
    let positions = AssignedPositions::new(
        (0..values.len())
            .map(|i| Vec3::new(i as f64, 0.0, 0.0))
            .collect(),
    );
    let mut dice = DiceTable::new(positions);
    dice.apply_values(values);
    dice
}

/// Scatter every die somewhere off its rest position
fn scatter(dice: &mut DiceTable) {
    for i in 0..dice.len() {
        dice.set_position(i, Vec3::new(10.0 + i as f64, 5.0, 5.0));
    }
}

fn at_rest(dice: &DiceTable, index: usize) -> bool {
    dice.get(index).unwrap().position == dice.assigned_position(index).unwrap()
}

// ============================================================================
// FORMING
// ============================================================================

#[test]
fn test_select_forms_lowest_index_triplet() {
    let mut dice = table(&[4, 4, 4, 2, 5]);
    let mut engine = GroupingEngine::new();

    let outcome = engine.select(0, &mut dice).unwrap();

    assert_eq!(outcome, SelectionOutcome::Formed { members: vec![0, 1, 2] });
    assert_eq!(engine.groups().len(), 1);
}

#[test]
fn test_select_again_dissolves() {
    let mut dice = table(&[4, 4, 4, 2, 5]);
    let mut engine = GroupingEngine::new();
    engine.select(0, &mut dice).unwrap();

    let outcome = engine.select(0, &mut dice).unwrap();

    assert_eq!(outcome, SelectionOutcome::Dissolved { released: vec![1, 2] });
    assert!(engine.groups().is_empty());
    assert!(engine.group_of(1).is_none());
}

#[test]
fn test_selecting_other_member_dissolves() {
    let mut dice = table(&[4, 4, 4, 2, 5]);
    let mut engine = GroupingEngine::new();
    engine.select(2, &mut dice).unwrap();

    let outcome = engine.select(1, &mut dice).unwrap();

    assert_eq!(outcome, SelectionOutcome::Dissolved { released: vec![0, 2] });
    assert!(engine.groups().is_empty());
}

#[test]
fn test_pairs_never_form_groups() {
    let values = [4, 4, 2, 2, 5];
    for index in 0..4 {
        let mut dice = table(&values);
        scatter(&mut dice);
        let mut engine = GroupingEngine::new();

        let outcome = engine.select(index, &mut dice).unwrap();

        assert_eq!(outcome, SelectionOutcome::NoMatch);
        assert!(engine.groups().is_empty());
        assert!(at_rest(&dice, index), "die {index} should be reset");
    }
}

#[test]
fn test_extra_matches_stay_free() {
    let mut dice = table(&[3, 3, 3, 3, 3, 3, 3]);
    let mut engine = GroupingEngine::new();

    let first = engine.select(4, &mut dice).unwrap();
    assert_eq!(first, SelectionOutcome::Formed { members: vec![0, 1, 4] });
    assert!(engine.group_of(2).is_none());
    assert!(engine.group_of(3).is_none());

    // Remaining free dice form a second, independent group
    let second = engine.select(6, &mut dice).unwrap();
    assert_eq!(second, SelectionOutcome::Formed { members: vec![2, 3, 6] });
    assert_eq!(engine.groups().len(), 2);

    // Only one free 3 is left
    assert_eq!(engine.select(5, &mut dice).unwrap(), SelectionOutcome::NoMatch);
}

#[test]
fn test_grouped_dice_are_not_borrowed() {
    let mut dice = table(&[2, 2, 2, 2, 1]);
    let mut engine = GroupingEngine::new();
    engine.select(0, &mut dice).unwrap();

    // Die 3 is free but its only matches are already grouped
    assert_eq!(engine.select(3, &mut dice).unwrap(), SelectionOutcome::NoMatch);
    assert_eq!(engine.groups().len(), 1);
}

#[test]
fn test_every_member_in_at_most_one_group() {
    let mut dice = table(&[5, 5, 5, 5, 5, 5]);
    let mut engine = GroupingEngine::new();
    for i in 0..6 {
        let _ = engine.select(i, &mut dice).unwrap();
    }
    for i in 0..6 {
        let count = engine.groups().iter().filter(|g| g.contains(i)).count();
        assert!(count <= 1, "die {i} is in {count} groups");
    }
}

#[test]
fn test_selection_always_resets_position() {
    let mut dice = table(&[4, 4, 4, 2, 5]);
    let mut engine = GroupingEngine::new();
    scatter(&mut dice);

    engine.select(0, &mut dice).unwrap();

    assert!(at_rest(&dice, 0));
    // Partners keep their positions; only the selected die is reset
    assert!(!at_rest(&dice, 1));
    assert!(!at_rest(&dice, 2));
}

// ============================================================================
// RETURN ALL
// ============================================================================

#[test]
fn test_return_all_clears_two_groups() {
    let mut dice = table(&[6, 6, 6, 1, 1, 1, 3]);
    let mut engine = GroupingEngine::new();
    engine.select(0, &mut dice).unwrap();
    engine.select(3, &mut dice).unwrap();
    assert_eq!(engine.groups().len(), 2);
    scatter(&mut dice);

    let moved = engine.return_all(&mut dice);

    assert_eq!(moved, vec![0, 1, 2, 3, 4, 5]);
    assert!(engine.groups().is_empty());
    for i in 0..6 {
        assert!(at_rest(&dice, i), "die {i} should be home");
    }
    assert!(!at_rest(&dice, 6));
}

#[test]
fn test_return_all_without_groups_is_noop() {
    let mut dice = table(&[1, 2, 3, 4, 5]);
    let mut engine = GroupingEngine::new();
    scatter(&mut dice);

    assert!(engine.return_all(&mut dice).is_empty());
    assert!(!at_rest(&dice, 0));
}
