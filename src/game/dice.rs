// Dice - Per-die state and the rest-position table

use crate::protocol::Vec3;

/// Fixed die index → rest position mapping, read-only once built
#[derive(Clone, Debug, PartialEq)]
pub struct AssignedPositions(Vec<Vec3>);

impl AssignedPositions {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self(positions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.0.get(index).copied()
    }
}

impl Default for AssignedPositions {
    /// Five-die table: a row of two with three above
    fn default() -> Self {
        Self(vec![
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ])
    }
}

/// One die on the table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DieState {
    pub index: usize,
    /// Face value; 0 until the first round settles
    pub value: u32,
    pub position: Vec3,
}

/// All dice of one client, index-aligned with the shared die order
#[derive(Clone, Debug)]
pub struct DiceTable {
    dice: Vec<DieState>,
    positions: AssignedPositions,
}

impl DiceTable {
    /// Every die starts unrolled at its rest position
    pub fn new(positions: AssignedPositions) -> Self {
        let dice = (0..positions.len())
            .map(|index| DieState {
                index,
                value: 0,
                position: positions.get(index).unwrap_or_default(),
            })
            .collect();
        Self { dice, positions }
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DieState> {
        self.dice.get(index)
    }

    pub fn dice(&self) -> &[DieState] {
        &self.dice
    }

    pub fn values(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Overwrite face values. Callers guarantee `values.len() == self.len()`.
    pub fn apply_values(&mut self, values: &[u32]) {
        for (die, &value) in self.dice.iter_mut().zip(values) {
            die.value = value;
        }
    }

    /// Record where the physics engine left a die
    pub fn set_position(&mut self, index: usize, position: Vec3) -> bool {
        match self.dice.get_mut(index) {
            Some(die) => {
                die.position = position;
                true
            }
            None => false,
        }
    }

    /// Move a die back to its assigned rest position
    pub fn reset_position(&mut self, index: usize) -> bool {
        match (self.dice.get_mut(index), self.positions.get(index)) {
            (Some(die), Some(rest)) => {
                die.position = rest;
                true
            }
            _ => false,
        }
    }

    pub fn assigned_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index)
    }
}
