// Grouping Engine - Player-built triplets of equal dice
//
// Selecting a grouped die splits it out of its group (dissolving groups that
// fall below the minimum size); selecting an ungrouped die tries to form a new
// group with the two lowest-indexed free dice of the same value. Every
// selection also sends the die back to its rest position.
//
// Groups are a personal annotation: nothing here is ever synchronized.

use super::dice::DiceTable;
use std::collections::BTreeSet;
use thiserror::Error;

/// Smallest group that is kept
pub const MIN_GROUP_SIZE: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Die index {index} out of range (table has {len} dice)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Die indices sharing one value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    members: BTreeSet<usize>,
}

impl Group {
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.members.iter().copied().collect()
    }
}

/// Result of one selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Die left its group; the group survives with these members
    Split { remaining: Vec<usize> },
    /// Die left its group, which fell below the minimum and released these dice
    Dissolved { released: Vec<usize> },
    /// New group formed
    Formed { members: Vec<usize> },
    /// Not enough free dice share the value
    NoMatch,
}

/// Tracks which dice are grouped together
#[derive(Clone, Debug, Default)]
pub struct GroupingEngine {
    groups: Vec<Group>,
}

impl GroupingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group containing a die, if any
    pub fn group_of(&self, index: usize) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(index))
    }

    /// Handle a player selecting die `index`
    pub fn select(
        &mut self,
        index: usize,
        dice: &mut DiceTable,
    ) -> Result<SelectionOutcome, GroupingError> {
        if index >= dice.len() {
            return Err(GroupingError::IndexOutOfRange {
                index,
                len: dice.len(),
            });
        }

        let outcome = match self.groups.iter().position(|g| g.contains(index)) {
            Some(pos) => self.split(pos, index),
            None => self.form(index, dice),
        };

        dice.reset_position(index);
        Ok(outcome)
    }

    fn split(&mut self, pos: usize, index: usize) -> SelectionOutcome {
        self.groups[pos].members.remove(&index);
        if self.groups[pos].len() >= MIN_GROUP_SIZE {
            return SelectionOutcome::Split {
                remaining: self.groups[pos].to_vec(),
            };
        }
        let dissolved = self.groups.remove(pos);
        SelectionOutcome::Dissolved {
            released: dissolved.to_vec(),
        }
    }

    fn form(&mut self, index: usize, dice: &DiceTable) -> SelectionOutcome {
        // Value 0 marks a die that has not landed yet.
        let target = match dice.get(index) {
            Some(d) if d.value != 0 => d.value,
            _ => return SelectionOutcome::NoMatch,
        };

        // Ascending scan keeps the tie-break identical on every client.
        let partners: Vec<usize> = dice
            .dice()
            .iter()
            .filter(|d| d.index != index && d.value == target)
            .filter(|d| self.group_of(d.index).is_none())
            .map(|d| d.index)
            .take(MIN_GROUP_SIZE - 1)
            .collect();

        if partners.len() < MIN_GROUP_SIZE - 1 {
            return SelectionOutcome::NoMatch;
        }

        let mut members: BTreeSet<usize> = partners.into_iter().collect();
        members.insert(index);
        let group = Group { members };
        let members = group.to_vec();
        self.groups.push(group);
        SelectionOutcome::Formed { members }
    }

    /// Send every grouped die home and forget all groups. Returns the dice moved.
    pub fn return_all(&mut self, dice: &mut DiceTable) -> Vec<usize> {
        let mut moved: Vec<usize> = self
            .groups
            .drain(..)
            .flat_map(|g| g.members.into_iter())
            .collect();
        moved.sort_unstable();
        for &index in &moved {
            dice.reset_position(index);
        }
        moved
    }

    /// Forget all groups without moving any die
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
