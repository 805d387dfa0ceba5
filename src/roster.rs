// Own-tank roster with ordinal slots

use serde::Serialize;

use crate::types::GameState;

/// Number of slots in the roster
pub const ROSTER_CAPACITY: usize = 5;

/// Our tank ids, left-compacted. A tank's slot index decides its role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    slots: [Option<i32>; ROSTER_CAPACITY],
}

impl Roster {
    /// Fills slots from `ids` in order; ids beyond capacity are dropped
    pub fn assign(ids: &[i32]) -> Self {
        let mut slots = [None; ROSTER_CAPACITY];
        for (slot, id) in slots.iter_mut().zip(ids.iter()) {
            *slot = Some(*id);
        }
        Roster { slots }
    }

    /// Drops every id that no longer appears among the live tanks, shifting
    /// survivors left so that they keep their relative order.
    pub fn reconcile(&mut self, state: &GameState) {
        let mut survivors = self
            .ids()
            .filter(|id| state.tank(*id).is_some())
            .collect::<Vec<_>>()
            .into_iter();
        for slot in self.slots.iter_mut() {
            *slot = survivors.next();
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn slots(&self) -> &[Option<i32>; ROSTER_CAPACITY] {
        &self.slots
    }

    pub fn tank_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.ids().any(|own| own == id)
    }
}
