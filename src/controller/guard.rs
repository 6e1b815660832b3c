use crate::domain::EntityId;
use std::collections::HashSet;

/// Tracks mutations that have been sent but not yet settled.
///
/// At most one outstanding mutation per entity id, and at most one
/// outstanding creation (which has no id yet).
#[derive(Debug, Default)]
pub struct InFlight {
    ids: HashSet<EntityId>,
    creating: bool,
}

impl InFlight {
    /// Claim `target` (None = creation). False if it is already busy.
    pub fn try_begin(&mut self, target: Option<EntityId>) -> bool {
        match target {
            Some(id) => self.ids.insert(id),
            None if self.creating => false,
            None => {
                self.creating = true;
                true
            }
        }
    }

    pub fn finish(&mut self, target: Option<EntityId>) {
        match target {
            Some(id) => {
                self.ids.remove(&id);
            }
            None => self.creating = false,
        }
    }

    pub fn is_busy(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }
}
