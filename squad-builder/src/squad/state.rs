// Squad state: one slot per formation position, each empty or occupied.

use std::sync::Arc;

use super::formation::{get_formation, Formation};
use super::player::PlayerRecord;
use super::position::Position;
use super::SquadError;

/// Where the squad is in its fill lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadPhase {
    Empty,
    PartiallyFilled,
    Full,
}

/// The lineup being built: the active formation plus its slot occupants.
#[derive(Debug, Clone)]
pub struct SquadState {
    formation: &'static Formation,
    slots: Vec<Option<Arc<PlayerRecord>>>,
}

impl SquadState {
    /// An empty squad laid out in `formation`.
    pub fn new(formation: &'static Formation) -> Self {
        SquadState {
            formation,
            slots: vec![None; formation.slot_count()],
        }
    }

    /// An empty squad in the formation named `name`.
    pub fn with_formation_name(name: &str) -> Result<Self, SquadError> {
        Ok(Self::new(get_formation(name)?))
    }

    pub fn formation(&self) -> &'static Formation {
        self.formation
    }

    /// Switch formation. Always a full reset, even to the same formation.
    pub fn change_formation(&mut self, name: &str) -> Result<(), SquadError> {
        let formation = get_formation(name)?;
        *self = Self::new(formation);
        Ok(())
    }

    /// Empty every slot, keeping the formation.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    fn check_index(&self, slot: usize) -> Result<(), SquadError> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(SquadError::InvalidSlotIndex {
                index: slot,
                slot_count: self.slots.len(),
            })
        }
    }

    /// Put `player` in `slot`, replacing any previous occupant.
    ///
    /// Returns the player that was displaced, if any. Placement is not
    /// restricted by position; the scorer penalises poor fits instead.
    pub fn assign(
        &mut self,
        slot: usize,
        player: Arc<PlayerRecord>,
    ) -> Result<Option<Arc<PlayerRecord>>, SquadError> {
        self.check_index(slot)?;
        Ok(self.slots[slot].replace(player))
    }

    /// Empty a single slot, returning its previous occupant.
    pub fn clear_slot(&mut self, slot: usize) -> Result<Option<Arc<PlayerRecord>>, SquadError> {
        self.check_index(slot)?;
        Ok(self.slots[slot].take())
    }

    /// Current occupant of `slot`.
    pub fn occupant(&self, slot: usize) -> Result<Option<&Arc<PlayerRecord>>, SquadError> {
        self.check_index(slot)?;
        Ok(self.slots[slot].as_ref())
    }

    /// Required position of `slot` in the active formation.
    pub fn required_position(&self, slot: usize) -> Result<Position, SquadError> {
        self.formation.position_at(slot)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot occupants in slot order.
    pub fn slots(&self) -> &[Option<Arc<PlayerRecord>>] {
        &self.slots
    }

    /// Occupied slots as `(slot_index, player)` pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Arc<PlayerRecord>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn phase(&self) -> SquadPhase {
        match self.filled_count() {
            0 => SquadPhase::Empty,
            n if n == self.slots.len() => SquadPhase::Full,
            _ => SquadPhase::PartiallyFilled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, position: Position) -> Arc<PlayerRecord> {
        Arc::new(PlayerRecord {
            name: name.to_string(),
            position,
            rating: 80,
            price: 1_000,
            club: "Club".into(),
            nationality: "Nation".into(),
            league: "League".into(),
            is_hero: false,
            is_icon: false,
        })
    }

    #[test]
    fn new_squad_is_empty_with_formation_slot_count() {
        let squad = SquadState::with_formation_name("4-4-2").unwrap();
        assert_eq!(squad.slot_count(), 11);
        assert_eq!(squad.filled_count(), 0);
        assert_eq!(squad.phase(), SquadPhase::Empty);
        assert!(squad.slots().iter().all(|s| s.is_none()));
    }

    #[test]
    fn unknown_formation_name_fails() {
        assert!(matches!(
            SquadState::with_formation_name("2-3-5"),
            Err(SquadError::InvalidFormationName { .. })
        ));
    }

    #[test]
    fn assign_and_read_back() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        let st = player("Striker", Position::Striker);
        assert!(squad.assign(1, st.clone()).unwrap().is_none());
        assert_eq!(squad.occupant(1).unwrap(), Some(&st));
        assert_eq!(squad.filled_count(), 1);
        assert_eq!(squad.phase(), SquadPhase::PartiallyFilled);
    }

    #[test]
    fn assign_returns_displaced_player() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        let first = player("First", Position::Goalkeeper);
        let second = player("Second", Position::Goalkeeper);
        squad.assign(10, first.clone()).unwrap();
        let displaced = squad.assign(10, second.clone()).unwrap();
        assert_eq!(displaced, Some(first));
        assert_eq!(squad.occupant(10).unwrap(), Some(&second));
        assert_eq!(squad.filled_count(), 1);
    }

    #[test]
    fn assign_out_of_range_fails() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        let err = squad.assign(11, player("X", Position::Striker)).unwrap_err();
        assert_eq!(
            err,
            SquadError::InvalidSlotIndex {
                index: 11,
                slot_count: 11
            }
        );
    }

    #[test]
    fn clear_slot_empties_only_that_slot() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        squad.assign(0, player("A", Position::LeftWing)).unwrap();
        squad.assign(1, player("B", Position::Striker)).unwrap();
        let removed = squad.clear_slot(0).unwrap();
        assert_eq!(removed.map(|p| p.name.clone()), Some("A".to_string()));
        assert!(squad.occupant(0).unwrap().is_none());
        assert!(squad.occupant(1).unwrap().is_some());
        assert!(squad.clear_slot(42).is_err());
    }

    #[test]
    fn full_squad_phase() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        for slot in 0..squad.slot_count() {
            let pos = squad.required_position(slot).unwrap();
            squad.assign(slot, player(&format!("P{slot}"), pos)).unwrap();
        }
        assert_eq!(squad.phase(), SquadPhase::Full);
        assert_eq!(squad.occupied().count(), 11);
    }

    #[test]
    fn clear_keeps_formation() {
        let mut squad = SquadState::with_formation_name("3-5-2").unwrap();
        squad.assign(3, player("Mid", Position::CentralMidfield)).unwrap();
        squad.clear();
        assert_eq!(squad.formation().name, "3-5-2");
        assert_eq!(squad.filled_count(), 0);
        assert_eq!(squad.slot_count(), 11);
    }

    #[test]
    fn change_formation_resets_all_slots() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        squad.assign(0, player("A", Position::LeftWing)).unwrap();
        squad.assign(10, player("K", Position::Goalkeeper)).unwrap();
        squad.change_formation("5-3-2").unwrap();
        assert_eq!(squad.formation().name, "5-3-2");
        assert_eq!(squad.slot_count(), squad.formation().slot_count());
        assert_eq!(squad.phase(), SquadPhase::Empty);
        assert_eq!(squad.required_position(5).unwrap(), Position::LeftWingBack);
    }

    #[test]
    fn change_formation_to_unknown_keeps_current_squad() {
        let mut squad = SquadState::with_formation_name("4-3-3").unwrap();
        squad.assign(0, player("A", Position::LeftWing)).unwrap();
        assert!(squad.change_formation("nope").is_err());
        assert_eq!(squad.formation().name, "4-3-3");
        assert_eq!(squad.filled_count(), 1);
    }
}
