// Squad model: positions, formations, player records and the slot state.

pub mod formation;
pub mod player;
pub mod position;
pub mod state;

use thiserror::Error;

/// Errors raised when a caller addresses a formation or slot that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquadError {
    #[error("slot index {index} is out of range (formation has {slot_count} slots)")]
    InvalidSlotIndex { index: usize, slot_count: usize },

    #[error("unknown formation `{name}`")]
    InvalidFormationName { name: String },
}
