// Chemistry scoring for a candidate in a slot.
//
// Chemistry is derived, never stored: it depends on the slot's required
// position and on whoever currently occupies the neighbouring slots, so it
// must be recomputed whenever any neighbour changes.

use std::fmt;

use crate::squad::player::PlayerRecord;
use crate::squad::position::Position;
use crate::squad::state::SquadState;
use crate::squad::SquadError;

use super::adjacency::adjacent_occupants;

// ---------------------------------------------------------------------------
// Chemistry value
// ---------------------------------------------------------------------------

/// Per-slot chemistry, always within `0..=Chemistry::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Chemistry(u8);

impl Chemistry {
    pub const MAX: u8 = 3;

    /// Build a chemistry value, clamping into range.
    pub fn clamped(value: i32) -> Self {
        Chemistry(value.clamp(0, Self::MAX as i32) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> ChemistryBand {
        match self.0 {
            0 => ChemistryBand::Negative,
            1 => ChemistryBand::Neutral,
            _ => ChemistryBand::Positive,
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse chemistry grouping used when colouring candidate lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChemistryBand {
    Negative,
    Neutral,
    Positive,
}

// ---------------------------------------------------------------------------
// Position fit
// ---------------------------------------------------------------------------

/// How well a player's listed position matches a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFit {
    Exact,
    Compatible,
    OutOfPosition,
}

impl PositionFit {
    pub fn of(required: Position, candidate: Position) -> Self {
        if candidate == required {
            PositionFit::Exact
        } else if required.accepts(candidate) {
            PositionFit::Compatible
        } else {
            PositionFit::OutOfPosition
        }
    }

    /// Starting chemistry before links are considered.
    pub fn base(&self) -> i32 {
        match self {
            PositionFit::Exact => 3,
            PositionFit::Compatible => 2,
            PositionFit::OutOfPosition => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Link value between a candidate and one neighbour.
///
/// Only the strongest tie counts: club (2) beats nationality (1) beats league (1).
pub fn link_strength(candidate: &PlayerRecord, neighbour: &PlayerRecord) -> u32 {
    if neighbour.club == candidate.club {
        2
    } else if neighbour.nationality == candidate.nationality
        || neighbour.league == candidate.league
    {
        1
    } else {
        0
    }
}

/// Sum of link values over the occupied neighbours.
pub fn total_links<'a>(
    candidate: &PlayerRecord,
    neighbours: impl IntoIterator<Item = Option<&'a PlayerRecord>>,
) -> u32 {
    neighbours
        .into_iter()
        .flatten()
        .map(|n| link_strength(candidate, n))
        .sum()
}

/// Combine a position base with the total link strength.
pub fn apply_links(base: i32, links: u32) -> Chemistry {
    let adjusted = if links >= 4 {
        (base + 1).min(Chemistry::MAX as i32)
    } else if links >= 2 {
        base.max(1)
    } else {
        (base - 1).max(0)
    };
    Chemistry::clamped(adjusted)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Chemistry `candidate` would have in `slot` given the squad's current occupants.
///
/// The slot's own occupant is ignored, so this scores both players already
/// placed and prospective replacements the same way.
pub fn score(
    squad: &SquadState,
    slot: usize,
    candidate: &PlayerRecord,
) -> Result<Chemistry, SquadError> {
    let required = squad.required_position(slot)?;
    let base = PositionFit::of(required, candidate.position).base();
    let links = total_links(candidate, adjacent_occupants(squad, slot)?);
    Ok(apply_links(base, links))
}
