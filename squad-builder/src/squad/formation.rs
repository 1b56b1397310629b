// Formation catalog: named line-ups laid out as rows of positions.
//
// Rows run from the attacking line down to the goalkeeper. Flattening the
// rows in order gives the slot index space used everywhere else.

use super::position::Position;
use super::SquadError;

use Position::*;

/// Number of slots every catalog formation flattens to.
pub const SQUAD_SIZE: usize = 11;

/// A named formation: ordered rows of slot positions.
#[derive(Debug, PartialEq, Eq)]
pub struct Formation {
    pub name: &'static str,
    pub rows: &'static [&'static [Position]],
}

/// The fixed formation catalog, in display order.
pub static FORMATIONS: &[Formation] = &[
    Formation {
        name: "4-3-3",
        rows: &[
            &[LeftWing, Striker, RightWing],
            &[CentralMidfield, CentralMidfield, CentralMidfield],
            &[LeftBack, CenterBack, CenterBack, RightBack],
            &[Goalkeeper],
        ],
    },
    Formation {
        name: "4-4-2",
        rows: &[
            &[Striker, Striker],
            &[LeftMidfield, CentralMidfield, CentralMidfield, RightMidfield],
            &[LeftBack, CenterBack, CenterBack, RightBack],
            &[Goalkeeper],
        ],
    },
    Formation {
        name: "4-2-3-1",
        rows: &[
            &[Striker],
            &[LeftMidfield, AttackingMidfield, RightMidfield],
            &[DefensiveMidfield, DefensiveMidfield],
            &[LeftBack, CenterBack, CenterBack, RightBack],
            &[Goalkeeper],
        ],
    },
    Formation {
        name: "3-4-3",
        rows: &[
            &[LeftWing, Striker, RightWing],
            &[LeftMidfield, CentralMidfield, CentralMidfield, RightMidfield],
            &[CenterBack, CenterBack, CenterBack],
            &[Goalkeeper],
        ],
    },
    Formation {
        name: "3-5-2",
        rows: &[
            &[Striker, Striker],
            &[
                LeftMidfield,
                CentralMidfield,
                CentralMidfield,
                CentralMidfield,
                RightMidfield,
            ],
            &[CenterBack, CenterBack, CenterBack],
            &[Goalkeeper],
        ],
    },
    Formation {
        name: "5-3-2",
        rows: &[
            &[Striker, Striker],
            &[CentralMidfield, CentralMidfield, CentralMidfield],
            &[LeftWingBack, CenterBack, CenterBack, CenterBack, RightWingBack],
            &[Goalkeeper],
        ],
    },
];

/// The formation a fresh squad starts in.
pub const DEFAULT_FORMATION: &str = "4-3-3";

/// Look up a formation by name.
pub fn get_formation(name: &str) -> Result<&'static Formation, SquadError> {
    FORMATIONS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| SquadError::InvalidFormationName {
            name: name.to_string(),
        })
}

/// Names of all catalog formations, in catalog order.
pub fn list_formations() -> Vec<&'static str> {
    FORMATIONS.iter().map(|f| f.name).collect()
}

impl Formation {
    /// Total number of slots across all rows.
    pub fn slot_count(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    /// Iterate over `(slot_index, row, col, position)` in flattened order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize, usize, Position)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &pos)| (r, c, pos)))
            .enumerate()
            .map(|(i, (r, c, pos))| (i, r, c, pos))
    }

    /// Required position of the slot at `slot`.
    pub fn position_at(&self, slot: usize) -> Result<Position, SquadError> {
        self.slots()
            .nth(slot)
            .map(|(_, _, _, pos)| pos)
            .ok_or(SquadError::InvalidSlotIndex {
                index: slot,
                slot_count: self.slot_count(),
            })
    }

    /// Row and row-local column of the slot at `slot`.
    pub fn grid_coords(&self, slot: usize) -> Result<(usize, usize), SquadError> {
        self.slots()
            .nth(slot)
            .map(|(_, r, c, _)| (r, c))
            .ok_or(SquadError::InvalidSlotIndex {
                index: slot,
                slot_count: self.slot_count(),
            })
    }

    /// Required positions for every slot, in slot order.
    pub fn positions(&self) -> Vec<Position> {
        self.slots().map(|(_, _, _, pos)| pos).collect()
    }
}
