// Slot adjacency on the formation grid.
//
// Rows are pitch lines; a slot's column is its index within its own row.
// Two slots are neighbours when both row and column differ by at most one.
// Columns are row-local, so rows of different widths are compared as if
// left-aligned: column 2 of a three-wide row neighbours column 2 of a
// five-wide row even though they sit at different places on the pitch.

use crate::squad::formation::Formation;
use crate::squad::player::PlayerRecord;
use crate::squad::state::SquadState;
use crate::squad::SquadError;

/// Indices of every slot adjacent to `slot`, in slot order. Never includes `slot`.
pub fn adjacent_slots(formation: &Formation, slot: usize) -> Result<Vec<usize>, SquadError> {
    let (row, col) = formation.grid_coords(slot)?;

    Ok(formation
        .slots()
        .filter(|&(i, r, c, _)| i != slot && row.abs_diff(r) <= 1 && col.abs_diff(c) <= 1)
        .map(|(i, _, _, _)| i)
        .collect())
}

/// Occupants of the slots adjacent to `slot`, resolved against the live squad.
pub fn adjacent_occupants(
    squad: &SquadState,
    slot: usize,
) -> Result<Vec<Option<&PlayerRecord>>, SquadError> {
    let neighbours = adjacent_slots(squad.formation(), slot)?;
    let slots = squad.slots();
    Ok(neighbours
        .into_iter()
        .map(|i| slots[i].as_deref())
        .collect())
}
