// Message types exchanged between the app orchestrator and the REPL front end.
//
// The front end sends `UserCommand`s; the orchestrator answers with
// `UiUpdate`s carrying ready-to-render view models. Slot and candidate
// indices are zero-based here; the front end shows them one-based.

use std::sync::Arc;

use crate::chemistry::rank::{CandidateFilter, SortMode};
use crate::chemistry::score::Chemistry;
use crate::chemistry::stats::SquadStats;
use crate::squad::player::{Badge, PlayerRecord};
use crate::squad::position::Position;
use crate::squad::state::SquadPhase;

// ---------------------------------------------------------------------------
// Commands (front end -> app)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    ListFormations,
    ChangeFormation(String),
    OpenSlot(usize),
    CloseSlot,
    Search(String),
    /// Empty string clears the nation filter.
    Nation(String),
    /// Empty string clears the league filter.
    League(String),
    ToggleChemSort,
    /// Place the n-th listed candidate in the open slot.
    Pick(usize),
    ClearSlot(usize),
    ClearSquad,
    Suggest,
    Reload,
    Show,
    Help,
    Quit,
}

// ---------------------------------------------------------------------------
// Updates (app -> front end)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<SquadSnapshot>),
    Candidates(Box<CandidateList>),
    Formations {
        names: Vec<&'static str>,
        current: &'static str,
    },
    LoadStatus(LoadStatus),
    Message(String),
    Error(String),
    Help,
}

/// Where the player pool is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready { count: usize },
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// One slot of the pitch view.
#[derive(Debug, Clone)]
pub struct SlotView {
    pub index: usize,
    pub required: Position,
    pub occupant: Option<Arc<PlayerRecord>>,
    /// Chemistry of the occupant; `None` for an empty slot.
    pub chemistry: Option<Chemistry>,
    pub badge: Option<Badge>,
    pub selected: bool,
}

/// Everything needed to draw the pitch and the stats bar.
#[derive(Debug, Clone)]
pub struct SquadSnapshot {
    pub formation: &'static str,
    /// Slots grouped by formation row, attack first.
    pub rows: Vec<Vec<SlotView>>,
    pub stats: SquadStats,
    pub phase: SquadPhase,
    pub selected_slot: Option<usize>,
    pub load_status: LoadStatus,
}

#[derive(Debug, Clone)]
pub struct CandidateView {
    pub player: Arc<PlayerRecord>,
    pub chemistry: Chemistry,
}

/// Ranked candidates for the open slot, capped at the configured limit.
#[derive(Debug, Clone)]
pub struct CandidateList {
    pub slot: usize,
    pub required: Position,
    pub filter: CandidateFilter,
    pub sort_mode: SortMode,
    /// Number of candidates before the cap was applied.
    pub total: usize,
    pub candidates: Vec<CandidateView>,
}

impl CandidateList {
    pub fn is_truncated(&self) -> bool {
        self.candidates.len() < self.total
    }
}
