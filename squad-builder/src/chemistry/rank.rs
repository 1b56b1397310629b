// Candidate filtering and ranking for an open slot.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::squad::player::PlayerRecord;
use crate::squad::state::SquadState;
use crate::squad::SquadError;

use super::score::{score, Chemistry};

/// Optional predicates on top of the slot's position filter.
///
/// Empty strings mean "no filter", matching what the pickers send when
/// nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Case-insensitive substring over name, club, league and nationality.
    pub text: String,
    /// Exact nationality.
    pub nation: String,
    /// Exact league.
    pub league: String,
}

impl CandidateFilter {
    /// Whether `player` passes the text, nation and league predicates.
    pub fn matches(&self, player: &PlayerRecord) -> bool {
        let text = self.text.trim().to_lowercase();
        let text_ok = text.is_empty()
            || [
                &player.name,
                &player.club,
                &player.league,
                &player.nationality,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&text));
        let nation_ok = self.nation.is_empty() || player.nationality == self.nation;
        let league_ok = self.league.is_empty() || player.league == self.league;

        text_ok && nation_ok && league_ok
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.nation.is_empty() && self.league.is_empty()
    }
}

/// Ordering applied to the filtered candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Rating, highest first.
    #[default]
    ByRating,
    /// Chemistry in the open slot, highest first; ties go to the higher rating.
    ByChemistry,
}

impl SortMode {
    pub fn toggled(&self) -> Self {
        match self {
            SortMode::ByRating => SortMode::ByChemistry,
            SortMode::ByChemistry => SortMode::ByRating,
        }
    }
}

/// A filtered candidate annotated with its chemistry in the open slot.
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub player: &'a Arc<PlayerRecord>,
    pub chemistry: Chemistry,
}

impl RankedCandidate<'_> {
    pub fn rating(&self) -> u32 {
        self.player.rating
    }
}

/// Filter `pool` down to players eligible for `slot` and order them.
///
/// Position compatibility always applies; the filter's predicates narrow
/// further. The sort is stable, so fully tied players keep pool order. The
/// whole ordered result is returned; capping the list is up to the caller.
pub fn rank<'a>(
    squad: &SquadState,
    slot: usize,
    pool: &'a [Arc<PlayerRecord>],
    filter: &CandidateFilter,
    sort_mode: SortMode,
) -> Result<Vec<RankedCandidate<'a>>, SquadError> {
    let required = squad.required_position(slot)?;

    let mut ranked = pool
        .iter()
        .filter(|p| required.accepts(p.position) && filter.matches(p))
        .map(|player| {
            Ok(RankedCandidate {
                player,
                chemistry: score(squad, slot, player)?,
            })
        })
        .collect::<Result<Vec<_>, SquadError>>()?;

    match sort_mode {
        SortMode::ByRating => ranked.sort_by(|a, b| b.rating().cmp(&a.rating())),
        SortMode::ByChemistry => ranked.sort_by(|a, b| {
            b.chemistry
                .cmp(&a.chemistry)
                .then_with(|| b.rating().cmp(&a.rating()))
        }),
    }

    Ok(ranked)
}

/// Distinct nationalities and leagues in the pool, each sorted, for the pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub nations: Vec<String>,
    pub leagues: Vec<String>,
}

pub fn filter_options(pool: &[Arc<PlayerRecord>]) -> FilterOptions {
    let nations: BTreeSet<&str> = pool.iter().map(|p| p.nationality.as_str()).collect();
    let leagues: BTreeSet<&str> = pool.iter().map(|p| p.league.as_str()).collect();
    FilterOptions {
        nations: nations.into_iter().map(String::from).collect(),
        leagues: leagues.into_iter().map(String::from).collect(),
    }
}
