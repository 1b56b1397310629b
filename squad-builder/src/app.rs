// Application state and orchestration logic.
//
// Owns the squad, the player pool and the open-slot browsing state. User
// commands from the front end are applied synchronously; the only async work
// is loading the pool, which runs in a spawned task and reports back to the
// event loop as a single result. Every change is pushed to the front end as
// `UiUpdate`s.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::chemistry::rank::{
    filter_options, rank, CandidateFilter, FilterOptions, RankedCandidate, SortMode,
};
use crate::chemistry::score::score;
use crate::chemistry::stats::aggregate;
use crate::config::Config;
use crate::loader::{load_players, LoadError, PlayerSource};
use crate::protocol::{
    CandidateList, CandidateView, LoadStatus, SlotView, SquadSnapshot, UiUpdate, UserCommand,
};
use crate::squad::formation::list_formations;
use crate::squad::player::PlayerPool;
use crate::squad::state::SquadState;
use crate::squad::SquadError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Squad(#[from] SquadError),

    #[error("no slot is open")]
    NoSlotSelected,

    #[error("candidate {} is out of range ({count} listed)", .index + 1)]
    CandidateOutOfRange { index: usize, count: usize },

    #[error("player data is not loaded")]
    PoolNotLoaded,

    #[error("unknown {kind} `{value}`")]
    UnknownFilterValue { kind: &'static str, value: String },
}

/// Outcome of one background pool load.
pub type LoadResult = Result<PlayerPool, LoadError>;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub squad: SquadState,
    /// `None` until the first successful load. A failed reload keeps the
    /// previous pool.
    pub pool: Option<PlayerPool>,
    pub load_status: LoadStatus,
    pub filter_options: FilterOptions,
    /// Slot whose candidate list is being browsed.
    pub selected_slot: Option<usize>,
    pub filter: CandidateFilter,
    pub sort_mode: SortMode,
}

impl AppState {
    /// Fresh state in the configured default formation, waiting for the pool.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let squad = SquadState::with_formation_name(&config.builder.default_formation)?;
        Ok(AppState {
            config,
            squad,
            pool: None,
            load_status: LoadStatus::Loading,
            filter_options: FilterOptions::default(),
            selected_slot: None,
            filter: CandidateFilter::default(),
            sort_mode: SortMode::default(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.load_status == LoadStatus::Loading
    }

    /// Apply one user command and return the updates the front end should show.
    ///
    /// `Quit` is handled by the event loop and produces nothing here. `Reload`
    /// only flips the load status; spawning the load is the loop's job.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Result<Vec<UiUpdate>, AppError> {
        debug!("Handling command: {:?}", cmd);
        match cmd {
            UserCommand::ListFormations => Ok(vec![UiUpdate::Formations {
                names: list_formations(),
                current: self.squad.formation().name,
            }]),
            UserCommand::ChangeFormation(name) => {
                self.squad.change_formation(name.trim())?;
                self.selected_slot = None;
                info!("Formation changed to {}", self.squad.formation().name);
                Ok(vec![
                    UiUpdate::Message(format!(
                        "Formation set to {}; squad cleared",
                        self.squad.formation().name
                    )),
                    self.snapshot_update()?,
                ])
            }
            UserCommand::OpenSlot(slot) => {
                self.squad.required_position(slot)?;
                if self.pool.is_none() {
                    return Err(AppError::PoolNotLoaded);
                }
                self.selected_slot = Some(slot);
                self.filter = CandidateFilter::default();
                self.sort_mode = SortMode::ByRating;
                self.with_candidates(vec![self.snapshot_update()?])
            }
            UserCommand::CloseSlot => {
                self.selected_slot = None;
                Ok(vec![self.snapshot_update()?])
            }
            UserCommand::Search(text) => {
                self.require_slot()?;
                self.filter.text = text.trim().to_string();
                self.with_candidates(Vec::new())
            }
            UserCommand::Nation(value) => {
                self.require_slot()?;
                self.filter.nation = resolve_option(&self.filter_options.nations, &value, "nation")?;
                self.with_candidates(Vec::new())
            }
            UserCommand::League(value) => {
                self.require_slot()?;
                self.filter.league = resolve_option(&self.filter_options.leagues, &value, "league")?;
                self.with_candidates(Vec::new())
            }
            UserCommand::ToggleChemSort => {
                self.require_slot()?;
                self.sort_mode = self.sort_mode.toggled();
                self.with_candidates(Vec::new())
            }
            UserCommand::Pick(index) => self.pick(index),
            UserCommand::ClearSlot(slot) => {
                let message = match self.squad.clear_slot(slot)? {
                    Some(player) => {
                        info!("Removed {} from slot {}", player.name, slot);
                        format!("Removed {}", player.name)
                    }
                    None => format!("Slot {} is already empty", slot + 1),
                };
                self.with_candidates(vec![UiUpdate::Message(message), self.snapshot_update()?])
            }
            UserCommand::ClearSquad => {
                self.squad.clear();
                info!("Squad cleared");
                self.with_candidates(vec![
                    UiUpdate::Message("Squad cleared".into()),
                    self.snapshot_update()?,
                ])
            }
            UserCommand::Suggest => Ok(vec![UiUpdate::Message(
                "Chemistry suggestions are not available".into(),
            )]),
            UserCommand::Reload => {
                if self.is_loading() {
                    return Ok(vec![UiUpdate::Message(
                        "Player data is already loading".into(),
                    )]);
                }
                self.load_status = LoadStatus::Loading;
                Ok(vec![UiUpdate::LoadStatus(LoadStatus::Loading)])
            }
            UserCommand::Show => self.with_candidates(vec![self.snapshot_update()?]),
            UserCommand::Help => Ok(vec![UiUpdate::Help]),
            UserCommand::Quit => Ok(Vec::new()),
        }
    }

    /// Install the result of a background load.
    pub fn apply_load_result(&mut self, result: LoadResult) -> Vec<UiUpdate> {
        match result {
            Ok(pool) => {
                info!("Player pool ready: {} players", pool.len());
                self.filter_options = filter_options(&pool);
                self.load_status = LoadStatus::Ready { count: pool.len() };
                self.pool = Some(pool);

                let mut updates = vec![UiUpdate::LoadStatus(self.load_status.clone())];
                match self.snapshot_update() {
                    Ok(update) => updates.push(update),
                    Err(e) => warn!("Failed to build snapshot after load: {}", e),
                }
                match self.candidate_list() {
                    Ok(Some(list)) => updates.push(UiUpdate::Candidates(Box::new(list))),
                    Ok(None) => {}
                    Err(e) => warn!("Failed to refresh candidates after load: {}", e),
                }
                updates
            }
            Err(e) => {
                error!("Player load failed: {}", e);
                self.load_status = LoadStatus::Failed {
                    message: e.to_string(),
                };
                vec![UiUpdate::LoadStatus(self.load_status.clone())]
            }
        }
    }

    /// Build the pitch and stats view for the current squad.
    pub fn build_snapshot(&self) -> Result<SquadSnapshot, AppError> {
        let formation = self.squad.formation();
        let mut rows: Vec<Vec<SlotView>> = formation
            .rows
            .iter()
            .map(|row| Vec::with_capacity(row.len()))
            .collect();

        for (index, row, _, required) in formation.slots() {
            let occupant = self.squad.occupant(index)?.cloned();
            let chemistry = match &occupant {
                Some(player) => Some(score(&self.squad, index, player)?),
                None => None,
            };
            let badge = occupant.as_ref().and_then(|p| p.badge());
            rows[row].push(SlotView {
                index,
                required,
                occupant,
                chemistry,
                badge,
                selected: self.selected_slot == Some(index),
            });
        }

        Ok(SquadSnapshot {
            formation: formation.name,
            rows,
            stats: aggregate(&self.squad)?,
            phase: self.squad.phase(),
            selected_slot: self.selected_slot,
            load_status: self.load_status.clone(),
        })
    }

    /// Ranked candidates for the open slot, capped at `list_limit`.
    ///
    /// `Ok(None)` when no slot is open.
    pub fn candidate_list(&self) -> Result<Option<CandidateList>, AppError> {
        let Some(slot) = self.selected_slot else {
            return Ok(None);
        };
        let ranked = self.ranked(slot)?;
        let total = ranked.len();
        let candidates = ranked
            .into_iter()
            .take(self.config.builder.list_limit)
            .map(|c| CandidateView {
                player: Arc::clone(c.player),
                chemistry: c.chemistry,
            })
            .collect();

        Ok(Some(CandidateList {
            slot,
            required: self.squad.required_position(slot)?,
            filter: self.filter.clone(),
            sort_mode: self.sort_mode,
            total,
            candidates,
        }))
    }

    fn ranked(&self, slot: usize) -> Result<Vec<RankedCandidate<'_>>, AppError> {
        let pool = self.pool.as_ref().ok_or(AppError::PoolNotLoaded)?;
        Ok(rank(&self.squad, slot, pool, &self.filter, self.sort_mode)?)
    }

    fn require_slot(&self) -> Result<usize, AppError> {
        self.selected_slot.ok_or(AppError::NoSlotSelected)
    }

    fn pick(&mut self, index: usize) -> Result<Vec<UiUpdate>, AppError> {
        let slot = self.require_slot()?;
        let player = {
            let ranked = self.ranked(slot)?;
            let count = ranked.len().min(self.config.builder.list_limit);
            if index >= count {
                return Err(AppError::CandidateOutOfRange { index, count });
            }
            Arc::clone(ranked[index].player)
        };

        let chemistry = score(&self.squad, slot, &player)?;
        self.squad.assign(slot, Arc::clone(&player))?;
        self.selected_slot = None;
        info!(
            "Placed {} in slot {} ({}) with chemistry {}",
            player.name,
            slot,
            self.squad.required_position(slot)?,
            chemistry
        );

        Ok(vec![
            UiUpdate::Message(format!("Placed {} (chemistry {})", player.name, chemistry)),
            self.snapshot_update()?,
        ])
    }

    fn snapshot_update(&self) -> Result<UiUpdate, AppError> {
        Ok(UiUpdate::Snapshot(Box::new(self.build_snapshot()?)))
    }

    /// Append the candidate list to `updates` when a slot is open.
    fn with_candidates(&self, mut updates: Vec<UiUpdate>) -> Result<Vec<UiUpdate>, AppError> {
        if let Some(list) = self.candidate_list()? {
            updates.push(UiUpdate::Candidates(Box::new(list)));
        }
        Ok(updates)
    }
}

/// Match a picker value case-insensitively against the known options.
///
/// Blank input clears the filter.
fn resolve_option(options: &[String], value: &str, kind: &'static str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    let wanted = value.to_lowercase();
    options
        .iter()
        .find(|o| o.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| AppError::UnknownFilterValue {
            kind,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` or the command channel closes.
///
/// Starts the initial pool load immediately. `Reload` starts another load
/// unless one is already running.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
    sources: Arc<[Box<dyn PlayerSource>]>,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // The loop keeps its own sender, so `load_rx` never reports closed.
    let (load_tx, mut load_rx) = mpsc::channel::<LoadResult>(4);
    let timeout = state.config.data.timeout();

    state.load_status = LoadStatus::Loading;
    let mut load_task = spawn_load(sources.clone(), timeout, load_tx.clone());
    let _ = ui_tx.send(UiUpdate::LoadStatus(LoadStatus::Loading)).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        let wants_load = cmd == UserCommand::Reload && !state.is_loading();
                        send_all(&ui_tx, dispatch(&mut state, cmd)).await;
                        if wants_load {
                            info!("Reloading player data");
                            load_task = spawn_load(sources.clone(), timeout, load_tx.clone());
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(result) = load_rx.recv() => {
                send_all(&ui_tx, state.apply_load_result(result)).await;
            }
        }
    }

    load_task.abort();
    info!("Application event loop exiting");
    Ok(())
}

fn dispatch(state: &mut AppState, cmd: UserCommand) -> Vec<UiUpdate> {
    match state.handle_command(cmd) {
        Ok(updates) => updates,
        Err(e) => {
            warn!("Command failed: {}", e);
            vec![UiUpdate::Error(e.to_string())]
        }
    }
}

async fn send_all(ui_tx: &mpsc::Sender<UiUpdate>, updates: Vec<UiUpdate>) {
    for update in updates {
        if ui_tx.send(update).await.is_err() {
            debug!("UI channel closed, dropping update");
            return;
        }
    }
}

fn spawn_load(
    sources: Arc<[Box<dyn PlayerSource>]>,
    timeout: Duration,
    load_tx: mpsc::Sender<LoadResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = load_players(&sources, timeout).await;
        let _ = load_tx.send(result).await;
    })
}
