// Line-oriented front end: parses typed commands and prints UI updates.
//
// Reads input lines and forwards parsed `UserCommand`s to the app loop, printing
// every `UiUpdate` it receives. Slot and candidate numbers are one-based on
// screen and converted to zero-based indices here.

use std::fmt::Write as _;
use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::chemistry::rank::SortMode;
use crate::chemistry::score::ChemistryBand;
use crate::chemistry::stats::group_thousands;
use crate::protocol::{CandidateList, LoadStatus, SlotView, SquadSnapshot, UiUpdate, UserCommand};

pub const HELP: &str = "\
Commands:
  formations          list available formations
  formation <name>    switch formation (clears the squad)
  slot <n>            open slot n and list candidates
  close               close the open slot
  search <text>       filter by name, club, league or nation (blank clears)
  nation <name>       only players of this nationality (blank clears)
  league <name>       only players from this league (blank clears)
  chem                toggle sorting by rating / chemistry
  pick <n>            place the n-th listed candidate in the open slot
  remove <n>          empty slot n
  clear               empty the whole squad
  suggest             suggest chemistry improvements
  reload              retry loading player data
  show                redraw the squad
  help                show this help
  quit                exit";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{name}`; type `help` for a list")]
    UnknownCommand { name: String },

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{value}` is not a valid number (numbering starts at 1)")]
    InvalidNumber { value: String },
}

/// Parse one input line into a command.
pub fn parse_command(line: &str) -> Result<UserCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "formations" => UserCommand::ListFormations,
        "formation" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "formation",
                    argument: "a formation name",
                });
            }
            UserCommand::ChangeFormation(rest.to_string())
        }
        "slot" => UserCommand::OpenSlot(parse_index("slot", rest)?),
        "close" => UserCommand::CloseSlot,
        "search" => UserCommand::Search(rest.to_string()),
        "nation" => UserCommand::Nation(rest.to_string()),
        "league" => UserCommand::League(rest.to_string()),
        "chem" => UserCommand::ToggleChemSort,
        "pick" => UserCommand::Pick(parse_index("pick", rest)?),
        "remove" => UserCommand::ClearSlot(parse_index("remove", rest)?),
        "clear" => UserCommand::ClearSquad,
        "suggest" => UserCommand::Suggest,
        "reload" => UserCommand::Reload,
        "show" => UserCommand::Show,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => {
            return Err(ParseError::UnknownCommand {
                name: other.to_string(),
            })
        }
    };
    Ok(cmd)
}

/// One-based number on screen to zero-based index.
fn parse_index(command: &'static str, arg: &str) -> Result<usize, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            argument: "a number",
        });
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseError::InvalidNumber {
            value: arg.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_update(update: &UiUpdate) -> String {
    match update {
        UiUpdate::Snapshot(snapshot) => render_snapshot(snapshot),
        UiUpdate::Candidates(list) => render_candidates(list),
        UiUpdate::Formations { names, current } => {
            let items: Vec<String> = names
                .iter()
                .map(|n| {
                    if n == current {
                        format!("{n} (current)")
                    } else {
                        n.to_string()
                    }
                })
                .collect();
            format!("Formations: {}", items.join(", "))
        }
        UiUpdate::LoadStatus(status) => render_load_status(status),
        UiUpdate::Message(message) => message.clone(),
        UiUpdate::Error(message) => format!("Error: {message}"),
        UiUpdate::Help => HELP.to_string(),
    }
}

pub fn render_load_status(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Loading => "Loading player data...".to_string(),
        LoadStatus::Ready { count } => format!("Loaded {count} players"),
        LoadStatus::Failed { message } => {
            format!("Could not load player data: {message}\nType `reload` to try again.")
        }
    }
}

/// Pitch rows, attack first, followed by the stats bar.
pub fn render_snapshot(snapshot: &SquadSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Formation {}", snapshot.formation);
    for row in &snapshot.rows {
        let cells: Vec<String> = row.iter().map(render_slot).collect();
        let _ = writeln!(out, "  {}", cells.join("   "));
    }
    let _ = write!(
        out,
        "Players {}  Chemistry {}  Value {}",
        snapshot.stats.filled_label(),
        snapshot.stats.chemistry_label(),
        snapshot.stats.price_label()
    );
    if let LoadStatus::Failed { .. } = snapshot.load_status {
        out.push_str("  (player data unavailable)");
    }
    out
}

fn render_slot(slot: &SlotView) -> String {
    let marker = if slot.selected { "*" } else { "" };
    match (&slot.occupant, slot.chemistry) {
        (Some(player), Some(chem)) => {
            let badge = slot
                .badge
                .map(|b| format!(" [{}]", b.label()))
                .unwrap_or_default();
            format!(
                "{marker}[{}] {} {}{} ({}/3)",
                slot.index + 1,
                slot.required,
                player.name,
                badge,
                chem
            )
        }
        _ => format!("{marker}[{}] {} -", slot.index + 1, slot.required),
    }
}

pub fn render_candidates(list: &CandidateList) -> String {
    let mut out = String::new();
    let sort = match list.sort_mode {
        SortMode::ByRating => "rating",
        SortMode::ByChemistry => "chemistry",
    };
    let _ = write!(
        out,
        "Slot {} ({}) sorted by {}",
        list.slot + 1,
        list.required,
        sort
    );
    let mut filters = Vec::new();
    if !list.filter.text.is_empty() {
        filters.push(format!("search \"{}\"", list.filter.text));
    }
    if !list.filter.nation.is_empty() {
        filters.push(format!("nation {}", list.filter.nation));
    }
    if !list.filter.league.is_empty() {
        filters.push(format!("league {}", list.filter.league));
    }
    if !filters.is_empty() {
        let _ = write!(out, "; {}", filters.join(", "));
    }
    out.push('\n');

    if list.candidates.is_empty() {
        out.push_str("  No matching players");
        return out;
    }

    for (i, c) in list.candidates.iter().enumerate() {
        let p = &c.player;
        let badge = p
            .badge()
            .map(|b| format!(" [{}]", b.label()))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:>3}. {}{}  {} {}  chem {}/3 {}  {} | {} | {}  ${}",
            i + 1,
            p.name,
            badge,
            p.position,
            p.rating,
            c.chemistry,
            band_marker(c.chemistry.band()),
            p.club,
            p.nationality,
            p.league,
            group_thousands(p.price)
        );
    }
    if list.is_truncated() {
        let _ = writeln!(
            out,
            "  Showing top {} of {}",
            list.candidates.len(),
            list.total
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// One-character stand-in for the candidate list's chemistry colouring.
fn band_marker(band: ChemistryBand) -> &'static str {
    match band {
        ChemistryBand::Positive => "+",
        ChemistryBand::Neutral => "=",
        ChemistryBand::Negative => "-",
    }
}

// ---------------------------------------------------------------------------
// REPL loop
// ---------------------------------------------------------------------------

/// Read commands from stdin and print updates to stdout.
pub async fn run(
    ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(input, &mut stdout, ui_rx, cmd_tx).await
}

/// Drive one REPL session over `input`, writing rendered updates to `out`.
///
/// At most one parsed command waits for channel capacity at a time, and
/// updates keep printing while it waits. After `quit` or end of input the
/// session keeps printing until the app loop closes the update channel.
pub async fn run_session<R, W>(
    input: R,
    out: &mut W,
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: io::Write,
{
    let mut lines = input.lines();
    let mut pending: Option<UserCommand> = None;
    let mut input_done = false;
    writeln!(out, "Squad builder. Type `help` for commands.")?;

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => writeln!(out, "{}", render_update(&update))?,
                    None => {
                        debug!("UI channel closed");
                        break;
                    }
                }
            }

            permit = cmd_tx.reserve(), if pending.is_some() => {
                match permit {
                    Ok(permit) => {
                        if let Some(cmd) = pending.take() {
                            permit.send(cmd);
                        }
                    }
                    Err(_) => {
                        debug!("Command channel closed");
                        pending = None;
                        input_done = true;
                    }
                }
            }

            line = lines.next_line(), if pending.is_none() && !input_done => {
                match line? {
                    None => {
                        info!("Input closed, quitting");
                        pending = Some(UserCommand::Quit);
                        input_done = true;
                    }
                    Some(line) => match parse_command(&line) {
                        Ok(UserCommand::Quit) => {
                            pending = Some(UserCommand::Quit);
                            input_done = true;
                        }
                        Ok(cmd) => pending = Some(cmd),
                        Err(ParseError::Empty) => {}
                        Err(e) => writeln!(out, "{e}")?,
                    },
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
