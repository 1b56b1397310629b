// Squad-wide totals for the stats bar.

use crate::squad::formation::SQUAD_SIZE;
use crate::squad::state::SquadState;
use crate::squad::SquadError;

use super::score::{score, Chemistry};

/// Aggregate figures for the current squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SquadStats {
    pub filled_count: usize,
    pub total_chemistry: u32,
    pub total_price: u64,
}

/// Sum chemistry and price over every occupied slot.
pub fn aggregate(squad: &SquadState) -> Result<SquadStats, SquadError> {
    let mut stats = SquadStats::default();
    for (slot, player) in squad.occupied() {
        stats.filled_count += 1;
        stats.total_chemistry += u32::from(score(squad, slot, player)?.value());
        stats.total_price += player.price;
    }
    Ok(stats)
}

impl SquadStats {
    /// e.g. "7/11"
    pub fn filled_label(&self) -> String {
        format!("{}/{}", self.filled_count, SQUAD_SIZE)
    }

    /// e.g. "21/33"
    pub fn chemistry_label(&self) -> String {
        let max = SQUAD_SIZE as u32 * u32::from(Chemistry::MAX);
        format!("{}/{}", self.total_chemistry, max)
    }

    /// e.g. "$1,250,000"
    pub fn price_label(&self) -> String {
        format!("${}", group_thousands(self.total_price))
    }
}

/// Format an integer with comma thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
