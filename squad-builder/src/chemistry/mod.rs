// Chemistry engine: adjacency, per-slot scoring, candidate ranking, totals.

pub mod adjacency;
pub mod rank;
pub mod score;
pub mod stats;
