// Football positions and the slot compatibility table.

use std::fmt;

/// Playing positions used by formation slots and player records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    CenterBack,
    LeftBack,
    RightBack,
    LeftWingBack,
    RightWingBack,
    DefensiveMidfield,
    CentralMidfield,
    AttackingMidfield,
    LeftMidfield,
    RightMidfield,
    LeftWing,
    RightWing,
    CenterForward,
    Striker,
}

impl Position {
    /// Parse a position code such as "ST" or "cdm" into a Position.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" => Some(Position::Goalkeeper),
            "CB" => Some(Position::CenterBack),
            "LB" => Some(Position::LeftBack),
            "RB" => Some(Position::RightBack),
            "LWB" => Some(Position::LeftWingBack),
            "RWB" => Some(Position::RightWingBack),
            "CDM" => Some(Position::DefensiveMidfield),
            "CM" => Some(Position::CentralMidfield),
            "CAM" => Some(Position::AttackingMidfield),
            "LM" => Some(Position::LeftMidfield),
            "RM" => Some(Position::RightMidfield),
            "LW" => Some(Position::LeftWing),
            "RW" => Some(Position::RightWing),
            "CF" => Some(Position::CenterForward),
            "ST" => Some(Position::Striker),
            _ => None,
        }
    }

    /// Return the display code for this position.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CenterBack => "CB",
            Position::LeftBack => "LB",
            Position::RightBack => "RB",
            Position::LeftWingBack => "LWB",
            Position::RightWingBack => "RWB",
            Position::DefensiveMidfield => "CDM",
            Position::CentralMidfield => "CM",
            Position::AttackingMidfield => "CAM",
            Position::LeftMidfield => "LM",
            Position::RightMidfield => "RM",
            Position::LeftWing => "LW",
            Position::RightWing => "RW",
            Position::CenterForward => "CF",
            Position::Striker => "ST",
        }
    }

    /// Positions acceptable in a slot that requires `self`.
    ///
    /// Always includes `self`. Not symmetric: an LB slot takes a CB, but a
    /// CB slot does not take an LB.
    pub fn compatible_positions(&self) -> &'static [Position] {
        use Position::*;
        match self {
            Striker => &[Striker, CenterForward, LeftWing, RightWing],
            CenterForward => &[CenterForward, Striker, AttackingMidfield],
            LeftWing => &[LeftWing, LeftMidfield, Striker],
            RightWing => &[RightWing, RightMidfield, Striker],
            AttackingMidfield => &[AttackingMidfield, CentralMidfield, CenterForward],
            CentralMidfield => &[CentralMidfield, AttackingMidfield, DefensiveMidfield],
            DefensiveMidfield => &[DefensiveMidfield, CentralMidfield, CenterBack],
            LeftMidfield => &[LeftMidfield, LeftWing, LeftWingBack],
            RightMidfield => &[RightMidfield, RightWing, RightWingBack],
            LeftWingBack => &[LeftWingBack, LeftBack, LeftMidfield],
            RightWingBack => &[RightWingBack, RightBack, RightMidfield],
            LeftBack => &[LeftBack, LeftWingBack, CenterBack],
            RightBack => &[RightBack, RightWingBack, CenterBack],
            CenterBack => &[CenterBack, DefensiveMidfield],
            Goalkeeper => &[Goalkeeper],
        }
    }

    /// Whether a player listed at `candidate` may be placed in a slot requiring `self`.
    pub fn accepts(&self, candidate: Position) -> bool {
        self.compatible_positions().contains(&candidate)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
