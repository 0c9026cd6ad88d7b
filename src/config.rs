/// How much protection the king gets when castling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastlingSafety {
    /// The king may not castle out of check or across an attacked square.
    #[default]
    Strict,
    /// Only the king's destination is protected, by the ordinary self-check filter.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleSet {
    pub castling: CastlingSafety,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lenient_castling() -> Self {
        Self {
            castling: CastlingSafety::Lenient,
        }
    }
}
