use crate::PositionSide;

/// Result type for calculator operations
pub type Result<T> = std::result::Result<T, CalcError>;

/// Errors raised while parsing inputs or computing a trade report
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    #[error("{field} must be a positive number")]
    NonPositive { field: &'static str },

    #[error("Stop-loss must be {} the entry price for a {side} position", stop_relation(.side))]
    StopOnWrongSide { side: PositionSide },

    #[error("Stop-loss is too close to the entry price, the position size would be unbounded")]
    StopTooClose,

    #[error("Take-profit must be {} the entry price for a {side} position", target_relation(.side))]
    TargetOnWrongSide { side: PositionSide },

    #[error("'{input}' is not a valid position side, choose LONG or SHORT")]
    UnknownSide { input: String },

    #[error("'{input}' is not a valid trading pair, send a symbol like BTCUSDT")]
    InvalidPair { input: String },

    #[error("The inputs are too large to produce a meaningful result")]
    ResultOutOfRange,

    #[error("Invalid calculator configuration: {0}")]
    InvalidConfig(&'static str),
}

fn stop_relation(side: &PositionSide) -> &'static str {
    match side {
        PositionSide::Long => "below",
        PositionSide::Short => "above",
    }
}

fn target_relation(side: &PositionSide) -> &'static str {
    match side {
        PositionSide::Long => "above",
        PositionSide::Short => "below",
    }
}
