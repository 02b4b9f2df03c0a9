use serde::Deserialize;
use serde::Serialize;

use crate::CalcError;
use crate::PositionSide;
use crate::Result;
use crate::input::ensure_positive;

/// Everything the user supplies for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub pair: String,
    pub side: PositionSide,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub risk_amount: f64,
    pub take_profit: f64,
}

impl TradeSetup {
    /// Check every field, including stop and target placement relative to entry
    pub fn validate(&self) -> Result<()> {
        ensure_positive("Entry price", self.entry_price)?;
        ensure_positive("Risk amount", self.risk_amount)?;
        validate_stop_loss(self.side, self.entry_price, self.stop_loss)?;
        validate_take_profit(self.side, self.entry_price, self.take_profit)?;
        Ok(())
    }
}

/// Smallest stop distance accepted, relative to the entry price (0.0001%)
pub const MIN_STOP_DISTANCE_RATIO: f64 = 1e-6;

/// Stop-loss must sit on the losing side of entry, and not within rounding of it
pub fn validate_stop_loss(side: PositionSide, entry_price: f64, stop_loss: f64) -> Result<f64> {
    ensure_positive("Stop-loss", stop_loss)?;
    let distance = (entry_price - stop_loss) * side.direction();
    if distance <= 0.0 {
        return Err(CalcError::StopOnWrongSide { side });
    }
    if distance < entry_price * MIN_STOP_DISTANCE_RATIO {
        return Err(CalcError::StopTooClose);
    }
    Ok(stop_loss)
}

/// Take-profit must sit on the winning side of entry
pub fn validate_take_profit(side: PositionSide, entry_price: f64, take_profit: f64) -> Result<f64> {
    ensure_positive("Take-profit", take_profit)?;
    if (take_profit - entry_price) * side.direction() <= 0.0 {
        return Err(CalcError::TargetOnWrongSide { side });
    }
    Ok(take_profit)
}
