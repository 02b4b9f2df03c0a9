use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::CalcError;
use crate::PositionSide;
use crate::Result;
use crate::TradeSetup;

/// Calculator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Leverage used to derive the required margin
    pub leverage: f64,

    /// Taker fee charged on entry and exit notional, in basis points
    pub taker_fee_bps: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            leverage: 10.0,
            taker_fee_bps: 4.0, // 0.04%
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.leverage.is_finite() || self.leverage < 1.0 {
            return Err(CalcError::InvalidConfig("leverage must be at least 1"));
        }
        if !self.taker_fee_bps.is_finite() || self.taker_fee_bps < 0.0 {
            return Err(CalcError::InvalidConfig("taker_fee_bps must be non-negative"));
        }
        Ok(())
    }

    pub fn fee_rate(&self) -> f64 {
        self.taker_fee_bps / 10_000.0
    }
}

/// Position sizing, margin and PNL figures for one trade setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub setup: TradeSetup,

    /// Size in base units such that hitting the stop loses exactly the risk amount
    pub position_size: f64,
    pub notional: f64,
    pub leverage: f64,
    pub margin: f64,

    /// Leverage at which the margin is fully consumed at the stop-loss
    pub max_leverage: u32,

    pub risk_reward: f64,
    pub stop_distance_pct: f64,
    pub target_distance_pct: f64,

    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_profit: f64,
    pub net_loss: f64,
    pub total_fees_at_target: f64,
    pub total_fees_at_stop: f64,
}

/// Turns a completed trade setup into a report
pub trait PositionCalculator: Send + Sync {
    fn calculate(&self, setup: &TradeSetup) -> Result<TradeReport>;
}

/// Linear USD-margined futures calculator
#[derive(Debug, Clone, Default)]
pub struct FuturesCalculator {
    config: CalculatorConfig,
}

impl FuturesCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

impl PositionCalculator for FuturesCalculator {
    fn calculate(&self, setup: &TradeSetup) -> Result<TradeReport> {
        setup.validate()?;

        let entry = setup.entry_price;
        let stop_distance = (entry - setup.stop_loss).abs();
        let target_distance = (setup.take_profit - entry).abs();

        let position_size = setup.risk_amount / stop_distance;
        let notional = position_size * entry;
        let margin = notional / self.config.leverage;
        let max_leverage = (entry / stop_distance).floor().max(1.0);

        let fee_rate = self.config.fee_rate();
        let total_fees_at_target = fee_rate * position_size * (entry + setup.take_profit);
        let total_fees_at_stop = fee_rate * position_size * (entry + setup.stop_loss);

        let gross_profit = position_size * target_distance;
        let gross_loss = setup.risk_amount;
        let net_profit = gross_profit - total_fees_at_target;
        let net_loss = gross_loss + total_fees_at_stop;

        let figures = [position_size, notional, margin, total_fees_at_target, total_fees_at_stop, net_profit, net_loss];
        if figures.iter().any(|value| !value.is_finite()) || max_leverage > f64::from(u32::MAX) {
            debug!(pair = %setup.pair, position_size, notional, "Trade report out of range");
            return Err(CalcError::ResultOutOfRange);
        }

        let report = TradeReport {
            setup: setup.clone(),
            position_size,
            notional,
            leverage: self.config.leverage,
            margin,
            max_leverage: max_leverage as u32,
            risk_reward: target_distance / stop_distance,
            stop_distance_pct: stop_distance / entry * 100.0,
            target_distance_pct: target_distance / entry * 100.0,
            gross_profit,
            gross_loss,
            net_profit,
            net_loss,
            total_fees_at_target,
            total_fees_at_stop,
        };

        debug!(
            pair = %setup.pair,
            side = %setup.side,
            position_size = %report.position_size,
            risk_reward = %report.risk_reward,
            "Calculated trade report"
        );

        Ok(report)
    }
}

impl TradeReport {
    /// Signed PNL if the position were closed at `exit_price`, before fees
    pub fn pnl_at(&self, exit_price: f64) -> f64 {
        (exit_price - self.setup.entry_price) * self.position_size * self.setup.side.direction()
    }

    pub fn is_long(&self) -> bool {
        self.setup.side == PositionSide::Long
    }
}
