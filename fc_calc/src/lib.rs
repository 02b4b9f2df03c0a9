//! # fc_calc
//!
//! Futures position sizing: trade setup validation, numeric input parsing
//! and the position size / risk-reward / margin / PNL calculator.

pub mod calculator;
pub mod error;
pub mod input;
pub mod setup;
pub mod side;

pub use calculator::CalculatorConfig;
pub use calculator::FuturesCalculator;
pub use calculator::PositionCalculator;
pub use calculator::TradeReport;
pub use error::CalcError;
pub use error::Result;
pub use input::parse_pair;
pub use input::parse_positive;
pub use setup::TradeSetup;
pub use setup::validate_stop_loss;
pub use setup::validate_take_profit;
pub use side::PositionSide;
