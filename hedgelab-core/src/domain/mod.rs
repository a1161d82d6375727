//! Domain types for HedgeLab

pub mod pnl;
pub mod position;
pub mod price;
pub mod threshold;
pub mod trade;

pub use pnl::{PnlRow, PnlSeries};
pub use position::{Position, PositionSide};
pub use price::{PricePoint, PriceSeries};
pub use threshold::{Threshold, ThresholdSet};
pub use trade::{HedgeTrade, TradeSide};
