//! Position — weighted-average-cost hedge inventory for one ledger run.

use serde::{Deserialize, Serialize};

/// Which side of the book currently holds inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Flat,
    Long,
    Short,
}

/// Weighted-average-cost hedge inventory.
///
/// Long and short inventory are tracked separately. A trade always nets the
/// opposing side before extending its own, so after every trade at most one
/// side is non-zero. The average price of an empty side is meaningless and
/// is reset to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub long_quantity: f64,
    pub long_avg_price: f64,
    pub short_quantity: f64,
    pub short_avg_price: f64,
}

impl Position {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn side(&self) -> PositionSide {
        match (self.long_quantity > 0.0, self.short_quantity > 0.0) {
            (true, false) => PositionSide::Long,
            (false, true) => PositionSide::Short,
            (false, false) => PositionSide::Flat,
            // Both sides open: report the larger one. Never reached by `apply`.
            (true, true) if self.long_quantity >= self.short_quantity => PositionSide::Long,
            (true, true) => PositionSide::Short,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.side() == PositionSide::Flat
    }

    /// Signed net inventory: long minus short.
    pub fn net_quantity(&self) -> f64 {
        self.long_quantity - self.short_quantity
    }

    /// Apply a signed trade at `price` and return the PnL it realizes.
    ///
    /// Transaction costs are not handled here.
    pub fn apply(&mut self, quantity: f64, price: f64) -> f64 {
        let realized = if quantity > 0.0 {
            self.buy(quantity, price)
        } else if quantity < 0.0 {
            self.sell(-quantity, price)
        } else {
            0.0
        };
        debug_assert!(
            !(self.long_quantity > 0.0 && self.short_quantity > 0.0),
            "long and short inventory open at the same time: {self:?}"
        );
        realized
    }

    /// Mark-to-market value of open inventory at `mark`.
    pub fn unrealized_pnl(&self, mark: f64) -> f64 {
        let mut pnl = 0.0;
        if self.long_quantity > 0.0 {
            pnl += self.long_quantity * (mark - self.long_avg_price);
        }
        if self.short_quantity > 0.0 {
            pnl += self.short_quantity * (self.short_avg_price - mark);
        }
        pnl
    }

    fn buy(&mut self, quantity: f64, price: f64) -> f64 {
        match self.side() {
            PositionSide::Short => {
                let matched = quantity.min(self.short_quantity);
                let realized = matched * (self.short_avg_price - price);
                self.short_quantity -= matched;
                if self.short_quantity <= 0.0 {
                    self.short_quantity = 0.0;
                    self.short_avg_price = 0.0;
                }
                let remaining = quantity - matched;
                if remaining > 0.0 {
                    Self::extend(&mut self.long_quantity, &mut self.long_avg_price, remaining, price);
                }
                realized
            }
            PositionSide::Flat | PositionSide::Long => {
                Self::extend(&mut self.long_quantity, &mut self.long_avg_price, quantity, price);
                0.0
            }
        }
    }

    fn sell(&mut self, quantity: f64, price: f64) -> f64 {
        match self.side() {
            PositionSide::Long => {
                let matched = quantity.min(self.long_quantity);
                let realized = matched * (price - self.long_avg_price);
                self.long_quantity -= matched;
                if self.long_quantity <= 0.0 {
                    self.long_quantity = 0.0;
                    self.long_avg_price = 0.0;
                }
                let remaining = quantity - matched;
                if remaining > 0.0 {
                    Self::extend(&mut self.short_quantity, &mut self.short_avg_price, remaining, price);
                }
                realized
            }
            PositionSide::Flat | PositionSide::Short => {
                Self::extend(&mut self.short_quantity, &mut self.short_avg_price, quantity, price);
                0.0
            }
        }
    }

    /// Weighted-average update of one side. `added` is always positive here,
    /// so the new quantity cannot be zero.
    fn extend(quantity: &mut f64, avg_price: &mut f64, added: f64, price: f64) {
        let new_quantity = *quantity + added;
        *avg_price = (*avg_price * *quantity + price * added) / new_quantity;
        *quantity = new_quantity;
    }
}
