//! # Covered Call
//!
//! Long stock bought at $S_0$ plus a short call struck at $K$ sold for premium $c$:
//! $$
//! \text{P\&L}(S_T)=(S_T-S_0)+c-\max(S_T-K,0)
//! $$
//!
use impl_new_derive::ImplNew;

use super::PriceGrid;
use crate::traits::PayoffExt;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct CoveredCall {
  /// Stock purchase price
  pub s0: f64,
  /// Call strike
  pub k: f64,
  /// Premium received for the call
  pub premium: f64,
}

impl Default for CoveredCall {
  fn default() -> Self {
    Self::new(100.0, 105.0, 5.0)
  }
}

impl CoveredCall {
  pub fn grid() -> PriceGrid {
    PriceGrid::new(80.0, 130.0, 500)
  }

  /// Profit of the long stock leg.
  pub fn stock_leg(&self, s_t: f64) -> f64 {
    s_t - self.s0
  }

  /// Profit of the short call leg, premium included.
  pub fn short_call_leg(&self, s_t: f64) -> f64 {
    self.premium - (s_t - self.k).max(0.0)
  }
}

impl PayoffExt for CoveredCall {
  fn name(&self) -> &'static str {
    "Covered Call"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    self.stock_leg(s_t) - (s_t - self.k).max(0.0)
  }

  fn profit(&self, s_t: f64) -> f64 {
    self.stock_leg(s_t) + self.short_call_leg(s_t)
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.s0 - self.premium)
  }

  fn max_profit(&self) -> Option<f64> {
    Some(self.k - self.s0 + self.premium)
  }
}
