//! # Short Call
//!
//! $$
//! \Pi(S_T)=-\max(S_T-K,0),\qquad \text{P\&L}(S_T)=\Pi(S_T)+c_0
//! $$
//!
use impl_new_derive::ImplNew;

use super::PriceGrid;
use crate::traits::PayoffExt;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct ShortCall {
  /// Strike price
  pub k: f64,
  /// Premium received
  pub c0: f64,
}

impl Default for ShortCall {
  fn default() -> Self {
    Self::new(100.0, 20.0)
  }
}

impl ShortCall {
  pub fn grid() -> PriceGrid {
    PriceGrid::new(0.0, 200.0, 400)
  }
}

impl PayoffExt for ShortCall {
  fn name(&self) -> &'static str {
    "Short Call"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    -(s_t - self.k).max(0.0)
  }

  fn profit(&self, s_t: f64) -> f64 {
    self.payoff(s_t) + self.c0
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.k + self.c0)
  }

  fn max_profit(&self) -> Option<f64> {
    Some(self.c0)
  }
}
