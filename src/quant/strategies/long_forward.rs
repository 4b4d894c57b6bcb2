//! # Long Forward and Short Put
//!
//! $$
//! \Pi_{fwd}(S_T)=S_T-F_0,\qquad
//! \Pi_{sp}(S_T)=-\max(K-S_T,0),\quad \text{P\&L}_{sp}=\Pi_{sp}+p_0
//! $$
//!
use impl_new_derive::ImplNew;

use super::PriceGrid;
use crate::traits::PayoffExt;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct LongForward {
  /// Forward price
  pub f0: f64,
}

impl Default for LongForward {
  fn default() -> Self {
    Self::new(100.0)
  }
}

impl LongForward {
  pub fn grid() -> PriceGrid {
    PriceGrid::new(0.0, 200.0, 400)
  }
}

impl PayoffExt for LongForward {
  fn name(&self) -> &'static str {
    "Long Forward"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    s_t - self.f0
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.f0)
  }
}

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct ShortPut {
  /// Strike price
  pub k: f64,
  /// Premium received
  pub p0: f64,
}

impl Default for ShortPut {
  fn default() -> Self {
    Self::new(100.0, 25.0)
  }
}

impl PayoffExt for ShortPut {
  fn name(&self) -> &'static str {
    "Short Put"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    -(self.k - s_t).max(0.0)
  }

  fn profit(&self, s_t: f64) -> f64 {
    self.payoff(s_t) + self.p0
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.k - self.p0)
  }

  fn max_profit(&self) -> Option<f64> {
    Some(self.p0)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn forward_has_no_premium() {
    let fwd = LongForward::default();

    assert_eq!(fwd.payoff(130.0), 30.0);
    assert_eq!(fwd.profit(70.0), fwd.payoff(70.0));
  }

  #[test]
  fn short_put_tracks_forward_below_strike() {
    let fwd = LongForward::default();
    let sp = ShortPut::default();
    let gap = sp.p0 - (sp.k - fwd.f0);

    for s in [0.0, 40.0, 99.0] {
      assert_abs_diff_eq!(sp.profit(s), fwd.payoff(s) + gap, epsilon = 1e-12);
    }
    for s in [100.0, 150.0, 200.0] {
      assert_eq!(sp.profit(s), sp.max_profit().unwrap());
    }
  }
}
