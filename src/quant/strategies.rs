//! # Strategies
//!
//! $$
//! \Pi(S_T)=\sum_i q_i\,\pi_i(S_T),\qquad
//! \text{P\&L}(S_T)=\Pi(S_T)-\sum_i q_i\,c_i
//! $$
//!
//! Expiry payoff/profit of basic option positions.
//!
use ndarray::Array1;

use crate::traits::PayoffExt;

pub mod covered_call;
pub mod long_forward;
pub mod protective_put;
pub mod short_call;

pub use covered_call::CoveredCall;
pub use long_forward::LongForward;
pub use long_forward::ShortPut;
pub use protective_put::FiduciaryCall;
pub use protective_put::ProtectivePut;
pub use short_call::ShortCall;

/// Evenly spaced grid of terminal prices, endpoints included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceGrid {
  pub lo: f64,
  pub hi: f64,
  pub n: usize,
}

impl PriceGrid {
  pub const fn new(lo: f64, hi: f64, n: usize) -> Self {
    Self { lo, hi, n }
  }

  pub fn to_array(&self) -> Array1<f64> {
    Array1::linspace(self.lo, self.hi, self.n)
  }
}

/// Payoff and profit of a strategy over a price grid.
#[derive(Clone, Debug)]
pub struct StrategyProfile {
  pub s_t: Array1<f64>,
  pub payoff: Array1<f64>,
  pub profit: Array1<f64>,
}

/// Evaluate `strategy` on every point of `grid`.
pub fn profile<P: PayoffExt>(strategy: &P, grid: &Array1<f64>) -> StrategyProfile {
  StrategyProfile {
    s_t: grid.clone(),
    payoff: grid.mapv(|s| strategy.payoff(s)),
    profit: grid.mapv(|s| strategy.profit(s)),
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn grid_includes_endpoints() {
    let grid = PriceGrid::new(80.0, 130.0, 500).to_array();

    assert_eq!(grid.len(), 500);
    assert_abs_diff_eq!(grid[0], 80.0, epsilon = 1e-12);
    assert_abs_diff_eq!(grid[499], 130.0, epsilon = 1e-9);
  }

  #[test]
  fn breakevens_are_profit_zeros() {
    let strategies: Vec<Box<dyn PayoffExt>> = vec![
      Box::new(CoveredCall::default()),
      Box::new(ShortCall::default()),
      Box::new(ProtectivePut::default()),
      Box::new(FiduciaryCall::default()),
      Box::new(LongForward::default()),
      Box::new(ShortPut::default()),
    ];

    for strategy in &strategies {
      let breakeven = strategy.breakeven().unwrap();
      assert_abs_diff_eq!(strategy.profit(breakeven), 0.0, epsilon = 1e-12);
    }
  }

  #[test]
  fn profile_matches_pointwise_evaluation() {
    let strategy = ShortCall::default();
    let grid = ShortCall::grid().to_array();
    let prof = profile(&strategy, &grid);

    assert_eq!(prof.profit.len(), grid.len());
    for (i, &s) in grid.iter().enumerate() {
      assert_eq!(prof.payoff[i], strategy.payoff(s));
      assert_eq!(prof.profit[i], strategy.profit(s));
    }
  }
}
