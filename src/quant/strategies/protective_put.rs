//! # Protective Put and Fiduciary Call
//!
//! Protective put: long stock plus a long put.
//! $$
//! \text{P\&L}(S_T)=(S_T-S_0)+\max(K-S_T,0)-p
//! $$
//!
//! Fiduciary call: long call plus a zero-coupon bond paying $K$. The bond
//! nets to zero at expiry, so only the call leg moves the P&L.
//! $$
//! \text{P\&L}(S_T)=\max(S_T-K,0)-c
//! $$
//!
use impl_new_derive::ImplNew;

use super::PriceGrid;
use crate::traits::PayoffExt;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct ProtectivePut {
  /// Stock purchase price
  pub s0: f64,
  /// Put strike
  pub k: f64,
  /// Premium paid for the put
  pub premium: f64,
}

impl Default for ProtectivePut {
  fn default() -> Self {
    Self::new(100.0, 95.0, 4.0)
  }
}

impl ProtectivePut {
  pub fn grid() -> PriceGrid {
    PriceGrid::new(50.0, 150.0, 300)
  }

  /// Worst-case loss, reached at or below the strike.
  pub fn max_loss(&self) -> f64 {
    self.k - self.s0 - self.premium
  }
}

impl PayoffExt for ProtectivePut {
  fn name(&self) -> &'static str {
    "Protective Put"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    (s_t - self.s0) + (self.k - s_t).max(0.0)
  }

  fn profit(&self, s_t: f64) -> f64 {
    self.payoff(s_t) - self.premium
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.s0 + self.premium)
  }
}

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct FiduciaryCall {
  /// Call strike, also the bond face value
  pub k: f64,
  /// Premium paid for the call
  pub premium: f64,
  /// Risk-free rate
  pub r: f64,
  /// Time to maturity in years
  pub t: f64,
}

impl Default for FiduciaryCall {
  fn default() -> Self {
    Self::new(95.0, 4.0, 0.05, 1.0)
  }
}

impl FiduciaryCall {
  pub fn grid() -> PriceGrid {
    ProtectivePut::grid()
  }
}

impl PayoffExt for FiduciaryCall {
  fn name(&self) -> &'static str {
    "Fiduciary Call"
  }

  fn payoff(&self, s_t: f64) -> f64 {
    (s_t - self.k).max(0.0)
  }

  fn profit(&self, s_t: f64) -> f64 {
    self.payoff(s_t) - self.premium
  }

  fn breakeven(&self) -> Option<f64> {
    Some(self.k + self.premium)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn put_floors_the_loss() {
    let pp = ProtectivePut::default();

    assert_abs_diff_eq!(pp.max_loss(), -9.0);
    for s in [50.0, 80.0, 95.0] {
      assert_abs_diff_eq!(pp.profit(s), pp.max_loss(), epsilon = 1e-12);
    }
    assert_abs_diff_eq!(pp.profit(150.0), 46.0, epsilon = 1e-12);
    assert!(pp.max_profit().is_none());
  }

  #[test]
  fn fiduciary_call_is_the_call_leg() {
    let fc = FiduciaryCall::default();

    assert_eq!(fc.profit(90.0), -4.0);
    assert_eq!(fc.profit(120.0), 21.0);
  }

  #[test]
  fn both_share_slope_above_strike() {
    let pp = ProtectivePut::default();
    let fc = FiduciaryCall::default();

    for s in [100.0, 120.0, 150.0] {
      assert_abs_diff_eq!(
        pp.profit(s + 1.0) - pp.profit(s),
        fc.profit(s + 1.0) - fc.profit(s),
        epsilon = 1e-12
      );
    }
  }
}
