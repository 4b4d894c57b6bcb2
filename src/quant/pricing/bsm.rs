//! # Black-Scholes
//!
//! $$
//! d_1=\frac{\ln(S/K)+(r+\tfrac12\sigma^2)T}{\sigma\sqrt T},\quad d_2=d_1-\sigma\sqrt T
//! $$
//!
//! $$
//! C=S\Phi(d_1)-Ke^{-rT}\Phi(d_2),\qquad P=Ke^{-rT}\Phi(-d_2)-S\Phi(-d_1)
//! $$
//!
//! At or past expiry ($T\le0$) prices collapse to intrinsic value, call delta
//! is the step $\mathbb 1_{S>K}$ and every other greek is zero.
//!
use chrono::NaiveDateTime;
use statrs::distribution::Continuous;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use super::finite_difference::central_difference_pair;
use super::finite_difference::RHO_BUMP;
use crate::quant::OptionType;
use crate::traits::PricerExt;
use crate::traits::TimeExt;

/// Days per year used to quote theta per day.
pub const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Clone, Copy, Debug)]
pub struct BSMPricer {
  /// Underlying price
  pub s: f64,
  /// Volatility
  pub v: f64,
  /// Strike price
  pub k: f64,
  /// Risk-free rate
  pub r: f64,
  /// Time to maturity in years
  pub tau: Option<f64>,
  /// Evaluation timestamp
  pub eval: Option<NaiveDateTime>,
  /// Expiration timestamp
  pub expiration: Option<NaiveDateTime>,
  /// Option type
  pub option_type: OptionType,
}

/// Prices and first-order greeks of a call/put pair. Thetas are per day.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BSMSnapshot {
  pub call: f64,
  pub put: f64,
  pub call_delta: f64,
  pub put_delta: f64,
  pub gamma: f64,
  pub vega: f64,
  pub call_theta: f64,
  pub put_theta: f64,
}

/// Price and greeks of the call/put pair for `(s, k, r, sigma, t)`.
pub fn bs_call_put(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> BSMSnapshot {
  BSMPricer::builder(s, sigma, k, r).tau(t).build().snapshot()
}

impl BSMPricer {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    s: f64,
    v: f64,
    k: f64,
    r: f64,
    tau: Option<f64>,
    eval: Option<NaiveDateTime>,
    expiration: Option<NaiveDateTime>,
    option_type: OptionType,
  ) -> Self {
    Self {
      s,
      v,
      k,
      r,
      tau,
      eval,
      expiration,
      option_type,
    }
  }

  pub fn builder(s: f64, v: f64, k: f64, r: f64) -> BSMPricerBuilder {
    BSMPricerBuilder {
      s,
      v,
      k,
      r,
      tau: None,
      eval: None,
      expiration: None,
      option_type: OptionType::Call,
    }
  }
}

pub struct BSMPricerBuilder {
  s: f64,
  v: f64,
  k: f64,
  r: f64,
  tau: Option<f64>,
  eval: Option<NaiveDateTime>,
  expiration: Option<NaiveDateTime>,
  option_type: OptionType,
}

impl BSMPricerBuilder {
  pub fn tau(mut self, tau: f64) -> Self {
    self.tau = Some(tau);
    self
  }
  pub fn eval(mut self, eval: NaiveDateTime) -> Self {
    self.eval = Some(eval);
    self
  }
  pub fn expiration(mut self, expiration: NaiveDateTime) -> Self {
    self.expiration = Some(expiration);
    self
  }
  pub fn option_type(mut self, option_type: OptionType) -> Self {
    self.option_type = option_type;
    self
  }
  pub fn build(self) -> BSMPricer {
    BSMPricer {
      s: self.s,
      v: self.v,
      k: self.k,
      r: self.r,
      tau: self.tau,
      eval: self.eval,
      expiration: self.expiration,
      option_type: self.option_type,
    }
  }
}

impl PricerExt for BSMPricer {
  fn calculate_call_put(&self) -> (f64, f64) {
    if self.is_expired() {
      return (
        OptionType::Call.payoff(self.s, self.k),
        OptionType::Put.payoff(self.s, self.k),
      );
    }

    let (d1, d2) = self.d1_d2();
    let n = Normal::default();
    let df = self.discount();

    let call = self.s * n.cdf(d1) - self.k * df * n.cdf(d2);
    let put = self.k * df * n.cdf(-d2) - self.s * n.cdf(-d1);

    (call, put)
  }

  fn calculate_price(&self) -> f64 {
    let (call, put) = self.calculate_call_put();
    match self.option_type {
      OptionType::Call => call,
      OptionType::Put => put,
    }
  }

  /// `[delta, gamma, theta per day, vega, rho]`, rho by centered difference.
  fn derivatives(&self) -> Vec<f64> {
    let (call_rho, put_rho) = self.rho_fd(RHO_BUMP);
    let rho = match self.option_type {
      OptionType::Call => call_rho,
      OptionType::Put => put_rho,
    };
    vec![
      self.delta(),
      self.gamma(),
      self.theta_per_day(),
      self.vega(),
      rho,
    ]
  }
}

impl TimeExt for BSMPricer {
  fn tau(&self) -> Option<f64> {
    self.tau
  }

  fn eval(&self) -> Option<NaiveDateTime> {
    self.eval
  }

  fn expiration(&self) -> Option<NaiveDateTime> {
    self.expiration
  }
}

impl BSMPricer {
  fn t(&self) -> f64 {
    self.calculate_tau_in_years()
  }

  /// True at or past expiry.
  pub fn is_expired(&self) -> bool {
    self.t() <= 0.0
  }

  fn discount(&self) -> f64 {
    (-self.r * self.t()).exp()
  }

  /// Calculate d1 and d2
  fn d1_d2(&self) -> (f64, f64) {
    let t = self.t();
    let vol_sqrt_t = self.v * t.sqrt();
    let d1 = ((self.s / self.k).ln() + (self.r + 0.5 * self.v.powi(2)) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    (d1, d2)
  }

  /// Copy with a different rate.
  pub fn with_rate(&self, r: f64) -> Self {
    Self { r, ..*self }
  }

  /// Copy with an explicit time to maturity.
  pub fn with_tau(&self, tau: f64) -> Self {
    Self {
      tau: Some(tau),
      ..*self
    }
  }

  /// Copy with a different spot.
  pub fn with_spot(&self, s: f64) -> Self {
    Self { s, ..*self }
  }

  /// Copy with a different volatility.
  pub fn with_vol(&self, v: f64) -> Self {
    Self { v, ..*self }
  }

  /// Call delta.
  fn call_delta(&self) -> f64 {
    if self.is_expired() {
      return if self.s > self.k { 1.0 } else { 0.0 };
    }
    let (d1, _) = self.d1_d2();
    Normal::default().cdf(d1)
  }

  /// Calculate the delta
  pub fn delta(&self) -> f64 {
    match self.option_type {
      OptionType::Call => self.call_delta(),
      OptionType::Put => self.call_delta() - 1.0,
    }
  }

  /// Calculate the gamma
  pub fn gamma(&self) -> f64 {
    if self.is_expired() {
      return 0.0;
    }
    let (d1, _) = self.d1_d2();
    Normal::default().pdf(d1) / (self.s * self.v * self.t().sqrt())
  }

  /// Calculate the vega (per unit of volatility)
  pub fn vega(&self) -> f64 {
    if self.is_expired() {
      return 0.0;
    }
    let (d1, _) = self.d1_d2();
    self.s * Normal::default().pdf(d1) * self.t().sqrt()
  }

  /// Annualized call and put theta.
  fn theta_pair(&self) -> (f64, f64) {
    if self.is_expired() {
      return (0.0, 0.0);
    }
    let (d1, d2) = self.d1_d2();
    let n = Normal::default();
    let t = self.t();

    let decay = -self.s * n.pdf(d1) * self.v / (2.0 * t.sqrt());
    let carry = self.r * self.k * self.discount();

    (decay - carry * n.cdf(d2), decay + carry * n.cdf(-d2))
  }

  /// Calculate the annualized theta
  pub fn theta(&self) -> f64 {
    let (call, put) = self.theta_pair();
    match self.option_type {
      OptionType::Call => call,
      OptionType::Put => put,
    }
  }

  /// Theta per calendar day
  pub fn theta_per_day(&self) -> f64 {
    self.theta() / DAYS_PER_YEAR
  }

  /// Calculate the analytic rho
  pub fn rho(&self) -> f64 {
    if self.is_expired() {
      return 0.0;
    }
    let (_, d2) = self.d1_d2();
    let n = Normal::default();
    let t = self.t();

    match self.option_type {
      OptionType::Call => self.k * t * self.discount() * n.cdf(d2),
      OptionType::Put => -self.k * t * self.discount() * n.cdf(-d2),
    }
  }

  /// Call and put rho by centered difference on the rate.
  pub fn rho_fd(&self, eps: f64) -> (f64, f64) {
    central_difference_pair(|r| self.with_rate(r).calculate_call_put(), self.r, eps)
  }

  /// Prices and greeks of both legs.
  pub fn snapshot(&self) -> BSMSnapshot {
    let (call, put) = self.calculate_call_put();
    let call_delta = self.call_delta();
    let (call_theta, put_theta) = self.theta_pair();

    BSMSnapshot {
      call,
      put,
      call_delta,
      put_delta: call_delta - 1.0,
      gamma: self.gamma(),
      vega: self.vega(),
      call_theta: call_theta / DAYS_PER_YEAR,
      put_theta: put_theta / DAYS_PER_YEAR,
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::*;
  use crate::quant::pricing::finite_difference::central_difference;

  fn atm() -> BSMPricer {
    BSMPricer::builder(100.0, 0.2, 100.0, 0.05).tau(1.0).build()
  }

  #[test]
  fn bsm_price() {
    let (call, put) = atm().calculate_call_put();

    assert_abs_diff_eq!(call, 10.450583572185565, epsilon = 1e-8);
    assert_abs_diff_eq!(put, 5.573526022256971, epsilon = 1e-8);
  }

  #[test]
  fn bsm_greeks() {
    let snap = atm().snapshot();

    assert_abs_diff_eq!(snap.call_delta, 0.6368306511756191, epsilon = 1e-10);
    assert_abs_diff_eq!(snap.gamma, 0.018762017345846895, epsilon = 1e-10);
    assert_abs_diff_eq!(snap.vega, 37.52403469169379, epsilon = 1e-8);
  }

  #[test]
  fn put_call_parity() {
    for &(s, k, r, v, t) in &[
      (100.0, 100.0, 0.05, 0.2, 1.0),
      (82_000.0, 93_800.0, 0.05, 0.5, 0.3),
      (50.0, 70.0, 0.0, 0.8, 2.5),
      (120.0, 90.0, 0.12, 0.05, 0.01),
    ] {
      let snap = bs_call_put(s, k, r, v, t);
      let forward_gap = s - k * (-r * t).exp();
      assert_abs_diff_eq!(snap.call - snap.put, forward_gap, epsilon = 1e-6);
    }
  }

  #[test]
  fn call_minus_put_delta_is_one() {
    for &s in &[60.0, 95.0, 100.0, 105.0, 160.0] {
      let snap = bs_call_put(s, 100.0, 0.03, 0.35, 0.75);
      assert_abs_diff_eq!(snap.call_delta - snap.put_delta, 1.0, epsilon = 1e-12);
    }
  }

  #[test]
  fn expiry_returns_intrinsic_and_step_delta() {
    let itm = bs_call_put(110.0, 100.0, 0.05, 0.2, 0.0);
    assert_eq!(itm.call, 10.0);
    assert_eq!(itm.put, 0.0);
    assert_eq!(itm.call_delta, 1.0);
    assert_eq!(itm.put_delta, 0.0);

    let otm = bs_call_put(90.0, 100.0, 0.05, 0.2, -0.5);
    assert_eq!(otm.call, 0.0);
    assert_eq!(otm.put, 10.0);
    assert_eq!(otm.call_delta, 0.0);
    assert_eq!(otm.put_delta, -1.0);

    let at_strike = bs_call_put(100.0, 100.0, 0.05, 0.2, 0.0);
    assert_eq!(at_strike.call_delta, 0.0);

    for snap in [itm, otm, at_strike] {
      assert_eq!(snap.gamma, 0.0);
      assert_eq!(snap.vega, 0.0);
      assert_eq!(snap.call_theta, 0.0);
      assert_eq!(snap.put_theta, 0.0);
    }
  }

  #[test]
  fn theta_is_negative_time_derivative() {
    for option_type in [OptionType::Call, OptionType::Put] {
      let pricer = BSMPricer {
        option_type,
        ..atm()
      };
      let d_dt = central_difference(|t| pricer.with_tau(t).calculate_price(), 1.0, 1e-5);
      assert_abs_diff_eq!(pricer.theta(), -d_dt, epsilon = 1e-4);
      assert_relative_eq!(
        pricer.theta_per_day() * DAYS_PER_YEAR,
        pricer.theta(),
        max_relative = 1e-12
      );
    }
  }

  #[test]
  fn rho_fd_converges_to_analytic() {
    let call = atm();
    let put = BSMPricer {
      option_type: OptionType::Put,
      ..atm()
    };
    let analytic = (call.rho(), put.rho());

    let mut eps = 1e-2;
    let mut last = (f64::INFINITY, f64::INFINITY);
    for _ in 0..5 {
      let (c, p) = call.rho_fd(eps);
      let err = ((c - analytic.0).abs(), (p - analytic.1).abs());
      assert!(err.0 < last.0, "call rho error did not shrink at eps={eps}");
      assert!(err.1 < last.1, "put rho error did not shrink at eps={eps}");
      last = err;
      eps /= 2.0;
    }

    let (c, p) = call.rho_fd(RHO_BUMP);
    assert_abs_diff_eq!(c, analytic.0, epsilon = 1e-4);
    assert_abs_diff_eq!(p, analytic.1, epsilon = 1e-4);
  }

  #[test]
  fn derivatives_follow_option_type() {
    let put = BSMPricer {
      option_type: OptionType::Put,
      ..atm()
    };
    let greeks = put.derivatives();

    assert_eq!(greeks.len(), 5);
    assert_abs_diff_eq!(greeks[0], put.snapshot().put_delta, epsilon = 1e-15);
    assert_abs_diff_eq!(greeks[2], put.snapshot().put_theta, epsilon = 1e-15);
    assert!(greeks[4] < 0.0);
  }

  #[test]
  fn tau_from_timestamps() {
    let eval = NaiveDate::from_ymd_opt(2026, 1, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    let expiration = NaiveDate::from_ymd_opt(2027, 1, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    let dated = BSMPricer::builder(100.0, 0.2, 100.0, 0.05)
      .eval(eval)
      .expiration(expiration)
      .build();

    assert_abs_diff_eq!(dated.calculate_tau_in_years(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
      dated.calculate_price(),
      atm().calculate_price(),
      epsilon = 1e-10
    );
  }

  #[test]
  fn missing_time_counts_as_expired() {
    let undated = BSMPricer::builder(120.0, 0.2, 100.0, 0.05).build();
    assert!(undated.is_expired());
    assert_eq!(undated.calculate_price(), 20.0);
  }
}
