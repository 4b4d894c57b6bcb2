use chrono::NaiveDateTime;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Pricer trait.
pub trait PricerExt: TimeExt {
  /// Calculate the call and put price.
  fn calculate_call_put(&self) -> (f64, f64);

  /// Calculate the price of the configured option type.
  fn calculate_price(&self) -> f64;

  /// Derivatives (greeks).
  fn derivatives(&self) -> Vec<f64> {
    vec![]
  }
}

pub trait TimeExt {
  fn tau(&self) -> Option<f64>;

  fn eval(&self) -> Option<NaiveDateTime> {
    None
  }

  fn expiration(&self) -> Option<NaiveDateTime> {
    None
  }

  /// Return tau directly, or compute it from the eval/expiration timestamps.
  fn tau_or_from_dates(&self) -> Option<f64> {
    if let Some(tau) = self.tau() {
      return Some(tau);
    }
    match (self.eval(), self.expiration()) {
      (Some(e), Some(x)) => {
        Some(x.signed_duration_since(e).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_YEAR)
      }
      _ => None,
    }
  }

  /// Calculate tau in years. Missing time information counts as expired.
  fn calculate_tau_in_years(&self) -> f64 {
    self.tau_or_from_dates().unwrap_or(0.0)
  }
}

/// Expiry payoff of a position or strategy in the underlying price $S_T$.
pub trait PayoffExt {
  /// Display name.
  fn name(&self) -> &'static str;

  /// Value at expiry, premiums excluded.
  fn payoff(&self, s_t: f64) -> f64;

  /// Profit/loss at expiry, premiums included.
  fn profit(&self, s_t: f64) -> f64 {
    self.payoff(s_t)
  }

  /// Underlying price where the profit crosses zero.
  fn breakeven(&self) -> Option<f64> {
    None
  }

  /// Maximum profit, `None` when unbounded.
  fn max_profit(&self) -> Option<f64> {
    None
  }
}
