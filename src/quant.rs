use std::fmt::Display;

pub mod pricing;
pub mod strategies;

/// Option type.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum OptionType {
  #[default]
  Call,
  Put,
}

impl OptionType {
  /// Intrinsic value at underlying level `s` for strike `k`.
  pub fn payoff(self, s: f64, k: f64) -> f64 {
    match self {
      OptionType::Call => (s - k).max(0.0),
      OptionType::Put => (k - s).max(0.0),
    }
  }
}

impl Display for OptionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      OptionType::Call => write!(f, "call"),
      OptionType::Put => write!(f, "put"),
    }
  }
}
