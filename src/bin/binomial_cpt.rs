use anyhow::Result;
use options_lab::quant::pricing::binomial::BinomialPricer;
use options_lab::quant::OptionType;

fn main() -> Result<()> {
  options_lab::telemetry::init();

  for option_type in [OptionType::Call, OptionType::Put] {
    let cpt = BinomialPricer::new(100.0, 110.0, 0.05, 1.0, 1.6, 0.7, option_type).cpt()?;
    println!("{cpt}");
  }
  Ok(())
}
