use anyhow::Result;
use chrono::NaiveDate;
use frontier_rs::config::EngineConfig;
use frontier_rs::market::sanitize_tickers;
use frontier_rs::market::PriceTable;
use frontier_rs::portfolio::PortfolioEngine;
use frontier_rs::report::allocation;
use frontier_rs::report::FrontierPayload;
use frontier_rs::report::RiskPayload;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::Normal;

/// Demo run over synthetic GBM-style closes: build a price table, run the
/// full pipeline and print the service payloads.
fn main() -> Result<()> {
  let tickers = sanitize_tickers(&[" TSLA ", "AAPL", "SPY", ""])?;

  let rows = 504;
  let mut rng = StdRng::seed_from_u64(42);
  let params = [(0.0012, 0.030), (0.0008, 0.018), (0.0004, 0.010)];

  let dates: Vec<NaiveDate> = (0..rows)
    .map(|i| NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Days::new(i as u64))
    .collect();

  let columns = params
    .iter()
    .map(|&(drift, vol)| {
      let noise = Normal::new(drift, vol).unwrap();
      let mut price = 100.0;
      (0..rows)
        .map(|_| {
          price *= 1.0 + noise.sample(&mut rng);
          Some(price)
        })
        .collect()
    })
    .collect();

  let prices = PriceTable::new(dates, tickers.clone(), columns)?;

  let engine = PortfolioEngine::new(EngineConfig {
    frontier_samples: 5000,
    ..EngineConfig::default()
  });
  let report = engine.analyze(&prices)?;

  println!("== risk ==");
  println!(
    "{}",
    serde_json::to_string_pretty(&RiskPayload::from(&report.risk))?
  );

  println!("== allocation ==");
  let weights = report.optimal.weights.clone().unwrap_or_default();
  println!(
    "{}",
    serde_json::to_string_pretty(&allocation(&tickers, &weights))?
  );

  println!("== frontier ==");
  let frontier = FrontierPayload::new(&report.frontier, &report.optimal);
  println!(
    "best-of-sample sharpe {:.4}, optimized sharpe {:.4}",
    report.frontier.best.sharpe_ratio, report.optimal.sharpe_ratio
  );
  println!("{} random portfolios", frontier.random_portfolios.len());

  Ok(())
}
