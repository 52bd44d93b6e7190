//! Batch collection across the stock universe, plus the single-key fetch.
//!
//! Both paths go through the one [`RetryPolicy`] instance so their failure
//! behavior stays identical. The batch loop is strictly sequential: the
//! provider enforces an implicit global rate limit, and a periodic cooldown
//! is the only safe way to respect it.

use crate::domain::error::HolderscanError;
use crate::domain::record::{HolderFilter, HolderRecord, StockBasic};
use crate::domain::retry::RetryPolicy;
use crate::domain::security::TsCode;
use crate::ports::pacing_port::Pacer;
use crate::ports::provider_port::HolderProvider;
use std::time::Duration;
use tracing::{error, info, warn};

/// Hard floor on provider pacing: pause after every this many processed
/// identifiers, success or failure.
pub const COOLDOWN_EVERY: usize = 200;
pub const COOLDOWN: Duration = Duration::from_secs(20);

#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub rows: Vec<HolderRecord>,
    /// Codes abandoned after the retry budget was exhausted.
    pub skipped: Vec<String>,
}

pub struct Collector<'a> {
    provider: &'a dyn HolderProvider,
    pacer: &'a dyn Pacer,
    retry: RetryPolicy,
    cooldown_every: usize,
    cooldown: Duration,
}

impl<'a> Collector<'a> {
    pub fn new(provider: &'a dyn HolderProvider, pacer: &'a dyn Pacer) -> Self {
        Self {
            provider,
            pacer,
            retry: RetryPolicy::default(),
            cooldown_every: COOLDOWN_EVERY,
            cooldown: COOLDOWN,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cooldown(mut self, every: usize, cooldown: Duration) -> Self {
        self.cooldown_every = every.max(1);
        self.cooldown = cooldown;
        self
    }

    /// Fetch the listed-stock universe once, retry-protected.
    pub fn universe(&self) -> Result<Vec<StockBasic>, HolderscanError> {
        self.retry
            .run(self.pacer, "fetch stock universe", || {
                self.provider.stock_universe()
            })
    }

    /// Fetch holder rows for every stock in the universe. `base` carries the
    /// period/date filters applied to each per-stock fetch.
    ///
    /// One bad identifier never aborts the batch: after the retry budget is
    /// spent it is logged at error, recorded in `skipped`, and the loop moves
    /// on. Empty responses contribute zero rows.
    pub fn collect(&self, universe: &[StockBasic], base: &HolderFilter) -> CollectOutcome {
        let mut outcome = CollectOutcome::default();

        for (i, stock) in universe.iter().enumerate() {
            match self.fetch_one(stock, base) {
                Ok(rows) => outcome.rows.extend(rows),
                Err(e) => {
                    error!("skipping {}: {}", stock.ts_code, e);
                    outcome.skipped.push(stock.ts_code.clone());
                }
            }

            let processed = i + 1;
            if processed % self.cooldown_every == 0 {
                info!(
                    "processed {} stocks, cooling down for {}s",
                    processed,
                    self.cooldown.as_secs()
                );
                self.pacer.pause(self.cooldown);
            }
        }

        outcome
    }

    fn fetch_one(
        &self,
        stock: &StockBasic,
        base: &HolderFilter,
    ) -> Result<Vec<HolderRecord>, HolderscanError> {
        let code = TsCode::new(&stock.ts_code)?;
        let mut filter = base.clone();
        filter.ts_code = Some(code.clone());
        let context = format!("fetch top10 holders for {code}");
        self.retry
            .run(self.pacer, &context, || self.provider.top10_holders(&filter))
    }
}

/// Single-key fetch with optional exact holder-name projection. Shares the
/// batch path's retry policy; the post-fetch name filter is an exact match,
/// unlike the fuzzy query engine.
pub fn fetch_holders(
    provider: &dyn HolderProvider,
    pacer: &dyn Pacer,
    retry: &RetryPolicy,
    filter: &HolderFilter,
    holder_name: Option<&str>,
) -> Result<Vec<HolderRecord>, HolderscanError> {
    let context = match &filter.ts_code {
        Some(code) => format!("fetch top10 holders for {code}"),
        None => "fetch top10 holders".to_string(),
    };
    let rows = retry.run(pacer, &context, || provider.top10_holders(filter))?;
    if rows.is_empty() {
        warn!("no holder rows matched the filter");
    }
    Ok(match holder_name {
        Some(name) => rows.into_iter().filter(|r| r.holder_name == name).collect(),
        None => rows,
    })
}
