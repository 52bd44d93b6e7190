//! Shared test fixtures: a scripted provider and a non-sleeping pacer.

use holderscan::domain::error::HolderscanError;
use holderscan::domain::record::{HolderFilter, HolderRecord, StockBasic};
use holderscan::domain::retry::RetryPolicy;
use holderscan::ports::pacing_port::Pacer;
use holderscan::ports::provider_port::HolderProvider;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

pub struct RecordingPacer {
    pub pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self {
            pauses: RefCell::new(Vec::new()),
        }
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

/// Provider answering from a fixed script; codes in `failing` always error.
pub struct FakeProvider {
    pub universe: Vec<StockBasic>,
    pub rows: HashMap<String, Vec<HolderRecord>>,
    pub failing: Vec<String>,
}

impl FakeProvider {
    pub fn new(universe: Vec<StockBasic>) -> Self {
        Self {
            universe,
            rows: HashMap::new(),
            failing: Vec::new(),
        }
    }

    pub fn with_rows(mut self, code: &str, rows: Vec<HolderRecord>) -> Self {
        self.rows.insert(code.to_string(), rows);
        self
    }

    pub fn with_failing(mut self, code: &str) -> Self {
        self.failing.push(code.to_string());
        self
    }
}

impl HolderProvider for FakeProvider {
    fn stock_universe(&self) -> Result<Vec<StockBasic>, HolderscanError> {
        Ok(self.universe.clone())
    }

    fn top10_holders(&self, filter: &HolderFilter) -> Result<Vec<HolderRecord>, HolderscanError> {
        let code = filter
            .ts_code
            .as_ref()
            .map(|c| c.as_str().to_string())
            .unwrap_or_default();
        if self.failing.contains(&code) {
            return Err(HolderscanError::Provider {
                reason: "simulated outage".into(),
            });
        }
        Ok(self.rows.get(&code).cloned().unwrap_or_default())
    }
}

pub fn stock(code: &str) -> StockBasic {
    StockBasic {
        ts_code: code.to_string(),
        symbol: code[..6].to_string(),
        name: format!("Stock {}", &code[..6]),
    }
}

pub fn row(code: &str, holder: &str, period: &str) -> HolderRecord {
    HolderRecord {
        ts_code: code.to_string(),
        holder_name: holder.to_string(),
        end_date: period.to_string(),
        ann_date: "20240428".to_string(),
        hold_amount: "1000000".to_string(),
        hold_ratio: "1.50".to_string(),
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        backoff_min: Duration::ZERO,
        backoff_max: Duration::ZERO,
    }
}
