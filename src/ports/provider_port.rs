//! Remote holder-data provider port trait.

use crate::domain::error::HolderscanError;
use crate::domain::record::{HolderFilter, HolderRecord, StockBasic};

pub trait HolderProvider {
    /// The full listed-stock universe with basic descriptive fields.
    fn stock_universe(&self) -> Result<Vec<StockBasic>, HolderscanError>;

    /// One page of top-10 floating shareholder rows matching the filter.
    /// An empty result is a legitimate answer, not an error.
    fn top10_holders(&self, filter: &HolderFilter) -> Result<Vec<HolderRecord>, HolderscanError>;
}
