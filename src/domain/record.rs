//! Holder disclosure records, universe entries and fetch filters.

use crate::domain::security::TsCode;
use chrono::NaiveDate;

/// One top-10 floating shareholder disclosure row: stock `ts_code` had
/// `holder_name` on its register for report period `end_date`, announced on
/// `ann_date`. The provider's numeric fields are carried verbatim as opaque
/// text; full-row equality is the dedup identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HolderRecord {
    pub ts_code: String,
    pub holder_name: String,
    /// Report period, YYYYMMDD.
    pub end_date: String,
    /// Announcement date, YYYYMMDD.
    pub ann_date: String,
    pub hold_amount: String,
    pub hold_ratio: String,
}

/// One listed stock from the provider's universe listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockBasic {
    pub ts_code: String,
    pub symbol: String,
    pub name: String,
}

/// Filter dimensions passed through to the provider. Omitted fields mean
/// "unfiltered" on that dimension.
#[derive(Debug, Clone, Default)]
pub struct HolderFilter {
    pub ts_code: Option<TsCode>,
    /// Report period, YYYYMMDD.
    pub period: Option<String>,
    /// Announcement date, YYYYMMDD.
    pub ann_date: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HolderFilter {
    pub fn for_code(ts_code: TsCode) -> Self {
        Self {
            ts_code: Some(ts_code),
            ..Self::default()
        }
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}
