//! Tushare Pro HTTP provider adapter.
//!
//! Tushare exposes a single POST endpoint taking `{api_name, token, params,
//! fields}` and answering with a columnar `{fields, items}` payload. The
//! client is constructed once with its token and passed by reference into
//! the collector; there is no ambient global credential.

use crate::domain::error::HolderscanError;
use crate::domain::record::{HolderFilter, HolderRecord, StockBasic};
use crate::ports::provider_port::HolderProvider;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://api.tushare.pro";

const HOLDER_FIELDS: &str = "ts_code,holder_name,end_date,ann_date,hold_amount,hold_ratio";
const STOCK_FIELDS: &str = "ts_code,symbol,name";

pub struct TushareClient {
    http: reqwest::blocking::Client,
    api_url: String,
    token: String,
}

impl TushareClient {
    pub fn new(token: String, api_url: Option<String>) -> Result<Self, HolderscanError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HolderscanError::Provider {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token,
        })
    }

    fn call(&self, api_name: &str, params: Value, fields: &str) -> Result<ApiData, HolderscanError> {
        let body = json!({
            "api_name": api_name,
            "token": self.token,
            "params": params,
            "fields": fields,
        });

        let response = self
            .http
            .post(&self.api_url)
            .json(&body)
            .send()
            .map_err(|e| HolderscanError::Provider {
                reason: format!("{api_name}: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HolderscanError::Provider {
                reason: format!("{api_name}: HTTP {status}"),
            });
        }

        let envelope: ApiResponse = response.json().map_err(|e| HolderscanError::Provider {
            reason: format!("{api_name}: malformed response: {e}"),
        })?;
        if envelope.code != 0 {
            return Err(HolderscanError::Provider {
                reason: format!(
                    "{api_name}: {}",
                    envelope.msg.unwrap_or_else(|| format!("code {}", envelope.code))
                ),
            });
        }
        Ok(envelope.data.unwrap_or_default())
    }
}

impl HolderProvider for TushareClient {
    fn stock_universe(&self) -> Result<Vec<StockBasic>, HolderscanError> {
        let data = self.call(
            "stock_basic",
            json!({ "exchange": "", "list_status": "L" }),
            STOCK_FIELDS,
        )?;
        Ok(stocks_from(&data))
    }

    fn top10_holders(&self, filter: &HolderFilter) -> Result<Vec<HolderRecord>, HolderscanError> {
        let mut params = serde_json::Map::new();
        if let Some(code) = &filter.ts_code {
            params.insert("ts_code".into(), json!(code.as_str()));
        }
        if let Some(period) = &filter.period {
            params.insert("period".into(), json!(period));
        }
        if let Some(ann_date) = &filter.ann_date {
            params.insert("ann_date".into(), json!(ann_date));
        }
        if let Some(start) = filter.start_date {
            params.insert("start_date".into(), json!(start.format("%Y%m%d").to_string()));
        }
        if let Some(end) = filter.end_date {
            params.insert("end_date".into(), json!(end.format("%Y%m%d").to_string()));
        }

        let data = self.call("top10_floatholders", Value::Object(params), HOLDER_FIELDS)?;
        Ok(holders_from(&data))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<ApiData>,
}

/// Columnar payload: one `fields` header list plus row-major `items`.
#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    items: Vec<Vec<Value>>,
}

impl ApiData {
    fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}

/// Cell as text; nulls become empty strings, numbers keep their JSON
/// rendering so the payload stays opaque.
fn cell(item: &[Value], index: Option<usize>) -> String {
    match index.and_then(|i| item.get(i)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn holders_from(data: &ApiData) -> Vec<HolderRecord> {
    let ts_code = data.column("ts_code");
    let holder_name = data.column("holder_name");
    let end_date = data.column("end_date");
    let ann_date = data.column("ann_date");
    let hold_amount = data.column("hold_amount");
    let hold_ratio = data.column("hold_ratio");

    data.items
        .iter()
        .map(|item| HolderRecord {
            ts_code: cell(item, ts_code),
            holder_name: cell(item, holder_name),
            end_date: cell(item, end_date),
            ann_date: cell(item, ann_date),
            hold_amount: cell(item, hold_amount),
            hold_ratio: cell(item, hold_ratio),
        })
        .collect()
}

fn stocks_from(data: &ApiData) -> Vec<StockBasic> {
    let ts_code = data.column("ts_code");
    let symbol = data.column("symbol");
    let name = data.column("name");

    data.items
        .iter()
        .map(|item| StockBasic {
            ts_code: cell(item, ts_code),
            symbol: cell(item, symbol),
            name: cell(item, name),
        })
        .collect()
}
