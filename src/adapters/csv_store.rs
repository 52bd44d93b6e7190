//! CSV artifact store.
//!
//! One UTF-8 CSV artifact per calendar day of collection plus one per query
//! invocation, all under a single base directory. Merging is an explicit
//! load / concatenate / dedup / rewrite cycle; re-merging the same rows is
//! a no-op.

use crate::domain::artifact::{daily_artifact_name, parse_daily_date, query_artifact_name};
use crate::domain::dataset::dedup_rows;
use crate::domain::error::HolderscanError;
use crate::domain::query::QueryOutcome;
use crate::domain::record::HolderRecord;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const HEADERS: [&str; 6] = [
    "ts_code",
    "holder_name",
    "end_date",
    "ann_date",
    "hold_amount",
    "hold_ratio",
];

pub struct CsvStore {
    base_path: PathBuf,
}

impl CsvStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Merge `new_rows` into the named artifact: existing rows keep their
    /// position and priority, appended rows that duplicate an existing row
    /// are dropped. Returns the deduplicated rows as written.
    pub fn merge_and_persist(
        &self,
        new_rows: Vec<HolderRecord>,
        name: &str,
    ) -> Result<Vec<HolderRecord>, HolderscanError> {
        let path = self.artifact_path(name);
        let mut combined = if path.exists() {
            self.read_rows(&path)?
        } else {
            Vec::new()
        };
        combined.extend(new_rows);
        let rows = dedup_rows(combined);
        self.write_rows(&path, &rows)?;
        Ok(rows)
    }

    /// Merge into the daily artifact for `date`.
    pub fn merge_daily(
        &self,
        new_rows: Vec<HolderRecord>,
        date: NaiveDate,
    ) -> Result<(PathBuf, Vec<HolderRecord>), HolderscanError> {
        let name = daily_artifact_name(date);
        let rows = self.merge_and_persist(new_rows, &name)?;
        Ok((self.artifact_path(&name), rows))
    }

    /// The most recent daily artifact, by the date embedded in its name.
    /// `None` when the directory is missing or holds no daily artifacts.
    pub fn latest_daily(&self) -> Result<Option<(NaiveDate, Vec<HolderRecord>)>, HolderscanError> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HolderscanError::Store {
                    reason: format!("failed to read {}: {}", self.base_path.display(), e),
                });
            }
        };

        let mut latest: Option<(NaiveDate, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| HolderscanError::Store {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            if let Some(date) = parse_daily_date(&name.to_string_lossy()) {
                if latest.as_ref().is_none_or(|(best, _)| date > *best) {
                    latest = Some((date, entry.path()));
                }
            }
        }

        match latest {
            Some((date, path)) => Ok(Some((date, self.read_rows(&path)?))),
            None => Ok(None),
        }
    }

    /// Write a query result as its own derived artifact, never touching the
    /// source dataset.
    pub fn write_query_result(
        &self,
        outcome: &QueryOutcome,
        date: NaiveDate,
    ) -> Result<PathBuf, HolderscanError> {
        let path = self.artifact_path(&query_artifact_name(&outcome.predicates, date));
        self.write_rows(&path, &outcome.rows)?;
        Ok(path)
    }

    fn read_rows(&self, path: &PathBuf) -> Result<Vec<HolderRecord>, HolderscanError> {
        let content = fs::read_to_string(path).map_err(|e| HolderscanError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        // Fields are bound by position below, so the header row must match
        // exactly; a reordered or foreign table is rejected, not misread.
        let headers = rdr
            .headers()
            .map_err(|e| HolderscanError::Store {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?
            .clone();
        if headers.iter().ne(HEADERS) {
            return Err(HolderscanError::Store {
                reason: format!(
                    "unexpected columns in {}: got [{}], expected [{}]",
                    path.display(),
                    headers.iter().collect::<Vec<_>>().join(","),
                    HEADERS.join(",")
                ),
            });
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| HolderscanError::Store {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let field = |i: usize, name: &str| -> Result<String, HolderscanError> {
                record
                    .get(i)
                    .map(str::to_string)
                    .ok_or_else(|| HolderscanError::Store {
                        reason: format!("missing {name} column in {}", path.display()),
                    })
            };
            rows.push(HolderRecord {
                ts_code: field(0, HEADERS[0])?,
                holder_name: field(1, HEADERS[1])?,
                end_date: field(2, HEADERS[2])?,
                ann_date: field(3, HEADERS[3])?,
                hold_amount: field(4, HEADERS[4])?,
                hold_ratio: field(5, HEADERS[5])?,
            });
        }
        Ok(rows)
    }

    fn write_rows(&self, path: &PathBuf, rows: &[HolderRecord]) -> Result<(), HolderscanError> {
        fs::create_dir_all(&self.base_path).map_err(|e| HolderscanError::Store {
            reason: format!("failed to create {}: {}", self.base_path.display(), e),
        })?;

        let mut wtr = csv::Writer::from_path(path).map_err(|e| HolderscanError::Store {
            reason: format!("failed to open {} for writing: {}", path.display(), e),
        })?;
        let io_err = |e: csv::Error| HolderscanError::Store {
            reason: format!("failed to write {}: {}", path.display(), e),
        };
        wtr.write_record(HEADERS).map_err(io_err)?;
        for row in rows {
            wtr.write_record([
                row.ts_code.as_str(),
                row.holder_name.as_str(),
                row.end_date.as_str(),
                row.ann_date.as_str(),
                row.hold_amount.as_str(),
                row.hold_ratio.as_str(),
            ])
            .map_err(io_err)?;
        }
        wtr.flush().map_err(|e| HolderscanError::Store {
            reason: format!("failed to flush {}: {}", path.display(), e),
        })
    }
}
