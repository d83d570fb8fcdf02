//! Aggregation of transactions into the three summary tables
//!
//! Each table is regenerated wholesale from the transaction list and persisted
//! as a CSV file in the data directory. Consumers reload the files rather than
//! holding on to a shared copy.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::import::{AMOUNT_COLUMN, CATEGORY_COLUMN, GENDER_COLUMN};
use crate::models::{CategoryRevenue, CustomerSegment, MonthlyRevenue, Transaction};

pub const CATEGORY_FILE: &str = "revenue_by_category.csv";
pub const MONTHLY_FILE: &str = "monthly_revenue.csv";
pub const SEGMENTS_FILE: &str = "customer_segments.csv";

pub const MONTH_COLUMN: &str = "Month";

const CATEGORY_HEADERS: [&str; 2] = [CATEGORY_COLUMN, AMOUNT_COLUMN];
const MONTHLY_HEADERS: [&str; 2] = [MONTH_COLUMN, AMOUNT_COLUMN];
const SEGMENT_HEADERS: [&str; 3] = [GENDER_COLUMN, CATEGORY_COLUMN, AMOUNT_COLUMN];

/// Sum amounts per product category, rows ordered by category name
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryRevenue> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    totals
        .into_iter()
        .map(|(category, total_amount)| CategoryRevenue {
            category: category.to_string(),
            total_amount,
        })
        .collect()
}

/// Sum amounts per calendar month, rows in chronological order
pub fn aggregate_by_month(transactions: &[Transaction]) -> Vec<MonthlyRevenue> {
    // (year, month) keys sort chronologically, unlike the rendered label for years < 1000
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        *totals
            .entry((tx.date.year(), tx.date.month()))
            .or_default() += tx.amount;
    }

    totals
        .into_iter()
        .map(|((year, month), total_amount)| MonthlyRevenue {
            month: format!("{:04}-{:02}", year, month),
            total_amount,
        })
        .collect()
}

/// Sum amounts per (gender, category) pair, ordered by gender then category
pub fn aggregate_by_segment(transactions: &[Transaction]) -> Vec<CustomerSegment> {
    let mut totals: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for tx in transactions {
        *totals
            .entry((tx.gender.as_str(), tx.category.as_str()))
            .or_default() += tx.amount;
    }

    totals
        .into_iter()
        .map(|((gender, category), total_amount)| CustomerSegment {
            gender: gender.to_string(),
            category: category.to_string(),
            total_amount,
        })
        .collect()
}

/// Locations of the persisted aggregate tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn category(&self) -> PathBuf {
        self.dir.join(CATEGORY_FILE)
    }

    pub fn monthly(&self) -> PathBuf {
        self.dir.join(MONTHLY_FILE)
    }

    pub fn segments(&self) -> PathBuf {
        self.dir.join(SEGMENTS_FILE)
    }
}

/// The three aggregate tables, as produced by one aggregation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub customer_segments: Vec<CustomerSegment>,
}

impl Datasets {
    /// Build all three tables from raw transactions
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            revenue_by_category: aggregate_by_category(transactions),
            monthly_revenue: aggregate_by_month(transactions),
            customer_segments: aggregate_by_segment(transactions),
        }
    }

    /// Persist all three tables, creating the data directory if needed
    ///
    /// Every table is written to a staging file first. The live files are
    /// only replaced once all three writes succeeded, so a failed run leaves
    /// the previous tables in place.
    pub fn write(&self, paths: &DataPaths) -> Result<()> {
        fs::create_dir_all(paths.dir())?;

        let targets = [paths.category(), paths.monthly(), paths.segments()];
        if let Err(err) = self.stage(paths) {
            for target in &targets {
                let _ = fs::remove_file(staging_path(target));
            }
            return Err(err);
        }
        for target in &targets {
            fs::rename(staging_path(target), target)?;
        }

        info!(
            dir = %paths.dir().display(),
            categories = self.revenue_by_category.len(),
            months = self.monthly_revenue.len(),
            segments = self.customer_segments.len(),
            "Analytics datasets generated"
        );
        Ok(())
    }

    fn stage(&self, paths: &DataPaths) -> Result<()> {
        write_table(
            &staging_path(&paths.category()),
            &CATEGORY_HEADERS,
            &self.revenue_by_category,
        )?;
        write_table(
            &staging_path(&paths.monthly()),
            &MONTHLY_HEADERS,
            &self.monthly_revenue,
        )?;
        write_table(
            &staging_path(&paths.segments()),
            &SEGMENT_HEADERS,
            &self.customer_segments,
        )
    }

    /// Load all three tables from disk
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            revenue_by_category: read_table(&paths.category())?,
            monthly_revenue: read_table(&paths.monthly())?,
            customer_segments: read_table(&paths.segments())?,
        })
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a table with an explicit header row, so empty tables keep their columns
fn write_table<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote table");
    Ok(())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_path(path)?;

    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
