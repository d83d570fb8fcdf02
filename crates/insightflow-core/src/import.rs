//! CSV import for retail transaction files
//!
//! Expected header: `Date, Gender, Product Category, Total Amount` (any order,
//! surrounding whitespace ignored). Extra columns such as `Customer ID` or
//! `Quantity` are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Transaction;

pub const DATE_COLUMN: &str = "Date";
pub const GENDER_COLUMN: &str = "Gender";
pub const CATEGORY_COLUMN: &str = "Product Category";
pub const AMOUNT_COLUMN: &str = "Total Amount";

/// Column positions resolved from the header row
struct ColumnIndex {
    date: usize,
    gender: usize,
    category: usize,
    amount: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            gender: find(GENDER_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
        })
    }
}

/// Load transactions from a CSV file on disk
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let transactions = parse_transactions(file)?;
    info!(
        path = %path.display(),
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Parse transactions from any CSV reader
///
/// Any malformed row aborts the whole load; there is no partial import.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;
    let mut transactions = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;

        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, DATE_COLUMN)?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let amount = parse_amount(field(columns.amount, AMOUNT_COLUMN)?)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;

        transactions.push(Transaction {
            date,
            gender: field(columns.gender, GENDER_COLUMN)?.trim().to_string(),
            category: field(columns.category, CATEGORY_COLUMN)?.trim().to_string(),
            amount,
        });
    }

    debug!("Parsed {} transaction rows", transactions.len());
    Ok(transactions)
}

/// Parse a date string in various common formats
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2023-11-24
        "%m/%d/%Y", // 11/24/2023
        "%Y/%m/%d", // 2023/11/24
        "%d-%m-%Y", // 24-11-2023
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Timestamps like "2023-11-24 00:00:00"
    if let Some((day, _)) = s.split_once(' ') {
        if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    Err(format!("Unable to parse date: {}", s))
}

/// Parse an amount string, tolerating currency symbols and thousands separators
fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s.trim().replace(['$', ',', ' '], "");

    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| format!("Unable to parse amount: {}", s))?;

    if !amount.is_finite() {
        return Err(format!("Amount is not a finite number: {}", s));
    }
    Ok(amount)
}
