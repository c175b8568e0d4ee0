// 🏦 Statement Normalizer - Raw bank export → uniform transactions
//
// The bank export arrives as up to 12 independently-fetched pages
// (page1.csv .. page12.csv) with no guaranteed header. Transaction rows sit
// between headers, totals and narrative lines, so rows are detected
// heuristically and everything unrecognizable is skipped, with the skip
// reason classified at each parse boundary instead of a catch-all.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Maximum number of statement pages probed per run
pub const MAX_PAGES: u32 = 12;

/// Minimum field count for a row to qualify as a transaction candidate
const MIN_COLUMNS: usize = 5;

/// Positional field holding the posting amount
const AMOUNT_FIELD: usize = 4;

// ============================================================================
// TRANSACTION
// ============================================================================

/// Transaction - One recognized bank-statement row
///
/// No identity beyond its two fields. Duplicates are legal and meaningful:
/// each one represents a distinct deposit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
}

// ============================================================================
// SKIP CLASSIFICATION
// ============================================================================

/// SkipReason - Why a statement row was dropped
///
/// Dropped rows are expected noise (headers, totals, narrative lines), never
/// errors. Each parse boundary gets its own reason so tests and the console
/// summary can see what was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Fewer than 5 positional fields
    TooFewColumns,
    /// First field carries no `.`, so no embedded DD.MM.YYYY token
    NoDateMarker,
    /// Date token present but does not parse as DD.MM.YYYY
    BadDate,
    /// Amount field does not parse as a signed decimal
    BadAmount,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::TooFewColumns => "too few columns",
            SkipReason::NoDateMarker => "no date marker",
            SkipReason::BadDate => "unparseable date",
            SkipReason::BadAmount => "unparseable amount",
        };
        write!(f, "{}", text)
    }
}

/// StatementStats - What the Normalizer saw during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementStats {
    pub pages_loaded: u32,
    pub pages_skipped: u32,
    pub rows_parsed: u32,
    pub too_few_columns: u32,
    pub no_date_marker: u32,
    pub bad_date: u32,
    pub bad_amount: u32,
}

impl StatementStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::TooFewColumns => self.too_few_columns += 1,
            SkipReason::NoDateMarker => self.no_date_marker += 1,
            SkipReason::BadDate => self.bad_date += 1,
            SkipReason::BadAmount => self.bad_amount += 1,
        }
    }

    pub fn rows_skipped(&self) -> u32 {
        self.too_few_columns + self.no_date_marker + self.bad_date + self.bad_amount
    }
}

// ============================================================================
// ROW PARSING
// ============================================================================

/// Parse one raw statement row into a Transaction
///
/// A row qualifies as a transaction candidate iff it has at least 5 fields
/// and field 0 contains a `.` (exports embed dates like "15.03.2024 10:22"
/// alongside narrative text in the same cell). The date is the token before
/// the first whitespace in field 0; the amount is field 4 with spaces
/// stripped, decimal comma turned into a point and a leading `+` removed.
///
/// # Examples
/// ```
/// use csv::StringRecord;
/// use rent_recon::parse_statement_row;
///
/// let row = StringRecord::from(vec!["15.03.2024 10:22", "desc", "", "", "+1 500,50"]);
/// let tx = parse_statement_row(&row).unwrap();
/// assert_eq!(tx.amount, 1500.50);
/// ```
pub fn parse_statement_row(record: &StringRecord) -> Result<Transaction, SkipReason> {
    if record.len() < MIN_COLUMNS {
        return Err(SkipReason::TooFewColumns);
    }

    let head = record.get(0).unwrap_or("");
    if !head.contains('.') {
        return Err(SkipReason::NoDateMarker);
    }

    let date_token = head.split_whitespace().next().ok_or(SkipReason::BadDate)?;
    let date =
        NaiveDate::parse_from_str(date_token, "%d.%m.%Y").map_err(|_| SkipReason::BadDate)?;

    let raw_amount = record.get(AMOUNT_FIELD).unwrap_or("");
    let cleaned: String = raw_amount
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace(',', ".");
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let amount = cleaned.parse::<f64>().map_err(|_| SkipReason::BadAmount)?;

    Ok(Transaction { date, amount })
}

// ============================================================================
// PAGE LOADING
// ============================================================================

/// Read all raw rows of one statement page
///
/// Headerless, variable-width CSV. Any open or read error fails the whole
/// page; the caller decides whether that matters.
fn load_page(path: &Path) -> Result<Vec<StringRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open statement page: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.with_context(|| format!("Failed to read row in {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

/// Load the bank statement from its page directory
///
/// Probes page1.csv through page12.csv. Pages that fail to load are skipped
/// (tolerance policy for partially-fetched exports, not an error); rows from
/// the loaded pages form one stream in page order, then row order. The only
/// hard failure is zero loadable pages, which means the statement source
/// itself is misconfigured rather than noisy.
pub fn load_statement(dir: &Path) -> Result<(Vec<Transaction>, StatementStats)> {
    let mut stats = StatementStats::default();
    let mut transactions = Vec::new();

    for page in 1..=MAX_PAGES {
        let path = dir.join(format!("page{}.csv", page));

        let records = match load_page(&path) {
            Ok(records) => {
                stats.pages_loaded += 1;
                records
            }
            Err(_) => {
                stats.pages_skipped += 1;
                continue;
            }
        };

        for record in &records {
            match parse_statement_row(record) {
                Ok(tx) => {
                    stats.rows_parsed += 1;
                    transactions.push(tx);
                }
                Err(reason) => stats.record_skip(reason),
            }
        }
    }

    if stats.pages_loaded == 0 {
        bail!(
            "No statement pages could be read from {} (tried page1.csv..page{}.csv)",
            dir.display(),
            MAX_PAGES
        );
    }

    Ok((transactions, stats))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_row_with_time_and_grouped_amount() {
        let row = record(&["15.03.2024 10:22", "desc", "", "", "+1 500,50"]);
        let tx = parse_statement_row(&row).unwrap();

        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!((tx.amount - 1500.50).abs() < 1e-9);

        println!("✅ Parsed: {:?}", tx);
    }

    #[test]
    fn test_parse_row_negative_amount() {
        let row = record(&["01.02.2024", "rent refund", "", "", "-300,00"]);
        let tx = parse_statement_row(&row).unwrap();

        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!((tx.amount + 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_row_plain_dot_amount() {
        let row = record(&["05.01.2024 08:00", "x", "y", "z", "1000.00"]);
        let tx = parse_statement_row(&row).unwrap();
        assert!((tx.amount - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_row_is_no_date_marker() {
        let row = record(&["Total", "", "", "", ""]);
        assert_eq!(parse_statement_row(&row), Err(SkipReason::NoDateMarker));
    }

    #[test]
    fn test_short_row_is_too_few_columns() {
        let row = record(&["15.03.2024", "only two"]);
        assert_eq!(parse_statement_row(&row), Err(SkipReason::TooFewColumns));
    }

    #[test]
    fn test_dotted_narrative_is_bad_date() {
        // Contains a dot, so it passes the candidate heuristic, but the
        // leading token is not a date
        let row = record(&["Closing balance incl. fees", "", "", "", "12,00"]);
        assert_eq!(parse_statement_row(&row), Err(SkipReason::BadDate));
    }

    #[test]
    fn test_unparseable_amount_is_bad_amount() {
        let row = record(&["15.03.2024 10:22", "", "", "", "n/a"]);
        let reason = parse_statement_row(&row).unwrap_err();
        assert_eq!(reason, SkipReason::BadAmount);
        assert_eq!(reason.to_string(), "unparseable amount");
    }

    #[test]
    fn test_statement_stats_counts() {
        let mut stats = StatementStats::default();
        stats.record_skip(SkipReason::TooFewColumns);
        stats.record_skip(SkipReason::NoDateMarker);
        stats.record_skip(SkipReason::NoDateMarker);
        stats.record_skip(SkipReason::BadAmount);

        assert_eq!(stats.too_few_columns, 1);
        assert_eq!(stats.no_date_marker, 2);
        assert_eq!(stats.bad_amount, 1);
        assert_eq!(stats.rows_skipped(), 4);
    }

    #[test]
    fn test_load_statement_concatenates_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();

        let mut page1 = File::create(dir.path().join("page1.csv")).unwrap();
        writeln!(page1, "Statement header,,,,").unwrap();
        writeln!(page1, "15.03.2024 10:22,desc,,,\"+1 500,50\"").unwrap();
        writeln!(page1, "Total,,,,").unwrap();

        let mut page2 = File::create(dir.path().join("page2.csv")).unwrap();
        writeln!(page2, "20.03.2024,desc,,,\"-200,00\"").unwrap();

        let (transactions, stats) = load_statement(dir.path()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
        );
        assert_eq!(stats.pages_loaded, 2);
        assert_eq!(stats.pages_skipped, 10);
        assert_eq!(stats.rows_parsed, 2);
        assert_eq!(stats.no_date_marker, 2);

        println!("✅ Loaded {} transactions: {:?}", transactions.len(), stats);
    }

    #[test]
    fn test_load_statement_skips_unreadable_page() {
        let dir = tempfile::tempdir().unwrap();

        let mut page1 = File::create(dir.path().join("page1.csv")).unwrap();
        writeln!(page1, "01.03.2024,a,b,c,\"100,00\"").unwrap();

        // page2 is a directory, so opening/reading it as a file fails
        std::fs::create_dir(dir.path().join("page2.csv")).unwrap();

        let mut page3 = File::create(dir.path().join("page3.csv")).unwrap();
        writeln!(page3, "02.03.2024,a,b,c,\"200,00\"").unwrap();

        let (transactions, stats) = load_statement(dir.path()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert!((transactions[0].amount - 100.0).abs() < 1e-9);
        assert!((transactions[1].amount - 200.0).abs() < 1e-9);
        assert_eq!(stats.pages_loaded, 2);
        assert_eq!(stats.pages_skipped, 10);
    }

    #[test]
    fn test_load_statement_fails_with_zero_pages() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_statement(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_statement_keeps_duplicates() {
        let dir = tempfile::tempdir().unwrap();

        let mut page1 = File::create(dir.path().join("page1.csv")).unwrap();
        writeln!(page1, "10.03.2024,a,b,c,\"1000,00\"").unwrap();
        writeln!(page1, "10.03.2024,a,b,c,\"1000,00\"").unwrap();

        let (transactions, _) = load_statement(dir.path()).unwrap();

        // Two identical deposits are two distinct payments
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0], transactions[1]);
    }
}
