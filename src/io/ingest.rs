//! CSV ingest and normalization.
//!
//! This module turns the four pre-baked dashboard tables into typed records.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep their file order)
//! - **Separation of concerns**: no probing or rendering logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::{info, warn};

use crate::domain::{CurrentPoint, CurvePoint, ModelResultRow, SaturationPoint};
use crate::error::AppError;

pub const CURRENT_POINTS_FILE: &str = "current_points.csv";
pub const CURVE_FILE: &str = "mROI_plotting.csv";
pub const MODEL_RESULTS_FILE: &str = "model_results.csv";
pub const SATURATION_FILE: &str = "plot_sat_df.csv";

/// Column holding the response value in both curve tables.
const RESPONSE_COLUMN: &str = "sat_curve_pts";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows in file order + row errors.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Paths of the four input tables inside a data directory.
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub current_points: PathBuf,
    pub curve: PathBuf,
    pub model_results: PathBuf,
    pub saturation: PathBuf,
}

impl InputFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            current_points: dir.join(CURRENT_POINTS_FILE),
            curve: dir.join(CURVE_FILE),
            model_results: dir.join(MODEL_RESULTS_FILE),
            saturation: dir.join(SATURATION_FILE),
        }
    }
}

type HeaderMap = HashMap<String, usize>;

/// Load the sampled mROI curves (`channel, spend, sat_curve_pts`).
pub fn load_curve_points(path: &Path) -> Result<Ingested<CurvePoint>, AppError> {
    read_table(path, &["channel", "spend", RESPONSE_COLUMN], |record, headers| {
        let (channel, spend, response) = parse_spend_row(record, headers)?;
        Ok(CurvePoint {
            channel,
            spend,
            response,
        })
    })
}

/// Load the current benchmark per channel (same schema as the curve table).
pub fn load_current_points(path: &Path) -> Result<Ingested<CurrentPoint>, AppError> {
    read_table(path, &["channel", "spend", RESPONSE_COLUMN], |record, headers| {
        let (channel, spend, response) = parse_spend_row(record, headers)?;
        Ok(CurrentPoint {
            channel,
            spend,
            response,
        })
    })
}

/// Load the saturation curves (`channel, adstock, saturation`).
pub fn load_saturation_points(path: &Path) -> Result<Ingested<SaturationPoint>, AppError> {
    read_table(path, &["channel", "adstock", "saturation"], |record, headers| {
        Ok(SaturationPoint {
            channel: get_required(record, headers, "channel")?.to_string(),
            adstock: parse_required_f64(record, headers, "adstock")?,
            saturation: parse_required_f64(record, headers, "saturation")?,
        })
    })
}

/// Load the hold-out predictions (`date, y_test, y_pred_test, y_val, y_pred_val`).
///
/// Only `date` is required per row; empty or `nan` cells become `None`.
pub fn load_model_results(path: &Path) -> Result<Ingested<ModelResultRow>, AppError> {
    read_table(
        path,
        &["date", "y_test", "y_pred_test", "y_val", "y_pred_val"],
        |record, headers| {
            Ok(ModelResultRow {
                date: parse_date(get_required(record, headers, "date")?)?,
                y_test: parse_opt_f64(get_optional(record, headers, "y_test")),
                y_pred_test: parse_opt_f64(get_optional(record, headers, "y_pred_test")),
                y_val: parse_opt_f64(get_optional(record, headers, "y_val")),
                y_pred_val: parse_opt_f64(get_optional(record, headers, "y_pred_val")),
            })
        },
    )
}

fn read_table<T, F>(path: &Path, required: &[&str], parse: F) -> Result<Ingested<T>, AppError>
where
    F: Fn(&StringRecord, &HeaderMap) -> Result<T, String>,
{
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();

    let header_map = build_header_map(&headers);
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(
                2,
                format!("Missing required column `{name}` in '{}'", path.display()),
            ));
        }
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records() starts after it.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse(&record, &header_map));

        match parsed {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        warn!(
            "event=row_skipped file={} line={} reason={}",
            path.display(),
            err.line,
            err.message
        );
    }

    if rows.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid rows in '{}' ({rows_read} read).", path.display()),
        ));
    }

    info!(
        "event=table_loaded file={} rows_read={} rows_used={} row_errors={}",
        path.display(),
        rows_read,
        rows.len(),
        row_errors.len()
    );

    Ok(Ingested {
        rows,
        row_errors,
        rows_read,
    })
}

fn parse_spend_row(record: &StringRecord, headers: &HeaderMap) -> Result<(String, f64, f64), String> {
    let channel = get_required(record, headers, "channel")?.to_string();
    let spend = parse_required_f64(record, headers, "spend")?;
    if spend < 0.0 {
        return Err(format!("Negative `spend` ({spend})."));
    }
    let response = parse_required_f64(record, headers, RESPONSE_COLUMN)?;
    Ok((channel, spend, response))
}

fn build_header_map(headers: &StringRecord) -> HeaderMap {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(record: &'a StringRecord, headers: &HeaderMap, name: &str) -> Result<&'a str, String> {
    get_optional(record, headers, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, headers: &HeaderMap, name: &str) -> Option<&'a str> {
    let idx = headers.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_required_f64(record: &StringRecord, headers: &HeaderMap, name: &str) -> Result<f64, String> {
    let raw = get_required(record, headers, name)?;
    parse_opt_f64(Some(raw)).ok_or_else(|| format!("Invalid `{name}` value '{raw}' (expected a finite number)."))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // pandas writes datetime indexes as `YYYY-MM-DD HH:MM:SS`.
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn curve_rows_keep_file_order_and_skip_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            CURVE_FILE,
            "\u{feff}channel,spend,sat_curve_pts\n\
             facebook,100,0.5\n\
             facebook,-5,0.1\n\
             tiktok,abc,0.2\n\
             tiktok,0,0.0\n",
        );

        let ingested = load_curve_points(&path).unwrap();
        assert_eq!(ingested.rows_read, 4);
        assert_eq!(ingested.rows.len(), 2);
        assert_eq!(ingested.rows[0], CurvePoint::new("facebook", 100.0, 0.5));
        assert_eq!(ingested.rows[1].channel, "tiktok");
        let lines: Vec<usize> = ingested.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, CURRENT_POINTS_FILE, "channel,spend\nfacebook,1\n");
        let err = load_current_points(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("sat_curve_pts"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_saturation_points(&dir.path().join(SATURATION_FILE)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn table_without_valid_rows_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, SATURATION_FILE, "channel,adstock,saturation\nfacebook,x,y\n");
        let err = load_saturation_points(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn model_results_allow_empty_split_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            MODEL_RESULTS_FILE,
            "date,y_test,y_pred_test,y_val,y_pred_val\n\
             2023-01-01,100,110,,\n\
             2023-01-08 00:00:00,,,nan,95\n",
        );
        let ingested = load_model_results(&path).unwrap();
        assert_eq!(ingested.rows.len(), 2);
        assert_eq!(ingested.rows[0].y_test, Some(100.0));
        assert_eq!(ingested.rows[0].y_val, None);
        assert_eq!(ingested.rows[1].date, NaiveDate::from_ymd_opt(2023, 1, 8).unwrap());
        assert_eq!(ingested.rows[1].y_val, None);
        assert_eq!(ingested.rows[1].y_pred_val, Some(95.0));
    }
}
