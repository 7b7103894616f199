use crate::error::LoadError;
use crate::types::{RawRow, Record};
use crate::util::{parse_f64_safe, parse_i32_safe};
use csv::ReaderBuilder;
use log::{debug, info};
use std::fs::File;
use std::io::Read;

/// Sentinel label for records whose region field is missing in the source.
pub const NOT_PROVIDED: &str = "Not Provided";

/// Columns that must exist in the source file. Anything else in the export
/// is carried along by the CSV reader and ignored.
const REQUIRED_COLUMNS: [&str; 13] = [
    "business_name",
    "business_address_1",
    "business_city",
    "business_state",
    "license_type",
    "license_number",
    "lic_status",
    "APPLICATION_CLASSIFICATION",
    "LIC_FEE_AMOUNT",
    "latitude",
    "longitude",
    "ORIGINAL_SUBMITTED_DATE",
    "Region",
];

/// Load-time diagnostics, printed once at startup.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub missing_fee: usize,
    pub missing_coords: usize,
    pub missing_region: usize,
}

/// The in-memory dataset. Built once at process start and read-only
/// thereafter; filtering and aggregation always produce new collections.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    min_year: i32,
    max_year: i32,
    regions: Vec<String>,
    license_types: Vec<String>,
}

impl RecordStore {
    pub fn load(path: &str) -> Result<(Self, LoadReport), LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        let result = Self::from_reader(file)?;
        info!("loaded {} records from {}", result.0.len(), path);
        Ok(result)
    }

    /// Build a store from any CSV byte source. `load` wraps this with file
    /// IO; tests feed it in-memory fixtures.
    pub fn from_reader<R: Read>(reader: R) -> Result<(Self, LoadReport), LoadError> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = rdr.headers()?.clone();
        for col in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == col) {
                return Err(LoadError::MissingColumn(col));
            }
        }

        let mut records: Vec<Record> = Vec::new();
        let mut report = LoadReport::default();

        for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
            let row = result?;
            report.total_rows += 1;

            // A row whose submitted date cannot yield a year poisons every
            // year-bounded view, so it aborts the load rather than being
            // skipped.
            let year = derive_year(row.original_submitted_date.as_deref()).ok_or_else(|| {
                LoadError::BadDate {
                    row: idx + 1,
                    value: row.original_submitted_date.clone().unwrap_or_default(),
                }
            })?;

            let region = match row.region.as_deref().map(str::trim) {
                Some(r) if !r.is_empty() => r.to_string(),
                _ => {
                    report.missing_region += 1;
                    NOT_PROVIDED.to_string()
                }
            };

            let fee_amount = parse_f64_safe(row.lic_fee_amount.as_deref());
            if fee_amount.is_none() {
                report.missing_fee += 1;
            }
            let latitude = parse_f64_safe(row.latitude.as_deref());
            let longitude = parse_f64_safe(row.longitude.as_deref());
            if latitude.is_none() || longitude.is_none() {
                report.missing_coords += 1;
            }

            records.push(Record {
                business_name: clean_text(row.business_name),
                address_1: clean_text(row.business_address_1),
                city: clean_text(row.business_city),
                state: clean_text(row.business_state),
                license_type: clean_text(row.license_type),
                license_number: clean_text(row.license_number),
                lic_status: clean_text(row.lic_status),
                classification: clean_text(row.application_classification),
                fee_amount,
                latitude,
                longitude,
                region,
                year,
            });
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let min_year = records.iter().map(|r| r.year).min().unwrap_or_default();
        let max_year = records.iter().map(|r| r.year).max().unwrap_or_default();
        let regions = distinct(records.iter().map(|r| r.region.as_str()));
        let license_types = distinct(records.iter().map(|r| r.license_type.as_str()));
        debug!(
            "year span {}-{}, {} regions, {} license types",
            min_year,
            max_year,
            regions.len(),
            license_types.len()
        );

        Ok((
            RecordStore {
                records,
                min_year,
                max_year,
                regions,
                license_types,
            },
            report,
        ))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Distinct regions in first-appearance order, for selector population.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct license types in first-appearance order.
    pub fn license_types(&self) -> &[String] {
        &self.license_types
    }
}

/// The submitted-date strings are JS-style, e.g.
/// `"Mon Apr 01 2019 00:00:00 GMT-0400 (Eastern Daylight Time)"`; the year is
/// the fourth whitespace-separated token.
fn derive_year(date: Option<&str>) -> Option<i32> {
    let token = date?.split_whitespace().nth(3);
    parse_i32_safe(token)
}

fn clean_text(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    const HEADER: &str = "business_name,business_address_1,business_city,business_state,license_type,license_number,lic_status,APPLICATION_CLASSIFICATION,LIC_FEE_AMOUNT,latitude,longitude,ORIGINAL_SUBMITTED_DATE,Region";

    fn row(name: &str, year: i32, region: &str, fee: &str) -> String {
        format!(
            "{name},12 Main St,Boston,MA,Retailer,MR281234,Active,Adult Use,{fee},42.36,-71.05,Mon Apr 01 {year} 00:00:00 GMT-0400 (Eastern Daylight Time),{region}"
        )
    }

    fn store_from(rows: &[String]) -> (RecordStore, LoadReport) {
        let csv = format!("{HEADER}\n{}", rows.join("\n"));
        RecordStore::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_derives_year_and_bounds() {
        let (store, report) = store_from(&[
            row("A", 2019, "Boston", "1500"),
            row("B", 2021, "Worcester", "300"),
            row("C", 2020, "Boston", "200"),
        ]);
        assert_eq!(report.total_rows, 3);
        assert_eq!(store.min_year(), 2019);
        assert_eq!(store.max_year(), 2021);
        assert_eq!(store.records()[0].year, 2019);
        assert_eq!(store.records()[2].year, 2020);
    }

    #[test]
    fn test_missing_region_normalized() {
        let (store, report) = store_from(&[row("A", 2019, "", "100"), row("B", 2019, "Boston", "100")]);
        assert_eq!(store.records()[0].region, NOT_PROVIDED);
        assert_eq!(store.records()[1].region, "Boston");
        assert_eq!(report.missing_region, 1);
    }

    #[test]
    fn test_catalogs_keep_first_appearance_order() {
        let (store, _) = store_from(&[
            row("A", 2019, "Worcester", "100"),
            row("B", 2019, "Boston", "100"),
            row("C", 2019, "Worcester", "100"),
        ]);
        assert_eq!(store.regions(), ["Worcester", "Boston"]);
        assert_eq!(store.license_types(), ["Retailer"]);
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let bad = "A,12 Main St,Boston,MA,Retailer,MR1,Active,Adult Use,100,42.0,-71.0,April 2019,Boston";
        let csv = format!("{HEADER}\n{}\n{}", row("B", 2019, "Boston", "100"), bad);
        match RecordStore::from_reader(csv.as_bytes()) {
            Err(LoadError::BadDate { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected BadDate, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "business_name,license_type\nA,Retailer";
        match RecordStore::from_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumn(_)) => {}
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_dataset_is_fatal() {
        let csv = format!("{HEADER}\n");
        assert!(matches!(
            RecordStore::from_reader(csv.as_bytes()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_missing_fee_is_counted_not_fatal() {
        let (store, report) = store_from(&[row("A", 2019, "Boston", ""), row("B", 2019, "Boston", "250")]);
        assert_eq!(store.records()[0].fee_amount, None);
        assert_eq!(store.records()[1].fee_amount, Some(250.0));
        assert_eq!(report.missing_fee, 1);
    }
}
