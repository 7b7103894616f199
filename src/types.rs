use serde::Deserialize;
use tabled::Tabled;

/// One CSV row exactly as it appears in the source export. Everything is
/// optional text; `store::RecordStore` is responsible for turning this into
/// a typed `Record`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "business_name")]
    pub business_name: Option<String>,
    #[serde(rename = "business_address_1")]
    pub business_address_1: Option<String>,
    #[serde(rename = "business_city")]
    pub business_city: Option<String>,
    #[serde(rename = "business_state")]
    pub business_state: Option<String>,
    #[serde(rename = "license_type")]
    pub license_type: Option<String>,
    #[serde(rename = "license_number")]
    pub license_number: Option<String>,
    #[serde(rename = "lic_status")]
    pub lic_status: Option<String>,
    #[serde(rename = "APPLICATION_CLASSIFICATION")]
    pub application_classification: Option<String>,
    #[serde(rename = "LIC_FEE_AMOUNT")]
    pub lic_fee_amount: Option<String>,
    #[serde(rename = "latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "ORIGINAL_SUBMITTED_DATE")]
    pub original_submitted_date: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
}

/// One licensing application, cleaned and typed.
///
/// - `year` is derived once at load time from the submitted-date string and
///   is guaranteed present for every stored record.
/// - `region` is never empty; missing values are normalized to
///   `"Not Provided"` at load time.
#[derive(Debug, Clone)]
pub struct Record {
    pub business_name: String,
    pub address_1: String,
    pub city: String,
    pub state: String,
    pub license_type: String,
    pub license_number: String,
    pub lic_status: String,
    pub classification: String,
    pub fee_amount: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub region: String,
    pub year: i32,
}

/// Display projection for the data-analysis table. Field order matches the
/// rendered column order; the three source address fields are already folded
/// into `business_address` by the time one of these exists.
#[derive(Debug, Clone, Tabled)]
pub struct LicenseRow {
    #[tabled(rename = "Business Name")]
    pub business_name: String,
    #[tabled(rename = "License Type")]
    pub license_type: String,
    #[tabled(rename = "Classification")]
    pub classification: String,
    #[tabled(rename = "License Status")]
    pub lic_status: String,
    #[tabled(rename = "License Number")]
    pub license_number: String,
    #[tabled(rename = "License Fee Amount")]
    pub fee_amount: String,
    #[tabled(rename = "Business Address")]
    pub business_address: String,
}
