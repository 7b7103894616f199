use crate::error::ViewError;
use crate::types::{LicenseRow, Record};
use crate::util::format_number;
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashMap;

/// The columns of the data-analysis table, in rendered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableColumn {
    BusinessName,
    LicenseType,
    Classification,
    LicenseStatus,
    LicenseNumber,
    FeeAmount,
    BusinessAddress,
}

impl TableColumn {
    pub const ALL: [TableColumn; 7] = [
        TableColumn::BusinessName,
        TableColumn::LicenseType,
        TableColumn::Classification,
        TableColumn::LicenseStatus,
        TableColumn::LicenseNumber,
        TableColumn::FeeAmount,
        TableColumn::BusinessAddress,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            TableColumn::BusinessName => "Business Name",
            TableColumn::LicenseType => "License Type",
            TableColumn::Classification => "Classification",
            TableColumn::LicenseStatus => "License Status",
            TableColumn::LicenseNumber => "License Number",
            TableColumn::FeeAmount => "License Fee Amount",
            TableColumn::BusinessAddress => "Business Address",
        }
    }

    /// The fee column is the only one with numeric ordering (and the only one
    /// eligible for max-value highlighting).
    pub fn is_numeric(self) -> bool {
        matches!(self, TableColumn::FeeAmount)
    }

    /// Resolve a user-facing column name. Unknown names are rejected so the
    /// caller can keep its prior view.
    pub fn from_display_name(name: &str) -> Result<Self, ViewError> {
        DISPLAY_LOOKUP
            .get(name)
            .copied()
            .ok_or_else(|| ViewError::InvalidSelection(name.to_string()))
    }
}

static DISPLAY_LOOKUP: Lazy<HashMap<&'static str, TableColumn>> = Lazy::new(|| {
    TableColumn::ALL
        .iter()
        .map(|&c| (c.display_name(), c))
        .collect()
});

/// A sorted, display-ready table over one filtered record set.
#[derive(Debug, Clone)]
pub struct TableView {
    pub rows: Vec<LicenseRow>,
    /// Indices (into `rows`) holding the maximum of the sort column. Empty
    /// unless the sort column is numeric.
    pub max_rows: Vec<usize>,
    pub column: TableColumn,
    pub ascending: bool,
}

struct ProjectedRow {
    display: LicenseRow,
    fee: Option<f64>,
}

fn project(r: &Record) -> ProjectedRow {
    ProjectedRow {
        display: LicenseRow {
            business_name: r.business_name.clone(),
            license_type: r.license_type.clone(),
            classification: r.classification.clone(),
            lic_status: r.lic_status.clone(),
            license_number: r.license_number.clone(),
            fee_amount: r
                .fee_amount
                .map(|f| format_number(f, 2))
                .unwrap_or_default(),
            business_address: format!("{}, {}, {}", r.address_1, r.city, r.state),
        },
        fee: r.fee_amount,
    }
}

fn text_field(row: &LicenseRow, column: TableColumn) -> &str {
    match column {
        TableColumn::BusinessName => &row.business_name,
        TableColumn::LicenseType => &row.license_type,
        TableColumn::Classification => &row.classification,
        TableColumn::LicenseStatus => &row.lic_status,
        TableColumn::LicenseNumber => &row.license_number,
        TableColumn::FeeAmount => &row.fee_amount,
        TableColumn::BusinessAddress => &row.business_address,
    }
}

// Missing fees sort last in either direction.
fn compare_fee(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Project, synthesize the address, and sort by one column.
///
/// The sort is stable: ties keep the record set's relative order. Max-value
/// detection only applies to the numeric fee column; asking for the "maximum"
/// of a text column is a no-op, not an error.
pub fn build_table(records: &[Record], column: TableColumn, ascending: bool) -> TableView {
    let mut rows: Vec<ProjectedRow> = records.iter().map(project).collect();

    if column.is_numeric() {
        rows.sort_by(|a, b| compare_fee(a.fee, b.fee, ascending));
    } else {
        rows.sort_by(|a, b| {
            let ord = text_field(&a.display, column).cmp(text_field(&b.display, column));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }

    let max_rows = if column.is_numeric() {
        let max = rows
            .iter()
            .filter_map(|r| r.fee)
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() {
            rows.iter()
                .enumerate()
                .filter(|(_, r)| r.fee == Some(max))
                .map(|(i, _)| i)
                .collect()
        } else {
            Vec::new()
        }
    } else {
        Vec::new()
    };

    TableView {
        rows: rows.into_iter().map(|r| r.display).collect(),
        max_rows,
        column,
        ascending,
    }
}
