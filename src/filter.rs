use crate::store::RecordStore;
use crate::types::Record;

/// Selector value meaning "no predicate" for region and license type.
pub const ALL: &str = "ALL";

/// One set of user filter selections. Years are inclusive bounds; region and
/// license type are exact-match predicates unless set to `ALL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub year_start: i32,
    pub year_end: i32,
    pub license_type: String,
    pub region: String,
}

impl FilterParams {
    /// The widest selection the store supports: full year span, every region,
    /// every license type. This is the state a freshly entered page starts in.
    pub fn full_range(store: &RecordStore) -> Self {
        FilterParams {
            year_start: store.min_year(),
            year_end: store.max_year(),
            license_type: ALL.to_string(),
            region: ALL.to_string(),
        }
    }
}

/// Narrow the store to the records matching every active predicate.
///
/// The result preserves store order. An inverted year range is the caller's
/// mistake (the prompts bound `year_end` below by `year_start`) and yields an
/// empty set rather than an error.
pub fn filter_records(store: &RecordStore, params: &FilterParams) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|r| r.year >= params.year_start && r.year <= params.year_end)
        .filter(|r| params.region == ALL || r.region == params.region)
        .filter(|r| params.license_type == ALL || r.license_type == params.license_type)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "business_name,business_address_1,business_city,business_state,license_type,license_number,lic_status,APPLICATION_CLASSIFICATION,LIC_FEE_AMOUNT,latitude,longitude,ORIGINAL_SUBMITTED_DATE,Region";

    fn row(name: &str, year: i32, license_type: &str, region: &str) -> String {
        format!(
            "{name},12 Main St,Boston,MA,{license_type},MR1,Active,Adult Use,100,42.0,-71.0,Mon Apr 01 {year} 00:00:00 GMT-0400 (Eastern Daylight Time),{region}"
        )
    }

    fn store_from(rows: &[String]) -> RecordStore {
        let csv = format!("{HEADER}\n{}", rows.join("\n"));
        RecordStore::from_reader(csv.as_bytes()).unwrap().0
    }

    fn params(store: &RecordStore) -> FilterParams {
        FilterParams::full_range(store)
    }

    fn sample_store() -> RecordStore {
        store_from(&[
            row("A", 2019, "Retailer", "Boston"),
            row("B", 2019, "Cultivator", "Worcester"),
            row("C", 2020, "Retailer", "Boston"),
            row("D", 2021, "Retailer", "Springfield"),
            row("E", 2021, "Cultivator", "Boston"),
            row("F", 2022, "Microbusiness", "Worcester"),
        ])
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let store = sample_store();
        let mut p = params(&store);
        p.year_start = 2019;
        p.year_end = 2020;
        let out = filter_records(&store, &p);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| (2019..=2020).contains(&r.year)));
    }

    #[test]
    fn test_inverted_range_yields_empty_set() {
        let store = sample_store();
        let mut p = params(&store);
        p.year_start = 2021;
        p.year_end = 2019;
        assert!(filter_records(&store, &p).is_empty());
    }

    #[test]
    fn test_region_filter_exact_match() {
        let store = store_from(&[
            row("A", 2019, "Retailer", "Boston"),
            row("B", 2019, "Retailer", "Worcester"),
            row("C", 2020, "Retailer", "Boston"),
            row("D", 2020, "Retailer", "Springfield"),
            row("E", 2020, "Retailer", "Worcester"),
            row("F", 2021, "Retailer", "Springfield"),
            row("G", 2021, "Retailer", "Boston"),
            row("H", 2021, "Retailer", "Worcester"),
        ]);
        let mut p = params(&store);
        p.region = "Boston".to_string();
        let out = filter_records(&store, &p);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.region == "Boston"));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let store = sample_store();
        let mut p = params(&store);
        p.region = "Boston".to_string();
        p.license_type = "Retailer".to_string();
        p.year_end = 2020;
        let out = filter_records(&store, &p);
        let names: Vec<&str> = out.iter().map(|r| r.business_name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn test_filter_preserves_store_order() {
        let store = sample_store();
        let mut p = params(&store);
        p.license_type = "Cultivator".to_string();
        let names: Vec<String> = filter_records(&store, &p)
            .iter()
            .map(|r| r.business_name.clone())
            .collect();
        assert_eq!(names, ["B", "E"]);
    }

    #[test]
    fn test_license_types_partition_the_all_selection() {
        let store = sample_store();
        let all = filter_records(&store, &params(&store));

        let mut partitioned = 0;
        for lt in store.license_types() {
            let mut p = params(&store);
            p.license_type = lt.clone();
            partitioned += filter_records(&store, &p).len();
        }
        assert_eq!(partitioned, all.len());
    }
}
