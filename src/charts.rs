use crate::error::ViewError;
use crate::types::Record;
use crate::util::average;
use std::collections::{BTreeMap, HashMap};

/// The active filter selections, stringified for title text. Builders never
/// re-derive these from the record set; an empty filter result still carries
/// the titles the user asked for.
#[derive(Debug, Clone)]
pub struct ChartContext {
    pub year_start: String,
    pub year_end: String,
    pub license_type: String,
    pub region: String,
}

impl ChartContext {
    pub fn new(year_start: i32, year_end: i32, license_type: &str, region: &str) -> Self {
        ChartContext {
            year_start: year_start.to_string(),
            year_end: year_end.to_string(),
            license_type: license_type.to_string(),
            region: region.to_string(),
        }
    }
}

/// Only slices above this share of the total carry visible label text.
const PIE_LABEL_THRESHOLD_PCT: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct PieSlice {
    pub value: String,
    pub count: usize,
    pub percent: f64,
    /// `"{percent:.2}% ({count})"`, present only when the slice is large
    /// enough to label. Small slices still render, just without text.
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PieSpec {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub year: i32,
    pub count: usize,
    /// Count text drawn above the bar.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct BarSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone)]
pub struct LinePoint {
    pub x: i32,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct LineSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<LinePoint>,
}

/// Group the record set by a categorical key and describe one pie slice per
/// distinct value, largest share first (ties keep first-appearance order).
pub fn build_pie<F>(records: &[Record], key: F, ctx: &ChartContext) -> Result<PieSpec, ViewError>
where
    F: Fn(&Record) -> &str,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for r in records {
        let k = key(r);
        match index.get(k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k.to_string(), counts.len());
                counts.push((k.to_string(), 1));
            }
        }
    }
    if counts.is_empty() {
        return Err(ViewError::EmptyAggregation);
    }

    // Stable sort: equal counts stay in first-appearance order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = records.len();
    let slices = counts
        .into_iter()
        .map(|(value, count)| {
            let percent = 100.0 * count as f64 / total as f64;
            let label = if percent > PIE_LABEL_THRESHOLD_PCT {
                Some(format!("{:.2}% ({})", percent, count))
            } else {
                None
            };
            PieSlice {
                value,
                count,
                percent,
                label,
            }
        })
        .collect();

    Ok(PieSpec {
        title: format!(
            "{}-{} {} License Applicant Type in {}",
            ctx.year_start, ctx.year_end, ctx.license_type, ctx.region
        ),
        slices,
    })
}

/// Group the record set by year and describe one bar per year, years
/// ascending, with the count as the above-bar label.
pub fn build_bar(records: &[Record], ctx: &ChartContext) -> Result<BarSpec, ViewError> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.year).or_default() += 1;
    }
    if counts.is_empty() {
        return Err(ViewError::EmptyAggregation);
    }

    let bars = counts
        .into_iter()
        .map(|(year, count)| Bar {
            year,
            count,
            label: count.to_string(),
        })
        .collect();

    Ok(BarSpec {
        title: format!(
            "{}-{} Number of {} License Applied in {}",
            ctx.year_start, ctx.year_end, ctx.license_type, ctx.region
        ),
        x_label: "Year".to_string(),
        y_label: "License Count".to_string(),
        bars,
    })
}

/// Describe a single connected line: the mean of `y` per distinct `x`, points
/// ordered by `x` ascending. Records where `y` is missing count toward
/// neither the numerator nor the denominator; an `x` with no present `y`
/// values contributes no point at all.
///
/// The builder is generic over both extractors and all label text so callers
/// decide what is being averaged; it knows nothing about fees or years.
pub fn build_line<X, Y>(
    records: &[Record],
    x: X,
    y: Y,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<LineSpec, ViewError>
where
    X: Fn(&Record) -> i32,
    Y: Fn(&Record) -> Option<f64>,
{
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in records {
        if let Some(v) = y(r) {
            groups.entry(x(r)).or_default().push(v);
        }
    }
    if groups.is_empty() {
        return Err(ViewError::EmptyAggregation);
    }

    let points = groups
        .into_iter()
        .map(|(x, values)| LinePoint {
            x,
            y: average(&values),
        })
        .collect();

    Ok(LineSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, classification: &str, fee: Option<f64>) -> Record {
        Record {
            business_name: String::new(),
            address_1: String::new(),
            city: String::new(),
            state: String::new(),
            license_type: "Retailer".to_string(),
            license_number: String::new(),
            lic_status: String::new(),
            classification: classification.to_string(),
            fee_amount: fee,
            latitude: None,
            longitude: None,
            region: "Boston".to_string(),
            year,
        }
    }

    fn ctx() -> ChartContext {
        ChartContext::new(2019, 2021, "ALL", "ALL")
    }

    #[test]
    fn test_pie_counts_cover_the_record_set() {
        let records: Vec<Record> = (0..60)
            .map(|i| rec(2019, if i < 50 { "Adult Use" } else { "Medical" }, None))
            .collect();
        let pie = build_pie(&records, |r| r.classification.as_str(), &ctx()).unwrap();

        let total: usize = pie.slices.iter().map(|s| s.count).sum();
        assert_eq!(total, records.len());
        for s in &pie.slices {
            assert!((s.percent - 100.0 * s.count as f64 / 60.0).abs() < 1e-9);
        }
        assert_eq!(pie.slices[0].value, "Adult Use");
        assert_eq!(pie.slices[0].count, 50);
    }

    #[test]
    fn test_pie_small_slices_render_unlabeled() {
        // 1 of 200 = 0.5%: below the label threshold, but still a slice.
        let mut records: Vec<Record> = (0..199).map(|_| rec(2019, "Adult Use", None)).collect();
        records.push(rec(2019, "Research", None));
        let pie = build_pie(&records, |r| r.classification.as_str(), &ctx()).unwrap();

        let big = &pie.slices[0];
        assert_eq!(big.label.as_deref(), Some("99.50% (199)"));
        let small = &pie.slices[1];
        assert_eq!(small.value, "Research");
        assert!(small.label.is_none());
    }

    #[test]
    fn test_pie_empty_set_is_an_error() {
        let err = build_pie(&[], |r| r.classification.as_str(), &ctx()).unwrap_err();
        assert_eq!(err, ViewError::EmptyAggregation);
    }

    #[test]
    fn test_pie_title_uses_the_display_context() {
        let records = vec![rec(2019, "Adult Use", None)];
        let c = ChartContext::new(2019, 2020, "Retailer", "Boston");
        let pie = build_pie(&records, |r| r.classification.as_str(), &c).unwrap();
        assert_eq!(pie.title, "2019-2020 Retailer License Applicant Type in Boston");
    }

    #[test]
    fn test_bar_counts_per_year() {
        let records = vec![
            rec(2019, "Adult Use", None),
            rec(2019, "Adult Use", None),
            rec(2021, "Adult Use", None),
        ];
        let bar = build_bar(&records, &ctx()).unwrap();
        assert_eq!(bar.bars.len(), 2);
        assert_eq!((bar.bars[0].year, bar.bars[0].count), (2019, 2));
        assert_eq!((bar.bars[1].year, bar.bars[1].count), (2021, 1));
        assert_eq!(bar.bars[0].label, "2");

        let total: usize = bar.bars.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_bar_empty_set_is_an_error() {
        assert_eq!(build_bar(&[], &ctx()).unwrap_err(), ViewError::EmptyAggregation);
    }

    #[test]
    fn test_line_averages_fee_per_year() {
        let records = vec![
            rec(2019, "Adult Use", Some(100.0)),
            rec(2019, "Adult Use", Some(200.0)),
            rec(2020, "Adult Use", Some(300.0)),
        ];
        let line = build_line(
            &records,
            |r| r.year,
            |r| r.fee_amount,
            "Average License Fee Amount for ALL in ALL (2019-2020)",
            "Year",
            "Average License Fee Amount",
        )
        .unwrap();

        assert_eq!(line.points.len(), 2);
        assert_eq!((line.points[0].x, line.points[0].y), (2019, 150.0));
        assert_eq!((line.points[1].x, line.points[1].y), (2020, 300.0));
    }

    #[test]
    fn test_line_skips_missing_values_entirely() {
        let records = vec![
            rec(2019, "Adult Use", Some(100.0)),
            rec(2019, "Adult Use", None),
            rec(2020, "Adult Use", None),
        ];
        let line = build_line(&records, |r| r.year, |r| r.fee_amount, "t", "x", "y").unwrap();

        // 2019 averages only the present fee; 2020 has none and no point.
        assert_eq!(line.points.len(), 1);
        assert_eq!((line.points[0].x, line.points[0].y), (2019, 100.0));
    }

    #[test]
    fn test_line_all_values_missing_is_an_error() {
        let records = vec![rec(2019, "Adult Use", None)];
        let err = build_line(&records, |r| r.year, |r| r.fee_amount, "t", "x", "y").unwrap_err();
        assert_eq!(err, ViewError::EmptyAggregation);
    }
}
