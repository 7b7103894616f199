// Console rendering for every view the session can produce.
//
// Builders hand over plain descriptions (slices, bars, points, rows); nothing
// in here aggregates or filters. This module owns all the terminal cosmetics.
use crate::charts::{BarSpec, LineSpec, PieSpec};
use crate::map::MapView;
use crate::session::ChartSpec;
use crate::table::TableView;
use crate::types::LicenseRow;
use crate::util::format_int;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

/// Width of the longest ASCII bar in the bar chart.
const BAR_WIDTH: usize = 40;

/// Character grid dimensions for the map density view.
const MAP_COLS: usize = 60;
const MAP_ROWS: usize = 20;

pub fn print_chart(spec: &ChartSpec) {
    match spec {
        ChartSpec::Pie(pie) => print_pie(pie),
        ChartSpec::Bar(bar) => print_bar(bar),
        ChartSpec::Line(line) => print_line(line),
    }
}

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "Applicant Type")]
    value: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Share")]
    share: String,
}

pub fn print_pie(pie: &PieSpec) {
    println!("\n{}\n", pie.title);
    let rows: Vec<SliceRow> = pie
        .slices
        .iter()
        .map(|s| SliceRow {
            value: s.value.clone(),
            count: format_int(s.count),
            // Slices under the label threshold stay in the chart but carry
            // no text.
            share: s.label.clone().unwrap_or_default(),
        })
        .collect();
    println!("{}\n", Table::new(rows).with(Style::markdown()));
}

pub fn print_bar(bar: &BarSpec) {
    println!("\n{}\n", bar.title);
    let max = bar.bars.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    for b in &bar.bars {
        let width = (b.count * BAR_WIDTH).div_ceil(max);
        println!("{:>6} | {} {}", b.year, "#".repeat(width), b.label);
    }
    println!("\n({} by {})\n", bar.y_label, bar.x_label);
}

pub fn print_line(line: &LineSpec) {
    println!("\n{}\n", line.title);
    let mut builder = Builder::default();
    builder.push_record([line.x_label.as_str(), line.y_label.as_str()]);
    for p in &line.points {
        builder.push_record([p.x.to_string(), crate::util::format_number(p.y, 2)]);
    }
    let table = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table);
}

/// Render the table view, marking the maximum cell(s) of a numeric sort
/// column with a trailing `*`.
pub fn print_table(view: &TableView, max_rows: usize) {
    let mut rows: Vec<LicenseRow> = view.rows.iter().take(max_rows).cloned().collect();
    for &i in &view.max_rows {
        if i < rows.len() {
            rows[i].fee_amount = format!("{} *", rows[i].fee_amount);
        }
    }
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}", Table::new(rows).with(Style::markdown()));
    if !view.max_rows.is_empty() {
        println!("(* highest {})", view.column.display_name());
    }
    if view.rows.len() > max_rows {
        println!(
            "(showing {} of {} rows)",
            format_int(max_rows),
            format_int(view.rows.len())
        );
    }
    println!();
}

/// Density grid over the bounding box of the plotted points: one character
/// per cell, darker with more businesses.
pub fn print_map(view: &MapView) {
    if view.points.is_empty() {
        println!("(no mappable records)\n");
        return;
    }

    let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
    let (mut min_lon, mut max_lon) = (f64::MAX, f64::MIN);
    for &(lat, lon) in &view.points {
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
    }

    let mut grid = [[0usize; MAP_COLS]; MAP_ROWS];
    for &(lat, lon) in &view.points {
        let col = scale(lon, min_lon, max_lon, MAP_COLS);
        // Row 0 is the northern edge.
        let row = MAP_ROWS - 1 - scale(lat, min_lat, max_lat, MAP_ROWS);
        grid[row][col] += 1;
    }

    println!("\nBusiness Locations\n");
    for row in &grid {
        let line: String = row
            .iter()
            .map(|&n| match n {
                0 => ' ',
                1 => '.',
                2..=4 => '+',
                _ => '#',
            })
            .collect();
        println!("|{}|", line);
    }
    println!(
        "\n{} businesses, lat {:.2}..{:.2}, lon {:.2}..{:.2}",
        format_int(view.points.len()),
        min_lat,
        max_lat,
        min_lon,
        max_lon
    );
    if view.forward_filled > 0 {
        println!(
            "Note: {} locations approximated from a preceding record.",
            format_int(view.forward_filled)
        );
    }
    if view.dropped > 0 {
        println!("Note: {} records had no usable coordinates.", format_int(view.dropped));
    }
    println!();
}

fn scale(value: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return 0;
    }
    let t = (value - min) / (max - min);
    ((t * (cells - 1) as f64).round() as usize).min(cells - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_maps_bounds_to_edges() {
        assert_eq!(scale(0.0, 0.0, 10.0, 60), 0);
        assert_eq!(scale(10.0, 0.0, 10.0, 60), 59);
        assert_eq!(scale(5.0, 0.0, 10.0, 61), 30);
    }

    #[test]
    fn test_scale_degenerate_bounds() {
        assert_eq!(scale(42.0, 42.0, 42.0, 60), 0);
    }
}
