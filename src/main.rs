// Entry point and interactive flow.
//
// The binary loads the licensing CSV once at startup, then loops over a
// page-selection menu:
// - [1] Map: plots every business location.
// - [2] Charts: pick a chart type and filters, then confirm with Show.
// - [3] Data Analysis: filter immediately, then sort interactively.
mod charts;
mod error;
mod filter;
mod map;
mod render;
mod session;
mod store;
mod table;
mod types;
mod util;

use clap::Parser;
use filter::FilterParams;
use session::{ChartKind, Page, Session};
use std::io::{self, Write};
use store::RecordStore;
use table::TableColumn;
use util::format_int;

/// Rows shown per table render before the "showing N of M" note kicks in.
const TABLE_PREVIEW_ROWS: usize = 20;

#[derive(Parser)]
#[command(
    name = "cannabis_report",
    version,
    about = "Massachusetts cannabis license explorer"
)]
struct Cli {
    /// CSV export of the licensing dataset.
    #[arg(long, default_value = "Cannabis_MA.csv")]
    data: String,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt. Reused for the main menu and the numbered selectors.
fn read_choice() -> String {
    prompt_line("Enter choice: ")
}

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Y/N confirmation, re-prompting on anything else.
fn prompt_confirm(prompt: &str) -> bool {
    loop {
        match prompt_line(prompt).to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Bounded numeric prompt standing in for a year slider: re-prompts until the
/// input parses and lands inside [min, max].
fn prompt_year(label: &str, min: i32, max: i32) -> i32 {
    loop {
        let input = prompt_line(&format!("{} [{}-{}]: ", label, min, max));
        match input.parse::<i32>() {
            Ok(y) if (min..=max).contains(&y) => return y,
            _ => println!("Please enter a year between {} and {}.", min, max),
        }
    }
}

/// Numbered selector seeded with "ALL" plus the store's distinct values.
fn prompt_select(label: &str, options: &[String]) -> String {
    println!("{}:", label);
    println!("[1] ALL");
    for (i, opt) in options.iter().enumerate() {
        println!("[{}] {}", i + 2, opt);
    }
    loop {
        match read_choice().parse::<usize>() {
            Ok(1) => return filter::ALL.to_string(),
            Ok(n) if n >= 2 && n <= options.len() + 1 => return options[n - 2].clone(),
            _ => println!("Invalid choice. Please enter 1-{}.", options.len() + 1),
        }
    }
}

/// The shared filter controls: year range bounded by the store, year end
/// bounded below by the chosen start, then region and license type.
fn prompt_filter(store: &RecordStore) -> FilterParams {
    println!("\nFilter");
    let year_start = prompt_year("Year Start", store.min_year(), store.max_year());
    let year_end = prompt_year("Year End", year_start, store.max_year());
    let region = prompt_select("Region", store.regions());
    let license_type = prompt_select("License Type", store.license_types());
    FilterParams {
        year_start,
        year_end,
        license_type,
        region,
    }
}

fn run_charts_page(session: &mut Session) {
    println!("\nSelect Chart Type:");
    println!("[1] Pie");
    println!("[2] Bar");
    println!("[3] Line\n");
    let kind = match read_choice().as_str() {
        "1" => ChartKind::Pie,
        "2" => ChartKind::Bar,
        "3" => ChartKind::Line,
        _ => {
            println!("Invalid choice. Please enter 1-3.\n");
            return;
        }
    };
    session.select_chart(kind);
    let params = prompt_filter(session.store());
    session.set_filter(params);

    // Charts are the expensive view; nothing is computed until Show.
    if !prompt_confirm("Show (Y/N): ") {
        return;
    }
    match session.confirm_chart() {
        Ok(spec) => render::print_chart(&spec),
        Err(e) => println!("{}\n", e),
    }
}

fn run_table_page(session: &mut Session) {
    let params = prompt_filter(session.store());
    println!("\nData Analysis\n");
    let view = session.update_table_filter(params);
    render::print_table(&view, TABLE_PREVIEW_ROWS);

    loop {
        println!("Sorting: select column (number or name):");
        for (i, col) in TableColumn::ALL.iter().enumerate() {
            println!("[{}] {}", i + 1, col.display_name());
        }
        let input = read_choice();
        let column_name = match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= TableColumn::ALL.len() => {
                TableColumn::ALL[n - 1].display_name().to_string()
            }
            // Anything non-numeric is treated as a typed column name and
            // validated by the session.
            _ => input,
        };
        println!("Select sorting order:");
        println!("[1] Ascending");
        println!("[2] Descending");
        let ascending = loop {
            match read_choice().as_str() {
                "1" => break true,
                "2" => break false,
                _ => println!("Invalid choice. Please enter 1 or 2."),
            }
        };

        // Every sort change re-renders immediately; a bad column keeps the
        // prior view.
        match session.set_sort(&column_name, ascending) {
            Ok(view) => render::print_table(&view, TABLE_PREVIEW_ROWS),
            Err(e) => println!("{}\n", e),
        }

        if !prompt_confirm("Sort again (Y/N): ") {
            break;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (store, report) = RecordStore::load(&cli.data)?;
    println!(
        "Processing dataset... ({} rows loaded, years {}-{})",
        format_int(report.total_rows),
        store.min_year(),
        store.max_year()
    );
    if report.missing_region > 0 {
        println!(
            "Note: {} rows without a region (shown as \"{}\").",
            format_int(report.missing_region),
            store::NOT_PROVIDED
        );
    }
    if report.missing_fee > 0 {
        println!(
            "Note: {} rows without a listed fee (excluded from fee averages).",
            format_int(report.missing_fee)
        );
    }
    if report.missing_coords > 0 {
        println!(
            "Note: {} rows missing map coordinates.",
            format_int(report.missing_coords)
        );
    }
    println!();

    let mut session = Session::new(&store);
    loop {
        println!("Select Page:");
        println!("[1] Map");
        println!("[2] Charts");
        println!("[3] Data Analysis");
        println!("[4] Exit\n");
        match read_choice().as_str() {
            "1" => session.select_page(Page::Map),
            "2" => session.select_page(Page::Charts),
            "3" => session.select_page(Page::DataAnalysis),
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1-4.\n");
                continue;
            }
        }
        match session.page() {
            Page::Map => render::print_map(&session.map_view()),
            Page::Charts => run_charts_page(&mut session),
            Page::DataAnalysis => run_table_page(&mut session),
        }
    }
    Ok(())
}
