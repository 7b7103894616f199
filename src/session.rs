use crate::charts::{self, BarSpec, ChartContext, LineSpec, PieSpec};
use crate::error::ViewError;
use crate::filter::{self, FilterParams};
use crate::map::{self, MapView};
use crate::store::RecordStore;
use crate::table::{self, TableColumn, TableView};
use crate::types::Record;
use log::debug;

/// Top-level pages. Mutually exclusive; the user switches freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Map,
    Charts,
    DataAnalysis,
}

/// Secondary selection within the Charts page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

/// A built chart, whichever kind the user confirmed.
#[derive(Debug, Clone)]
pub enum ChartSpec {
    Pie(PieSpec),
    Bar(BarSpec),
    Line(LineSpec),
}

/// Per-user view state over a shared read-only store.
///
/// The two pages recompute on different triggers: charts are only built by an
/// explicit `confirm_chart` (the Show action), while the data-analysis table
/// rebuilds on every filter or sort change. Switching pages discards any
/// staged-but-unconfirmed selections.
pub struct Session<'a> {
    store: &'a RecordStore,
    page: Page,
    chart_kind: ChartKind,
    filter: FilterParams,
    sort_column: TableColumn,
    ascending: bool,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Session {
            store,
            page: Page::Map,
            chart_kind: ChartKind::Pie,
            filter: FilterParams::full_range(store),
            sort_column: TableColumn::BusinessName,
            ascending: true,
        }
    }

    pub fn store(&self) -> &RecordStore {
        self.store
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn filter(&self) -> &FilterParams {
        &self.filter
    }

    /// Switch pages. There is no in-progress state worth keeping: pending
    /// filter and sort selections reset to their defaults.
    pub fn select_page(&mut self, page: Page) {
        debug!("page -> {:?}", page);
        self.page = page;
        self.filter = FilterParams::full_range(self.store);
        self.sort_column = TableColumn::BusinessName;
        self.ascending = true;
    }

    /// The map plots the whole store, unfiltered.
    pub fn map_view(&self) -> MapView {
        map::build_map(self.store.records())
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    /// Stage filter selections. On the Charts page nothing is computed until
    /// the user confirms.
    pub fn set_filter(&mut self, filter: FilterParams) {
        self.filter = filter;
    }

    /// The Show action: the only path that filters and builds a chart.
    pub fn confirm_chart(&self) -> Result<ChartSpec, ViewError> {
        let records = filter::filter_records(self.store, &self.filter);
        debug!(
            "building {:?} chart over {} records",
            self.chart_kind,
            records.len()
        );
        let ctx = ChartContext::new(
            self.filter.year_start,
            self.filter.year_end,
            &self.filter.license_type,
            &self.filter.region,
        );
        match self.chart_kind {
            ChartKind::Pie => {
                charts::build_pie(&records, |r: &Record| r.classification.as_str(), &ctx)
                    .map(ChartSpec::Pie)
            }
            ChartKind::Bar => charts::build_bar(&records, &ctx).map(ChartSpec::Bar),
            ChartKind::Line => charts::build_line(
                &records,
                |r| r.year,
                |r| r.fee_amount,
                &format!(
                    "Average License Fee Amount for {} in {} ({}-{})",
                    ctx.license_type, ctx.region, ctx.year_start, ctx.year_end
                ),
                "Year",
                "Average License Fee Amount",
            )
            .map(ChartSpec::Line),
        }
    }

    /// Data-analysis filter change: recomputes the table immediately.
    pub fn update_table_filter(&mut self, filter: FilterParams) -> TableView {
        self.filter = filter;
        self.rebuild_table()
    }

    /// Data-analysis sort change: recomputes the table immediately. An
    /// unknown column name is rejected before any state changes, so the
    /// prior view stays valid.
    pub fn set_sort(&mut self, column_name: &str, ascending: bool) -> Result<TableView, ViewError> {
        let column = TableColumn::from_display_name(column_name)?;
        self.sort_column = column;
        self.ascending = ascending;
        Ok(self.rebuild_table())
    }

    pub fn table_view(&self) -> TableView {
        self.rebuild_table()
    }

    fn rebuild_table(&self) -> TableView {
        let records = filter::filter_records(self.store, &self.filter);
        table::build_table(&records, self.sort_column, self.ascending)
    }
}
