//! Common test utilities: matrices, tables on a manual clock, and region
//! coordinate helpers.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use wingrid::schedule::ManualClock;
use wingrid::{
    CellValue, ColumnBand, DataMatrix, Region, RowBand, ScrollEvent, ScrollInfo, Table,
    TableConfig,
};

/// A `rows` × `cols` matrix whose cells read `"r:c"`.
#[must_use]
pub fn matrix(rows: usize, cols: usize) -> Rc<DataMatrix> {
    Rc::new(DataMatrix::from_fn(rows, cols, |r, c| {
        CellValue::from(format!("{r}:{c}"))
    }))
}

/// Every scroll callback invocation, in order.
pub type ScrollLog = Rc<RefCell<Vec<(Option<ScrollEvent>, ScrollInfo)>>>;

/// A table on a manual clock that records its scroll callbacks.
pub struct Harness {
    pub table: Table,
    pub clock: ManualClock,
    pub scrolls: ScrollLog,
}

impl Harness {
    #[must_use]
    pub fn new(config: TableConfig, data: Rc<DataMatrix>) -> Self {
        let clock = ManualClock::new(0.0);
        let scrolls: ScrollLog = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&scrolls);
        let table = Table::builder(config, data)
            .clock(Rc::new(clock.clone()))
            .scroll_fn(move |event, info| sink.borrow_mut().push((event.copied(), info)))
            .build();
        Self {
            table,
            clock,
            scrolls,
        }
    }

    /// Advance the clock and run whatever became due.
    pub fn advance(&mut self, ms: f64) -> wingrid::TickOutcome {
        self.clock.advance(ms);
        self.table.tick()
    }

    /// Run every pending debouncer to completion.
    pub fn settle(&mut self) {
        while let Some(deadline) = self.table.next_deadline() {
            self.clock.set(deadline);
            self.table.tick();
        }
    }
}

/// `(row, col)` data coordinates of every cell of a region, row-major.
#[must_use]
pub fn coordinates(table: &Table, rows: RowBand, columns: ColumnBand) -> Vec<Vec<(usize, usize)>> {
    table
        .region(Region::new(rows, columns))
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| (cell.row, cell.col)).collect())
        .collect()
}

/// Data row of the first cell of a region.
#[must_use]
pub fn first_row(table: &Table, rows: RowBand, columns: ColumnBand) -> usize {
    table
        .region(Region::new(rows, columns))
        .cell(0, 0)
        .expect("region has cells")
        .row
}

/// Data column of the first cell of a region.
#[must_use]
pub fn first_col(table: &Table, rows: RowBand, columns: ColumnBand) -> usize {
    table
        .region(Region::new(rows, columns))
        .cell(0, 0)
        .expect("region has cells")
        .col
}
