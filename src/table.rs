//! A table instance: the explicit store behind one rendered grid.
//!
//! `Table` owns the partition, the range sequence, the scroll offsets, the
//! nine region grids and the debouncers. Every mutation goes through a
//! method; projection runs either synchronously (programmatic offset changes,
//! data replacement) or when a debouncer fires in [`Table::tick`].

use std::rc::Rc;

use serde::Serialize;

use crate::error::{Result, WingridError};
use crate::layout::{
    wheel_line_scroll, AxisMetrics, GridPartition, ScrollbarGeometry, ScrollbarState, Viewport,
};
use crate::overlay::ResolveContext;
use crate::projector::{Projection, RegionGrid};
use crate::schedule::{earliest_deadline, Clock, Debouncer, SystemClock};
use crate::types::{
    Axis, CellEvent, CellValue, ColumnBand, DataMatrix, DataValueFn, EventName, Range, Region,
    RowBand, ScrollDirection, ScrollEvent, ScrollInfo, ScrollPosition, TableConfig,
    REFRESH_DELAY_MS,
};

/// Host scroll callback: `(raw event, resolved position)`.
pub type ScrollFn = dyn FnMut(Option<&ScrollEvent>, ScrollInfo);

/// Listener for the "content updated" notification.
pub type ContentListener = dyn FnMut();

/// Where a wheel event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WheelTarget {
    /// The vertical scrollbar wrapper.
    VerticalScrollbar,
    /// The horizontal scrollbar wrapper, which sits inside the table body.
    HorizontalScrollbar,
    /// Anywhere else over the table.
    Body,
}

/// What a call to [`Table::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    /// The regions were recomputed.
    pub content_updated: bool,
    /// New scrollbar sizes to apply.
    pub geometry: Option<ScrollbarGeometry>,
    /// A raw scroll event resolved to a new offset.
    pub scrolled: Option<Axis>,
}

/// Builds a [`Table`] with optional callbacks.
pub struct TableBuilder {
    config: TableConfig,
    data: Rc<DataMatrix>,
    data_value_fn: Option<Rc<DataValueFn>>,
    scroll_fn: Option<Box<ScrollFn>>,
    clock: Option<Rc<dyn Clock>>,
    ranges: Vec<Range>,
}

impl TableBuilder {
    /// Override the default `rows[row][col]` data accessor.
    pub fn data_value_fn(
        mut self,
        f: impl Fn(&DataMatrix, usize, usize) -> Option<CellValue> + 'static,
    ) -> Self {
        let f: Rc<DataValueFn> = Rc::new(f);
        self.data_value_fn = Some(f);
        self
    }

    /// Callback invoked once at construction and on every resolved scroll.
    pub fn scroll_fn(mut self, f: impl FnMut(Option<&ScrollEvent>, ScrollInfo) + 'static) -> Self {
        self.scroll_fn = Some(Box::new(f));
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Register a range before the first projection.
    pub fn range(mut self, range: Range) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn build(self) -> Table {
        let partition = GridPartition::from_config(&self.config);
        let clock = match self.clock {
            Some(clock) => clock,
            None => Rc::new(SystemClock::new()),
        };
        let mut table = Table {
            viewport: Viewport::default(),
            projection: Projection::default(),
            vertical_bar: ScrollbarState::default(),
            horizontal_bar: ScrollbarState::default(),
            geometry: None,
            body_height_px: None,
            touch_point: None,
            content_listeners: Vec::new(),
            refresh: Debouncer::new("refresh", REFRESH_DELAY_MS),
            scrollbar_refresh: Debouncer::new("scrollbar refresh", REFRESH_DELAY_MS),
            scroll: Debouncer::new("scroll", self.config.scroll_delay_ms()),
            wheel_restore: Debouncer::new("wheel delay restore", self.config.wheel_scroll_delay_ms()),
            content_version: 0,
            data: self.data,
            data_value_fn: self.data_value_fn,
            scroll_fn: self.scroll_fn,
            ranges: self.ranges,
            clock,
            partition,
            config: self.config,
        };

        let (vertical, horizontal) = table.metrics(&table.data);
        let requested = ScrollPosition::new(
            table.config.scroll_top_position.unwrap_or(0),
            table.config.scroll_left_position.unwrap_or(0),
        );
        table.viewport = Viewport::new(ScrollPosition::new(
            requested.top.min(vertical.max_offset()),
            requested.left.min(horizontal.max_offset()),
        ));

        log::debug!(
            "table built: {}x{} data, {} ranges, offset {:?}",
            table.data.row_count(),
            table.data.column_count(),
            table.ranges.len(),
            table.viewport.position()
        );

        table.update_data_and_scrollbars();
        table.notify_scroll(None, ScrollDirection::None);
        table
    }
}

/// One windowed grid over a shared data matrix.
pub struct Table {
    config: TableConfig,
    partition: GridPartition,
    data: Rc<DataMatrix>,
    data_value_fn: Option<Rc<DataValueFn>>,
    ranges: Vec<Range>,
    viewport: Viewport,
    projection: Projection,
    vertical_bar: ScrollbarState,
    horizontal_bar: ScrollbarState,
    geometry: Option<ScrollbarGeometry>,
    body_height_px: Option<f64>,
    touch_point: Option<(f64, f64)>,
    scroll_fn: Option<Box<ScrollFn>>,
    content_listeners: Vec<Box<ContentListener>>,
    refresh: Debouncer<()>,
    /// Argument: vertical only.
    scrollbar_refresh: Debouncer<bool>,
    scroll: Debouncer<ScrollEvent>,
    wheel_restore: Debouncer<()>,
    content_version: u64,
    clock: Rc<dyn Clock>,
}

impl Table {
    pub fn builder(config: TableConfig, data: Rc<DataMatrix>) -> TableBuilder {
        TableBuilder {
            config,
            data,
            data_value_fn: None,
            scroll_fn: None,
            clock: None,
            ranges: Vec::new(),
        }
    }

    /// A table without callbacks.
    pub fn new(config: TableConfig, data: Rc<DataMatrix>) -> Self {
        Self::builder(config, data).build()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn partition(&self) -> &GridPartition {
        &self.partition
    }

    pub fn data(&self) -> &Rc<DataMatrix> {
        &self.data
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn scroll_position(&self) -> ScrollPosition {
        self.viewport.position()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn region(&self, region: Region) -> &RegionGrid {
        self.projection.region(region)
    }

    pub fn column_names(&self, band: ColumnBand) -> &[String] {
        self.projection.column_names(band)
    }

    pub fn row_numbers(&self, band: RowBand) -> &[usize] {
        self.projection.row_numbers(band)
    }

    pub fn scrollbar(&self, axis: Axis) -> &ScrollbarState {
        match axis {
            Axis::Vertical => &self.vertical_bar,
            Axis::Horizontal => &self.horizontal_bar,
        }
    }

    fn scrollbar_mut(&mut self, axis: Axis) -> &mut ScrollbarState {
        match axis {
            Axis::Vertical => &mut self.vertical_bar,
            Axis::Horizontal => &mut self.horizontal_bar,
        }
    }

    /// Scrollbar sizes from the last scrollbar refresh.
    pub fn scrollbar_geometry(&self) -> Option<ScrollbarGeometry> {
        self.geometry
    }

    /// Incremented after every full recomputation.
    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// Delay currently applied to raw scroll events.
    pub fn scroll_delay_ms(&self) -> f64 {
        self.scroll.wait_ms()
    }

    /// Register a range. Ranges added after the first projection schedule a
    /// recomputation. Returns the registration index.
    pub fn add_range(&mut self, range: Range) -> usize {
        self.ranges.push(range);
        let now = self.clock.now_ms();
        self.refresh.call(now, ());
        self.ranges.len() - 1
    }

    /// Subscribe to the "content updated" notification.
    pub fn on_content_updated(&mut self, f: impl FnMut() + 'static) {
        self.content_listeners.push(Box::new(f));
    }

    /// Replace the data matrix. A different reference rescales both offsets
    /// and recomputes; the same reference is a no-op.
    pub fn set_data(&mut self, data: Rc<DataMatrix>) {
        if Rc::ptr_eq(&self.data, &data) {
            return;
        }
        let old = self.metrics(&self.data);
        let new = self.metrics(&data);
        self.viewport.rescale(old, new);
        self.data = data;
        self.update_data_and_scrollbars();
    }

    /// Set the vertical offset programmatically.
    pub fn set_scroll_top(&mut self, top: usize) -> usize {
        self.set_scroll_offset(Axis::Vertical, top)
    }

    /// Set the horizontal offset programmatically.
    pub fn set_scroll_left(&mut self, left: usize) -> usize {
        self.set_scroll_offset(Axis::Horizontal, left)
    }

    /// Clamp and apply an offset, move the scrollbar to match and recompute.
    /// The scrollbar echo of this change is swallowed. Returns the applied
    /// offset.
    pub fn set_scroll_offset(&mut self, axis: Axis, offset: usize) -> usize {
        let (vertical, horizontal) = self.metrics(&self.data);
        let metrics = match axis {
            Axis::Vertical => vertical,
            Axis::Horizontal => horizontal,
        };
        let bar = match axis {
            Axis::Vertical => &mut self.vertical_bar,
            Axis::Horizontal => &mut self.horizontal_bar,
        };
        let applied = self.viewport.set_offset(axis, offset, metrics, bar);
        self.refresh_content();
        applied
    }

    /// Queue a raw scrollbar scroll event. It is processed after the current
    /// scroll delay without further events.
    pub fn scroll_event(&mut self, event: ScrollEvent) {
        if let Some(axis) = event.target {
            self.scrollbar_mut(axis).position_px = event.position_px;
        }
        let now = self.clock.now_ms();
        self.scroll.call(now, event);
    }

    /// Handle a wheel event. Returns true when the boundary should prevent
    /// the browser default.
    pub fn wheel_event(&mut self, target: WheelTarget, delta_y: f64) -> bool {
        let now = self.clock.now_ms();
        if target != WheelTarget::Body {
            self.scroll.set_wait(self.config.wheel_scroll_delay_ms());
            self.wheel_restore.call(now, ());
        }
        if target == WheelTarget::VerticalScrollbar {
            return false;
        }
        let Some(delta_px) = wheel_line_scroll(&self.vertical_bar, delta_y) else {
            return false;
        };
        if self.vertical_bar.scroll_by(delta_px) {
            let event = ScrollEvent::new(
                Some(Axis::Vertical),
                self.vertical_bar.position_px,
                self.vertical_bar.scroll_extent_px,
            );
            self.scroll.call(now, event);
        }
        true
    }

    /// Record the contact point of a touch start.
    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.touch_point = Some((x, y));
    }

    /// Scroll both scrollbars by the finger movement and re-project once if
    /// either offset moved.
    pub fn touch_move(&mut self, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.touch_point.replace((x, y)) else {
            return;
        };
        self.vertical_bar.scroll_by(last_y - y);
        self.horizontal_bar.scroll_by(last_x - x);
        let mut moved = false;
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let bar = self.scrollbar(axis);
            let event = ScrollEvent::new(Some(axis), bar.position_px, bar.scroll_extent_px);
            moved |= self.resolve_scroll_event(&event).is_some();
        }
        if moved {
            self.refresh_content();
        }
    }

    pub fn touch_end(&mut self) {
        self.touch_point = None;
    }

    /// The table body height changed; schedule a scrollbar refresh.
    pub fn body_resized(&mut self, height_px: f64) {
        let changed = self
            .body_height_px
            .map_or(true, |h| (h - height_px).abs() > f64::EPSILON);
        self.body_height_px = Some(height_px);
        if changed {
            let now = self.clock.now_ms();
            self.scrollbar_refresh.call(now, false);
        }
    }

    /// Attach the vertical scrollbar to its enclosing body container, given
    /// as the container's current height. Fails without a container.
    pub fn attach_vertical_scrollbar(&mut self, body_height_px: Option<f64>) -> Result<()> {
        let height = body_height_px.ok_or(WingridError::MissingScrollContainer)?;
        self.body_height_px = Some(height);
        let now = self.clock.now_ms();
        self.scrollbar_refresh.call(now, true);
        Ok(())
    }

    /// Report measured scrollbar wrapper dimensions after geometry was
    /// applied. For the vertical scrollbar the scroll ratio is preserved.
    /// Returns true if the wrapper size changed.
    pub fn measure_scrollbar(&mut self, axis: Axis, client_px: f64, scroll_extent_px: f64) -> bool {
        self.scrollbar_mut(axis).resize(client_px, scroll_extent_px)
    }

    /// Call the handler bound to `name` on a rendered cell.
    ///
    /// The scrollbar positions stored by the table are left as they were;
    /// boundaries write them back to the scrollbars afterwards. Returns true
    /// if a handler ran.
    pub fn dispatch_event(
        &self,
        region: Region,
        row: usize,
        col: usize,
        event: &CellEvent<'_>,
    ) -> bool {
        let Some(cell) = self.region(region).cell(row, col) else {
            return false;
        };
        let Some(handler) = cell.handler(event.name) else {
            return false;
        };
        handler(event, cell);
        true
    }

    /// Event names bound anywhere in the current projection.
    pub fn bound_events(&self) -> Vec<EventName> {
        let mut names: Vec<EventName> = Region::all()
            .flat_map(|r| self.region(r).cells())
            .flat_map(|c| c.event_callbacks.keys().copied())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Run every debouncer that is due.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();
        let mut outcome = TickOutcome::default();
        let version = self.content_version;

        if self.wheel_restore.poll(now).is_some() {
            self.scroll.set_wait(self.config.scroll_delay_ms());
        }
        if let Some(event) = self.scroll.poll(now) {
            outcome.scrolled = self.process_scroll_event(&event);
        }
        if self.refresh.poll(now).is_some() {
            self.update_data_and_scrollbars();
        }
        if let Some(vertical_only) = self.scrollbar_refresh.poll(now) {
            outcome.geometry = Some(self.refresh_scrollbars(vertical_only));
        }

        outcome.content_updated = self.content_version != version;
        outcome
    }

    /// When [`Table::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<f64> {
        earliest_deadline([
            self.wheel_restore.next_deadline(),
            self.scroll.next_deadline(),
            self.refresh.next_deadline(),
            self.scrollbar_refresh.next_deadline(),
        ])
    }

    /// Drop all pending work.
    pub fn cancel_pending(&mut self) {
        self.refresh.cancel();
        self.scrollbar_refresh.cancel();
        self.scroll.cancel();
        if self.wheel_restore.cancel().is_some() {
            self.scroll.set_wait(self.config.scroll_delay_ms());
        }
    }

    /// Vertical and horizontal metrics for `data` under this partition.
    fn metrics(&self, data: &DataMatrix) -> (AxisMetrics, AxisMetrics) {
        let p = &self.partition;
        (
            AxisMetrics::new(
                data.row_count(),
                p.fixed_rows(),
                p.row_count(RowBand::Middle),
            ),
            AxisMetrics::new(
                data.column_count(),
                p.fixed_columns(),
                p.column_count(ColumnBand::Center),
            ),
        )
    }

    /// The debounced body of [`Table::scroll_event`].
    fn process_scroll_event(&mut self, event: &ScrollEvent) -> Option<Axis> {
        let axis = self.resolve_scroll_event(event)?;
        self.refresh_content();
        Some(axis)
    }

    /// Move the offset for a raw event and notify the host, without
    /// projecting.
    fn resolve_scroll_event(&mut self, event: &ScrollEvent) -> Option<Axis> {
        let (vertical, horizontal) = self.metrics(&self.data);
        let axis = self.viewport.apply_scroll(event, vertical, horizontal)?;
        self.notify_scroll(Some(event), ScrollDirection::from(Some(axis)));
        if self.config.vertical_scrollbar_auto_resize() {
            let now = self.clock.now_ms();
            self.scrollbar_refresh.call(now, true);
        }
        Some(axis)
    }

    fn notify_scroll(&mut self, event: Option<&ScrollEvent>, direction: ScrollDirection) {
        let position = self.viewport.position();
        let info = ScrollInfo {
            top: position.top + self.partition.row_count(RowBand::Header),
            left: position.left + self.partition.column_count(ColumnBand::Left),
            direction,
        };
        if let Some(f) = self.scroll_fn.as_mut() {
            f(event, info);
        }
    }

    /// Recompute all nine regions and notify listeners.
    fn refresh_content(&mut self) {
        let ctx = ResolveContext {
            data: &self.data,
            data_value_fn: self.data_value_fn.as_deref(),
            scroll: self.viewport.position(),
        };
        self.projection.project(&self.partition, &ctx, &self.ranges);
        self.content_version += 1;
        for listener in &mut self.content_listeners {
            listener();
        }
    }

    fn update_data_and_scrollbars(&mut self) {
        self.refresh_content();
        let now = self.clock.now_ms();
        self.scrollbar_refresh.call(now, false);
    }

    fn refresh_scrollbars(&mut self, vertical_only: bool) -> ScrollbarGeometry {
        let mut geometry = ScrollbarGeometry::compute(
            &self.partition,
            self.data.row_count(),
            self.data.column_count(),
            vertical_only,
        );
        if vertical_only {
            geometry.horizontal = self.geometry.and_then(|g| g.horizontal);
        }
        log::trace!("scrollbar geometry {geometry:?}");
        self.geometry = Some(geometry);
        geometry
    }
}
