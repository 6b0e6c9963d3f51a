//! The sorted, date-filtered and paginated list behind the transaction table.

use chrono::NaiveDate;

use crate::models::Transaction;

pub(crate) const PAGE_SIZE: usize = 10;

/// Inclusive calendar-date range. Only filters when both bounds are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub(crate) fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// `start 00:00:00.000 <= date <= end 23:59:59.999`, which for whole
    /// days is just `start <= date <= end`.
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => true,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |d: Option<NaiveDate>| {
            d.map_or_else(|| "…".to_string(), |d| d.format("%d/%m/%Y").to_string())
        };
        write!(f, "{} to {}", show(self.start), show(self.end))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TransactionView {
    all: Vec<Transaction>,
    filtered: Vec<Transaction>,
    range: DateRange,
    page: usize,
}

impl Default for TransactionView {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionView {
    pub(crate) fn new() -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            range: DateRange::default(),
            page: 1,
        }
    }

    /// Replace the loaded records. Newest date first; equal dates keep the
    /// order they were given in.
    pub(crate) fn load(&mut self, mut records: Vec<Transaction>) {
        records.sort_by(|a, b| b.date.cmp(&a.date));
        self.all = records;
        self.apply_filter();
    }

    pub(crate) fn all(&self) -> &[Transaction] {
        &self.all
    }

    pub(crate) fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    pub(crate) fn range(&self) -> DateRange {
        self.range
    }

    pub(crate) fn set_start(&mut self, start: Option<NaiveDate>) {
        self.set_range(DateRange::new(start, self.range.end));
    }

    pub(crate) fn set_end(&mut self, end: Option<NaiveDate>) {
        self.set_range(DateRange::new(self.range.start, end));
    }

    pub(crate) fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.filtered = if self.range.is_active() {
            self.all
                .iter()
                .filter(|t| self.range.contains(t.date))
                .cloned()
                .collect()
        } else {
            self.all.clone()
        };
        self.page = 1;
    }

    // ── Paging ────────────────────────────────────────────────

    /// Current page, 1-based.
    pub(crate) fn page(&self) -> usize {
        self.page
    }

    pub(crate) fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE).max(1)
    }

    pub(crate) fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub(crate) fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Returns false when already on the last page.
    pub(crate) fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Returns false when already on the first page.
    pub(crate) fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn page_rows(&self) -> &[Transaction] {
        let len = self.filtered.len();
        let start = ((self.page - 1) * PAGE_SIZE).min(len);
        let end = (start + PAGE_SIZE).min(len);
        &self.filtered[start..end]
    }
}
