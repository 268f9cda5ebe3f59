// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApplicationRecord, Column, SortDirection, SortKey, SortSpec};

pub const PAGE_SIZE: usize = 10;

/// `needle` must already be lowercased.
pub fn record_matches(record: &ApplicationRecord, needle: &str) -> bool {
    Column::SEARCHABLE.iter().any(|column| {
        record
            .field(*column)
            .is_some_and(|value| value.display().to_lowercase().contains(needle))
    })
}

pub fn filter_records(raw: &[ApplicationRecord], query: &str) -> Vec<ApplicationRecord> {
    let needle = query.to_lowercase();
    raw.iter()
        .filter(|record| record_matches(record, &needle))
        .cloned()
        .collect()
}

pub fn sort_records(records: &mut [ApplicationRecord], spec: SortSpec) {
    records.sort_by(|left, right| spec.compare(left, right));
}

pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Pages are 1-based. Out-of-range pages yield an empty slice.
pub fn page_slice(records: &[ApplicationRecord], page: usize) -> &[ApplicationRecord] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(PAGE_SIZE))
    else {
        return &[];
    };
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// The loaded dataset plus the search/sort/page state derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    raw: Vec<ApplicationRecord>,
    derived: Vec<ApplicationRecord>,
    query: String,
    sort: Option<SortSpec>,
    sort_applied: bool,
    page: usize,
}

impl TableView {
    pub fn new(records: Vec<ApplicationRecord>) -> Self {
        Self {
            derived: records.clone(),
            raw: records,
            query: String::new(),
            sort: None,
            sort_applied: false,
            page: 1,
        }
    }

    pub fn raw(&self) -> &[ApplicationRecord] {
        &self.raw
    }

    pub fn derived(&self) -> &[ApplicationRecord] {
        &self.derived
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The last requested sort, kept across searches so the next request on
    /// the same key still flips direction.
    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// `false` once a search has rebuilt the rows in raw order.
    pub fn is_sort_applied(&self) -> bool {
        self.sort_applied
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Never less than one, so an empty view still has a page to sit on.
    pub fn last_page(&self) -> usize {
        page_count(self.derived.len()).max(1)
    }

    pub fn current_rows(&self) -> &[ApplicationRecord] {
        page_slice(&self.derived, self.page)
    }

    /// Direction of the order the rows are actually in, if `key` produced it.
    pub fn sort_direction_for(&self, key: SortKey) -> Option<SortDirection> {
        self.sort
            .filter(|spec| self.sort_applied && spec.key == key)
            .map(|spec| spec.direction)
    }

    /// Refilters from the raw dataset in raw order and returns to page 1.
    /// The sort spec is remembered but no longer applied.
    /// Re-applying the current query is a no-op and reports `false`.
    pub fn apply_query(&mut self, query: &str) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query.to_owned();
        self.derived = filter_records(&self.raw, &self.query);
        self.sort_applied = false;
        self.page = 1;
        tracing::debug!(
            query = %self.query,
            matches = self.derived.len(),
            "query applied"
        );
        true
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.apply_query(query);
        self
    }

    /// Sorting the same key again flips direction; a new key starts ascending.
    pub fn sort_by(&mut self, key: SortKey) -> SortDirection {
        let direction = match self.sort {
            Some(spec) if spec.key == key => spec.direction.toggled(),
            _ => SortDirection::Asc,
        };
        let spec = SortSpec { key, direction };
        sort_records(&mut self.derived, spec);
        self.sort = Some(spec);
        self.sort_applied = true;
        tracing::debug!(key = key.as_str(), direction = direction.as_str(), "sorted");
        direction
    }

    /// Clamps into `[1, last_page]` and returns the page actually selected.
    pub fn select_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.last_page());
        self.page
    }
}
