//! Per-view list state.
//!
//! Each list screen owns a [`ListState`] (what the user typed, picked and
//! clicked) and a [`ViewConfig`] (how those controls map onto record fields).
//! [`ListState::query`] turns the pair into a [`Query`], so the only thing
//! that differs between screens is configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date_range::{Boundary, DateRange};
use crate::error::{QueryError, Result};
use crate::filter::{is_unconstrained, ClauseValue};
use crate::op::Op;
use crate::query::Query;
use crate::sort::{Dir, Sort};

/// Page size used when a view does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A dropdown-style filter control bound to a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub name: String,
    pub field: String,
    /// `Eq` for plain dropdowns. `In` reads the selection as a
    /// comma-separated list; the string operators use it verbatim.
    pub op: Op,
}

/// Declarative wiring of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    name: String,
    search_fields: Vec<String>,
    controls: Vec<FilterControl>,
    date_field: Option<String>,
    sort_fields: Vec<String>,
    default_sort: Option<Sort>,
    page_size: usize,
    boundary: Boundary,
}

impl ViewConfig {
    pub fn new(name: impl Into<String>) -> Self {
        ViewConfig {
            name: name.into(),
            search_fields: Vec::new(),
            controls: Vec::new(),
            date_field: None,
            sort_fields: Vec::new(),
            default_sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            boundary: Boundary::default(),
        }
    }

    /// Fields the search box looks in.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an equality control.
    pub fn control(self, name: &str, field: &str) -> Self {
        self.control_with(name, field, Op::Eq)
    }

    pub fn control_with(mut self, name: &str, field: &str, op: Op) -> Self {
        self.controls.push(FilterControl {
            name: name.to_string(),
            field: field.to_string(),
            op,
        });
        self
    }

    /// Field the date-range picker applies to.
    pub fn date_field(mut self, field: &str) -> Self {
        self.date_field = Some(field.to_string());
        self
    }

    /// Columns the user may sort by. Left empty, any field is accepted.
    pub fn sort_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sort applied until the user picks a column.
    pub fn default_sort(mut self, sort: Sort) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    pub fn get_page_size(&self) -> usize {
        self.page_size
    }

    pub fn get_date_field(&self) -> Option<&str> {
        self.date_field.as_deref()
    }

    pub fn control_named(&self, name: &str) -> Option<&FilterControl> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn get_sort_fields(&self) -> &[String] {
        &self.sort_fields
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.sort_fields.is_empty() || self.sort_fields.iter().any(|f| f == field)
    }
}

/// What the user has entered on one list screen.
///
/// Any change to search, filters, date range or sort sends the view back to
/// page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    search: String,
    selections: BTreeMap<String, String>,
    date_range: Option<DateRange>,
    sort: Option<Sort>,
    page: usize,
}

impl Default for ListState {
    fn default() -> Self {
        ListState {
            search: String::new(),
            selections: BTreeMap::new(),
            date_range: None,
            sort: None,
            page: 1,
        }
    }
}

impl ListState {
    pub fn new() -> Self {
        ListState::default()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Sets a control's selection; `"all"` or blank clears it.
    pub fn set_filter(&mut self, control: &str, selection: &str) {
        if is_unconstrained(selection) {
            self.selections.remove(control);
        } else {
            self.selections
                .insert(control.to_string(), selection.to_string());
        }
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
        self.page = 1;
    }

    /// Column-header click: a new field sorts ascending, the current field
    /// flips direction.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.field == field => Sort::new(field, current.dir.toggle()),
            _ => Sort::new(field, Dir::Asc),
        });
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Requested page; the engine clamps it to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Clears search, filter selections and date range. The sort stays.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.selections.clear();
        self.date_range = None;
        self.page = 1;
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty() || !self.selections.is_empty() || self.date_range.is_some()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selection(&self, control: &str) -> Option<&str> {
        self.selections.get(control).map(String::as_str)
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Builds the query for this state under `config`.
    ///
    /// Fails on a selection for a control the view does not have, a sort
    /// column it does not offer, a date range on a view without a date
    /// field, or a zero page size.
    pub fn query(&self, config: &ViewConfig) -> Result<Query> {
        let mut query = Query::new().search(&self.search, config.search_fields.iter().cloned());

        for (name, selection) in &self.selections {
            let control = config
                .control_named(name)
                .ok_or_else(|| QueryError::UnknownControl {
                    view: config.name.clone(),
                    control: name.clone(),
                })?;
            query = query.and(&control.field, control.op, selection_value(control.op, selection));
        }

        if let Some(range) = self.date_range {
            let field = config
                .date_field
                .as_deref()
                .ok_or_else(|| QueryError::NoDateField(config.name.clone()))?;
            query = query.date_range_with(field, range, config.boundary);
        }

        if let Some(sort) = self.sort.as_ref().filter(|s| !config.is_sortable(&s.field)) {
            return Err(QueryError::UnknownSortField {
                view: config.name.clone(),
                field: sort.field.clone(),
            });
        }
        if let Some(sort) = self.sort.as_ref().or(config.default_sort.as_ref()) {
            query = query.order_by(&sort.field, sort.dir);
        }

        query.paginate(self.page, config.page_size)
    }
}

fn selection_value(op: Op, selection: &str) -> ClauseValue {
    match op {
        Op::In => ClauseValue::StringSet(
            selection
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => ClauseValue::String(selection.to_string()),
    }
}
