//! haulview - list views over logistics CRM records.
//!
//! Each view (activities, invoices, transactions, tasks, deliveries) is a
//! [`ViewConfig`] over a record type. The command line plays the part of
//! the list screen's controls: it fills a [`ListState`], the state builds a
//! [`haulview_query::Query`], and the resulting page is printed.
//!
//! ```text
//! haulview deliveries --search porto --filter status=pending,in-transit --sort scheduled
//! haulview activities --date this-week --filter type=delivery --format json
//! haulview invoices --from 2024-01-01 --to 2024-01-31 --page 2
//! ```

pub mod data;
pub mod records;
pub mod render;
pub mod views;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};
use clap::{ArgAction, Parser, ValueEnum};
use haulview_query::{Boundary, DateRange, ListState, Queryable, ViewConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::render::TableRow;
use crate::views::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Search, filter, sort and page CRM list views.
#[derive(Debug, Parser)]
#[command(name = "haulview", version)]
pub struct Cli {
    /// List view to show
    #[arg(value_enum)]
    pub view: View,

    /// Case-insensitive text search across the view's search fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter control selection, e.g. `status=pending` (repeatable; `all` clears)
    #[arg(short, long = "filter", value_name = "CONTROL=VALUE", value_parser = parse_selection)]
    pub filters: Vec<(String, String)>,

    /// Date range preset: today, yesterday, this-week, this-month, last-month,
    /// or START..END
    #[arg(short, long, value_name = "PRESET", conflicts_with_all = ["from", "to"])]
    pub date: Option<DateRange>,

    /// Custom range start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Custom range end, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Sort by field; repeating a field flips its direction
    #[arg(long = "sort", value_name = "FIELD")]
    pub sorts: Vec<String>,

    /// Page to show (1-indexed; past the end shows the last page)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Items per page (defaults to the view's page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Let today/this-week/this-month include future-dated records
    #[arg(long)]
    pub open_ended: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,

    /// Load records from a JSON array instead of the built-in mock data
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Resolve date presets as of this instant (RFC 3339) instead of now
    #[arg(long, value_name = "INSTANT")]
    pub as_of: Option<DateTime<FixedOffset>>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_selection(s: &str) -> std::result::Result<(String, String), String> {
    let (control, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CONTROL=VALUE, got '{}'", s))?;
    let control = control.trim();
    if control.is_empty() {
        return Err(format!("missing control name in '{}'", s));
    }
    Ok((control.to_string(), value.trim().to_string()))
}

impl Cli {
    /// Replays the command line onto a fresh list state, in the order a
    /// user would touch the controls. The page goes last since every other
    /// change resets it.
    pub fn list_state(&self) -> Result<ListState> {
        let mut state = ListState::new();
        if let Some(term) = &self.search {
            state.set_search(term.clone());
        }
        for (control, value) in &self.filters {
            state.set_filter(control, value);
        }
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateRange::custom(from, to)?),
            _ => self.date,
        };
        state.set_date_range(range);
        for field in &self.sorts {
            state.toggle_sort(field);
        }
        state.set_page(self.page);
        Ok(state)
    }

    /// The view's configuration with command-line overrides applied.
    pub fn view_config(&self) -> ViewConfig {
        let mut config = self.view.config();
        if let Some(size) = self.page_size {
            config = config.page_size(size);
        }
        if self.open_ended {
            config = config.boundary(Boundary::OpenEnded);
        }
        config
    }
}

/// Runs the command, writing the page to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match cli.as_of {
        Some(now) => show_view(cli, &now, out),
        None => show_view(cli, &Local::now(), out),
    }
}

fn show_view<Tz: TimeZone>(cli: &Cli, now: &DateTime<Tz>, out: &mut dyn Write) -> Result<()> {
    let today = data::Today::of(now);
    let path = cli.data.as_deref();
    match cli.view {
        View::Activities => show(cli, load(path, || data::activities(today))?, now, out),
        View::Invoices => show(cli, load(path, || data::invoices(today))?, now, out),
        View::Transactions => show(cli, load(path, || data::transactions(today))?, now, out),
        View::Tasks => show(cli, load(path, || data::tasks(today))?, now, out),
        View::Deliveries => show(cli, load(path, || data::deliveries(today))?, now, out),
    }
}

/// Reads records from `path`, or falls back to the mock data.
pub fn load<T, F>(path: Option<&Path>, mock: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    let Some(path) = path else {
        return Ok(mock());
    };
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

fn show<T, Tz>(cli: &Cli, records: Vec<T>, now: &DateTime<Tz>, out: &mut dyn Write) -> Result<()>
where
    T: Queryable + Serialize + TableRow,
    Tz: TimeZone,
{
    let config = cli.view_config();
    let state = cli.list_state()?;
    if let Some(control) = cli
        .filters
        .iter()
        .map(|(control, _)| control)
        .find(|control| config.control_named(control).is_none())
    {
        let known: Vec<&str> = config.controls().iter().map(|c| c.name.as_str()).collect();
        bail!(
            "view '{}' has no filter '{}' (available: {})",
            config.name(),
            control,
            known.join(", ")
        );
    }
    if let Some(field) = cli.sorts.iter().find(|field| !config.is_sortable(field)) {
        bail!(
            "view '{}' cannot sort by '{}' (available: {})",
            config.name(),
            field,
            config.get_sort_fields().join(", ")
        );
    }

    let query = state
        .query(&config)
        .with_context(|| format!("invalid {} query", config.name()))?;
    tracing::debug!(view = config.name(), records = records.len(), "running query");

    let page = query.execute_at(&records, T::accessor, now);
    match cli.format {
        Format::Text => render::text(out, config.name(), &page, state.has_active_filters())?,
        Format::Json => render::json(out, &page)?,
    }
    Ok(())
}
