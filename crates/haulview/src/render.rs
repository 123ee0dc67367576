//! Page rendering: an aligned text table or pretty JSON.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use console::style;
use haulview_query::Page;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::records::{Activity, Delivery, Invoice, Task, Transaction};

/// Widest a cell may get before it is cut with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 32;

/// A record that can be shown as one table row.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl TableRow for Activity {
    fn headers() -> &'static [&'static str] {
        &["ID", "DATE", "TYPE", "TITLE", "CUSTOMER", "STATUS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.date),
            self.kind.clone(),
            self.title.clone(),
            self.customer.name.clone(),
            self.status.clone(),
        ]
    }
}

impl TableRow for Invoice {
    fn headers() -> &'static [&'static str] {
        &["NUMBER", "ISSUED", "DUE", "CUSTOMER", "AMOUNT", "STATUS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.number.clone(),
            date(&self.issued),
            self.due.as_ref().map_or_else(|| "-".to_string(), date),
            self.customer.name.clone(),
            money(self.amount),
            self.status.clone(),
        ]
    }
}

impl TableRow for Transaction {
    fn headers() -> &'static [&'static str] {
        &["REFERENCE", "DATE", "TYPE", "METHOD", "DESCRIPTION", "AMOUNT", "STATUS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.reference.clone(),
            date(&self.date),
            self.kind.clone(),
            self.method.clone(),
            self.description.clone(),
            money(self.amount),
            self.status.clone(),
        ]
    }
}

impl TableRow for Task {
    fn headers() -> &'static [&'static str] {
        &["ID", "DUE", "PRIORITY", "TITLE", "ASSIGNEE", "STATUS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.due),
            self.priority.to_string(),
            self.title.clone(),
            or_dash(self.assignee.as_deref()),
            self.status.clone(),
        ]
    }
}

impl TableRow for Delivery {
    fn headers() -> &'static [&'static str] {
        &["TRACKING", "SCHEDULED", "ROUTE", "CUSTOMER", "DRIVER", "WEIGHT", "STATUS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.tracking.clone(),
            date(&self.scheduled),
            format!("{} → {}", self.origin, self.destination),
            self.customer.name.clone(),
            or_dash(self.driver.as_deref()),
            format!("{:.1} kg", self.weight_kg),
            self.status.clone(),
        ]
    }
}

/// Cuts `s` to `max_width` display columns, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

/// Lays out header and rows in columns two spaces apart.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| truncate_to_width(cell, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header_line = line(headers.iter().map(|h| h.to_string()).collect());
    lines.push(style(header_line).bold().to_string());
    lines.extend(rows.into_iter().map(line));
    lines
}

/// Writes a page as a text table with a summary line.
///
/// An empty page prints an empty-state message instead; when
/// `filters_active` is set it suggests clearing them.
pub fn text<T: TableRow>(
    out: &mut dyn Write,
    view: &str,
    page: &Page<&T>,
    filters_active: bool,
) -> io::Result<()> {
    if page.is_empty() {
        writeln!(out, "No {} found.", view)?;
        if filters_active {
            writeln!(
                out,
                "Nothing matches the current search and filters. Clear them to see all {}.",
                view
            )?;
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = page.items.iter().map(|item| item.cells()).collect();
    for line in table(T::headers(), &rows) {
        writeln!(out, "{}", line)?;
    }

    let first = page.first_item_number();
    let last = first + page.len() - 1;
    writeln!(out)?;
    writeln!(
        out,
        "Showing {}-{} of {} {} (page {} of {})",
        first,
        last,
        page.total_items,
        view,
        page.page_number,
        page.total_pages.max(1)
    )?;
    Ok(())
}

/// Writes a page as pretty-printed JSON.
pub fn json<T: Serialize>(out: &mut dyn Write, page: &Page<&T>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, page)?;
    writeln!(out)
}
