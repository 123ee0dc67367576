//! One declarative [`ViewConfig`] per list screen.
//!
//! Screens differ only in which fields the search box reads, which dropdown
//! filters exist, the date field, the default sort and the page size.

use std::fmt;

use clap::ValueEnum;
use haulview_query::{Op, Sort, ViewConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Activities,
    Invoices,
    Transactions,
    Tasks,
    Deliveries,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::Activities => "activities",
            View::Invoices => "invoices",
            View::Transactions => "transactions",
            View::Tasks => "tasks",
            View::Deliveries => "deliveries",
        }
    }

    pub fn config(self) -> ViewConfig {
        match self {
            View::Activities => ViewConfig::new(self.name())
                .search_fields(["title", "description", "customer.name"])
                .control("type", "type")
                .control("status", "status")
                .control("customer", "customer.name")
                .date_field("date")
                .sort_fields(["date", "title", "type", "status", "customer.name", "id"])
                .default_sort(Sort::desc("date"))
                .page_size(10),
            View::Invoices => ViewConfig::new(self.name())
                .search_fields(["number", "customer.name", "customer.company"])
                .control_with("status", "status", Op::In)
                .control("customer", "customer.name")
                .date_field("issued")
                .sort_fields(["issued", "due", "amount", "number", "status", "customer.name", "id"])
                .default_sort(Sort::desc("issued")),
            View::Transactions => ViewConfig::new(self.name())
                .search_fields(["reference", "description", "customer.name"])
                .control("type", "type")
                .control("method", "method")
                .control("status", "status")
                .date_field("date")
                .sort_fields(["date", "amount", "reference", "type", "method", "status", "id"])
                .default_sort(Sort::desc("date")),
            View::Tasks => ViewConfig::new(self.name())
                .search_fields(["title", "description", "assignee"])
                .control("status", "status")
                .control("assignee", "assignee")
                .date_field("due")
                .sort_fields(["due", "priority", "title", "status", "assignee", "id"])
                .default_sort(Sort::asc("due"))
                .page_size(10),
            View::Deliveries => ViewConfig::new(self.name())
                .search_fields(["tracking", "customer.name", "origin", "destination"])
                .control_with("status", "status", Op::In)
                .control("driver", "driver")
                .control_with("destination", "destination", Op::StartsWith)
                .date_field("scheduled")
                .sort_fields([
                    "scheduled",
                    "tracking",
                    "origin",
                    "destination",
                    "status",
                    "driver",
                    "weight",
                    "customer.name",
                    "id",
                ])
                .default_sort(Sort::desc("scheduled")),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
