//! CRM record types shown in the list views.
//!
//! Query names are the serde names, so a `--data` file and a `--filter` use
//! the same vocabulary (`type`, `customer.name`, `due`).

use std::fmt;

use chrono::{DateTime, Utc};
use haulview_macros::Queryable;
use haulview_query::QueryEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Customer {
    #[query(String)]
    pub name: String,

    #[query(String, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Customer {
    pub fn new(name: &str, company: Option<&str>) -> Self {
        Customer {
            name: name.to_string(),
            company: company.map(str::to_string),
        }
    }
}

/// A call, email, meeting, note or delivery event in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Activity {
    #[query(Number)]
    pub id: u32,

    #[query(String)]
    pub title: String,

    #[query(String, rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    #[query(String)]
    #[serde(default)]
    pub description: String,

    #[query(String)]
    pub status: String,

    #[query(nested)]
    pub customer: Customer,

    #[query(Timestamp)]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Invoice {
    #[query(Number)]
    pub id: u32,

    #[query(String)]
    pub number: String,

    #[query(nested)]
    pub customer: Customer,

    #[query(Number)]
    pub amount: f64,

    /// `draft`, `sent`, `paid` or `overdue`.
    #[query(String)]
    pub status: String,

    #[query(Timestamp)]
    pub issued: DateTime<Utc>,

    #[query(Timestamp, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Transaction {
    #[query(Number)]
    pub id: u32,

    #[query(String)]
    pub reference: String,

    #[query(String)]
    #[serde(default)]
    pub description: String,

    /// `credit` or `debit`.
    #[query(String, rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,

    #[query(String)]
    pub method: String,

    #[query(Number)]
    pub amount: f64,

    #[query(String)]
    pub status: String,

    #[query(nested)]
    pub customer: Customer,

    #[query(Timestamp)]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl QueryEnum for Priority {
    fn discriminant(&self) -> u32 {
        match self {
            Priority::Low => 10,
            Priority::Medium => 20,
            Priority::High => 30,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Task {
    #[query(Number)]
    pub id: u32,

    #[query(String)]
    pub title: String,

    #[query(String)]
    #[serde(default)]
    pub description: String,

    /// `todo`, `in-progress` or `done`.
    #[query(String)]
    pub status: String,

    /// Sorts low < medium < high.
    #[query(Enum)]
    pub priority: Priority,

    #[query(String, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[query(Timestamp)]
    pub due: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Delivery {
    #[query(Number)]
    pub id: u32,

    #[query(String)]
    pub tracking: String,

    #[query(nested)]
    pub customer: Customer,

    #[query(String)]
    pub origin: String,

    #[query(String)]
    pub destination: String,

    /// `pending`, `in-transit`, `delivered` or `failed`.
    #[query(String)]
    pub status: String,

    #[query(String, optional)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    #[query(Number, rename = "weight")]
    #[serde(rename = "weight")]
    pub weight_kg: f64,

    #[query(Timestamp)]
    pub scheduled: DateTime<Utc>,

    /// Proof of delivery captured.
    #[query(Bool)]
    #[serde(default)]
    pub signed: bool,
}
