//! Built-in mock data.
//!
//! Dates are laid out relative to a reference day so the date-range presets
//! always have something to show: a few records today, some this week,
//! some last month and a couple scheduled ahead. Hours are wall-clock hours
//! in the viewer's offset, so "today" rows stay inside the viewer's today.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::records::{Activity, Customer, Delivery, Invoice, Priority, Task, Transaction};

const CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Ana Souza", Some("Porto Freight")),
    ("Bruno Lima", Some("Lima & Filhos")),
    ("Chloé Martin", Some("Rhône Cargo")),
    ("Dmitri Ivanov", None),
    ("Émile Dubois", Some("Dubois Transports")),
    ("Fatima Zahra", Some("Atlas Logistics")),
    ("Grace Okafor", None),
    ("Hiro Tanaka", Some("Kanto Express")),
];

fn customer(index: usize) -> Customer {
    let (name, company) = CUSTOMERS[index % CUSTOMERS.len()];
    Customer::new(name, company)
}

/// The viewer's calendar day and UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Today {
    pub date: NaiveDate,
    pub offset: FixedOffset,
}

impl Today {
    /// The day `now` falls on, in `now`'s own offset.
    pub fn of<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Today {
            date: now.date_naive(),
            offset: now.offset().fix(),
        }
    }

    pub fn utc(date: NaiveDate) -> Self {
        Today {
            date,
            offset: Utc.fix(),
        }
    }

    /// `days` from today at `hour`:00 local time.
    fn at(self, days: i64, hour: i64) -> DateTime<Utc> {
        let local = self.date.and_time(NaiveTime::MIN) + Duration::days(days) + Duration::hours(hour);
        (local - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }
}

pub fn activities(today: Today) -> Vec<Activity> {
    const ROWS: &[(&str, &str, &str, &str, i64, i64)] = &[
        ("Delivery to Porto depot", "delivery", "completed", "Pallets dropped at dock 3", 0, 9),
        ("Follow-up call", "call", "completed", "Discussed Q3 volumes", 0, 11),
        ("Rate sheet sent", "email", "completed", "Updated fuel surcharge", 0, 14),
        ("Route review meeting", "meeting", "scheduled", "Northern corridor", 0, 16),
        ("Delivery to Lyon", "delivery", "completed", "Signed by warehouse lead", -1, 10),
        ("Missed call", "call", "missed", "Left voicemail", -1, 15),
        ("Contract renewal", "meeting", "completed", "Two-year term agreed", -2, 13),
        ("Customs paperwork", "note", "completed", "EORI number confirmed", -2, 17),
        ("Delivery to Casablanca", "delivery", "failed", "Recipient absent", -3, 9),
        ("Quote request", "email", "completed", "Refrigerated transport", -4, 10),
        ("Onboarding call", "call", "completed", "Portal access set up", -5, 12),
        ("Damage claim", "note", "open", "Two cartons crushed", -6, 11),
        ("Delivery to Osaka", "delivery", "completed", "Air freight leg", -8, 8),
        ("Invoice query", "email", "completed", "Disputed pallet count", -9, 16),
        ("Quarterly review", "meeting", "completed", "On-time rate 96%", -12, 14),
        ("Delivery to Hamburg", "delivery", "completed", "Cross-dock transfer", -15, 9),
        ("Pricing call", "call", "completed", "Volume discount tiers", -20, 10),
        ("Site visit", "meeting", "completed", "New warehouse in Setúbal", -26, 13),
        ("Delivery to Madrid", "delivery", "completed", "Express service", -33, 9),
        ("Holiday schedule", "email", "completed", "Reduced pickups", -38, 11),
        ("Claim settled", "note", "completed", "Credit note issued", -45, 15),
        ("Delivery to Marseille", "delivery", "scheduled", "Booked slot 07:00", 2, 7),
        ("Planning call", "call", "scheduled", "Peak season capacity", 3, 10),
        ("Carrier audit", "meeting", "scheduled", "Annual compliance", 9, 9),
    ];

    ROWS.iter()
        .enumerate()
        .map(|(i, &(title, kind, status, description, days, hour))| Activity {
            id: i as u32 + 1,
            title: title.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            status: status.to_string(),
            customer: customer(i),
            date: today.at(days, hour),
        })
        .collect()
}

pub fn invoices(today: Today) -> Vec<Invoice> {
    const ROWS: &[(f64, &str, i64, Option<i64>)] = &[
        (1250.00, "paid", -40, Some(30)),
        (980.50, "paid", -35, Some(30)),
        (4320.00, "overdue", -33, Some(14)),
        (210.75, "paid", -28, Some(30)),
        (7600.00, "sent", -14, Some(30)),
        (345.20, "sent", -10, Some(30)),
        (1890.00, "overdue", -25, Some(7)),
        (560.00, "draft", -2, None),
        (12450.00, "sent", -6, Some(45)),
        (99.90, "paid", -3, Some(15)),
        (3300.00, "draft", 0, None),
        (720.40, "sent", -1, Some(30)),
        (2015.00, "paid", -18, Some(30)),
        (640.00, "overdue", -50, Some(30)),
    ];

    ROWS.iter()
        .enumerate()
        .map(|(i, &(amount, status, issued_days, terms))| {
            let issued = today.at(issued_days, 9);
            Invoice {
                id: i as u32 + 1,
                number: format!("INV-{:04}", 2041 + i),
                customer: customer(i * 3),
                amount,
                status: status.to_string(),
                issued,
                due: terms.map(|days| issued + Duration::days(days)),
            }
        })
        .collect()
}

pub fn transactions(today: Today) -> Vec<Transaction> {
    const ROWS: &[(&str, &str, &str, f64, &str, i64, i64)] = &[
        ("credit", "transfer", "Payment INV-2041", 1250.00, "cleared", -12, 10),
        ("credit", "card", "Payment INV-2042", 980.50, "cleared", -7, 15),
        ("debit", "transfer", "Fuel card top-up", 3000.00, "cleared", -6, 9),
        ("debit", "direct-debit", "Warehouse lease", 8200.00, "cleared", -30, 8),
        ("credit", "transfer", "Payment INV-2044", 210.75, "cleared", -20, 11),
        ("debit", "card", "Toll charges", 145.30, "pending", 0, 12),
        ("credit", "cash", "COD delivery HV-1003", 320.00, "cleared", -1, 17),
        ("debit", "transfer", "Subcontractor haulage", 2750.00, "pending", -2, 14),
        ("credit", "card", "Payment INV-2050", 99.90, "cleared", -3, 16),
        ("debit", "card", "Packaging supplies", 412.60, "failed", -4, 10),
        ("credit", "transfer", "Payment INV-2053", 2015.00, "cleared", -16, 9),
        ("debit", "direct-debit", "Vehicle insurance", 1540.00, "cleared", -33, 8),
        ("credit", "transfer", "Deposit new account", 5000.00, "pending", 0, 9),
        ("debit", "transfer", "Customs duties", 880.15, "cleared", -9, 13),
        ("credit", "cash", "COD delivery HV-1011", 145.00, "cleared", -5, 18),
        ("debit", "card", "Tyre replacement", 1260.00, "cleared", -41, 11),
    ];

    ROWS.iter()
        .enumerate()
        .map(
            |(i, &(kind, method, description, amount, status, days, hour))| Transaction {
                id: i as u32 + 1,
                reference: format!("TX-{:05}", 88120 + i * 7),
                description: description.to_string(),
                kind: kind.to_string(),
                method: method.to_string(),
                amount,
                status: status.to_string(),
                customer: customer(i + 1),
                date: today.at(days, hour),
            },
        )
        .collect()
}

pub fn tasks(today: Today) -> Vec<Task> {
    const ROWS: &[(&str, &str, Priority, Option<&str>, i64)] = &[
        ("Confirm Marseille slot", "todo", Priority::High, Some("Ana"), 1),
        ("Renew fleet insurance", "in-progress", Priority::High, Some("Bruno"), 5),
        ("Chase overdue INV-2043", "todo", Priority::Medium, Some("Chloé"), 0),
        ("Update rate cards", "done", Priority::Low, Some("Ana"), -3),
        ("Driver training roster", "todo", Priority::Low, None, 12),
        ("Reconcile COD payments", "in-progress", Priority::Medium, Some("Dmitri"), 0),
        ("Plan peak season routes", "todo", Priority::High, None, 20),
        ("Archive Q1 manifests", "done", Priority::Low, Some("Bruno"), -30),
        ("Follow up damage claim", "todo", Priority::Medium, Some("Chloé"), -1),
        ("Audit tachograph data", "todo", Priority::Medium, Some("Dmitri"), 7),
        ("Book customs broker", "done", Priority::High, Some("Ana"), -8),
        ("Replace dock scanner", "todo", Priority::Low, None, 3),
    ];

    ROWS.iter()
        .enumerate()
        .map(|(i, &(title, status, priority, assignee, days))| Task {
            id: i as u32 + 1,
            title: title.to_string(),
            description: String::new(),
            status: status.to_string(),
            priority,
            assignee: assignee.map(str::to_string),
            due: today.at(days, 17),
        })
        .collect()
}

pub fn deliveries(today: Today) -> Vec<Delivery> {
    const ROWS: &[(&str, &str, &str, Option<&str>, f64, i64, i64)] = &[
        ("Lisbon", "Porto", "delivered", Some("Rui"), 420.0, -1, 9),
        ("Lisbon", "Madrid", "in-transit", Some("Marta"), 1250.5, 0, 7),
        ("Porto", "Vigo", "delivered", Some("Rui"), 88.2, -3, 14),
        ("Madrid", "Lyon", "failed", Some("Jordi"), 640.0, -2, 10),
        ("Lisbon", "Casablanca", "pending", None, 2200.0, 1, 6),
        ("Setúbal", "Faro", "delivered", Some("Marta"), 35.0, -9, 11),
        ("Lyon", "Marseille", "pending", Some("Jordi"), 910.0, 2, 7),
        ("Porto", "Hamburg", "in-transit", Some("Klaus"), 3100.0, 0, 5),
        ("Madrid", "Valencia", "delivered", Some("Jordi"), 150.0, -12, 9),
        ("Lisbon", "Osaka", "delivered", None, 12.5, -8, 8),
        ("Faro", "Seville", "delivered", Some("Rui"), 480.0, -20, 13),
        ("Hamburg", "Rotterdam", "delivered", Some("Klaus"), 2600.0, -31, 10),
        ("Porto", "Coimbra", "pending", None, 75.0, 4, 9),
        ("Lisbon", "Braga", "delivered", Some("Marta"), 260.0, -5, 15),
        ("Valencia", "Barcelona", "failed", Some("Jordi"), 330.0, -6, 12),
        ("Marseille", "Nice", "in-transit", Some("Élodie"), 198.0, 0, 11),
        ("Lisbon", "Évora", "delivered", Some("Rui"), 55.0, -40, 9),
        ("Porto", "Lisbon", "pending", Some("Marta"), 720.0, 6, 8),
    ];

    ROWS.iter()
        .enumerate()
        .map(
            |(i, &(origin, destination, status, driver, weight_kg, days, hour))| Delivery {
                id: i as u32 + 1,
                tracking: format!("HV-{}", 1001 + i),
                customer: customer(i + 2),
                origin: origin.to_string(),
                destination: destination.to_string(),
                status: status.to_string(),
                driver: driver.map(str::to_string),
                weight_kg,
                scheduled: today.at(days, hour),
                signed: status == "delivered",
            },
        )
        .collect()
}
