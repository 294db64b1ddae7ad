//! Stock predefined-task seeding.
//!
//! # Responsibility
//! - Populate `predefined_tasks` with the stock templates on first run.
//!
//! # Invariants
//! - Seeding is skipped entirely when any template already exists.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

struct SeedTemplate {
    title: &'static str,
    description: &'static str,
    frequency: &'static str,
    required_count: u32,
    points_per_click: i64,
}

const STOCK_TEMPLATES: &[SeedTemplate] = &[
    SeedTemplate {
        title: "Drink Water",
        description: "Stay hydrated.",
        frequency: "daily",
        required_count: 8,
        points_per_click: 5,
    },
    SeedTemplate {
        title: "Read 10 Pages",
        description: "Expand knowledge.",
        frequency: "daily",
        required_count: 1,
        points_per_click: 15,
    },
    SeedTemplate {
        title: "Meditate",
        description: "Clear your mind.",
        frequency: "daily",
        required_count: 1,
        points_per_click: 20,
    },
    SeedTemplate {
        title: "Take Vitamins",
        description: "Daily supplements.",
        frequency: "daily",
        required_count: 1,
        points_per_click: 10,
    },
    SeedTemplate {
        title: "Go to Gym",
        description: "Exercise.",
        frequency: "weekly",
        required_count: 3,
        points_per_click: 50,
    },
    SeedTemplate {
        title: "Grocery Shopping",
        description: "Buy food.",
        frequency: "weekly",
        required_count: 1,
        points_per_click: 30,
    },
    SeedTemplate {
        title: "Laundry",
        description: "Wash clothes.",
        frequency: "weekly",
        required_count: 1,
        points_per_click: 25,
    },
    SeedTemplate {
        title: "Water Plants",
        description: "Keep them alive.",
        frequency: "weekly",
        required_count: 1,
        points_per_click: 15,
    },
    SeedTemplate {
        title: "Dentist Appt",
        description: "Checkup.",
        frequency: "one_time",
        required_count: 1,
        points_per_click: 100,
    },
    SeedTemplate {
        title: "Pay Rent",
        description: "Monthly payment.",
        frequency: "one_time",
        required_count: 1,
        points_per_click: 100,
    },
    SeedTemplate {
        title: "Oil Change",
        description: "Car maintenance.",
        frequency: "one_time",
        required_count: 1,
        points_per_click: 50,
    },
];

/// Inserts the stock templates when the table is empty.
pub fn seed_templates(conn: &Connection) -> DbResult<()> {
    let existing: i64 =
        conn.query_row("SELECT COUNT(*) FROM predefined_tasks;", [], |row| {
            row.get(0)
        })?;
    if existing > 0 {
        return Ok(());
    }

    for template in STOCK_TEMPLATES {
        conn.execute(
            "INSERT INTO predefined_tasks (
                id,
                title,
                description,
                points_per_click,
                frequency,
                required_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                Uuid::new_v4().to_string(),
                template.title,
                template.description,
                template.points_per_click,
                template.frequency,
                template.required_count,
            ],
        )?;
    }

    info!(
        "event=seed_templates module=db status=ok count={}",
        STOCK_TEMPLATES.len()
    );
    Ok(())
}
