//! Dashboard overview
//!
//! Four panels: per-group availability, recent donors, pending orders and
//! the latest order/supply movements.

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::BloodBankDb;

use crate::table;

pub fn show(db: &BloodBankDb) -> Result<()> {
    println!("{}", display::header("Blood Inventory"));
    let totals = db.availability()?;
    if totals.is_empty() {
        println!("{}", display::status(Level::Info, "Inventory is empty"));
    } else {
        let rows = totals
            .into_iter()
            .map(|t| vec![t.group.to_string(), t.total.to_string()])
            .collect();
        table::print(&table::table(&["Group", "Total units"], rows));
    }

    println!();
    println!("{}", display::header("Recent Donors"));
    let donors = db.recent_donors(5)?;
    if donors.is_empty() {
        println!("{}", display::status(Level::Info, "No donors registered yet"));
    } else {
        let rows = donors
            .into_iter()
            .map(|d| vec![d.name, d.group.to_string(), d.contact])
            .collect();
        table::print(&table::table(&["Name", "Group", "Contact"], rows));
    }

    println!();
    println!("{}", display::header("Pending Orders"));
    let orders = db.pending_orders(5)?;
    if orders.is_empty() {
        println!("{}", display::status(Level::Info, "No pending orders"));
    } else {
        let rows = orders
            .into_iter()
            .map(|o| {
                vec![
                    o.id,
                    o.hospital,
                    o.group.to_string(),
                    o.quantity.to_string(),
                ]
            })
            .collect();
        table::print(&table::table(&["Id", "Hospital", "Group", "Units"], rows));
    }

    println!();
    println!("{}", display::header("Recent Activity"));
    let activity = db.recent_activity(6)?;
    if activity.is_empty() {
        println!("{}", display::status(Level::Info, "No activity yet"));
    } else {
        let rows = activity
            .into_iter()
            .map(|a| {
                vec![
                    a.kind.to_string(),
                    a.id,
                    a.group.to_string(),
                    a.quantity.to_string(),
                    a.on.to_string(),
                ]
            })
            .collect();
        table::print(&table::table(&["Type", "Id", "Group", "Units", "Date"], rows));
    }

    Ok(())
}
