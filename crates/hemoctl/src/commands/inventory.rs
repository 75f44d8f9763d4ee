//! Storage lot commands

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, BloodGroup, StockAction};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    let lots = db.list_inventory()?;
    if lots.is_empty() {
        println!("{}", display::status(Level::Info, "Inventory is empty"));
        return Ok(());
    }

    let rows = lots
        .into_iter()
        .map(|l| vec![l.storage_id, l.group.to_string(), l.quantity.to_string()])
        .collect();
    table::print(&table::table(&["Storage", "Group", "Units"], rows));
    Ok(())
}

pub fn summary(db: &BloodBankDb) -> Result<()> {
    let totals = db.availability()?;
    if totals.is_empty() {
        println!("{}", display::status(Level::Info, "Inventory is empty"));
        return Ok(());
    }

    let rows = totals
        .into_iter()
        .map(|t| vec![t.group.to_string(), t.total.to_string()])
        .collect();
    table::print(&table::table(&["Group", "Total units"], rows));
    Ok(())
}

pub fn adjust(
    db: &BloodBankDb,
    storage_id: &str,
    group: &str,
    action: &str,
    quantity: i64,
) -> Result<()> {
    let group: BloodGroup = match group.parse() {
        Ok(g) => g,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };
    let action: StockAction = match action.parse() {
        Ok(a) => a,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    match db.adjust_stock(storage_id, group, action, quantity) {
        Ok(true) => report_success("Inventory updated"),
        Ok(false) => println!(
            "{}",
            display::status(Level::Warning, "No such storage lot, nothing removed")
        ),
        Err(e) => report_error(&e),
    }
    Ok(())
}
