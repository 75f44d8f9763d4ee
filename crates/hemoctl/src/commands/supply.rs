//! Supply delivery commands

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, BloodGroup, SupplyIntake};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    let records = db.list_supply()?;
    if records.is_empty() {
        println!("{}", display::status(Level::Info, "No supply on record"));
        return Ok(());
    }

    let rows = records
        .into_iter()
        .map(|s| {
            vec![
                s.id,
                s.hospital,
                s.group.to_string(),
                s.quantity.to_string(),
                s.delivered_on.to_string(),
            ]
        })
        .collect();
    table::print(&table::table(
        &["Id", "Hospital", "Group", "Units", "Date"],
        rows,
    ));
    Ok(())
}

pub fn record(db: &BloodBankDb, id: &str, hospital: &str, group: &str, quantity: i64) -> Result<()> {
    let group: BloodGroup = match group.parse() {
        Ok(g) => g,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    let intake = SupplyIntake {
        supply_id: id.to_string(),
        hospital_id: hospital.to_string(),
        group,
        quantity,
    };
    match db.record_supply(&intake) {
        Ok(()) => report_success(&format!("Supply {id} recorded, stock credited")),
        Err(e) => report_error(&e),
    }
    Ok(())
}
