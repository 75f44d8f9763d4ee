//! Donor registry commands

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, BloodGroup, Donor};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    let donors = db.list_donors()?;
    if donors.is_empty() {
        println!("{}", display::status(Level::Info, "No donors registered yet"));
        return Ok(());
    }

    let rows = donors
        .into_iter()
        .map(|d| vec![d.id, d.name, d.group.to_string(), d.contact])
        .collect();
    table::print(&table::table(&["Id", "Name", "Group", "Contact"], rows));
    Ok(())
}

pub fn add(db: &BloodBankDb, id: &str, name: &str, group: &str, contact: &str) -> Result<()> {
    let group: BloodGroup = match group.parse() {
        Ok(g) => g,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    let donor = Donor {
        id: id.to_string(),
        name: name.to_string(),
        group,
        contact: contact.to_string(),
    };
    match db.register_donor(&donor) {
        Ok(()) => report_success(&format!("Donor {} registered", donor.id)),
        Err(e) => report_error(&format!("{e:#}")),
    }
    Ok(())
}
