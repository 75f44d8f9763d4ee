//! Hospital registry commands

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, Hospital};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    let hospitals = db.list_hospitals()?;
    if hospitals.is_empty() {
        println!("{}", display::status(Level::Info, "No hospitals on record"));
        return Ok(());
    }

    let rows = hospitals
        .into_iter()
        .map(|h| vec![h.id, h.name, h.location])
        .collect();
    table::print(&table::table(&["Id", "Name", "Location"], rows));
    Ok(())
}

pub fn add(db: &BloodBankDb, id: &str, name: &str, location: &str) -> Result<()> {
    let hospital = Hospital {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
    };
    match db.add_hospital(&hospital) {
        Ok(()) => report_success(&format!("Hospital {} added", hospital.id)),
        Err(e) => report_error(&format!("{e:#}")),
    }
    Ok(())
}
