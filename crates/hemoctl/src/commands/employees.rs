//! Employee roster commands

use anyhow::Result;
use chrono::NaiveDate;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, Designation, NewEmployee};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    let employees = db.list_employees()?;
    if employees.is_empty() {
        println!("{}", display::status(Level::Info, "No employees on record"));
        return Ok(());
    }

    let rows = employees
        .into_iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name,
                e.email,
                e.salary.to_string(),
                e.designation,
                e.joining_date.to_string(),
                e.contact,
            ]
        })
        .collect();
    table::print(&table::table(
        &["Id", "Name", "Email", "Salary", "Designation", "Joined", "Contact"],
        rows,
    ));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    db: &BloodBankDb,
    name: &str,
    email: &str,
    salary: i64,
    designation: &str,
    joined: &str,
    contact: &str,
    bank_id: i64,
    address: &str,
) -> Result<()> {
    let designation: Designation = match designation.parse() {
        Ok(d) => d,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };
    let joining_date = match NaiveDate::parse_from_str(joined, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            report_error(&"joining date must be YYYY-MM-DD");
            return Ok(());
        }
    };

    let employee = NewEmployee {
        name: name.to_string(),
        email: email.to_string(),
        salary,
        designation,
        joining_date,
        contact: contact.to_string(),
        bank_id,
        bank_address: address.to_string(),
    };
    match db.add_employee(&employee) {
        Ok(id) => report_success(&format!("Employee #{id} added")),
        Err(e) => report_error(&format!("{e:#}")),
    }
    Ok(())
}
