//! Order commands

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::{BloodBankDb, BloodGroup, Order, OrderRequest};

use crate::table;

use super::{report_error, report_success};

pub fn list(db: &BloodBankDb) -> Result<()> {
    print_orders(db.list_orders()?);
    Ok(())
}

pub fn pending(db: &BloodBankDb) -> Result<()> {
    print_orders(db.pending_orders(0)?);
    Ok(())
}

fn print_orders(orders: Vec<Order>) {
    if orders.is_empty() {
        println!("{}", display::status(Level::Info, "No orders on record"));
        return;
    }

    let rows = orders
        .into_iter()
        .map(|o| {
            vec![
                o.id,
                o.hospital,
                o.group.to_string(),
                o.quantity.to_string(),
                o.status.to_string(),
                o.placed_on.to_string(),
            ]
        })
        .collect();
    table::print(&table::table(
        &["Id", "Hospital", "Group", "Units", "Status", "Date"],
        rows,
    ));
}

pub fn place(db: &BloodBankDb, id: &str, hospital: &str, group: &str, quantity: i64) -> Result<()> {
    let group: BloodGroup = match group.parse() {
        Ok(g) => g,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    let request = OrderRequest {
        order_id: id.to_string(),
        hospital_id: hospital.to_string(),
        group,
        quantity,
    };
    match db.place_order(&request) {
        Ok(drains) => {
            report_success(&format!("Order {id} placed"));
            for drain in drains {
                println!(
                    "{}",
                    display::kv(&drain.storage_id, &format!("-{} units", drain.taken))
                );
            }
        }
        Err(e) => report_error(&e),
    }
    Ok(())
}

pub fn cancel(db: &BloodBankDb, id: &str) -> Result<()> {
    match db.cancel_order(id) {
        Ok(()) => report_success(&format!("Order {id} cancelled, stock returned")),
        Err(e) => report_error(&e),
    }
    Ok(())
}

pub fn fulfill(db: &BloodBankDb, id: &str) -> Result<()> {
    match db.fulfill_order(id) {
        Ok(()) => report_success(&format!("Order {id} fulfilled")),
        Err(e) => report_error(&e),
    }
    Ok(())
}
