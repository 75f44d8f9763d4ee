//! Inventory ledger operations
//!
//! Order placement, cancellation, fulfilment, supply intake and manual
//! stock adjustment. Every multi-statement sequence runs inside a single
//! transaction, with its precondition checked inside that transaction, so
//! a failure partway through rolls the whole sequence back and concurrent
//! writers cannot deplete stock between the check and the write.
//!
//! Lot policy: order placement drains lots in ascending `Storage_id`
//! order, splitting across lots when one cannot cover the request.
//! Cancellation refunds the lowest lot of the group, or creates a
//! `RET<order-id>` lot when the group has none left.

use rusqlite::{params, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

use crate::blood_group::BloodGroup;
use crate::store::BloodBankDb;
use crate::types::{OrderRequest, OrderStatus, StockAction, SupplyIntake};
use crate::validate::{self, ValidationError};

/// Order and supply quantities accepted by the forms
pub const MAX_ORDER_QTY: i64 = 50;
/// Manual adjustments allow larger corrections
pub const MAX_ADJUST_QTY: i64 = 100;

/// Ledger operation failures
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient stock for {group}: requested {requested}, available {available}")]
    InsufficientStock {
        group: BloodGroup,
        requested: i64,
        available: i64,
    },

    #[error("order {0} already exists")]
    DuplicateOrder(String),

    #[error("supply record {0} already exists")]
    DuplicateSupply(String),

    #[error("order {0} not found")]
    UnknownOrder(String),

    #[error("hospital {0} not found")]
    UnknownHospital(String),

    #[error("order {id} is {status}, not Pending")]
    NotPending { id: String, status: OrderStatus },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

/// One lot's contribution to an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotDrain {
    pub storage_id: String,
    pub taken: i64,
}

impl BloodBankDb {
    /// Place an order: verify stock inside the transaction, insert the
    /// Pending order, then drain lots until the quantity is covered.
    /// Returns which lots were drained and by how much.
    pub fn place_order(&self, request: &OrderRequest) -> Result<Vec<LotDrain>, LedgerError> {
        validate::identifier(&request.order_id)?;
        validate::identifier(&request.hospital_id)?;
        validate::quantity(request.quantity, 1, MAX_ORDER_QTY)?;

        let tx = self.conn.unchecked_transaction()?;

        let hospital_known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM Hospital WHERE Hosp_id = ?1)",
            params![request.hospital_id],
            |row| row.get(0),
        )?;
        if !hospital_known {
            return Err(LedgerError::UnknownHospital(request.hospital_id.clone()));
        }

        let order_known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM Orders WHERE Order_id = ?1)",
            params![request.order_id],
            |row| row.get(0),
        )?;
        if order_known {
            return Err(LedgerError::DuplicateOrder(request.order_id.clone()));
        }

        let available: i64 = tx.query_row(
            "SELECT COALESCE(SUM(Quantity), 0) FROM Storage_House WHERE Blood_grp = ?1",
            params![request.group],
            |row| row.get(0),
        )?;
        if available < request.quantity {
            return Err(LedgerError::InsufficientStock {
                group: request.group,
                requested: request.quantity,
                available,
            });
        }

        let today = chrono::Local::now().date_naive();
        tx.execute(
            "INSERT INTO Orders (Order_id, Hosp_id, Blood_grp, Quantity, Status, Order_date)
             VALUES (?1, ?2, ?3, ?4, 'Pending', ?5)",
            params![
                request.order_id,
                request.hospital_id,
                request.group,
                request.quantity,
                today,
            ],
        )?;

        let mut lots: Vec<(String, i64)> = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT Storage_id, Quantity FROM Storage_House
                 WHERE Blood_grp = ?1 AND Quantity > 0
                 ORDER BY Storage_id",
            )?;
            let rows = stmt.query_map(params![request.group], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            for row in rows {
                lots.push(row?);
            }
        }

        let mut remaining = request.quantity;
        let mut drains = Vec::new();
        for (storage_id, held) in lots {
            if remaining == 0 {
                break;
            }
            let taken = held.min(remaining);
            tx.execute(
                "UPDATE Storage_House SET Quantity = Quantity - ?1 WHERE Storage_id = ?2",
                params![taken, storage_id],
            )?;
            debug!(lot = %storage_id, taken, "drained lot");
            remaining -= taken;
            drains.push(LotDrain { storage_id, taken });
        }
        // the SUM check above ran in this transaction, so the lots cover it
        debug_assert_eq!(remaining, 0);

        tx.commit()?;
        info!(order = %request.order_id, group = %request.group,
              quantity = request.quantity, "order placed");
        Ok(drains)
    }

    /// Cancel a Pending order and return its quantity to stock
    pub fn cancel_order(&self, order_id: &str) -> Result<(), LedgerError> {
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE Orders SET Status = 'Cancelled'
             WHERE Order_id = ?1 AND Status = 'Pending'",
            params![order_id],
        )?;
        if changed == 0 {
            return Err(order_not_pending(&tx, order_id)?);
        }

        let (group, quantity): (BloodGroup, i64) = tx.query_row(
            "SELECT Blood_grp, Quantity FROM Orders WHERE Order_id = ?1",
            params![order_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let lot: Option<String> = tx
            .query_row(
                "SELECT Storage_id FROM Storage_House WHERE Blood_grp = ?1
                 ORDER BY Storage_id LIMIT 1",
                params![group],
                |row| row.get(0),
            )
            .optional()?;
        match lot {
            Some(storage_id) => {
                tx.execute(
                    "UPDATE Storage_House SET Quantity = Quantity + ?1 WHERE Storage_id = ?2",
                    params![quantity, storage_id],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO Storage_House (Storage_id, Blood_grp, Quantity)
                     VALUES (?1, ?2, ?3)",
                    params![format!("RET{order_id}"), group, quantity],
                )?;
            }
        }

        tx.commit()?;
        info!(order = %order_id, quantity, group = %group, "order cancelled, stock returned");
        Ok(())
    }

    /// Mark a Pending order Fulfilled; stock was already drained at
    /// placement, so no inventory change happens here
    pub fn fulfill_order(&self, order_id: &str) -> Result<(), LedgerError> {
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE Orders SET Status = 'Fulfilled'
             WHERE Order_id = ?1 AND Status = 'Pending'",
            params![order_id],
        )?;
        if changed == 0 {
            return Err(order_not_pending(&tx, order_id)?);
        }

        tx.commit()?;
        info!(order = %order_id, "order fulfilled");
        Ok(())
    }

    /// Record a supply delivery and credit stock in the same transaction.
    /// The credited lot is keyed `SUP<supply-id>`; repeat deliveries onto
    /// an existing lot increment it.
    pub fn record_supply(&self, intake: &SupplyIntake) -> Result<(), LedgerError> {
        validate::identifier(&intake.supply_id)?;
        validate::identifier(&intake.hospital_id)?;
        validate::quantity(intake.quantity, 1, MAX_ORDER_QTY)?;

        let tx = self.conn.unchecked_transaction()?;

        let hospital_known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM Hospital WHERE Hosp_id = ?1)",
            params![intake.hospital_id],
            |row| row.get(0),
        )?;
        if !hospital_known {
            return Err(LedgerError::UnknownHospital(intake.hospital_id.clone()));
        }

        let supply_known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM Supply WHERE Supply_id = ?1)",
            params![intake.supply_id],
            |row| row.get(0),
        )?;
        if supply_known {
            return Err(LedgerError::DuplicateSupply(intake.supply_id.clone()));
        }

        let today = chrono::Local::now().date_naive();
        tx.execute(
            "INSERT INTO Supply (Supply_id, Hosp_id, Blood_grp, Quantity, Supply_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                intake.supply_id,
                intake.hospital_id,
                intake.group,
                intake.quantity,
                today,
            ],
        )?;

        tx.execute(
            "INSERT INTO Storage_House (Storage_id, Blood_grp, Quantity)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(Storage_id) DO UPDATE SET Quantity = Quantity + excluded.Quantity",
            params![
                format!("SUP{}", intake.supply_id),
                intake.group,
                intake.quantity,
            ],
        )?;

        tx.commit()?;
        info!(supply = %intake.supply_id, group = %intake.group,
              quantity = intake.quantity, "supply recorded");
        Ok(())
    }

    /// Manual stock correction. Add creates the lot if needed; Remove
    /// clamps at zero and reports whether any row was touched.
    pub fn adjust_stock(
        &self,
        storage_id: &str,
        group: BloodGroup,
        action: StockAction,
        quantity: i64,
    ) -> Result<bool, LedgerError> {
        validate::identifier(storage_id)?;
        validate::quantity(quantity, 1, MAX_ADJUST_QTY)?;

        let touched = match action {
            StockAction::Add => {
                self.conn.execute(
                    "INSERT INTO Storage_House (Storage_id, Blood_grp, Quantity)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(Storage_id) DO UPDATE SET Quantity = Quantity + excluded.Quantity",
                    params![storage_id, group, quantity],
                )?;
                true
            }
            StockAction::Remove => {
                let changed = self.conn.execute(
                    "UPDATE Storage_House SET Quantity = MAX(0, Quantity - ?1)
                     WHERE Storage_id = ?2",
                    params![quantity, storage_id],
                )?;
                changed > 0
            }
        };
        info!(lot = %storage_id, ?action, quantity, touched, "stock adjusted");
        Ok(touched)
    }
}

/// Classify a failed conditional status update: the order is either
/// missing or already terminal
fn order_not_pending(
    tx: &rusqlite::Transaction<'_>,
    order_id: &str,
) -> Result<LedgerError, LedgerError> {
    let status: Option<OrderStatus> = tx
        .query_row(
            "SELECT Status FROM Orders WHERE Order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(match status {
        None => LedgerError::UnknownOrder(order_id.to_string()),
        Some(status) => LedgerError::NotPending {
            id: order_id.to_string(),
            status,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hospital;
    use tempfile::NamedTempFile;

    fn test_db() -> (BloodBankDb, NamedTempFile) {
        let tmp = NamedTempFile::new().unwrap();
        let db = BloodBankDb::open_at(tmp.path()).unwrap();
        db.add_hospital(&Hospital {
            id: "HOSP1".to_string(),
            name: "City Hospital".to_string(),
            location: "Pune".to_string(),
        })
        .unwrap();
        (db, tmp)
    }

    fn seed_lot(db: &BloodBankDb, storage_id: &str, group: BloodGroup, quantity: i64) {
        db.adjust_stock(storage_id, group, StockAction::Add, quantity)
            .unwrap();
    }

    fn order(id: &str, group: BloodGroup, quantity: i64) -> OrderRequest {
        OrderRequest {
            order_id: id.to_string(),
            hospital_id: "HOSP1".to_string(),
            group,
            quantity,
        }
    }

    fn lot_quantity(db: &BloodBankDb, storage_id: &str) -> i64 {
        db.list_inventory()
            .unwrap()
            .into_iter()
            .find(|lot| lot.storage_id == storage_id)
            .map(|lot| lot.quantity)
            .unwrap_or(-1)
    }

    #[test]
    fn placing_an_order_drains_stock() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);

        let drains = db
            .place_order(&order("ORD1", BloodGroup::APositive, 3))
            .unwrap();
        assert_eq!(
            drains,
            vec![LotDrain {
                storage_id: "STO1".to_string(),
                taken: 3
            }]
        );
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 7);
        assert_eq!(
            db.order_status("ORD1").unwrap(),
            Some(OrderStatus::Pending)
        );
    }

    #[test]
    fn order_splits_across_lots_in_storage_id_order() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 2);
        seed_lot(&db, "STO2", BloodGroup::APositive, 5);

        let drains = db
            .place_order(&order("ORD1", BloodGroup::APositive, 4))
            .unwrap();
        assert_eq!(drains.len(), 2);
        assert_eq!(drains[0].storage_id, "STO1");
        assert_eq!(drains[0].taken, 2);
        assert_eq!(drains[1].storage_id, "STO2");
        assert_eq!(drains[1].taken, 2);
        assert_eq!(lot_quantity(&db, "STO1"), 0);
        assert_eq!(lot_quantity(&db, "STO2"), 3);
    }

    #[test]
    fn insufficient_stock_writes_nothing() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 2);

        let err = db
            .place_order(&order("ORD1", BloodGroup::APositive, 5))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                requested: 5,
                available: 2,
                ..
            }
        ));
        assert_eq!(db.order_status("ORD1").unwrap(), None);
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 2);
    }

    #[test]
    fn stock_of_another_group_does_not_count() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::ONegative, 20);

        let err = db
            .place_order(&order("ORD1", BloodGroup::APositive, 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
    }

    #[test]
    fn duplicate_order_id_is_rejected() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);
        db.place_order(&order("ORD1", BloodGroup::APositive, 1))
            .unwrap();

        let err = db
            .place_order(&order("ORD1", BloodGroup::APositive, 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateOrder(_)));
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 9);
    }

    #[test]
    fn unknown_hospital_is_rejected() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);

        let mut request = order("ORD1", BloodGroup::APositive, 1);
        request.hospital_id = "NOPE".to_string();
        let err = db.place_order(&request).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownHospital(_)));
    }

    #[test]
    fn cancelling_restores_stock_and_is_terminal() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);
        db.place_order(&order("ORD1", BloodGroup::APositive, 3))
            .unwrap();
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 7);

        db.cancel_order("ORD1").unwrap();
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 10);
        assert_eq!(
            db.order_status("ORD1").unwrap(),
            Some(OrderStatus::Cancelled)
        );
        assert!(db.pending_order_ids().unwrap().is_empty());

        let err = db.cancel_order("ORD1").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotPending {
                status: OrderStatus::Cancelled,
                ..
            }
        ));
        // the second attempt must not refund again
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 10);
    }

    #[test]
    fn cancelling_with_no_lot_left_creates_a_return_lot() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 3);
        db.place_order(&order("ORD1", BloodGroup::APositive, 3))
            .unwrap();

        // drop the emptied lot entirely so the group has no row
        db.conn
            .execute("DELETE FROM Storage_House WHERE Storage_id = 'STO1'", [])
            .unwrap();

        db.cancel_order("ORD1").unwrap();
        assert_eq!(lot_quantity(&db, "RETORD1"), 3);
    }

    #[test]
    fn cancel_unknown_order_fails() {
        let (db, _tmp) = test_db();
        let err = db.cancel_order("ORD9").unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOrder(_)));
    }

    #[test]
    fn fulfilment_keeps_stock_and_is_terminal() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);
        db.place_order(&order("ORD1", BloodGroup::APositive, 4))
            .unwrap();

        db.fulfill_order("ORD1").unwrap();
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 6);
        assert_eq!(
            db.order_status("ORD1").unwrap(),
            Some(OrderStatus::Fulfilled)
        );

        let err = db.cancel_order("ORD1").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotPending {
                status: OrderStatus::Fulfilled,
                ..
            }
        ));
    }

    #[test]
    fn supply_creates_the_derived_lot() {
        let (db, _tmp) = test_db();
        db.record_supply(&SupplyIntake {
            supply_id: "SUP1".to_string(),
            hospital_id: "HOSP1".to_string(),
            group: BloodGroup::APositive,
            quantity: 5,
        })
        .unwrap();

        assert_eq!(lot_quantity(&db, "SUPSUP1"), 5);
        assert_eq!(db.list_supply().unwrap().len(), 1);
    }

    #[test]
    fn supply_onto_existing_lot_increments_it() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "SUPSUP1", BloodGroup::APositive, 2);

        db.record_supply(&SupplyIntake {
            supply_id: "SUP1".to_string(),
            hospital_id: "HOSP1".to_string(),
            group: BloodGroup::APositive,
            quantity: 5,
        })
        .unwrap();
        assert_eq!(lot_quantity(&db, "SUPSUP1"), 7);
    }

    #[test]
    fn duplicate_supply_id_is_rejected_without_stock_change() {
        let (db, _tmp) = test_db();
        let intake = SupplyIntake {
            supply_id: "SUP1".to_string(),
            hospital_id: "HOSP1".to_string(),
            group: BloodGroup::APositive,
            quantity: 5,
        };
        db.record_supply(&intake).unwrap();
        let err = db.record_supply(&intake).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSupply(_)));
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 5);
    }

    #[test]
    fn removal_clamps_at_zero() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 5);

        let touched = db
            .adjust_stock("STO1", BloodGroup::APositive, StockAction::Remove, 10)
            .unwrap();
        assert!(touched);
        assert_eq!(lot_quantity(&db, "STO1"), 0);
    }

    #[test]
    fn removal_of_absent_lot_is_a_noop() {
        let (db, _tmp) = test_db();
        let touched = db
            .adjust_stock("NOPE1", BloodGroup::APositive, StockAction::Remove, 1)
            .unwrap();
        assert!(!touched);
    }

    #[test]
    fn quantities_are_range_checked() {
        let (db, _tmp) = test_db();
        seed_lot(&db, "STO1", BloodGroup::APositive, 10);

        let err = db
            .place_order(&order("ORD1", BloodGroup::APositive, 51))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let err = db
            .adjust_stock("STO1", BloodGroup::APositive, StockAction::Add, 101)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let err = db
            .adjust_stock("STO1", BloodGroup::APositive, StockAction::Remove, 0)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
