//! SQLite-backed blood bank store
//!
//! Owns the connection and the schema. Table and column names are the
//! inherited interface (`Donor.Dona_id`, `Storage_House.Blood_grp`, ...)
//! and are kept as-is; everything user-supplied is bound as a parameter.
//!
//! Multi-statement ledger sequences live in `ledger.rs`; this module holds
//! single-statement reads and writes.

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::blood_group::BloodGroup;
use crate::intent::BoundQuery;
use crate::types::{
    Activity, ActivityKind, Donor, Employee, GroupAvailability, Hospital, NewEmployee, Order,
    OrderStatus, ResultTable, StorageLot, SupplyRecord,
};
use crate::validate::{self, ValidationError};

/// Blood bank database handle
pub struct BloodBankDb {
    pub(crate) conn: Connection,
}

impl BloodBankDb {
    /// Open or create the database at a specific path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let conn = Connection::open(path_ref)
            .with_context(|| format!("Failed to open database: {:?}", path_ref))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open or create the database at the default location
    pub fn open_default() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    /// Default database path under the user data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("hemobank")
            .join("bloodbank.db")
    }

    /// Create tables and indexes if they do not exist yet
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Employee (
                Emp_id INTEGER PRIMARY KEY AUTOINCREMENT,
                Emp_name TEXT NOT NULL,
                Email TEXT NOT NULL,
                Salary INTEGER NOT NULL CHECK (Salary >= 0),
                Designation TEXT NOT NULL,
                Joining_date TEXT NOT NULL,
                BB_contact TEXT NOT NULL,
                BB_id INTEGER NOT NULL,
                BB_address TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Donor (
                Dona_id TEXT PRIMARY KEY,
                Dona_name TEXT NOT NULL,
                Blood_grp TEXT NOT NULL,
                Dona_contact TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Hospital (
                Hosp_id TEXT PRIMARY KEY,
                Hosp_name TEXT NOT NULL,
                Location TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Storage_House (
                Storage_id TEXT PRIMARY KEY,
                Blood_grp TEXT NOT NULL,
                Quantity INTEGER NOT NULL CHECK (Quantity >= 0)
            );

            CREATE TABLE IF NOT EXISTS Orders (
                Order_id TEXT PRIMARY KEY,
                Hosp_id TEXT NOT NULL REFERENCES Hospital(Hosp_id),
                Blood_grp TEXT NOT NULL,
                Quantity INTEGER NOT NULL,
                Status TEXT NOT NULL DEFAULT 'Pending',
                Order_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Supply (
                Supply_id TEXT PRIMARY KEY,
                Hosp_id TEXT NOT NULL REFERENCES Hospital(Hosp_id),
                Blood_grp TEXT NOT NULL,
                Quantity INTEGER NOT NULL,
                Supply_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_storage_group ON Storage_House(Blood_grp);
            CREATE INDEX IF NOT EXISTS idx_orders_status ON Orders(Status);
            CREATE INDEX IF NOT EXISTS idx_donor_group ON Donor(Blood_grp);
            "#,
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Donors
    // ------------------------------------------------------------------

    /// Register a new donor; donor ids are caller-assigned and unique
    pub fn register_donor(&self, donor: &Donor) -> Result<()> {
        validate::identifier(&donor.id)?;
        validate::required(&donor.name, "name")?;
        validate::contact(&donor.contact)?;
        if self.donor_exists(&donor.id)? {
            return Err(ValidationError::DuplicateId("donor", donor.id.clone()).into());
        }

        self.conn.execute(
            "INSERT INTO Donor (Dona_id, Dona_name, Blood_grp, Dona_contact)
             VALUES (?1, ?2, ?3, ?4)",
            params![donor.id, donor.name, donor.group, donor.contact],
        )?;
        info!(donor = %donor.id, group = %donor.group, "registered donor");
        Ok(())
    }

    fn donor_exists(&self, id: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM Donor WHERE Dona_id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn list_donors(&self) -> Result<Vec<Donor>> {
        let mut stmt = self.conn.prepare(
            "SELECT Dona_id, Dona_name, Blood_grp, Dona_contact FROM Donor ORDER BY Dona_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Donor {
                id: row.get(0)?,
                name: row.get(1)?,
                group: row.get(2)?,
                contact: row.get(3)?,
            })
        })?;

        let mut donors = Vec::new();
        for row in rows {
            donors.push(row?);
        }
        Ok(donors)
    }

    /// First donors by name, for the dashboard panel
    pub fn recent_donors(&self, limit: usize) -> Result<Vec<Donor>> {
        let mut stmt = self.conn.prepare(
            "SELECT Dona_id, Dona_name, Blood_grp, Dona_contact
             FROM Donor ORDER BY Dona_name LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(Donor {
                id: row.get(0)?,
                name: row.get(1)?,
                group: row.get(2)?,
                contact: row.get(3)?,
            })
        })?;

        let mut donors = Vec::new();
        for row in rows {
            donors.push(row?);
        }
        Ok(donors)
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    /// Add an employee; returns the store-assigned row id
    pub fn add_employee(&self, employee: &NewEmployee) -> Result<i64> {
        validate::required(&employee.name, "name")?;
        validate::required(&employee.email, "email")?;
        validate::required(&employee.bank_address, "address")?;
        validate::contact(&employee.contact)?;
        if employee.salary < 0 {
            return Err(ValidationError::NegativeSalary.into());
        }

        self.conn.execute(
            "INSERT INTO Employee
             (Emp_name, Email, Salary, Designation, Joining_date, BB_contact, BB_id, BB_address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                employee.name,
                employee.email,
                employee.salary,
                employee.designation.as_str(),
                employee.joining_date,
                employee.contact,
                employee.bank_id,
                employee.bank_address,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(employee = id, "added employee");
        Ok(id)
    }

    pub fn list_employees(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT Emp_id, Emp_name, Email, Salary, Designation, Joining_date,
                    BB_contact, BB_id, BB_address
             FROM Employee ORDER BY Emp_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Employee {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                salary: row.get(3)?,
                designation: row.get(4)?,
                joining_date: row.get(5)?,
                contact: row.get(6)?,
                bank_id: row.get(7)?,
                bank_address: row.get(8)?,
            })
        })?;

        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?);
        }
        Ok(employees)
    }

    // ------------------------------------------------------------------
    // Hospitals
    // ------------------------------------------------------------------

    pub fn add_hospital(&self, hospital: &Hospital) -> Result<()> {
        validate::identifier(&hospital.id)?;
        validate::required(&hospital.name, "name")?;
        validate::required(&hospital.location, "location")?;
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM Hospital WHERE Hosp_id = ?1)",
            params![hospital.id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(ValidationError::DuplicateId("hospital", hospital.id.clone()).into());
        }

        self.conn.execute(
            "INSERT INTO Hospital (Hosp_id, Hosp_name, Location) VALUES (?1, ?2, ?3)",
            params![hospital.id, hospital.name, hospital.location],
        )?;
        info!(hospital = %hospital.id, "added hospital");
        Ok(())
    }

    pub fn list_hospitals(&self) -> Result<Vec<Hospital>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Hosp_id, Hosp_name, Location FROM Hospital ORDER BY Hosp_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Hospital {
                id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
            })
        })?;

        let mut hospitals = Vec::new();
        for row in rows {
            hospitals.push(row?);
        }
        Ok(hospitals)
    }

    pub fn hospital_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Hosp_id FROM Hospital ORDER BY Hosp_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    pub fn list_inventory(&self) -> Result<Vec<StorageLot>> {
        let mut stmt = self.conn.prepare(
            "SELECT Storage_id, Blood_grp, Quantity FROM Storage_House ORDER BY Storage_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StorageLot {
                storage_id: row.get(0)?,
                group: row.get(1)?,
                quantity: row.get(2)?,
            })
        })?;

        let mut lots = Vec::new();
        for row in rows {
            lots.push(row?);
        }
        Ok(lots)
    }

    /// Per-group stock totals, highest first
    pub fn availability(&self) -> Result<Vec<GroupAvailability>> {
        let mut stmt = self.conn.prepare(
            "SELECT Blood_grp, SUM(Quantity) AS Total_Units
             FROM Storage_House
             GROUP BY Blood_grp
             ORDER BY Total_Units DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(GroupAvailability {
                group: row.get(0)?,
                total: row.get(1)?,
            })
        })?;

        let mut totals = Vec::new();
        for row in rows {
            totals.push(row?);
        }
        Ok(totals)
    }

    /// Total units in stock for one group
    pub fn stock_for(&self, group: BloodGroup) -> Result<i64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(Quantity), 0) FROM Storage_House WHERE Blood_grp = ?1",
            params![group],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ------------------------------------------------------------------
    // Orders and supply history
    // ------------------------------------------------------------------

    pub fn list_orders(&self) -> Result<Vec<Order>> {
        self.orders_where("", 0)
    }

    /// Pending orders only, for the dashboard panel
    pub fn pending_orders(&self, limit: usize) -> Result<Vec<Order>> {
        self.orders_where("WHERE o.Status = 'Pending'", limit)
    }

    fn orders_where(&self, filter: &str, limit: usize) -> Result<Vec<Order>> {
        let limit_clause = if limit > 0 {
            format!("LIMIT {limit}")
        } else {
            String::new()
        };
        let sql = format!(
            "SELECT o.Order_id, h.Hosp_name, o.Blood_grp, o.Quantity, o.Status, o.Order_date
             FROM Orders o JOIN Hospital h ON o.Hosp_id = h.Hosp_id
             {filter}
             ORDER BY o.Order_date DESC, o.Order_id {limit_clause}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Order {
                id: row.get(0)?,
                hospital: row.get(1)?,
                group: row.get(2)?,
                quantity: row.get(3)?,
                status: row.get(4)?,
                placed_on: row.get(5)?,
            })
        })?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?);
        }
        Ok(orders)
    }

    /// Ids of orders still open for a status change
    pub fn pending_order_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Order_id FROM Orders WHERE Status = 'Pending' ORDER BY Order_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    pub fn order_status(&self, order_id: &str) -> Result<Option<OrderStatus>> {
        let status = self
            .conn
            .query_row(
                "SELECT Status FROM Orders WHERE Order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status)
    }

    pub fn list_supply(&self) -> Result<Vec<SupplyRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.Supply_id, h.Hosp_name, s.Blood_grp, s.Quantity, s.Supply_date
             FROM Supply s JOIN Hospital h ON s.Hosp_id = h.Hosp_id
             ORDER BY s.Supply_date DESC, s.Supply_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SupplyRecord {
                id: row.get(0)?,
                hospital: row.get(1)?,
                group: row.get(2)?,
                quantity: row.get(3)?,
                delivered_on: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Latest order and supply movements interleaved, newest first
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT Kind, Id, Blood_grp, Quantity, On_date FROM (
                 SELECT 'Order' AS Kind, Order_id AS Id, Blood_grp, Quantity,
                        Order_date AS On_date
                 FROM Orders
                 UNION ALL
                 SELECT 'Supply' AS Kind, Supply_id AS Id, Blood_grp, Quantity,
                        Supply_date AS On_date
                 FROM Supply
             )
             ORDER BY On_date DESC, Id LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let kind: String = row.get(0)?;
            Ok(Activity {
                kind: if kind == "Order" {
                    ActivityKind::Order
                } else {
                    ActivityKind::Supply
                },
                id: row.get(1)?,
                group: row.get(2)?,
                quantity: row.get(3)?,
                on: row.get(4)?,
            })
        })?;

        let mut activity = Vec::new();
        for row in rows {
            activity.push(row?);
        }
        Ok(activity)
    }

    // ------------------------------------------------------------------
    // Free-text search execution
    // ------------------------------------------------------------------

    /// Run a translated question and collect the result generically,
    /// column names from the statement, values stringified
    pub fn search(&self, query: &BoundQuery) -> Result<ResultTable> {
        let mut stmt = self.conn.prepare(query.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut table = ResultTable {
            columns,
            rows: Vec::new(),
        };
        let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(table.columns.len());
            for i in 0..table.columns.len() {
                record.push(format_value(row.get_ref(i)?));
            }
            table.rows.push(record);
        }
        Ok(table)
    }
}

fn format_value(value: rusqlite::types::ValueRef<'_>) -> String {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::QueryTranslator;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn test_db() -> (BloodBankDb, NamedTempFile) {
        let tmp = NamedTempFile::new().unwrap();
        let db = BloodBankDb::open_at(tmp.path()).unwrap();
        (db, tmp)
    }

    fn asha() -> Donor {
        Donor {
            id: "DON100".to_string(),
            name: "Asha".to_string(),
            group: BloodGroup::APositive,
            contact: "9876543210".to_string(),
        }
    }

    #[test]
    fn donor_round_trip() {
        let (db, _tmp) = test_db();
        db.register_donor(&asha()).unwrap();

        let donors = db.list_donors().unwrap();
        assert_eq!(donors.len(), 1);
        assert_eq!(donors[0], asha());
    }

    #[test]
    fn duplicate_donor_is_rejected() {
        let (db, _tmp) = test_db();
        db.register_donor(&asha()).unwrap();
        let err = db.register_donor(&asha()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(db.list_donors().unwrap().len(), 1);
    }

    #[test]
    fn donor_with_bad_contact_is_rejected_before_write() {
        let (db, _tmp) = test_db();
        let mut donor = asha();
        donor.contact = "12345".to_string();
        assert!(db.register_donor(&donor).is_err());
        assert!(db.list_donors().unwrap().is_empty());
    }

    #[test]
    fn employee_gets_store_assigned_id() {
        let (db, _tmp) = test_db();
        let employee = NewEmployee {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            salary: 30_000,
            designation: crate::types::Designation::Nurse,
            joining_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            contact: "9000000001".to_string(),
            bank_id: 1,
            bank_address: "12 Main St".to_string(),
        };
        let id = db.add_employee(&employee).unwrap();
        assert_eq!(id, 1);

        let listed = db.list_employees().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].designation, "Nurse");
        assert_eq!(listed[0].joining_date, employee.joining_date);
    }

    #[test]
    fn hospital_round_trip_and_ids() {
        let (db, _tmp) = test_db();
        db.add_hospital(&Hospital {
            id: "HOSP1".to_string(),
            name: "City Hospital".to_string(),
            location: "Pune".to_string(),
        })
        .unwrap();

        assert_eq!(db.hospital_ids().unwrap(), vec!["HOSP1".to_string()]);
        assert_eq!(db.list_hospitals().unwrap()[0].name, "City Hospital");
    }

    #[test]
    fn availability_sums_lots_per_group() {
        let (db, _tmp) = test_db();
        db.conn
            .execute_batch(
                "INSERT INTO Storage_House VALUES ('STO1', 'A+', 4);
                 INSERT INTO Storage_House VALUES ('STO2', 'A+', 6);
                 INSERT INTO Storage_House VALUES ('STO3', 'O-', 3);",
            )
            .unwrap();

        let totals = db.availability().unwrap();
        assert_eq!(totals[0].group, BloodGroup::APositive);
        assert_eq!(totals[0].total, 10);
        assert_eq!(totals[1].total, 3);
        assert_eq!(db.stock_for(BloodGroup::APositive).unwrap(), 10);
        assert_eq!(db.stock_for(BloodGroup::BNegative).unwrap(), 0);
    }

    #[test]
    fn search_executes_translated_question() {
        let (db, _tmp) = test_db();
        db.register_donor(&asha()).unwrap();

        let translator = QueryTranslator::new();
        let query = translator.translate("donors with a+").unwrap();
        let table = db.search(&query).unwrap();

        assert_eq!(table.columns[0], "Dona_id");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "Asha");

        // no O- donors registered
        let none = translator.translate("donors with o-").unwrap();
        assert!(db.search(&none).unwrap().is_empty());
    }
}
