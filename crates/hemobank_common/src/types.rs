//! Shared domain records
//!
//! Row-level types exchanged between the store, the ledger operations and
//! the CLI. Field names follow the database columns they map to.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::blood_group::BloodGroup;
use crate::validate::ValidationError;

/// A registered donor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub group: BloodGroup,
    pub contact: String,
}

/// Employee designations offered by the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designation {
    Manager,
    LabTechnician,
    Nurse,
    Receptionist,
    Other,
}

impl Designation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Manager => "Manager",
            Designation::LabTechnician => "Lab Technician",
            Designation::Nurse => "Nurse",
            Designation::Receptionist => "Receptionist",
            Designation::Other => "Other",
        }
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Designation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(Designation::Manager),
            "lab technician" | "lab-technician" | "technician" => Ok(Designation::LabTechnician),
            "nurse" => Ok(Designation::Nurse),
            "receptionist" => Ok(Designation::Receptionist),
            "other" => Ok(Designation::Other),
            other => Err(ValidationError::UnknownDesignation(other.to_string())),
        }
    }
}

/// Employee fields as entered on the form; the store assigns the row id
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub salary: i64,
    pub designation: Designation,
    pub joining_date: NaiveDate,
    pub contact: String,
    pub bank_id: i64,
    pub bank_address: String,
}

/// A stored employee row
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub salary: i64,
    pub designation: String,
    pub joining_date: NaiveDate,
    pub contact: String,
    pub bank_id: i64,
    pub bank_address: String,
}

/// A hospital that places orders and delivers supply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub location: String,
}

/// One inventory row: a lot of a single blood group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLot {
    pub storage_id: String,
    pub group: BloodGroup,
    pub quantity: i64,
}

/// Per-group stock total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupAvailability {
    pub group: BloodGroup,
    pub total: i64,
}

/// Order lifecycle states; Fulfilled and Cancelled are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Fulfilled => "Fulfilled",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl ToSql for OrderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OrderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: ValidationError| FromSqlError::Other(Box::new(e)))
    }
}

/// An order row joined with its hospital name
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub hospital: String,
    pub group: BloodGroup,
    pub quantity: i64,
    pub status: OrderStatus,
    pub placed_on: NaiveDate,
}

/// A supply row joined with its hospital name
#[derive(Debug, Clone)]
pub struct SupplyRecord {
    pub id: String,
    pub hospital: String,
    pub group: BloodGroup,
    pub quantity: i64,
    pub delivered_on: NaiveDate,
}

/// Fields required to place an order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub order_id: String,
    pub hospital_id: String,
    pub group: BloodGroup,
    pub quantity: i64,
}

/// Fields required to record a supply delivery
#[derive(Debug, Clone)]
pub struct SupplyIntake {
    pub supply_id: String,
    pub hospital_id: String,
    pub group: BloodGroup,
    pub quantity: i64,
}

/// Manual inventory adjustment direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    Add,
    Remove,
}

impl FromStr for StockAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(StockAction::Add),
            "remove" => Ok(StockAction::Remove),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// Dashboard activity feed entry, one order or supply movement
#[derive(Debug, Clone)]
pub struct Activity {
    pub kind: ActivityKind,
    pub id: String,
    pub group: BloodGroup,
    pub quantity: i64,
    pub on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Order,
    Supply,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Order => f.write_str("Order"),
            ActivityKind::Supply => f.write_str("Supply"),
        }
    }
}

/// A generic tabular result set, as handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
