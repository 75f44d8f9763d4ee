//! Blood group codes
//!
//! The eight ABO/Rh combinations, stored as their display form ("A+", "AB-")
//! in every table that carries a `Blood_grp` column.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::validate::ValidationError;

/// One of the eight ABO/Rh blood type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    OPositive,
    ONegative,
    AbPositive,
    AbNegative,
}

impl BloodGroup {
    /// All groups, in the order forms list them
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ValidationError;

    /// Case-insensitive parse, so user input like "a+" or "ab-" is accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(BloodGroup::APositive),
            "A-" => Ok(BloodGroup::ANegative),
            "B+" => Ok(BloodGroup::BPositive),
            "B-" => Ok(BloodGroup::BNegative),
            "O+" => Ok(BloodGroup::OPositive),
            "O-" => Ok(BloodGroup::ONegative),
            "AB+" => Ok(BloodGroup::AbPositive),
            "AB-" => Ok(BloodGroup::AbNegative),
            other => Err(ValidationError::UnknownBloodGroup(other.to_string())),
        }
    }
}

impl ToSql for BloodGroup {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BloodGroup {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: ValidationError| FromSqlError::Other(Box::new(e)))
    }
}
