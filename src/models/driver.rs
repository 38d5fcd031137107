use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub u32);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster entry. Drivers are created once at startup and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub code: String,
    pub cell: String,
}

impl Driver {
    pub fn new(id: u32, name: &str, code: &str, cell: &str) -> Self {
        Self {
            id: DriverId(id),
            name: name.to_string(),
            code: code.to_string(),
            cell: cell.to_string(),
        }
    }
}
