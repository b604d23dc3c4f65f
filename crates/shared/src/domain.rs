use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CarId);

/// A vehicle record as stored by the remote service. The id is assigned
/// server-side and never changes; there is no update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
}

/// Create payload: a car without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
}

impl CarDraft {
    pub fn into_car(self, id: CarId) -> Car {
        Car {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            plate: self.plate,
        }
    }
}
