use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::command::StoreError;

/// A single user entry in the store file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub email: String,
    pub age: i64,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Record {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|source| StoreError::Decode {
            what: "item",
            source,
        })
    }
}

/// Parses the store file contents. Zero-length contents are an empty store.
pub fn decode_records(contents: &[u8]) -> Result<Vec<Record>, StoreError> {
    if contents.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_slice(contents).map_err(|source| StoreError::Decode {
        what: "store file contents",
        source,
    })
}

pub fn encode_records(records: &[Record]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(records).map_err(StoreError::Encode)
}
