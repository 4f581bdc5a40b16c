use std::io::Write;

use super::{output_message, write_records, Execute, StoreError};
use crate::{
    record::{decode_records, Record},
    store::StoreFile,
};

/// Appends a record to the store. An id that is already present is reported
/// but does not prevent the append.
pub struct Add {
    pub record: Record,
}

impl TryFrom<Option<Record>> for Add {
    type Error = StoreError;

    fn try_from(item: Option<Record>) -> Result<Self, Self::Error> {
        Ok(Self {
            record: item.ok_or(StoreError::Configuration("item"))?,
        })
    }
}

impl Execute for Add {
    fn execute(&mut self, store: &mut StoreFile, output: &mut dyn Write) -> Result<(), StoreError> {
        let mut records = decode_records(store.contents())?;

        for existing in records.iter().filter(|r| r.id == self.record.id) {
            log::debug!("Duplicate id {} in {}", existing.id, store.path().display());
            output_message(
                output,
                format_args!("Item with id {} already exists", self.record.id),
            )?;
        }

        records.push(self.record.clone());
        write_records(store, &records)
    }
}
