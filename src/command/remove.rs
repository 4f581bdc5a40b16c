use std::io::Write;

use super::{output_message, write_records, Arguments, Execute, StoreError};
use crate::{record::decode_records, store::StoreFile};

/// Removes every record with the given id. The file is only rewritten when
/// at least one record matched.
pub struct Remove {
    pub id: String,
}

impl TryFrom<&'_ Arguments> for Remove {
    type Error = StoreError;

    fn try_from(args: &'_ Arguments) -> Result<Self, Self::Error> {
        Ok(Self {
            id: args.id()?.to_string(),
        })
    }
}

impl Execute for Remove {
    fn execute(&mut self, store: &mut StoreFile, output: &mut dyn Write) -> Result<(), StoreError> {
        let mut records = decode_records(store.contents())?;
        let before = records.len();

        records.retain(|r| r.id != self.id);

        if records.len() == before {
            return output_message(output, format_args!("Item with id {} not found", self.id));
        }

        log::debug!("Removing {} records with id {}", before - records.len(), self.id);
        write_records(store, &records)
    }
}
