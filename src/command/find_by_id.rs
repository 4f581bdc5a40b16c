use std::io::Write;

use super::{output_message, Arguments, Execute, StoreError};
use crate::{record::decode_records, store::StoreFile};

/// Writes the JSON of every record with the given id, back to back.
pub struct FindById {
    pub id: String,
}

impl TryFrom<&'_ Arguments> for FindById {
    type Error = StoreError;

    fn try_from(args: &'_ Arguments) -> Result<Self, Self::Error> {
        Ok(Self {
            id: args.id()?.to_string(),
        })
    }
}

impl Execute for FindById {
    fn execute(&mut self, store: &mut StoreFile, output: &mut dyn Write) -> Result<(), StoreError> {
        decode_records(store.contents())?
            .iter()
            .filter(|r| r.id == self.id)
            .try_for_each(|r| output_message(&mut *output, format_args!("{r}")))
    }
}
