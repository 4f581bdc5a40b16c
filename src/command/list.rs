use std::io::Write;

use super::{output_bytes, Execute, StoreError};
use crate::store::StoreFile;

/// Copies the raw store file bytes to the output without parsing them.
pub struct List;

impl Execute for List {
    fn execute(&mut self, store: &mut StoreFile, output: &mut dyn Write) -> Result<(), StoreError> {
        output_bytes(output, store.contents())
    }
}
