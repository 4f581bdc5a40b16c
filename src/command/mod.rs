use std::{
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    record::{encode_records, Record},
    store::StoreFile,
};

use self::{add::Add, find_by_id::FindById, list::List, remove::Remove};

mod add;
mod find_by_id;
mod list;
mod remove;

pub(self) trait Execute {
    fn execute(&mut self, store: &mut StoreFile, output: &mut dyn Write) -> Result<(), StoreError>;
}

/// Everything a single invocation needs. Empty strings count as absent.
#[derive(Debug, Default, Clone)]
pub struct Arguments {
    pub operation: Option<String>,
    pub item: Option<String>,
    pub id: Option<String>,
    pub file_name: Option<PathBuf>,
}

impl Arguments {
    fn operation(&self) -> Option<&str> {
        non_empty(self.operation.as_deref())
    }

    /// Decodes the item payload whenever one was given, whatever the operation.
    fn item(&self) -> Result<Option<Record>, StoreError> {
        non_empty(self.item.as_deref())
            .map(str::parse::<Record>)
            .transpose()
    }

    fn id(&self) -> Result<&str, StoreError> {
        non_empty(self.id.as_deref()).ok_or(StoreError::Configuration("id"))
    }

    fn file_name(&self) -> Option<&Path> {
        self.file_name
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    List,
    FindById,
    Remove,
}

impl FromStr for Operation {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "list" => Ok(Self::List),
            "findById" => Ok(Self::FindById),
            "remove" => Ok(Self::Remove),
            other => Err(StoreError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::List => "list",
            Self::FindById => "findById",
            Self::Remove => "remove",
        })
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("-{0} flag has to be specified")]
    Configuration(&'static str),
    #[error("Failed to decode {what} as JSON")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode records as JSON")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to {action} {path}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write to STDOUT")]
    WriteOutput(#[source] io::Error),
    #[error("Operation {0} not allowed!")]
    UnsupportedOperation(String),
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

/// Runs one operation against the store file named in `args`, writing any
/// operation output to `output`.
pub fn perform(args: &Arguments, output: &mut dyn Write) -> Result<(), StoreError> {
    let item = args.item()?;

    let file_name = args
        .file_name()
        .ok_or(StoreError::Configuration("fileName"))?;

    let mut store = StoreFile::open(file_name)?;

    let operation: Operation = args
        .operation()
        .ok_or(StoreError::Configuration("operation"))?
        .parse()?;

    log::debug!("Running {operation} on {}", store.path().display());

    match operation {
        Operation::List => List.execute(&mut store, output),
        Operation::Add => Add::try_from(item)?.execute(&mut store, output),
        Operation::Remove => Remove::try_from(args)?.execute(&mut store, output),
        Operation::FindById => FindById::try_from(args)?.execute(&mut store, output),
    }
}

fn output_bytes(output: &mut dyn Write, value: &[u8]) -> Result<(), StoreError> {
    output
        .write_all(value)
        .map_err(StoreError::WriteOutput)
}

fn output_message(output: &mut dyn Write, message: fmt::Arguments<'_>) -> Result<(), StoreError> {
    output
        .write_fmt(message)
        .map_err(StoreError::WriteOutput)
}

fn write_records(store: &mut StoreFile, records: &[Record]) -> Result<(), StoreError> {
    let bytes = encode_records(records)?;
    store.overwrite(&bytes)?;
    log::debug!(
        "Wrote {} records to {}",
        records.len(),
        store.path().display()
    );
    Ok(())
}


#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{
        perform,
        test_utils::{record, run, store_with, stored},
        Arguments, Operation, StoreError,
    };

    #[test]
    fn missing_file_name_is_a_configuration_error() {
        for operation in ["add", "list", "findById", "remove", ""] {
            let args = Arguments {
                operation: Some(operation.to_string()),
                item: Some(r#"{"id":"1","email":"a@b.c","age":1}"#.to_string()),
                id: Some("1".to_string()),
                file_name: None,
            };
            let err = perform(&args, &mut Vec::<u8>::new()).unwrap_err();
            assert!(
                matches!(err, StoreError::Configuration("fileName")),
                "{operation}"
            );
        }
    }

    #[test]
    fn empty_file_name_is_a_configuration_error() {
        let args = Arguments {
            operation: Some("list".to_string()),
            file_name: Some("".into()),
            ..Default::default()
        };
        assert!(matches!(
            perform(&args, &mut Vec::<u8>::new()).unwrap_err(),
            StoreError::Configuration("fileName")
        ));
    }

    #[test]
    fn missing_operation_is_a_configuration_error() {
        let (_dir, path) = store_with(&[]);
        let args = Arguments {
            file_name: Some(path.clone()),
            ..Default::default()
        };

        let err = perform(&args, &mut Vec::<u8>::new()).unwrap_err();

        assert!(matches!(err, StoreError::Configuration("operation")));
        assert_eq!(err.to_string(), "-operation flag has to be specified");
        // the store file is still created, as it is opened before dispatch
        assert!(path.exists());
    }

    #[test]
    fn malformed_item_fails_before_the_file_is_created() {
        let (_dir, path) = store_with(&[]);

        for operation in ["list", "add", "findById", "remove", "abcd", ""] {
            let args = Arguments {
                operation: Some(operation.to_string()),
                item: Some("{oops".to_string()),
                id: Some("1".to_string()),
                file_name: Some(path.clone()),
            };

            let err = perform(&args, &mut Vec::<u8>::new()).unwrap_err();

            assert!(
                matches!(err, StoreError::Decode { what: "item", .. }),
                "{operation}"
            );
            assert!(!path.exists(), "{operation}");
        }
    }

    #[test]
    fn malformed_item_is_reported_before_missing_file_name() {
        let args = Arguments {
            operation: Some("list".to_string()),
            item: Some("{oops".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            perform(&args, &mut Vec::<u8>::new()).unwrap_err(),
            StoreError::Decode { what: "item", .. }
        ));
    }

    #[test]
    fn valid_item_is_ignored_by_other_operations() {
        let (_dir, path) = store_with(&[record("1")]);
        let item = record("2").to_string();

        let out = run(&path, "findById", Some(&item), Some("1")).unwrap();

        assert_eq!(out, record("1").to_string());
        assert_eq!(stored(&path), vec![record("1")]);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failure_is_a_write_output_error() {
        let (_dir, path) = store_with(&[record("1")]);
        let args = Arguments {
            operation: Some("list".to_string()),
            file_name: Some(path),
            ..Default::default()
        };

        let err = perform(&args, &mut BrokenPipe).unwrap_err();

        assert!(matches!(err, StoreError::WriteOutput(_)));
        assert_eq!(err.to_string(), "Failed to write to STDOUT");
    }

    #[test]
    fn unknown_operation_is_not_allowed() {
        let (_dir, path) = store_with(&[]);

        let err = run(&path, "abcd", None, None).unwrap_err();

        assert!(matches!(err, StoreError::UnsupportedOperation(ref op) if op == "abcd"));
        assert_eq!(err.to_string(), "Operation abcd not allowed!");
    }

    #[test]
    fn operation_names_are_case_sensitive() {
        assert_eq!("findById".parse::<Operation>().unwrap(), Operation::FindById);
        assert!("findbyid".parse::<Operation>().is_err());
        assert!("LIST".parse::<Operation>().is_err());
    }

    #[test]
    fn add_then_list_round_trips() {
        let (_dir, path) = store_with(&[]);
        let item = r#"{"id": "1", "email": "email@test.com", "age": 23}"#;

        assert_eq!(run(&path, "add", Some(item), None).unwrap(), "");
        let listed = run(&path, "list", None, None).unwrap();

        assert_eq!(listed, r#"[{"id":"1","email":"email@test.com","age":23}]"#);
    }
}
