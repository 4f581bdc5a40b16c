use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;

use crate::command::{perform, Arguments};

mod command;
mod record;
mod store;

const LONG_FLAGS: [&str; 4] = ["operation", "item", "fileName", "id"];

#[derive(Parser, Debug, Default, PartialEq)]
#[command(author, version)]
/// Command-line utility for managing user records stored as a JSON array in
/// a single file
///
/// Flags may be given with one or two leading dashes, e.g. `-operation list`
/// or `--operation=list`.
struct Args {
    /// usage: -operation add|list|findById|remove
    #[arg(long = "operation", allow_hyphen_values = true)]
    operation: Option<String>,

    /// usage: -item {"id": "1", "email": "email@test.com", "age": 23}
    #[arg(long = "item", allow_hyphen_values = true)]
    item: Option<String>,

    /// usage: -id "1"
    #[arg(long = "id", allow_hyphen_values = true)]
    id: Option<String>,

    /// usage: -fileName "user.json"
    #[arg(long = "fileName", allow_hyphen_values = true)]
    file_name: Option<PathBuf>,
}

impl From<Args> for Arguments {
    fn from(args: Args) -> Self {
        Self {
            operation: args.operation,
            item: args.item,
            id: args.id,
            file_name: args.file_name,
        }
    }
}

/// Rewrites `-name` and `-name=value` to their double-dash form for the
/// known long flags so clap does not read them as clusters of short flags.
fn normalize_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = s.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("--{rest}"))
            } else {
                arg
            }
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse_from(normalize_flags(std::env::args_os()));
    log::debug!("{args:?}");

    let stdout = io::stdout();
    let mut output = stdout.lock();
    perform(&args.into(), &mut output)?;
    output.flush().context("Failed to flush STDOUT")?;

    Ok(())
}
