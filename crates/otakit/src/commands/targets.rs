//! Targets command

use anyhow::{Context, Result};
use otakit_core::TargetMatrix;
use std::io::{self, Read};
use tracing::debug;

use crate::cli::TargetsArgs;

pub fn run(args: TargetsArgs) -> Result<()> {
    let list = match args.list {
        Some(list) => list,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read target list from stdin")?;
            buf
        }
    };

    let matrix = TargetMatrix::parse(&list);
    debug!("Expanded {} targets", matrix.include.len());
    println!("{}", matrix.to_json()?);
    Ok(())
}
