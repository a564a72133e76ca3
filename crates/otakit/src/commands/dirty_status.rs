//! Dirty-status command

use anyhow::{Context, Result};
use otakit_core::TreeStatus;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::debug;

use crate::cli::DirtyStatusArgs;

pub fn run(args: DirtyStatusArgs) -> Result<()> {
    let mut status = TreeStatus::default();

    if args.files.is_empty() {
        status
            .read_from(io::stdin().lock())
            .context("Failed to read status from stdin")?;
    } else {
        for path in &args.files {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            status
                .read_from(BufReader::new(file))
                .with_context(|| format!("Failed to read {}", path))?;
        }
    }

    debug!("Tree status: {:?}", status);

    // No trailing newline, the fragment is spliced into release notes
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", status.summary())?;
    stdout.flush()?;
    Ok(())
}
