//! Announce command

use anyhow::{Context, Result};
use camino::Utf8Path;
use otakit_core::{
    announce, AnnounceInputs, AnnounceOutcome, DefaultReason, Digester, Error, Sha256Digester,
    Sha256sumDigester,
};
use tracing::debug;

use crate::cli::{AnnounceArgs, DigestBackend};
use crate::output;

pub fn run(args: AnnounceArgs) -> Result<()> {
    let json = args.json;
    let digester: Box<dyn Digester> = match args.digest {
        DigestBackend::Native => Box::new(Sha256Digester),
        DigestBackend::Sha256sum => Box::new(Sha256sumDigester::new()),
    };

    let config = inputs_from_args(args)
        .validate()
        .context("Invalid announce configuration")?;

    let spinner = output::spinner(&format!("Hashing {}", config.artifact_path));
    let result = announce(&config, digester.as_ref());
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err @ Error::FingerprintConflict { .. }) => {
            output::error("FATAL: new OTA entry conflicts with an old one");
            return Err(err.into());
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("Failed to announce {}", config.artifact_path)));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.entry)?);
    } else {
        print_summary(&outcome);
    }
    Ok(())
}

fn inputs_from_args(args: AnnounceArgs) -> AnnounceInputs {
    debug!("Announce args: {:?}", args);
    AnnounceInputs {
        device: args.device,
        update_type: args.update_type,
        timestamp: args.timestamp,
        artifact_path: args.path,
        signed: args.signed,
        base_url: args.base_url,
        os_version: args.os_version,
        manifest_dir: args.manifest_dir.map(String::from),
    }
}

fn print_summary(outcome: &AnnounceOutcome) {
    if let Some(reason) = &outcome.default_reason {
        output::warning(&default_note(reason, &outcome.manifest_path));
    }
    output::success(&format!(
        "Announced {} ({} entries)",
        outcome.entry.filename, outcome.total_entries
    ));
    output::kv("Manifest", outcome.manifest_path.as_str());
    output::kv("ID", &outcome.entry.id);
    output::kv("SHA256", &outcome.entry.sha256);
    output::kv("Size", &outcome.entry.size.to_string());
    output::kv("URL", &outcome.entry.url);
}

/// Describe why the manifest was started from scratch
fn default_note(reason: &DefaultReason, path: &Utf8Path) -> String {
    match reason {
        DefaultReason::Missing => format!("Started a new manifest at {}", path),
        DefaultReason::Unreadable(e) => {
            format!("Could not read {} ({}); overwrote it with a new manifest", path, e)
        }
        DefaultReason::Malformed(e) => {
            format!("Discarded malformed manifest {} ({}); previous entries are lost", path, e)
        }
    }
}
