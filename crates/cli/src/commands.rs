//! Subcommands of the `lotto` CLI, all working on a JSON ledger file.

use std::{fs, path::Path};

use clap::Subcommand;
use engine::{BetLedger, EditRequest, EngineError, EntryId, RandomIds};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a notation without generating entries.
    Parse { raw: String },
    /// Expand a notation and append the entries to the ledger.
    Add { raw: String, amount: String },
    /// Edit one entry and reconcile its group.
    Edit {
        entry: String,
        number: String,
        amount: u32,
    },
    /// Flag an entry as finalized on the slip.
    Finalize { entry: String },
    /// Print the ledger.
    Show,
}

pub fn run(command: Command, settings: &AppConfig) -> Result<()> {
    let width = settings.digit_width()?;
    let ledger_path = Path::new(&settings.ledger);

    match command {
        Command::Parse { raw } => {
            let atoms = engine::parse(&raw, width).map_err(EngineError::from)?;
            print_json(&atoms, settings.pretty)
        }
        Command::Add { raw, amount } => {
            let mut ledger = load_ledger(ledger_path)?;
            let added = ledger.add(&raw, &amount, width, &RandomIds)?.to_vec();
            save_ledger(ledger_path, &ledger)?;
            tracing::info!(entries = added.len(), total = ledger.total(), "entries added");
            print_json(&added, settings.pretty)
        }
        Command::Edit {
            entry,
            number,
            amount,
        } => {
            let mut ledger = load_ledger(ledger_path)?;
            let edit = EditRequest {
                target: parse_entry_id(&entry)?,
                new_number: number,
                new_amount: amount,
            };
            let diff = ledger.edit(&edit, &RandomIds)?;
            save_ledger(ledger_path, &ledger)?;
            tracing::info!(route = ?diff.route, "entry edited");
            print_json(&diff, settings.pretty)
        }
        Command::Finalize { entry } => {
            let mut ledger = load_ledger(ledger_path)?;
            let id = parse_entry_id(&entry)?;
            if !ledger.mark_finalized(id) {
                return Err(EngineError::KeyNotFound(entry).into());
            }
            save_ledger(ledger_path, &ledger)?;
            tracing::info!(%id, "entry finalized");
            Ok(())
        }
        Command::Show => {
            let ledger = load_ledger(ledger_path)?;
            print_json(&ledger, settings.pretty)
        }
    }
}

fn parse_entry_id(raw: &str) -> Result<EntryId> {
    Uuid::parse_str(raw.trim())
        .map(EntryId)
        .map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// A missing ledger file is an empty ledger.
pub(crate) fn load_ledger(path: &Path) -> Result<BetLedger> {
    if !path.exists() {
        return Ok(BetLedger::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn save_ledger(path: &Path, ledger: &BetLedger) -> Result<()> {
    let raw = serde_json::to_string_pretty(ledger)?;
    fs::write(path, raw)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{DigitWidth, SequentialIds};

    #[test]
    fn missing_ledger_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = load_ledger(&dir.path().join("none.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn ledger_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = BetLedger::new();
        ledger
            .add("5p.12r", "100", DigitWidth::Two, &SequentialIds::new())
            .unwrap();
        save_ledger(&path, &ledger).unwrap();
        assert_eq!(load_ledger(&path).unwrap(), ledger);
    }

    #[test]
    fn rejects_malformed_entry_id() {
        assert!(matches!(
            parse_entry_id("not-an-id"),
            Err(AppError::InvalidId(_))
        ));
    }
}
