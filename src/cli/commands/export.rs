//! `pwvault export` — write every credential as a JSON array of mappings.
//!
//! Each element is `PasswordEntry::to_dict()`, so the output includes
//! secrets in clear text.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, VaultError};
use crate::vault::PasswordEntry;

use super::open_vault;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let manager = open_vault(cli)?;
    let entries = manager.load()?;

    let content = format_as_json(&entries)?;

    match output_path {
        Some(dest) => {
            let dest_path = Path::new(dest);

            // Refuse to overwrite vault files.
            if dest_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pwv"))
                || dest_path == manager.path()
            {
                return Err(VaultError::CommandFailed(
                    "refusing to export over a vault file".into(),
                ));
            }

            fs::write(dest_path, content)?;
            output::success(&format!(
                "Exported {} entries to {dest}",
                entries.len()
            ));
        }
        None => println!("{content}"),
    }

    Ok(())
}

fn format_as_json(entries: &[PasswordEntry]) -> Result<String> {
    let array = Value::Array(
        entries
            .iter()
            .map(|e| Value::Object(e.to_dict()))
            .collect(),
    );
    serde_json::to_string_pretty(&array)
        .map_err(|e| VaultError::Serialization(format!("export: {e}")))
}
