//! Rewriting a profile's `modlist.txt`.
//!
//! Each entry is a status sign followed by the mod name (`+` enabled,
//! `-` disabled, `*` unmanaged, ...). The file is read in full, rebuilt and
//! written back. There is no locking: Mod Organizer must not write the same
//! file while the assistant runs.

use crate::error::{AssistantError, Result};
use camino::Utf8Path;
use indexmap::IndexSet;
use std::fs;

/// Rebuild mod list `content` with the given mods enabled and disabled.
///
/// Entries not named in either set keep their sign, whatever it is. Lines
/// shorter than two characters after trimming are dropped. The relative
/// order of entries is preserved and every output line ends with `\n`.
pub fn rewrite_modlist(content: &str, enabled: &IndexSet<String>, disabled: &IndexSet<String>) -> String {
    let mut output = String::with_capacity(content.len());

    for line in content.lines() {
        let line = line.trim();

        let mut chars = line.chars();
        let Some(sign) = chars.next() else {
            continue;
        };
        if chars.as_str().is_empty() {
            continue;
        }
        let name = chars.as_str().trim();

        if enabled.contains(name) {
            output.push('+');
        } else if disabled.contains(name) {
            output.push('-');
        } else {
            output.push(sign);
        }
        output.push_str(name);
        output.push('\n');
    }

    output
}

/// Apply [`rewrite_modlist`] to the file at `path`, overwriting it.
///
/// # Errors
/// [`AssistantError::MissingFile`] if the file does not exist,
/// [`AssistantError::Io`] if it cannot be read or written.
pub fn modify_modlist_file(
    path: &Utf8Path,
    enabled: &IndexSet<String>,
    disabled: &IndexSet<String>,
) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| AssistantError::io(path, e))?;
    let rewritten = rewrite_modlist(&content, enabled, disabled);
    fs::write(path, rewritten).map_err(|e| AssistantError::io(path, e))?;

    tracing::debug!("Rewrote mod list {}", path);
    Ok(())
}
