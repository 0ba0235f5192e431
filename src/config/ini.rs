//! Minimal INI support for the rule file and `ModOrganizer.ini`.
//!
//! Reading follows the dialect the rule file has always been written in:
//!
//! - `[Section]` headers; names are case-sensitive and repeated sections merge
//! - `key = value` or `key: value`, split on the first delimiter
//! - keys are case-insensitive
//! - full-line comments start with `#` or `;`
//! - indented lines continue the previous value (joined with `\n`)
//! - a blank line ends a value
//! - a repeated key accumulates its values instead of overwriting them
//!
//! Writing is line-preserving: [`set_value`] replaces a single key in raw
//! text and leaves every other line untouched, so Qt-specific encodings in
//! `ModOrganizer.ini` survive.

use crate::error::{AssistantError, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use std::fs;

type Section = IndexMap<String, Vec<String>>;

/// Parsed INI document; sections and keys keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: IndexMap<String, Section>,
}

impl IniDocument {
    /// Read and parse an INI file.
    ///
    /// # Errors
    /// [`AssistantError::MissingFile`] if the file does not exist,
    /// [`AssistantError::Io`] for any other read failure.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AssistantError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    /// Parse INI text. Malformed lines are logged and skipped.
    pub fn parse(content: &str) -> Self {
        let mut doc = Self::default();
        let mut section: Option<String> = None;
        // Key currently accepting continuation lines, with its indentation.
        let mut current_key: Option<(String, usize)> = None;

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        for (number, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                current_key = None;
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();

            if let (Some(name), Some((key, key_indent))) = (&section, &current_key) {
                if indent > *key_indent {
                    if let Some(values) = doc
                        .sections
                        .get_mut(name)
                        .and_then(|s| s.get_mut(key))
                        .and_then(|v| v.last_mut())
                    {
                        values.push('\n');
                        values.push_str(line);
                    }
                    continue;
                }
            }

            if let Some(header) = parse_header(line) {
                doc.sections.entry(header.to_string()).or_default();
                section = Some(header.to_string());
                current_key = None;
                continue;
            }

            let Some((key, value)) = split_key_value(line) else {
                tracing::warn!("Skipping malformed INI line {}: {:?}", number + 1, line);
                continue;
            };

            let Some(name) = &section else {
                tracing::warn!("Skipping INI line {} outside of any section: {:?}", number + 1, line);
                continue;
            };

            let key = key.to_lowercase();
            doc.sections
                .entry(name.clone())
                .or_default()
                .entry(key.clone())
                .or_default()
                .push(value.to_string());
            current_key = Some((key, indent));
        }

        doc
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Section names in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Value of `key` in `section`. Repeated keys are joined with `\n`.
    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.raw_values(section, key).map(|values| values.join("\n"))
    }

    /// Value of `key`, or `fallback` when the section or key is missing.
    pub fn get_or(&self, section: &str, key: &str, fallback: &str) -> String {
        self.get(section, key)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Every line of every occurrence of `key`, in declaration order.
    ///
    /// Blank entries are dropped.
    pub fn get_all(&self, section: &str, key: &str) -> Vec<String> {
        self.raw_values(section, key)
            .into_iter()
            .flatten()
            .flat_map(|value| value.split('\n'))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Boolean value of `key`: `1/yes/true/on` or `0/no/false/off`.
    ///
    /// Missing keys and unrecognized values yield `fallback`.
    pub fn get_bool(&self, section: &str, key: &str, fallback: bool) -> bool {
        let Some(value) = self.get(section, key) else {
            return fallback;
        };

        match value.trim().to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => true,
            "0" | "no" | "false" | "off" => false,
            other => {
                tracing::warn!("Not a boolean value for {}/{}: {:?}", section, key, other);
                fallback
            }
        }
    }

    fn raw_values(&self, section: &str, key: &str) -> Option<&Vec<String>> {
        self.sections.get(section)?.get(&key.to_lowercase())
    }
}

/// Replace `key` in `section` of raw INI `content` with `key=value`.
///
/// Only matching key lines change. A missing key is appended to the end of
/// its section, a missing section to the end of the text. Line endings
/// (`\n` or `\r\n`) follow the existing content.
pub fn set_value(content: &str, section: &str, key: &str, value: &str) -> String {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let mut in_section = false;
    let mut section_found = false;
    let mut replaced = false;
    // Index after the last non-blank line of the target section.
    let mut insert_at = None;

    for (index, line) in lines.iter_mut().enumerate() {
        let trimmed = line.trim();
        if let Some(header) = parse_header(trimmed) {
            in_section = header == section;
            section_found |= in_section;
            if in_section {
                insert_at = Some(index + 1);
            }
            continue;
        }
        if !in_section || trimmed.is_empty() {
            continue;
        }

        insert_at = Some(index + 1);
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if let Some((existing, _)) = split_key_value(trimmed) {
            if existing.eq_ignore_ascii_case(key) {
                *line = format!("{}={}", existing, value);
                replaced = true;
            }
        }
    }

    if !replaced {
        let entry = format!("{}={}", key, value);
        match insert_at {
            Some(index) if section_found => lines.insert(index, entry),
            _ => {
                if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                    lines.push(String::new());
                }
                lines.push(format!("[{}]", section));
                lines.push(entry);
            }
        }
    }

    let mut output = lines.join(newline);
    output.push_str(newline);
    output
}

fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let header = &rest[..end];
    if header.is_empty() { None } else { Some(header) }
}

/// Split at the first `=` or `:` into a trimmed key and value.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
[General]
Settings = Low,High
DebugMode = true

; comment
[Low]
MinVram = 0
MaxVram=6
AspectRatio = 16:9

[LowGroup]
Mod = modA
    modB
Mod = modC
";

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = IniDocument::parse(RULES);
        assert!(doc.has_section("General"));
        assert!(doc.has_section("Low"));
        assert!(!doc.has_section("low"));
        assert_eq!(doc.get("General", "Settings").as_deref(), Some("Low,High"));
        assert_eq!(doc.get("Low", "maxvram").as_deref(), Some("6"));
        assert_eq!(doc.get("Low", "AspectRatio").as_deref(), Some("16:9"));
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["General", "Low", "LowGroup"]);
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let doc = IniDocument::parse(RULES);
        assert_eq!(doc.get_all("LowGroup", "Mod"), vec!["modA", "modB", "modC"]);
        assert_eq!(doc.get("LowGroup", "Mod").as_deref(), Some("modA\nmodB\nmodC"));
    }

    #[test]
    fn test_value_starting_on_next_line() {
        let doc = IniDocument::parse("[Group]\nMod =\n  first\n  second\n\n  orphan = 1\n");
        assert_eq!(doc.get_all("Group", "mod"), vec!["first", "second"]);
        assert_eq!(doc.get("Group", "orphan").as_deref(), Some("1"));
    }

    #[test]
    fn test_get_bool() {
        let doc = IniDocument::parse("[General]\nA = yes\nB = off\nC = maybe\n");
        assert!(doc.get_bool("General", "A", false));
        assert!(!doc.get_bool("General", "B", true));
        assert!(doc.get_bool("General", "C", true));
        assert!(!doc.get_bool("General", "Missing", false));
    }

    #[test]
    fn test_lines_outside_sections_are_skipped() {
        let doc = IniDocument::parse("orphan = 1\nnot a pair\n[S]\nk = v\n");
        assert_eq!(doc.sections().count(), 1);
        assert_eq!(doc.get_or("S", "k", ""), "v");
        assert_eq!(doc.get_or("S", "missing", "fallback"), "fallback");
    }

    #[test]
    fn test_set_value_replaces_in_place() {
        let content = "[General]\ngameName=Skyrim Special Edition\nselected_profile=@ByteArray(Default)\n\n[Settings]\nlanguage=en\n";
        let updated = set_value(content, "General", "selected_profile", "@ByteArray(Low)");
        assert_eq!(
            updated,
            "[General]\ngameName=Skyrim Special Edition\nselected_profile=@ByteArray(Low)\n\n[Settings]\nlanguage=en\n"
        );
    }

    #[test]
    fn test_set_value_appends_missing_key_to_section() {
        let content = "[General]\ngameName=Skyrim\n\n[Settings]\nlanguage=en\n";
        let updated = set_value(content, "General", "selected_profile", "@ByteArray(Low)");
        assert_eq!(
            updated,
            "[General]\ngameName=Skyrim\nselected_profile=@ByteArray(Low)\n\n[Settings]\nlanguage=en\n"
        );
    }

    #[test]
    fn test_set_value_appends_missing_section() {
        let updated = set_value("[Settings]\r\nlanguage=en\r\n", "General", "selected_profile", "@ByteArray(Low)");
        assert_eq!(
            updated,
            "[Settings]\r\nlanguage=en\r\n\r\n[General]\r\nselected_profile=@ByteArray(Low)\r\n"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = IniDocument::load(Utf8Path::new("/definitely/not/here.ini")).unwrap_err();
        assert!(matches!(err, AssistantError::MissingFile(_)));
    }
}
