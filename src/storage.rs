//! Storage backend trait and implementations
//!
//! Backends turn a [`MemoryStore`] into text and back. Two formats ship with
//! the crate: line-oriented `.properties` files and flat JSON objects.

use crate::error::{Error, Result};
use crate::store::{MemoryStore, PropertyStore};
use log::debug;
use std::path::Path;

/// Trait for storage backend implementations
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "properties", "json")
    fn extension(&self) -> &str;

    /// Serialize a store to string
    fn serialize(&self, store: &MemoryStore) -> Result<String>;

    /// Deserialize a store from string
    fn deserialize(&self, content: &str) -> Result<MemoryStore>;

    /// Read and deserialize from file
    fn read(&self, path: &Path) -> Result<MemoryStore> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let store = self.deserialize(&content)?;
        debug!("Read {} properties from {}", store.len(), path.display());
        Ok(store)
    }

    /// Serialize and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write(&self, path: &Path, store: &MemoryStore) -> Result<()> {
        let content = self.serialize(store)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Wrote {} properties to {}", store.len(), path.display());
        Ok(())
    }
}

// =============================================================================
// Properties Storage Implementation
// =============================================================================

/// `.properties` text backend (default)
///
/// Reads `key=value`, `key: value` and `key value` lines, skipping `#` and `!`
/// comments. A trailing backslash joins the next line. Writes one sorted
/// `key=value` line per entry with special characters escaped.
#[derive(Clone, Default)]
pub struct PropertiesStorage {
    /// Optional comment written as the first line
    header: Option<String>,
}

impl PropertiesStorage {
    /// Create a new properties backend without a header comment
    #[must_use]
    pub fn new() -> Self {
        Self { header: None }
    }

    /// Write `comment` as a `#` line at the top of saved files
    #[must_use]
    pub fn with_header(mut self, comment: impl Into<String>) -> Self {
        self.header = Some(comment.into());
        self
    }
}

impl StorageBackend for PropertiesStorage {
    fn extension(&self) -> &str {
        "properties"
    }

    fn serialize(&self, store: &MemoryStore) -> Result<String> {
        let mut out = String::new();
        if let Some(header) = &self.header {
            for line in header.lines() {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        for (key, value) in store.iter() {
            escape_into(&mut out, key, true);
            out.push('=');
            escape_into(&mut out, value, false);
            out.push('\n');
        }
        Ok(out)
    }

    fn deserialize(&self, content: &str) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();
        for (line_no, logical) in logical_lines(content) {
            let (raw_key, raw_value) = split_key_value(&logical);
            let key = unescape(raw_key, line_no)?;
            let value = unescape(raw_value, line_no)?;
            store.set(&key, value);
        }
        Ok(store)
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Join continuation lines, drop comments and blanks.
///
/// Yields `(first_line_number, logical_line)`.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut result = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, physical) in content.lines().enumerate() {
        let line = physical.trim_start_matches(is_blank);

        let (start, mut buf) = match current.take() {
            Some(pending) => pending,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            buf.push_str(&line[..line.len() - 1]);
            current = Some((start, buf));
        } else {
            buf.push_str(line);
            result.push((start, buf));
        }
    }

    if let Some(pending) = current {
        result.push(pending);
    }
    result
}

/// Split a logical line into its raw (still escaped) key and value parts
fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                let rest = line[i..].trim_start_matches(is_blank);
                let mut offset = line.len() - rest.len();
                if rest.starts_with('=') || rest.starts_with(':') {
                    offset += 1;
                }
                value_start = offset;
                break;
            }
            _ => {}
        }
    }

    let value = line[value_start..].trim_start_matches(is_blank);
    (&line[..key_end], value)
}

fn unescape(raw: &str, line_no: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        Error::Parse(format!(
                            "line {line_no}: malformed \\uXXXX escape '\\u{hex}'"
                        ))
                    })?;
                out.push(code);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend: a flat object of string values
#[derive(Clone, Default)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    #[must_use]
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, store: &MemoryStore) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(store).map_err(Error::from)
        } else {
            serde_json::to_string(store).map_err(Error::from)
        }
    }

    fn deserialize(&self, content: &str) -> Result<MemoryStore> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        object
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => Ok((key, s)),
                other => Err(Error::Parse(format!(
                    "value for '{key}' must be a string, found {other}"
                ))),
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
