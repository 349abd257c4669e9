//! Configuration file upgrades.
//!
//! Older files point at the shared table with `spreadsheet`,
//! `spreadsheet_url` or `database`, and lack fields added since. Migration
//! works on the raw YAML tree so keys this version does not know survive.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Keys that used to hold the table location, oldest first.
const LEGACY_TABLE_KEYS: [&str; 3] = ["spreadsheet_url", "spreadsheet", "database"];

fn read_tree(path: &Path) -> AppResult<Value> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let tree: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    match tree {
        Value::Mapping(_) => Ok(tree),
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        _ => Err(AppError::Config(format!(
            "{}: top level must be a mapping",
            path.display()
        ))),
    }
}

fn defaults_tree() -> AppResult<Value> {
    serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))
}

/// Dotted names of default fields absent from `target`.
fn collect_missing(target: &Mapping, defaults: &Mapping, prefix: &str, out: &mut Vec<String>) {
    for (k, v) in defaults {
        let Some(name) = k.as_str() else { continue };
        let dotted = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        match (target.get(k), v) {
            (None, _) => out.push(dotted),
            (Some(Value::Mapping(t)), Value::Mapping(d)) => collect_missing(t, d, &dotted, out),
            _ => {}
        }
    }
}

/// Copy absent default fields into `target`, recursing into sections.
fn fill_missing(target: &mut Mapping, defaults: &Mapping) {
    for (k, v) in defaults {
        match (target.get_mut(k), v) {
            (None, _) => {
                target.insert(k.clone(), v.clone());
            }
            (Some(Value::Mapping(t)), Value::Mapping(d)) => fill_missing(t, d),
            _ => {}
        }
    }
}

/// Move the first legacy table key found onto `table`, unless `table` is
/// already set. Legacy keys are removed either way.
fn rename_legacy_table_key(map: &mut Mapping) -> Option<&'static str> {
    let table_key = Value::String("table".into());
    let mut renamed = None;

    for legacy in LEGACY_TABLE_KEYS {
        let key = Value::String(legacy.into());
        if let Some(v) = map.remove(&key)
            && !map.contains_key(&table_key)
            && v.as_str().is_some_and(|s| !s.trim().is_empty())
        {
            map.insert(table_key.clone(), v);
            renamed = Some(legacy);
        }
    }

    renamed
}

/// Fields the config file at `path` does not set (defaults apply to them).
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let tree = read_tree(path)?;
    let defaults = defaults_tree()?;

    let mut out = Vec::new();
    if let (Some(t), Some(d)) = (tree.as_mapping(), defaults.as_mapping()) {
        let mut t = t.clone();
        rename_legacy_table_key(&mut t);
        collect_missing(&t, d, "", &mut out);
    }
    Ok(out)
}

/// Upgrade the config file in place. Returns the list of changes made;
/// empty means the file was already current and was not rewritten.
pub fn migrate_config(path: &Path) -> AppResult<Vec<String>> {
    let mut tree = read_tree(path)?;
    let defaults = defaults_tree()?;
    let mut changes = Vec::new();

    if let (Some(map), Some(d)) = (tree.as_mapping_mut(), defaults.as_mapping()) {
        if let Some(legacy) = rename_legacy_table_key(map) {
            changes.push(format!("renamed `{legacy}` to `table`"));
        }

        let mut missing = Vec::new();
        collect_missing(map, d, "", &mut missing);
        if !missing.is_empty() {
            fill_missing(map, d);
            changes.push(format!("added defaults for {}", missing.join(", ")));
        }
    }

    if changes.is_empty() {
        return Ok(changes);
    }

    let serialized = serde_yaml::to_string(&tree).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;
    info!(path = %path.display(), changes = %changes.join("; "), "config migrated");

    Ok(changes)
}
