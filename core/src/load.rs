use crate::error::LoadError;
use crate::record::Record;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode records from an already-parsed JSON value, which must be an array.
pub fn records_from_value(json: Value) -> Result<Vec<Record>, LoadError> {
    let arr = match json {
        Value::Array(arr) => arr,
        other => return Err(LoadError::NotAnArray(kind(&other))),
    };
    arr.into_iter()
        .enumerate()
        .map(|(index, v)| {
            serde_json::from_value(v).map_err(|source| LoadError::InvalidRecord { index, source })
        })
        .collect()
}

pub fn records_from_str(s: &str) -> Result<Vec<Record>, LoadError> {
    records_from_value(serde_json::from_str(s)?)
}

pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    records_from_value(serde_json::from_reader(reader)?)
}

/// Fail on the first record whose id has already been seen.
pub fn ensure_unique_ids(records: &[Record]) -> Result<(), LoadError> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id) {
            return Err(LoadError::DuplicateId(r.id));
        }
    }
    Ok(())
}

/// Read a `metadata.json` export from disk.
pub fn load_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, LoadError> {
    let f = File::open(path.as_ref())?;
    let records = records_from_reader(BufReader::new(f))?;
    tracing::info!(path = %path.as_ref().display(), num_records = records.len(), "loaded records");
    Ok(records)
}
