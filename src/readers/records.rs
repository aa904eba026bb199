use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{Field, LoadError};

/// Reads whitespace-separated records matching `layout` and passes each one,
/// already parsed, to `handle`. Blank lines are skipped.
///
/// Returns the number of records handled. A source without any record is a
/// format error.
pub fn read_records<P, F>(path: P, layout: &[Field], mut handle: F) -> Result<usize, LoadError>
where
    P: AsRef<Path>,
    F: FnMut(&[f32]),
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let reader = BufReader::new(file);

    let mut values = Vec::with_capacity(layout.len());
    let mut records = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::unreadable(path, e))?;
        let line_number = idx + 1;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != layout.len() {
            return Err(LoadError::malformed(
                path,
                line_number,
                format!("expected {} fields, found {}", layout.len(), tokens.len()),
            ));
        }

        values.clear();
        for (token, field) in tokens.iter().zip(layout) {
            let value = field.parse(token).ok_or_else(|| {
                LoadError::malformed(path, line_number, format!("cannot parse '{}'", token))
            })?;
            values.push(value);
        }

        handle(&values);
        records += 1;
    }

    if records == 0 {
        return Err(LoadError::malformed(path, 0, "no records found"));
    }

    Ok(records)
}
