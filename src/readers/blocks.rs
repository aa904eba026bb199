use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use super::LoadError;
use crate::utils::parse_clock;

/// One value of a block table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockValue {
    pub minute: f32,
    pub depth: f32,
    pub wavelength: f32,
    pub value: f32,
}

struct NumberedLines<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self, path: &Path) -> Result<Option<String>, LoadError> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                line.map(Some).map_err(|e| LoadError::unreadable(path, e))
            }
            None => Ok(None),
        }
    }
}

/// Leading numbers of a line, stopping at the first token that is not one.
fn leading_numbers(line: &str) -> Vec<f32> {
    line.split_whitespace()
        .map_while(|token| token.parse::<f32>().ok())
        .collect()
}

/// Reads depth × wavelength tables, optionally stamped with a time.
///
/// ```text
/// 06:00
/// depth   0     10    20
/// 400     0.02  0.03  0.01
/// 405     0.02  0.03  0.01
///
/// 12:00
/// ...
/// ```
///
/// A block without a time line is taken to be at midnight. Rows end at a
/// blank or non-numeric line; a time line ending the rows starts the next
/// block. A row with fewer values than depth headers is a
/// format error; the values before it have already been handed to `handle`.
pub fn read_blocks<P, F>(path: P, mut handle: F) -> Result<usize, LoadError>
where
    P: AsRef<Path>,
    F: FnMut(BlockValue),
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let mut lines = NumberedLines {
        lines: BufReader::new(file).lines(),
        number: 0,
    };

    let mut items = 0;
    // Time line that ended the rows of the previous block
    let mut pending: Option<String> = None;

    loop {
        let first = match pending.take() {
            Some(line) => line,
            None => match lines.next_line(path)? {
                Some(line) => line,
                None => break,
            },
        };
        if first.trim().is_empty() {
            continue;
        }

        let (minute, header) = match parse_clock(&first) {
            Some(minute) => match lines.next_line(path)? {
                Some(header) => (minute, header),
                None => {
                    return Err(LoadError::malformed(
                        path,
                        lines.number,
                        "time without a depth header",
                    ));
                }
            },
            None => (0, first),
        };

        // Skip a leading label such as "depth"
        let depths: Vec<f32> = header
            .split_whitespace()
            .skip_while(|token| token.parse::<f32>().is_err())
            .map_while(|token| token.parse::<f32>().ok())
            .collect();

        while let Some(row) = lines.next_line(path)? {
            let numbers = leading_numbers(&row);
            let Some((&wavelength, values)) = numbers.split_first() else {
                if parse_clock(&row).is_some() {
                    pending = Some(row);
                }
                break;
            };

            for (i, &depth) in depths.iter().enumerate() {
                let Some(&value) = values.get(i) else {
                    return Err(LoadError::malformed(
                        path,
                        lines.number,
                        format!("expected {} values, found {}", depths.len(), values.len()),
                    ));
                };
                handle(BlockValue {
                    minute: minute as f32,
                    depth,
                    wavelength,
                    value,
                });
                items += 1;
            }
        }
    }

    if items == 0 {
        return Err(LoadError::malformed(path, lines.number, "no values found"));
    }

    Ok(items)
}
