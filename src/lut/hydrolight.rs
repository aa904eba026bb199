use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LutError {
    #[error("could not read irradiance table {}: {source}", .path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("irradiance table {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("irradiance table {} holds no rows", .path.display())]
    Empty { path: PathBuf },
}

/// Irradiance ratios precomputed by a radiative transfer model (Hydrolight).
///
/// The file is a stream of whitespace-separated ratios, one row per depth
/// step from the minimum depth down, each row holding one ratio per
/// wavelength step. Line breaks carry no meaning.
#[derive(Debug, Clone)]
pub struct IrradianceTable {
    path: PathBuf,
    width: usize,
    values: Vec<f32>,
}

impl IrradianceTable {
    /// Reads a table whose rows hold `width` wavelengths.
    pub fn from_file<P: AsRef<Path>>(path: P, width: usize) -> Result<Self, LutError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| LutError::Missing {
            path: path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut values = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|source| LutError::Missing {
                path: path.clone(),
                source,
            })?;
            for value_str in line.split_whitespace() {
                let value = value_str.parse::<f32>().map_err(|_| LutError::Format {
                    path: path.clone(),
                    reason: format!("cannot parse '{}'", value_str),
                })?;
                values.push(value);
            }
        }

        if values.is_empty() {
            return Err(LutError::Empty { path });
        }
        if width == 0 || values.len() % width != 0 {
            return Err(LutError::Format {
                reason: format!(
                    "{} values do not make whole rows of {} wavelengths",
                    values.len(),
                    width
                ),
                path,
            });
        }

        Ok(Self {
            path,
            width,
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of depth rows.
    pub fn rows(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.values.chunks_exact(self.width).nth(index)
    }
}
