use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use tiff::encoder::{TiffEncoder, colortype};

use super::photosynthesis::MOL_PHOTONS_PER_JOULE_NM;
use super::{Engine, NOON, ProductionError};

const PROFILE_HEADER: &str = "Z\tPP\tAchl_max\tChl\tPhi_mu_max\tPUR_total\
\tPAR_total/uE m^-2 s^-1\tPAR_total/W m^-2\tEd(400nm)/W m^-2 nm^-1\tBeta\tKPUR";

/// Shortest of fixed or scientific notation with six significant digits.
fn general(value: f32) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.5e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let trim = |s: &str| -> String {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s.to_string()
        }
    };

    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent) as usize;
        trim(&format!("{:.*}", decimals, value))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim(mantissa), sign, exponent.abs())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, ProductionError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ProductionError::Output {
            path: path.to_path_buf(),
            source,
        })
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> ProductionError + '_ {
    move |source| ProductionError::Output {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes every configured output, the profile first since it re-derives the
/// ratio grid at noon.
pub fn write_all(engine: &mut Engine) -> Result<(), ProductionError> {
    let outputs = engine.config().outputs.clone();

    if let Some(path) = &outputs.profile {
        write_profile(engine, path)?;
        info!("Wrote depth profile to {}", path.display());
    }
    if let Some(path) = &outputs.spec_irr_depth {
        write_ratio_text(engine, path)?;
        info!("Wrote irradiance ratios to {}", path.display());
    }
    if let Some(path) = &outputs.spec_irr_depth_8bit {
        write_ratio_8bit(engine, path)?;
        info!("Wrote 8-bit irradiance ratios to {}", path.display());
    }
    if let Some(path) = &outputs.spec_irr_depth_tiff {
        write_ratio_tiff(engine, path)?;
        info!("Wrote irradiance ratio image to {}", path.display());
    }

    Ok(())
}

/// Per-depth breakdown of the calculation at noon.
pub fn write_profile(engine: &mut Engine, path: &Path) -> Result<(), ProductionError> {
    let ze = engine.euphotic_depth(NOON);
    let config = engine.config();
    let column = engine.column();
    let mean_chl = engine.mean_chl(NOON, config.depth.min, ze);
    let surface_chl = engine.chl(NOON, 0);
    let step = config.wavelength.step as f32;

    let mut out = create(path)?;
    let fail = io_error(path);
    writeln!(out, "{}", PROFILE_HEADER).map_err(&fail)?;

    for (index, depth) in config.depth.values().enumerate() {
        if depth > ze {
            break;
        }

        let (watts, einsteins) = config
            .wavelength
            .values()
            .map(|l| (l, engine.ed_at_depth(l, depth, NOON)))
            .fold((0.0, 0.0), |(watts, einsteins), (l, ed)| {
                (
                    watts + ed,
                    einsteins + ed * l as f32 * 1.0e6 * MOL_PHOTONS_PER_JOULE_NM,
                )
            });

        let chl = engine.chl(NOON, depth);
        let rates = engine.rates(surface_chl, chl);
        let row = [
            engine.pp_depth()[index],
            rates.a_chl_max,
            chl,
            rates.phi_mu_max,
            engine.pur_total(NOON, depth, mean_chl),
            einsteins * step,
            watts * step,
            engine.ed_at_depth(400, depth, NOON),
            column.beta.at(NOON, depth as f32),
            engine.kpur(NOON, depth),
        ];

        write!(out, "{}", depth).map_err(&fail)?;
        for value in row {
            write!(out, "\t{:>7}", general(value)).map_err(&fail)?;
        }
        writeln!(out).map_err(&fail)?;
    }

    out.flush().map_err(&fail)
}

/// Ratio grid as text, one row per configured depth.
pub fn write_ratio_text(engine: &Engine, path: &Path) -> Result<(), ProductionError> {
    let config = engine.config();
    let mut out = create(path)?;
    let fail = io_error(path);

    for wavelength in config.wavelength.values() {
        write!(out, "\t{:7}", wavelength).map_err(&fail)?;
    }
    writeln!(out).map_err(&fail)?;

    for (depth, row) in config.depth.values().zip(engine.ratio().rows()) {
        write!(out, "{}", depth).map_err(&fail)?;
        for ratio in row {
            write!(out, "\t{:07.5}", ratio).map_err(&fail)?;
        }
        writeln!(out).map_err(&fail)?;
    }

    out.flush().map_err(&fail)
}

/// Ratio grid scaled to bytes, row-major without a header.
pub fn write_ratio_8bit(engine: &Engine, path: &Path) -> Result<(), ProductionError> {
    let bytes: Vec<u8> = engine.ratio().iter().map(|&r| (r * 255.0) as u8).collect();

    let mut out = create(path)?;
    let fail = io_error(path);
    out.write_all(&bytes).map_err(&fail)?;
    out.flush().map_err(&fail)
}

/// Ratio grid as a single band float TIFF, wavelengths across and depths down.
pub fn write_ratio_tiff(engine: &Engine, path: &Path) -> Result<(), ProductionError> {
    let tiff_error = |source| ProductionError::Tiff {
        path: path.to_path_buf(),
        source,
    };

    let ratio = engine.ratio();
    let (height, width) = ratio.dim();
    let data: Vec<f32> = ratio.iter().copied().collect();

    let mut encoder = TiffEncoder::new(create(path)?).map_err(tiff_error)?;
    encoder
        .write_image::<colortype::Gray32Float>(width as u32, height as u32, &data)
        .map_err(tiff_error)
}
