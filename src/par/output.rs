use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::{ParDay, ParError, ParStep};
use crate::config::par::ParOutputs;
use crate::utils::format_clock;

fn write_lines<F>(path: &Path, steps: &[ParStep], mut line: F) -> Result<(), ParError>
where
    F: FnMut(&mut BufWriter<File>, &ParStep) -> std::io::Result<()>,
{
    let fail = |source| ParError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(path).map_err(fail)?);
    for step in steps {
        line(&mut out, step).map_err(fail)?;
    }
    out.flush().map_err(fail)
}

/// `HH:MM wavelength Ed mu0` rows, readable as irradiance input.
pub fn write_spectra(path: &Path, steps: &[ParStep]) -> Result<(), ParError> {
    write_lines(path, steps, |out, step| {
        let clock = format_clock(step.minute);
        for s in &step.spectrum {
            writeln!(out, "{}\t{}\t{:.6}\t{:.6}", clock, s.wavelength, s.ed, s.mu0)?;
        }
        Ok(())
    })
}

/// Direct and diffuse PAR as seen by a hemispherical sensor.
pub fn write_sensor(path: &Path, steps: &[ParStep]) -> Result<(), ParError> {
    write_lines(path, steps, |out, step| {
        writeln!(
            out,
            "{}\t{:.6}\t{:.6}\t{:.6}",
            format_clock(step.minute),
            step.par_direct,
            step.par_diffuse,
            step.sensor_angle
        )
    })
}

pub fn write_total(path: &Path, steps: &[ParStep]) -> Result<(), ParError> {
    write_lines(path, steps, |out, step| {
        writeln!(out, "{}\t{:.6}", format_clock(step.minute), step.par_total)
    })
}

/// Zenith angle in degrees.
pub fn write_zenith(path: &Path, steps: &[ParStep]) -> Result<(), ParError> {
    write_lines(path, steps, |out, step| {
        writeln!(out, "{}\t{:.6}", format_clock(step.minute), step.zenith_deg)
    })
}

pub fn write_all(day: &ParDay, outputs: &ParOutputs) -> Result<(), ParError> {
    let sinks: [(&Option<_>, fn(&Path, &[ParStep]) -> Result<(), ParError>); 4] = [
        (&outputs.par, write_spectra),
        (&outputs.sensor, write_sensor),
        (&outputs.total_par, write_total),
        (&outputs.zenith, write_zenith),
    ];

    for (path, write) in sinks {
        if let Some(path) = path {
            write(path, &day.steps)?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::par::SpectralIrradiance;
    use crate::quantity::Irradiance;
    use crate::quantity::Loadable;
    use tempfile::tempdir;

    fn steps() -> Vec<ParStep> {
        vec![ParStep {
            minute: 365,
            zenith_deg: 70.5,
            sensor_angle: 1.2,
            par_direct: 100.0,
            par_diffuse: 50.0,
            par_total: 150.0,
            spectrum: vec![
                SpectralIrradiance {
                    wavelength: 400,
                    ed: 0.5,
                    mu0: 0.8,
                },
                SpectralIrradiance {
                    wavelength: 450,
                    ed: 0.75,
                    mu0: 0.85,
                },
            ],
        }]
    }

    #[test]
    fn test_line_formats() {
        let dir = tempdir().unwrap();
        let total = dir.path().join("total.txt");
        let sensor = dir.path().join("sensor.txt");
        let zenith = dir.path().join("zenith.txt");

        write_total(&total, &steps()).unwrap();
        write_sensor(&sensor, &steps()).unwrap();
        write_zenith(&zenith, &steps()).unwrap();

        assert_eq!(std::fs::read_to_string(total).unwrap(), " 6:05\t150.000000\n");
        assert_eq!(
            std::fs::read_to_string(sensor).unwrap(),
            " 6:05\t100.000000\t50.000000\t1.200000\n"
        );
        assert_eq!(std::fs::read_to_string(zenith).unwrap(), " 6:05\t70.500000\n");
    }

    #[test]
    fn test_spectra_load_as_irradiance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ed.txt");
        write_spectra(&path, &steps()).unwrap();

        let mut ed = Irradiance::new();
        assert_eq!(ed.load(&path, 1.0).unwrap(), 2);
        assert_eq!(ed.first_minute(), 365);
        assert!((ed.ed(365, 450.0) - 0.75).abs() < 1e-6);
        assert!((ed.mu0(365, 400.0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_write_all() {
        let dir = tempdir().unwrap();
        let outputs = ParOutputs {
            total_par: Some(dir.path().join("total.txt")),
            ..ParOutputs::default()
        };
        let day = ParDay {
            daily: 1.0,
            steps: steps(),
        };

        write_all(&day, &outputs).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
