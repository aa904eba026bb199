//! Solar position from day of year, UTC time and location.

use std::f32::consts::{FRAC_PI_2, PI};

const D2R: f32 = PI / 180.0;
const R2D: f32 = 180.0 / PI;

/// Sun position for one instant. Angles in degrees.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    pub zenith_deg: f32,
    pub azimuth_deg: f32,
    pub altitude_deg: f32,
    pub declination_deg: f32,
    pub air_mass: f32,
}

impl SolarPosition {
    /// `hour` is decimal UTC hours, `longitude` positive east.
    ///
    /// Below the horizon the zenith is reported as exactly 90°.
    pub fn calculate(day_of_year: u32, hour: f32, latitude: f32, longitude: f32) -> Self {
        // Local solar noon for a GMT time meridian
        let solar_noon = 12.0 - longitude / 15.0;

        let lat = latitude * D2R;
        let declination = 23.45 * D2R * (D2R * 360.0 * (284.0 + day_of_year as f32) / 365.0).sin();

        // Whole minutes only
        let hours = hour.trunc();
        let minutes = ((hour - hours) * 60.0).trunc();
        let clock = hours + minutes / 60.0;

        // 15° per hour
        let hour_angle = (solar_noon - clock) * 60.0 * 0.0043633;

        let altitude = (lat.sin() * declination.sin()
            + lat.cos() * declination.cos() * hour_angle.cos())
        .asin();
        let azimuth = (declination.cos() * hour_angle.sin() / altitude.cos()).asin();

        let altitude_deg = altitude * R2D;
        let (zenith_deg, air_mass) = if altitude_deg < 0.0 {
            (90.0, 1229_f32.sqrt())
        } else {
            let path = 614.0 * altitude.sin();
            (90.0 - altitude_deg, (1229.0 + path * path).sqrt() - path)
        };

        SolarPosition {
            zenith_deg,
            azimuth_deg: azimuth * R2D,
            altitude_deg,
            declination_deg: declination * R2D,
            air_mass,
        }
    }

    /// Zenith angle at `minute` of the day, in radians. Exactly `π/2` while
    /// the sun is below the horizon.
    pub fn zenith_at(day_of_year: u32, minute: u32, latitude: f32, longitude: f32) -> f32 {
        let hour = (minute / 60) as f32 + (minute % 60) as f32 / 60.0;
        let position = Self::calculate(day_of_year, hour, latitude, longitude);
        if position.altitude_deg < 0.0 {
            FRAC_PI_2
        } else {
            position.zenith_deg * D2R
        }
    }
}
