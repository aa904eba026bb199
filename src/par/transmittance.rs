//! Clear-sky spectral irradiance at the sea surface after Gregg and Carder
//! (1990), with a cloud cover correction.

use std::f32::consts::PI;

use crate::config::par::Atmosphere;

/// Standard atmospheric pressure, mbar.
pub const STANDARD_PRESSURE: f32 = 1013.25;
/// Orbital eccentricity.
pub const ECCENTRICITY: f32 = 0.0167;
/// Refractive index of sea water.
pub const SEA_WATER_INDEX: f32 = 1.341;
/// Mean cosine of the diffuse sky light below the surface.
pub const MU_SKY: f32 = 0.89;

/// Atmospheric inputs at one wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrum {
    pub wavelength: f32,
    /// Extraterrestrial irradiance.
    pub h_o: f32,
    /// Ozone absorption.
    pub a_oz: f32,
    /// Oxygen absorption.
    pub a_o: f32,
    /// Water vapour absorption.
    pub a_w: f32,
}

/// Terms that stay fixed over a day.
#[derive(Debug, Clone)]
pub struct ClearSky {
    atmosphere: Atmosphere,
    day_of_year: u32,
    /// Aerosol single scattering albedo.
    omega_a: f32,
    /// Turbidity.
    beta: f32,
    /// Ozone scale height.
    ozone_height: f32,
    /// Fraction of light passing the clouds.
    cloud: f32,
}

impl ClearSky {
    /// `noon_zenith` in radians sets the cloud correction.
    pub fn new(atmosphere: &Atmosphere, day_of_year: u32, noon_zenith: f32) -> Self {
        let omega_a = (-0.0032 * atmosphere.am + 0.972) * (3.06e-4 * atmosphere.rh).exp();
        let tau_a_550 = 3.91 / atmosphere.v;
        let beta = tau_a_550 / 0.55_f32.powf(-atmosphere.alpha);

        Self {
            atmosphere: atmosphere.clone(),
            day_of_year,
            omega_a,
            beta,
            ozone_height: atmosphere.o3 / 1000.0,
            cloud: cloud_coefficient(atmosphere.c, noon_zenith),
        }
    }

    pub fn cloud(&self) -> f32 {
        self.cloud
    }

    pub fn omega_a(&self) -> f32 {
        self.omega_a
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Path terms for a sun at `theta` radians from the zenith.
    pub fn sun(&self, theta: f32) -> SunPath<'_> {
        let atmosphere = &self.atmosphere;
        let degrees = theta.to_degrees();
        let (sin_theta, cos_theta) = theta.sin_cos();

        let m = 1.0 / (cos_theta + 0.15 * (93.885 - degrees).powf(-1.253));
        let (ps, pd) = surface_reflectance(atmosphere.w, theta);

        SunPath {
            sky: self,
            sin_theta,
            cos_theta,
            m,
            m_prime: m * atmosphere.p / STANDARD_PRESSURE,
            m_oz: 1.0035 / (cos_theta * cos_theta + 0.007).sqrt(),
            ps,
            pd,
            fa: forward_scattering(atmosphere.alpha, cos_theta),
        }
    }
}

fn cloud_coefficient(cover: f32, noon_zenith: f32) -> f32 {
    const F_VIS: f32 = 0.46;

    let noon_elevation = 90.0 - noon_zenith.to_degrees();
    let delta = 0.632 * cover - 0.0019 * noon_elevation;
    let coefficient = 1.0 - (0.75 * delta) / (1.0 - 0.25 * F_VIS);
    coefficient.min(0.95)
}

/// Forward scattering probability of the aerosol.
fn forward_scattering(alpha: f32, cos_theta: f32) -> f32 {
    let mean_cos = if alpha < 0.0 {
        0.82
    } else if alpha <= 1.2 {
        -0.1417 * alpha + 0.82
    } else {
        0.65
    };

    let b3 = (1.0 - mean_cos).ln();
    let b2 = b3 * (0.0783 + b3 * (-0.3824 - 0.5874 * b3));
    let b1 = b3 * (1.459 + b3 * (0.1595 + 0.4129 * b3));

    1.0 - 0.5 * ((b1 + b2 * cos_theta) * cos_theta).exp()
}

/// Diffuse and direct sea surface reflectance for wind speed `wind`.
///
/// Only reasonably accurate for zenith angles of 40° and more.
fn surface_reflectance(wind: f32, theta: f32) -> (f32, f32) {
    const AIR_DENSITY: f32 = 1.2e3;
    const D1: f32 = 2.2e-5;
    const D2: f32 = 4.0e-4;
    const D3: f32 = 4.5e-5;
    const D4: f32 = 4.0e-5;

    let drag = if wind <= 7.0 {
        (0.62 + 1.56 / wind) * 1.0e-3
    } else {
        (0.49 + 0.065 * wind) * 1.0e-3
    };

    let foam = if wind <= 4.0 {
        0.0
    } else if wind <= 7.0 {
        D1 * AIR_DENSITY * drag * wind * wind - D2
    } else {
        (D3 * AIR_DENSITY * drag - D4) * wind * wind
    };

    let pd = if wind <= 2.0 {
        let refracted = (theta.sin() / SEA_WATER_INDEX).asin();
        let sin_num = (theta - refracted).sin();
        let sin_denom = (theta + refracted).sin();
        let tan_num = (theta - refracted).tan();
        let tan_denom = (theta + refracted).tan();
        0.5 * ((sin_num * sin_num) / (2.0 * sin_denom * sin_denom)
            + (tan_num * tan_num) / (tan_denom * tan_denom))
    } else {
        let b = -7.14e-4 * wind + 0.0618;
        0.0253 * (b * (theta.to_degrees() - 40.0)).exp() + foam
    };

    let ps = (if wind <= 4.0 { 0.066 } else { 0.057 }) + foam;

    (ps, pd)
}

/// Path terms for one sun position.
#[derive(Debug, Clone)]
pub struct SunPath<'a> {
    sky: &'a ClearSky,
    sin_theta: f32,
    cos_theta: f32,
    /// Atmospheric path length.
    m: f32,
    /// Path length at the surface pressure.
    m_prime: f32,
    /// Path length through the ozone layer.
    m_oz: f32,
    ps: f32,
    pd: f32,
    fa: f32,
}

impl SunPath<'_> {
    /// Mean cosine of the refracted direct beam.
    pub fn mu_sun(&self) -> f32 {
        (self.sin_theta / SEA_WATER_INDEX).asin().cos()
    }

    /// Direct irradiance just below the surface, cloud corrected.
    pub fn direct(&self, s: &Spectrum) -> f32 {
        self.fo(s)
            * self.cos_theta
            * self.tr(s)
            * self.ta(s)
            * self.toz(s)
            * self.to(s)
            * self.tw(s)
            * (1.0 - self.pd)
            * self.sky.cloud
    }

    /// Diffuse irradiance just below the surface, cloud corrected.
    pub fn diffuse(&self, s: &Spectrum) -> f32 {
        (self.rayleigh_scattered(s) + self.aerosol_scattered(s)) * (1.0 - self.ps) * self.sky.cloud
    }

    /// Extraterrestrial irradiance corrected for the Earth-Sun distance.
    fn fo(&self, s: &Spectrum) -> f32 {
        let orbit = 2.0 * PI * (self.sky.day_of_year as f32 - 3.0) / 365.0;
        s.h_o * (1.0 + ECCENTRICITY * orbit.cos()).powi(2)
    }

    /// Rayleigh transmittance.
    fn tr(&self, s: &Spectrum) -> f32 {
        let l = s.wavelength / 1000.0;
        (-self.m_prime / (115.6406 * l.powi(4) - 1.335 * l.powi(2))).exp()
    }

    fn tau_a(&self, s: &Spectrum) -> f32 {
        self.sky.beta * (s.wavelength / 1000.0).powf(-self.sky.atmosphere.alpha)
    }

    /// Aerosol transmittance.
    fn ta(&self, s: &Spectrum) -> f32 {
        (-self.tau_a(s) * self.m).exp()
    }

    /// Ozone transmittance.
    fn toz(&self, s: &Spectrum) -> f32 {
        (-s.a_oz * self.sky.ozone_height * self.m_oz).exp()
    }

    /// Oxygen transmittance.
    fn to(&self, s: &Spectrum) -> f32 {
        let path = s.a_o * self.m_prime;
        ((-1.41 * path) / (1.0 + 118.3 * path).powf(0.45)).exp()
    }

    /// Water vapour transmittance.
    fn tw(&self, s: &Spectrum) -> f32 {
        let path = s.a_w * self.sky.atmosphere.wv * self.m;
        ((-0.2385 * path) / (1.0 + 20.07 * path).powf(0.45)).exp()
    }

    /// Aerosol absorption transmittance.
    fn taa(&self, s: &Spectrum) -> f32 {
        (-(1.0 - self.sky.omega_a) * self.tau_a(s) * self.m).exp()
    }

    /// Aerosol scattering transmittance.
    fn tas(&self, s: &Spectrum) -> f32 {
        (-self.sky.omega_a * self.tau_a(s) * self.m).exp()
    }

    fn absorbed_path(&self, s: &Spectrum) -> f32 {
        self.fo(s) * self.cos_theta * self.toz(s) * self.to(s) * self.tw(s) * self.taa(s)
    }

    fn rayleigh_scattered(&self, s: &Spectrum) -> f32 {
        self.absorbed_path(s) * (1.0 - self.tr(s).powf(0.95)) * 0.5
    }

    fn aerosol_scattered(&self, s: &Spectrum) -> f32 {
        self.absorbed_path(s) * self.tr(s).powf(1.5) * (1.0 - self.tas(s)) * self.fa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(wavelength: f32) -> Spectrum {
        Spectrum {
            wavelength,
            h_o: 1.8,
            a_oz: 0.0,
            a_o: 0.0,
            a_w: 0.0,
        }
    }

    #[test]
    fn test_cloud_coefficient() {
        // Clear sky with the sun overhead at noon
        assert_eq!(cloud_coefficient(0.0, 0.0), 0.95);
        // Overcast
        let overcast = cloud_coefficient(1.0, 60_f32.to_radians());
        let expected = 1.0 - 0.75 * (0.632 - 0.0019 * 30.0) / (1.0 - 0.25 * 0.46);
        assert!((overcast - expected).abs() < 1e-4, "{} vs {}", overcast, expected);
    }

    #[test]
    fn test_forward_scattering_limits() {
        let low = forward_scattering(-1.0, 0.5);
        let high = forward_scattering(2.0, 0.5);
        assert!(low > 0.0 && low < 1.0);
        assert!(high > 0.0 && high < 1.0);
        assert_eq!(forward_scattering(-1.0, 0.5), forward_scattering(-0.5, 0.5));
    }

    #[test]
    fn test_surface_reflectance() {
        // Calm sea: Fresnel term grows towards the horizon
        let (ps, pd_low) = surface_reflectance(1.0, 30_f32.to_radians());
        let (_, pd_high) = surface_reflectance(1.0, 80_f32.to_radians());
        assert_eq!(ps, 0.066);
        assert!(pd_high > pd_low);

        // Foam adds to both terms in strong wind
        let (ps, _) = surface_reflectance(10.0, 50_f32.to_radians());
        assert!(ps > 0.057);
    }

    #[test]
    fn test_irradiance_falls_with_sun_angle() {
        let sky = ClearSky::new(&Atmosphere::default(), 172, 30_f32.to_radians());
        let s = spectrum(500.0);

        let high = sky.sun(30_f32.to_radians());
        let low = sky.sun(75_f32.to_radians());

        assert!(high.direct(&s) > low.direct(&s));
        assert!(high.direct(&s) > 0.0);
        assert!(high.diffuse(&s) > 0.0);
        assert!(high.direct(&s) < s.h_o);
    }

    #[test]
    fn test_no_source_no_light() {
        let sky = ClearSky::new(&Atmosphere::default(), 172, 0.5);
        let mut s = spectrum(450.0);
        s.h_o = 0.0;

        let sun = sky.sun(0.5);
        assert_eq!(sun.direct(&s), 0.0);
        assert_eq!(sun.diffuse(&s), 0.0);
    }

    #[test]
    fn test_mu_sun() {
        let sky = ClearSky::new(&Atmosphere::default(), 172, 0.5);
        assert!((sky.sun(0.0).mu_sun() - 1.0).abs() < 1e-6);

        // Snell: sin(90°)/1.341
        let grazing = sky.sun(PI / 2.0 - 1e-3).mu_sun();
        let expected = (1.0 / SEA_WATER_INDEX).asin().cos();
        assert!((grazing - expected).abs() < 1e-3);
    }
}
