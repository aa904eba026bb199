//! Closed-form pieces of the Morel (1991) production model.

/// Planck's constant, J s.
pub const PLANCK: f32 = 6.625e-34;
/// Speed of light, m s⁻¹.
pub const LIGHT_SPEED: f32 = 3.0e8;
pub const AVOGADRO: f32 = 6.022e23;

/// Moles of photons per joule, per nanometre of wavelength.
pub const MOL_PHOTONS_PER_JOULE_NM: f32 = 1.0e-9 / (PLANCK * LIGHT_SPEED) / AVOGADRO;

/// Maximum chlorophyll-specific absorption from chlorophyll concentration.
pub fn a_chl_max_from_chl(chl: f32) -> f32 {
    40.3 * chl.powf(-0.33) / 1000.0
}

/// Maximum quantum yield from chlorophyll concentration.
pub fn phi_mu_max_from_chl(chl: f32) -> f32 {
    let c = chl.powf(0.66);
    0.05 * c / (c + 0.44)
}

/// Light saturation and inhibition factor `f(x)`, with `f(0) = 1`.
pub fn photoinhibition(x: f32, beta: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        (1.0 / x) * (1.0 - (-x).exp()) * (-beta * x).exp()
    }
}

/// KPUR at `temperature` from its value at 20 °C in µE m⁻² s⁻¹, giving E m⁻² s⁻¹.
pub fn kpur(kpur_20: f32, temperature: f32) -> f32 {
    (kpur_20 / 1.0e6) * 1.065_f32.powf(temperature - 20.0)
}

fn yellow_substance(wavelength: f32) -> f32 {
    (-0.014 * (wavelength - 440.0)).exp()
}

/// Total scattering coefficient `b`.
pub fn scattering(bw: f32, wavelength: f32, mean_chl: f32) -> f32 {
    bw + (550.0 / wavelength) * 0.3 * mean_chl.powf(0.62)
}

/// Total absorption coefficient `a`.
pub fn absorption(aw: f32, achl: f32, wavelength: f32, mean_chl: f32) -> f32 {
    (aw + 0.06 * achl * mean_chl.powf(0.65)) * (1.0 + 0.2 * yellow_substance(wavelength))
}

/// Downwelling to scalar irradiance factor.
pub fn scalar_factor(mu0: f32, b_over_a: f32) -> f32 {
    (1.0 / mu0) * (1.0 + (0.425 * mu0 - 0.19) * b_over_a).sqrt()
}
