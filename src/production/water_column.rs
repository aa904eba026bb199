use log::{info, warn};

use crate::config::ModelConfig;
use crate::quantity::{
    ChlAttenuation, DepthSpectralQuantity, Irradiance, LoadError, Loadable,
    PhytoplanktonAbsorption, ProfileQuantity, SpectralQuantity,
};

/// Every measured field the production model reads, built once per run,
/// filled by the loaders and then only read by the engine.
#[derive(Debug, Clone)]
pub struct WaterColumn {
    pub ed: Irradiance,
    pub chl: ProfileQuantity,
    pub beta: ProfileQuantity,
    pub st: ProfileQuantity,
    pub k: DepthSpectralQuantity,
    pub ab: DepthSpectralQuantity,
    pub kc: ChlAttenuation,
    pub kw: SpectralQuantity,
    pub aw: SpectralQuantity,
    pub bw: SpectralQuantity,
    pub achl: SpectralQuantity,
    pub aph: PhytoplanktonAbsorption,
}

impl Default for WaterColumn {
    fn default() -> Self {
        Self {
            ed: Irradiance::new(),
            chl: ProfileQuantity::chlorophyll(),
            beta: ProfileQuantity::beta(),
            st: ProfileQuantity::sea_temperature(),
            k: DepthSpectralQuantity::attenuation(),
            ab: DepthSpectralQuantity::scatter_absorb_ratio(),
            kc: ChlAttenuation::new(),
            kw: SpectralQuantity::water_attenuation(),
            aw: SpectralQuantity::water_absorption(),
            bw: SpectralQuantity::water_scattering(),
            achl: SpectralQuantity::specific_absorption(),
            aph: PhytoplanktonAbsorption::new(),
        }
    }
}

impl WaterColumn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a quantity up by its configuration key.
    pub fn quantity_mut(&mut self, name: &str) -> Option<&mut dyn Loadable> {
        let quantity: &mut dyn Loadable = match name {
            "ed" => &mut self.ed,
            "chl" => &mut self.chl,
            "beta" => &mut self.beta,
            "st" => &mut self.st,
            "k" => &mut self.k,
            "ab" => &mut self.ab,
            "kc" => &mut self.kc,
            "kw" => &mut self.kw,
            "aw" => &mut self.aw,
            "bw" => &mut self.bw,
            "achl" => &mut self.achl,
            "aph" => &mut self.aph,
            _ => return None,
        };
        Some(quantity)
    }

    /// Loads every configured input and applies the scalar overrides.
    ///
    /// The first failing input stops loading; what it held before the bad
    /// record stays in place.
    pub fn load_inputs(&mut self, config: &ModelConfig) -> Result<(), LoadError> {
        self.st.set_default(config.temperature);

        if let Some(conversion) = config.inputs.get("ed").and_then(|i| i.mu0_conversion) {
            self.ed.set_mu0_conversion(conversion);
        }

        for (name, input) in &config.inputs {
            let quantity = self
                .quantity_mut(name)
                .ok_or_else(|| LoadError::UnknownQuantity(name.clone()))?;
            let conversion = input.conversion.unwrap_or(quantity.default_conversion());
            let records = quantity.load(&input.path, conversion)?;
            info!(
                "Loaded {} records of {} from {}",
                records,
                name,
                input.path.display()
            );
        }

        if let Some(chl) = config.chl {
            if self.chl.is_loaded() {
                warn!("Constant chlorophyll {} replaces the loaded chlorophyll data", chl);
            }
            self.chl.clear();
            self.chl.set_default(chl);
        }

        Ok(())
    }

    /// Attenuation at one depth and wavelength: the loaded `K` when present,
    /// otherwise water plus chlorophyll attenuation for the raw chlorophyll.
    pub fn attenuation(&self, minute: u32, depth: f32, wavelength: f32) -> f32 {
        if self.k.is_loaded() {
            self.k.at(depth, wavelength)
        } else {
            self.kw.at(wavelength) + self.kc.at(self.chl.at(minute, depth), wavelength)
        }
    }
}
