pub mod hydrolight;

pub use hydrolight::{IrradianceTable, LutError};
