pub mod climate_data;
pub mod dataset;
pub mod models;

pub use climate_data::*;
pub use dataset::*;
pub use models::*;
