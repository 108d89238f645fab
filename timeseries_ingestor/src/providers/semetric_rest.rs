pub mod params;
pub mod provider;
pub mod response;

pub use params::SemetricSettings;
pub use provider::SemetricProvider;
