// KeyCRM API access: pagination driver and the three resource loaders.

pub mod client;
pub mod traits;

pub use client::KeyCrmClient;
pub use traits::CatalogSource;
