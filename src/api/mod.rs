pub mod client;
pub mod memory;
pub mod traits;
pub mod types;

pub use client::MarketplaceClient;
pub use memory::StaticListings;
pub use traits::ListingSource;
