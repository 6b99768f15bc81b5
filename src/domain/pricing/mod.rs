// Pricing core: rate resolution, unit counting, and quote assembly
// All pure functions; I/O stays in the service layer

pub mod duration;
pub mod engine;
pub mod rates;

pub use engine::{compute_pricing, PricingOptions};
