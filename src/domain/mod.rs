// Domain layer module exports
// Team aggregate, consultant read model, pricing core, and the store ports.
// Independent of transport and persistence concerns.

pub mod consultant;
pub mod errors;
pub mod pricing;
pub mod repositories;
pub mod team;
