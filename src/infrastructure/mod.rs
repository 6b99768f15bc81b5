// Infrastructure layer module
// Concrete adapters for the domain's store ports

pub mod repositories;
