// Store adapters: PostgreSQL for deployment, in-memory for tests/dev

pub mod memory;
pub mod postgres_consultant_directory;
pub mod postgres_team_store;

pub use memory::{InMemoryConsultantDirectory, InMemoryTeamStore};
pub use postgres_consultant_directory::PostgresConsultantDirectory;
pub use postgres_team_store::PostgresTeamStore;
