// Port traits for the two external collaborators
// Domain stays independent of any concrete backend

pub mod consultant_directory;
pub mod team_store;

pub use consultant_directory::ConsultantDirectory;
pub use team_store::{TeamPage, TeamStore};
