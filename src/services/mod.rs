// Application services orchestrating domain logic over the store ports

pub mod team_selection;

pub use team_selection::TeamSelectionService;
