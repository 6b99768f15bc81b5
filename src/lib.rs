//! CrewQuote API Library
//!
//! REST backend for a consulting-marketplace platform. The core is the team
//! pricing and membership engine: it turns a roster of consultant
//! assignments, a billing period, allocation percentages and a project
//! duration into a deterministic quote, and keeps the persisted pricing
//! snapshot in sync with every mutation.

pub mod api;
pub mod auth;
pub mod domain;
pub mod infrastructure;
pub mod notify;
pub mod services;
