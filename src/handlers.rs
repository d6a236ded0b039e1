pub mod auth;
pub mod businesses;
pub mod items;
pub mod milestones;
pub mod statistics;
