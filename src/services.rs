pub mod auth;
pub mod business_service;
pub mod item_service;
pub mod milestone_service;
pub mod statistics_service;
