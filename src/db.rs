pub mod user_repo;
pub use user_repo::UserRepository;
pub mod business_repo;
pub use business_repo::BusinessRepository;
pub mod item_repo;
pub use item_repo::ItemRepository;
pub mod milestone_repo;
pub use milestone_repo::MilestoneRepository;
