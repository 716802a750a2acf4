//! Repository layer: one zero-sized struct per aggregate, each exposing
//! `async fn`s that take the pool explicitly.

pub mod chore_repo;
pub mod dashboard_repo;
pub mod user_repo;

pub use chore_repo::ChoreRepo;
pub use dashboard_repo::DashboardRepo;
pub use user_repo::UserRepo;
