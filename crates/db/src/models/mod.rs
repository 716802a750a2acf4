pub mod chore;
pub mod user;
