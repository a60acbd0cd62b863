pub mod auth;
pub mod candidate;
pub mod job;
pub mod resume;
pub mod shared;
pub mod user;
