pub mod candidate;
pub mod group_permission;
pub mod job;
pub mod resume;
pub mod user;
pub mod user_group;
