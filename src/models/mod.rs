pub mod application;
pub mod company;
pub mod job;
pub mod saved_job;
pub mod session;
pub mod user;
