pub mod application_service;
pub mod auth_service;
pub mod company_service;
pub mod job_service;
pub mod profile_service;
pub mod saved_job_service;
