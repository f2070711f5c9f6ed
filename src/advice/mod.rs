pub mod advisor;
pub mod agent;
pub mod summary;

pub use advisor::AdvisorProfile;
pub use agent::AdviceAgent;
