pub mod agent_client;

pub use agent_client::{AgentClient, SessionMessage, SessionStatus};
