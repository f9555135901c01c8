//! Session/UI controller state
//!
//! Per-user context (credential, selected tool, last outcome), the store
//! that keeps sessions apart, and the fun fact source.

pub mod fun_fact;
pub mod state;
pub mod store;

pub use fun_fact::FunFacts;
pub use state::{Credential, Notice, NoticeLevel, Session, SessionState};
pub use store::SessionStore;
