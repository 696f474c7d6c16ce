pub mod store;
pub mod types;

pub use store::{CacheSessionStore, SessionStore, SessionStoreError};
pub use types::{Session, SessionData};
