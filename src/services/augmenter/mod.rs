pub mod core;
pub mod error;
pub mod types;

pub use self::core::RequestAugmenter;
pub use error::{AugmentError, AugmentResult};
pub use types::{Credentials, Outcome, RequestContext, Termination};
