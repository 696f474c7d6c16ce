pub mod augmenter;
pub mod cache;
pub mod provider;
pub mod session;
pub mod validators;
