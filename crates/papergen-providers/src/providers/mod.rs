//! Provider implementations

pub mod google;

pub use google::GoogleProvider;
