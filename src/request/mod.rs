//! Request building module
//!
//! Merges defaults with overrides and turns the result into a transport-ready
//! request descriptor.

mod builder;
mod merge;

pub use builder::{build, RequestDescriptor, USER_AGENT_STRING};
pub use merge::merge;
