//! Path traversal policies.

pub mod successor;

pub use successor::{SuccessorPolicy, FirstOption, FIRST_OPTION_POLICY};
