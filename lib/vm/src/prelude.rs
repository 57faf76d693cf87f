//! Common imports for writing and exercising programs.
pub use crate::{log, CallResult, Error, Frame, Host, Program, World};
