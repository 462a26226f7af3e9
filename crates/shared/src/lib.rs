//! Types shared by the intake core and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
