//! Wire and domain types shared between the task client core and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
