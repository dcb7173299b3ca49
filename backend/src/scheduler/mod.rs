//! Weekly study schedule construction.
//!
//! The skeleton builder partitions each day into fixed commitments and
//! study/break filler. Subject assignment happens later, in
//! [`crate::generation`].

pub mod skeleton;

pub use skeleton::build;

#[cfg(test)]
mod tests;
