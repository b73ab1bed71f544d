//! Reference feature: stable, identity-reusable record references

pub mod cache;
pub mod reference;

pub use cache::ReferenceCache;
pub use reference::{ExtendedReference, Reference};
