//! The semantic model a source remapper works on: class names, member
//! signatures, resolved bindings and the inheritance queries needed to follow
//! members up the class hierarchy.
//!
//! This crate holds no remapping logic itself. A semantic front-end (a
//! compiler or an index over a source set) produces [`binding::Binding`]
//! values for identifier occurrences and implements
//! [`inheritance::InheritanceProvider`]; the resolver in the `niello` crate
//! consumes both.

pub mod name;
pub mod signature;
pub mod binding;
pub mod inheritance;
