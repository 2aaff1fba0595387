//! Mapping trees and the identifier resolver for applying a deobfuscation
//! renaming consistently to Java source.
//!
//! [`tree::mappings::MappingSet`] stores a hierarchical renaming table, the
//! [`enigma`] module reads one from Enigma format text, and the [`resolver`]
//! module computes rewrite instructions for resolved identifier occurrences,
//! following members up the inheritance hierarchy where needed.

pub mod tree;

pub mod enigma;

pub mod resolver;
