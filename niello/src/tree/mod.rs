//! The in-memory representation of a renaming table.

pub mod mappings;
