//! Covenant handling: accumulating covenants onto banks and facilities,
//! and resolving the combined restrictions a facility enforces.

pub mod resolver;
pub mod restrictions;
