//! Delimited-file collaborators: reading the four input tables and writing
//! the assignment and yield tables.

pub mod reader;
pub mod writer;
