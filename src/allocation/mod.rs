pub mod observer;
pub mod policy;
pub mod validation;
pub mod yields;
