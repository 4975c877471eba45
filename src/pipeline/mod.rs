pub mod acquire;
pub mod analyze;
pub mod compare;
