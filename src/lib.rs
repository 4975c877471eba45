pub mod backends;
pub mod cli;
pub mod color;
pub mod error;
pub mod flow;
pub mod pipeline;
pub mod report;
pub mod session;
