pub mod compile;
pub mod functions;
