pub mod dump;
pub mod exec;
