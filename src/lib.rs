pub mod cli;
pub mod gate;
