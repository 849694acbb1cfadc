//! Live progress display while a debate runs

pub mod renderer;
