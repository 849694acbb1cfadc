//! Output formatting for concluded debates

pub mod console;
