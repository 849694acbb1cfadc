//! Persona registry
//!
//! The council is made of a closed set of [`Advisor`]s, each backed by a
//! static [`Persona`], plus the distinguished [`moderator`] persona used for
//! consensus analysis and final synthesis. Personas live for the whole
//! process and are shared read-only between concurrent debates.

pub mod advisor;
pub mod registry;

pub use advisor::Advisor;
pub use registry::{Persona, PersonaDisplay, moderator};
