//! Infrastructure configuration modules.

pub mod evaluation;
pub mod logging;
pub mod profile;
pub mod settings;
