//! Binary-side wiring: settings resolution, terminal handling and the run itself.

pub(crate) mod config_runtime;
pub(crate) mod runtime;
pub(crate) mod terminal;
