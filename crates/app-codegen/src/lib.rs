//! Collapses the extractor class table into a single lazily loaded module.

pub mod emit;
pub mod error;
pub mod generator;
pub mod ordering;
pub mod plugin_guard;

pub use emit::{render, render_module, RenderedModule, StandIn};
pub use error::{GenerateError, GuardError, OrderError};
pub use generator::{generate, GenerateOptions, GenerateReport};
pub use ordering::order_classes;
pub use plugin_guard::PluginDirGuard;
