mod in_memory;
#[cfg(target_os = "windows")]
mod loaded;
mod module;

pub use in_memory::InMemoryModules;
#[cfg(target_os = "windows")]
pub use loaded::LoadedModules;
pub use module::{ModuleImage, ModuleProvider};
