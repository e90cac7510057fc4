//! Persistence adapters for onboarding settings.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::JsonFileSettingsStore;
pub use memory::MemorySettingsStore;
pub use traits::SettingsStore;
