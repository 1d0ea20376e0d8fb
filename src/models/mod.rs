// Models module
// Data structures for events and application settings

pub mod event;
pub mod settings;
