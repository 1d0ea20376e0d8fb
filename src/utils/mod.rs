// Utilities module
// Shared helper functions

pub mod date;
