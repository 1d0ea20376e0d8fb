mod app;
pub mod swipe;
pub mod theme;
pub mod viewport;
pub mod views;

pub use app::CalendarApp;
