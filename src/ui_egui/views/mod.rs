pub mod day_view;
mod palette;

pub use day_view::{DayView, PointerRouting};
