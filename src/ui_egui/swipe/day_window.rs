use chrono::NaiveDate;

use super::gesture::NavDirection;
use crate::models::event::DateRange;
use crate::utils::date::{clamp_to_paged_range, next_day, previous_day};

/// Three contiguous day pages centred on the focal date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    focal_date: NaiveDate,
    pages: [NaiveDate; 3],
}

impl DayWindow {
    pub fn new(focal_date: NaiveDate) -> Self {
        let focal_date = clamp_to_paged_range(focal_date);
        Self {
            focal_date,
            pages: Self::pages_around(focal_date),
        }
    }

    pub fn focal_date(&self) -> NaiveDate {
        self.focal_date
    }

    /// `(previous, focal, next)`
    pub fn pages(&self) -> [NaiveDate; 3] {
        self.pages
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.pages[0], self.pages[2])
    }

    /// Shifts the window by exactly one day.
    pub fn on_committed(&mut self, direction: NavDirection) {
        let shifted = match direction {
            NavDirection::Previous => previous_day(self.focal_date),
            NavDirection::Next => next_day(self.focal_date),
        };
        match shifted {
            Some(date) => self.apply(date),
            None => log::warn!(
                "Cannot move {:?} from {}: outside the supported date range",
                direction,
                self.focal_date
            ),
        }
    }

    /// External navigation (date picker, "today"). Returns whether the
    /// window moved; repeating the same date is a no-op.
    pub fn set_focal_date(&mut self, date: NaiveDate) -> bool {
        let date = clamp_to_paged_range(date);
        if date == self.focal_date {
            return false;
        }
        self.apply(date);
        true
    }

    fn apply(&mut self, date: NaiveDate) {
        self.focal_date = clamp_to_paged_range(date);
        self.pages = Self::pages_around(self.focal_date);
    }

    fn pages_around(focal: NaiveDate) -> [NaiveDate; 3] {
        // focal is already clamped, so both neighbours exist
        [
            previous_day(focal).unwrap_or(focal),
            focal,
            next_day(focal).unwrap_or(focal),
        ]
    }
}
