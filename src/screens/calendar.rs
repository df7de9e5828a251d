//! Calendar grouping for the reservation browser.

use crate::backend::Reservation;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Reservations grouped by event day.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationCalendar {
    days: BTreeMap<NaiveDate, Vec<Reservation>>,
}

impl ReservationCalendar {
    pub fn from_reservations(reservations: Vec<Reservation>) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<Reservation>> = BTreeMap::new();
        for reservation in reservations {
            days.entry(reservation.event_date)
                .or_default()
                .push(reservation);
        }
        ReservationCalendar { days }
    }

    /// Reservations on a single day.
    ///
    pub fn on(&self, date: NaiveDate) -> &[Reservation] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reservations within a month, in date order. An invalid month yields nothing.
    ///
    pub fn for_month(&self, year: i32, month: u32) -> Vec<&Reservation> {
        match month_bounds(year, month) {
            Some((start, end)) => self
                .days
                .range(start..end)
                .flat_map(|(_, reservations)| reservations.iter())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every day of the month paired with its reservation count.
    ///
    pub fn month_days(&self, year: i32, month: u32) -> Vec<(NaiveDate, usize)> {
        let (start, end) = match month_bounds(year, month) {
            Some(bounds) => bounds,
            None => return Vec::new(),
        };
        let mut days = Vec::new();
        let mut day = start;
        while day < end {
            days.push((day, self.on(day).len()));
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        days
    }

    /// Distinct months that have at least one reservation.
    ///
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months: Vec<(i32, u32)> = self
            .days
            .keys()
            .map(|date| (date.year(), date.month()))
            .collect();
        months.dedup();
        months
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse a `YYYY-MM` month argument.
///
pub fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    month_bounds(year, month).map(|_| (year, month))
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}
