use std::sync::Mutex;
use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts config options for library system, including the lending and late fee policy
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub max_borrowed_books: usize,
    pub book_loan_days: i64,
    // number of overdue days billed at fee_tier_rate before fee_daily_rate applies
    pub fee_tier_days: i64,
    pub fee_tier_rate: f64,
    pub fee_daily_rate: f64,
    pub max_late_fee: f64,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            max_borrowed_books: 5,
            book_loan_days: 14,
            fee_tier_days: 7,
            fee_tier_rate: 0.50,
            fee_daily_rate: 1.00,
            max_late_fee: 15.00,
        }
    }
}

// Clock is the only source of "now" for workflows so that fee computation stays deterministic under test.
pub trait Clock: Sync + Send {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

// FixedClock returns the same instant until it is moved explicitly.
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self { time: Mutex::new(time) }
    }

    pub fn set(&self, time: NaiveDateTime) {
        if let Ok(mut current) = self.time.lock() {
            *current = time;
        }
    }

    pub fn advance_days(&self, days: i64) {
        if let Ok(mut current) = self.time.lock() {
            *current += Duration::days(days);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.time.lock() {
            Ok(time) => *time,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use crate::core::domain::{Clock, Configuration, FixedClock};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(10, 0, 0)).expect("valid date")
    }

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!(5, config.max_borrowed_books);
        assert_eq!(14, config.book_loan_days);
        assert_eq!(7, config.fee_tier_days);
        assert_eq!(15.0, config.max_late_fee);
    }

    #[tokio::test]
    async fn test_should_move_fixed_clock() {
        let clock = FixedClock::new(at(2025, 9, 1));
        assert_eq!(at(2025, 9, 1), clock.now());
        clock.advance_days(3);
        assert_eq!(at(2025, 9, 4), clock.now());
        clock.set(at(2025, 1, 1));
        assert_eq!(at(2025, 1, 1), clock.now());
    }
}
