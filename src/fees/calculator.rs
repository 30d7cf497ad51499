use chrono::NaiveDateTime;
use crate::core::domain::Configuration;
use crate::fees::dto::FeeResult;
use crate::lending::dto::BorrowRecordDto;

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Computes the late fee of a borrow record.
///
/// An open record is measured against `now` and a returned one against its `returned_at`.
/// Overdue days are whole days past `due_at`, truncated toward zero. The first
/// `fee_tier_days` are billed at `fee_tier_rate`, every later day at `fee_daily_rate`,
/// and the total is capped at `max_late_fee`.
pub fn calculate_late_fee(record: Option<&BorrowRecordDto>, now: NaiveDateTime,
                          config: &Configuration) -> FeeResult {
    let record = match record {
        Some(record) => record,
        None => return FeeResult::no_record(),
    };
    let reference = record.returned_at.unwrap_or(now);
    let overdue_days = (reference - record.due_at).num_days();
    if overdue_days <= 0 {
        return FeeResult::on_time();
    }
    let fee = if overdue_days <= config.fee_tier_days {
        config.fee_tier_rate * overdue_days as f64
    } else {
        config.fee_tier_rate * config.fee_tier_days as f64
            + config.fee_daily_rate * (overdue_days - config.fee_tier_days) as f64
    };
    FeeResult::overdue(round_cents(fee.min(config.max_late_fee)), overdue_days)
}
