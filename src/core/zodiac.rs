use crate::domain::model::{BirthDate, MonthDay, ZodiacRecord};

pub const UNKNOWN_SIGN: &str = "Unknown";

/// Inclusive range check on `month * 100 + day`. A range whose start is
/// after its end wraps over the new year.
pub fn in_range(month: u32, day: u32, start: MonthDay, end: MonthDay) -> bool {
    let value = MonthDay::new(month, day).encode();
    let (start, end) = (start.encode(), end.encode());

    if start <= end {
        start <= value && value <= end
    } else {
        value >= start || value <= end
    }
}

fn is_calendar_day(month: u32, day: u32) -> bool {
    MonthDay::new(month, day).is_calendar_day()
}

/// First record in declaration order whose range contains the day.
/// Shared boundary days go to whichever record is declared first.
pub fn resolve(records: &[ZodiacRecord], month: u32, day: u32) -> Option<&ZodiacRecord> {
    if !is_calendar_day(month, day) {
        tracing::debug!("{}/{} is not a calendar day", day, month);
        return None;
    }

    records
        .iter()
        .find(|record| in_range(month, day, record.start, record.end))
}

pub fn resolve_birth_date<'a>(
    records: &'a [ZodiacRecord],
    birth_date: &BirthDate,
) -> Option<&'a ZodiacRecord> {
    resolve(records, birth_date.month(), birth_date.day())
}

pub fn identifier(record: Option<&ZodiacRecord>) -> &str {
    record.map(ZodiacRecord::identifier).unwrap_or(UNKNOWN_SIGN)
}

/// Days of a leap year that no record covers.
pub fn uncovered_days(records: &[ZodiacRecord]) -> Vec<MonthDay> {
    (1..=12)
        .flat_map(|month| (1..=31).map(move |day| (month, day)))
        .filter(|&(month, day)| is_calendar_day(month, day))
        .filter(|&(month, day)| resolve(records, month, day).is_none())
        .map(|(month, day)| MonthDay::new(month, day))
        .collect()
}
