use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// A "month" is a flat 30 days, not a calendar month.
pub const DAYS_PER_MONTH: i64 = 30;

/// Optional lower bound on review dates for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    cutoff: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn unbounded() -> Self {
        Self { cutoff: None }
    }

    /// `now - months * 30 days`; zero months means no window. A span too
    /// large for chrono clamps to the earliest representable instant.
    pub fn last_months(months: u32, now: DateTime<Utc>) -> Self {
        if months == 0 {
            return Self::unbounded();
        }
        let cutoff = TimeDelta::try_days(i64::from(months) * DAYS_PER_MONTH)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { cutoff: Some(cutoff) }
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    pub fn is_active(&self) -> bool {
        self.cutoff.is_some()
    }

    /// Undated reviews always pass; a date that cannot be read never does.
    pub fn admits(&self, date: Option<&str>) -> bool {
        let Some(cutoff) = self.cutoff else { return true };
        match date.map(str::trim).filter(|d| !d.is_empty()) {
            None => true,
            Some(raw) => parse_review_date(raw).is_some_and(|d| d >= cutoff),
        }
    }

    /// True when the date is readable and older than the cutoff.
    pub fn predates(&self, date: Option<&str>) -> bool {
        match (self.cutoff, date.and_then(parse_review_date)) {
            (Some(cutoff), Some(d)) => d < cutoff,
            _ => false,
        }
    }
}

/// Read the date formats the stores emit.
pub fn parse_review_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
