use chrono::{DateTime, TimeZone};

const MS_PER_DAY: u64 = 86_400_000;
const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Time left until the wedding, split into display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// Decomposes `target - now`, clamped at zero once `target` has passed.
    pub fn between<A: TimeZone, B: TimeZone>(target: &DateTime<A>, now: &DateTime<B>) -> Self {
        let diff = target
            .timestamp_millis()
            .saturating_sub(now.timestamp_millis())
            .max(0);
        Self::from_millis(diff.unsigned_abs())
    }

    pub fn from_millis(ms: u64) -> Self {
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn past_target_is_all_zero() {
        let now = Utc::now();
        let target = now - Duration::days(3);
        assert_eq!(Countdown::between(&target, &now), Countdown::default());
    }

    #[test]
    fn target_equal_to_now_is_zero() {
        let now = Utc::now();
        assert!(Countdown::between(&now, &now).is_zero());
    }

    #[test]
    fn decomposes_into_units() {
        let now = Utc::now();
        let target = now
            + Duration::days(12)
            + Duration::hours(5)
            + Duration::minutes(7)
            + Duration::seconds(9)
            + Duration::milliseconds(999);
        assert_eq!(
            Countdown::between(&target, &now),
            Countdown {
                days: 12,
                hours: 5,
                minutes: 7,
                seconds: 9,
            }
        );
    }

    #[test]
    fn total_seconds_matches_floor_of_difference() {
        let now = Utc::now();
        for offset_ms in [1_i64, 999, 1_000, 59_999, 3_600_001, 86_400_000 * 40 + 12_345] {
            let target = now + Duration::milliseconds(offset_ms);
            let countdown = Countdown::between(&target, &now);
            assert_eq!(countdown.total_seconds(), (offset_ms / 1_000) as u64);
        }
    }

    #[test]
    fn millis_beyond_i64_range_stay_unsigned() {
        let countdown = Countdown::from_millis(u64::MAX);
        assert_eq!(countdown.days, u64::MAX / 86_400_000);
        assert!(countdown.hours < 24);
        assert!(countdown.minutes < 60);
        assert!(countdown.seconds < 60);
        assert_eq!(
            Countdown::from_millis(i64::MAX as u64 + 1_000).days,
            (i64::MAX as u64 + 1_000) / 86_400_000
        );
    }
}
