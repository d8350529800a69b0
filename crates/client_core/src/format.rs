use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};

use crate::calendar::DAY_NAMES;

/// `2026년 11월 21일 토요일 오후 2시 30분`; minutes are left out on the hour.
pub fn wedding_datetime_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let date = at.date_naive();
    let time = at.time();
    let (meridiem, hour) = match time.hour() {
        0 => ("오전", 12),
        h @ 1..=11 => ("오전", h),
        12 => ("오후", 12),
        h => ("오후", h - 12),
    };
    let clock = if time.minute() == 0 {
        format!("{meridiem} {hour}시")
    } else {
        format!("{meridiem} {hour}시 {}분", time.minute())
    };
    format!("{} {clock}", wedding_date_label(date))
}

/// `2026년 11월 21일 토요일`
pub fn wedding_date_label(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 {}요일",
        date.year(),
        date.month(),
        date.day(),
        DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
    )
}

/// `D-37`, `D-Day`, or `D+3` once the day has passed.
pub fn d_day_label(wedding: NaiveDate, today: NaiveDate) -> String {
    let days = (wedding - today).num_days();
    match days {
        0 => "D-Day".to_string(),
        d if d > 0 => format!("D-{d}"),
        d => format!("D+{}", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn afternoon_time_uses_twelve_hour_clock() {
        let kst = FixedOffset::east_opt(9 * 3600).expect("offset");
        let at = kst
            .with_ymd_and_hms(2026, 11, 21, 14, 30, 0)
            .single()
            .expect("datetime");
        assert_eq!(wedding_datetime_label(&at), "2026년 11월 21일 토요일 오후 2시 30분");
    }

    #[test]
    fn noon_and_midnight_on_the_hour() {
        let kst = FixedOffset::east_opt(9 * 3600).expect("offset");
        let noon = kst
            .with_ymd_and_hms(2026, 11, 21, 12, 0, 0)
            .single()
            .expect("datetime");
        assert!(wedding_datetime_label(&noon).ends_with("오후 12시"));
        let midnight = kst
            .with_ymd_and_hms(2026, 11, 21, 0, 0, 0)
            .single()
            .expect("datetime");
        assert!(wedding_datetime_label(&midnight).ends_with("오전 12시"));
    }

    #[test]
    fn d_day_counts_both_directions() {
        let wedding = date(2026, 11, 21);
        assert_eq!(d_day_label(wedding, date(2026, 10, 15)), "D-37");
        assert_eq!(d_day_label(wedding, wedding), "D-Day");
        assert_eq!(d_day_label(wedding, date(2026, 11, 24)), "D+3");
    }
}
