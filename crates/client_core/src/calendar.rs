use chrono::{Datelike, NaiveDate};

/// Weekday labels, Sunday first.
pub const DAY_NAMES: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// Month view around the wedding day.
///
/// `days` starts with one `None` per weekday before the 1st and then lists
/// every day of the month. The tail is not padded to a full week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    pub wedding_day: u32,
    pub days: Vec<Option<u32>>,
    pub wedding_day_name: &'static str,
    pub day_names: [&'static str; 7],
}

impl CalendarGrid {
    pub fn for_date(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let leading = first.weekday().num_days_from_sunday() as usize;
        let last_day = days_in_month(date.year(), date.month());

        let mut days = Vec::with_capacity(leading + last_day as usize);
        days.resize(leading, None);
        days.extend((1..=last_day).map(Some));

        Self {
            year: date.year(),
            month: date.month(),
            wedding_day: date.day(),
            days,
            wedding_day_name: DAY_NAMES[date.weekday().num_days_from_sunday() as usize],
            day_names: DAY_NAMES,
        }
    }

    /// Grid for an optional wedding date; `None` means no calendar.
    pub fn for_wedding(date: Option<NaiveDate>) -> Option<Self> {
        date.map(Self::for_date)
    }

    /// Rows of seven cells; the last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<u32>]> {
        self.days.chunks(7)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn thirty_one_day_month_starting_wednesday() {
        // July 2026 starts on a Wednesday.
        let grid = CalendarGrid::for_date(date(2026, 7, 18));
        assert_eq!(grid.days.len(), 34);
        assert!(grid.days[..3].iter().all(Option::is_none));
        assert_eq!(grid.days[3], Some(1));
        assert_eq!(grid.days[33], Some(31));
        assert_eq!(grid.year, 2026);
        assert_eq!(grid.month, 7);
        assert_eq!(grid.wedding_day, 18);
        assert_eq!(grid.wedding_day_name, "토");
    }

    #[test]
    fn month_starting_sunday_has_no_leading_blanks() {
        // February 2026 starts on a Sunday and has 28 days.
        let grid = CalendarGrid::for_date(date(2026, 2, 14));
        assert_eq!(grid.days.len(), 28);
        assert_eq!(grid.days[0], Some(1));
        assert_eq!(grid.weeks().count(), 4);
    }

    #[test]
    fn leap_february_and_december_lengths() {
        let leap = CalendarGrid::for_date(date(2028, 2, 29));
        assert_eq!(leap.days.iter().flatten().count(), 29);

        let december = CalendarGrid::for_date(date(2026, 12, 24));
        assert_eq!(december.days.iter().flatten().last(), Some(&31));
    }

    #[test]
    fn no_wedding_date_means_no_calendar() {
        assert!(CalendarGrid::for_wedding(None).is_none());
    }

    #[test]
    fn day_names_start_on_sunday() {
        let grid = CalendarGrid::for_date(date(2026, 11, 1));
        assert_eq!(grid.day_names[0], "일");
        assert_eq!(grid.day_names[6], "토");
        assert_eq!(grid.wedding_day_name, "일");
    }
}
