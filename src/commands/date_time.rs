use chrono::{DateTime, Local, TimeZone};

use crate::models::InfoType;

/// Answers with the requested parts of `now`, in time/date/day order.
pub fn describe<Tz: TimeZone>(info: &[InfoType], now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut parts = Vec::with_capacity(3);
    for kind in InfoType::ALL {
        if !info.contains(&kind) {
            continue;
        }
        let sentence = match kind {
            InfoType::Time => format!("It's {}.", now.format("%I:%M %p")),
            InfoType::Date => format!("Today's date is {}.", now.format("%B %d, %Y")),
            InfoType::Day => format!("Today is {}.", now.format("%A")),
        };
        parts.push(sentence);
    }
    parts.join(" ")
}

pub fn get_date_time(info: &[InfoType]) -> String {
    describe(info, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 6, 22, 30, 0).unwrap()
    }

    #[test]
    fn test_date_only() {
        let reply = describe(&[InfoType::Date], &sample());
        assert_eq!(reply, "Today's date is November 06, 2025.");
        assert!(reply.ends_with('.') && !reply.ends_with(".."));
    }

    #[test]
    fn test_time_only() {
        assert_eq!(describe(&[InfoType::Time], &sample()), "It's 10:30 PM.");
    }

    #[test]
    fn test_all_parts_in_fixed_order() {
        assert_eq!(
            describe(&[InfoType::Day, InfoType::Time, InfoType::Date], &sample()),
            "It's 10:30 PM. Today's date is November 06, 2025. Today is Thursday."
        );
    }
}
