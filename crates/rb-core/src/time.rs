//! Pickup time of day.
//!
//! Accepted grammar: one or two digit hour `0`-`23` (two-digit form `00`-`23`),
//! a colon, and exactly two minute digits `00`-`59`. No surrounding
//! whitespace is allowed.

use core::fmt;
use core::str::FromStr;

use crate::{CoreError, CoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupTime {
    hour: u8,
    minute: u8,
}

impl PickupTime {
    pub fn new(hour: u8, minute: u8) -> CoreResult<Self> {
        if hour > 23 {
            return Err(CoreError::InvalidArg {
                what: "hour must be in 0..=23",
            });
        }
        if minute > 59 {
            return Err(CoreError::InvalidArg {
                what: "minute must be in 0..=59",
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidTime {
            value: value.to_string(),
        };

        let (hour_part, minute_part) = value.split_once(':').ok_or_else(invalid)?;
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        if hour_part.is_empty() || hour_part.len() > 2 || !all_digits(hour_part) {
            return Err(invalid());
        }
        if minute_part.len() != 2 || !all_digits(minute_part) {
            return Err(invalid());
        }

        let hour: u8 = hour_part.parse().map_err(|_| invalid())?;
        let minute: u8 = minute_part.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn minutes_since_midnight(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl FromStr for PickupTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Always zero-padded, so formatted times sort lexicographically in
/// chronological order.
impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

pub fn is_valid_pickup_time(value: &str) -> bool {
    PickupTime::parse(value).is_ok()
}

/// Input mask for typed times: digits only, with a colon inserted after the
/// first two digits once a third one is typed. `"0730"` becomes `"07:30"`.
pub fn normalize_time_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 3 {
        return digits;
    }
    let end = digits.len().min(4);
    format!("{}:{}", &digits[..2], &digits[2..end])
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn padded_times_round_trip(h in 0_u8..24, m in 0_u8..60) {
            let s = format!("{h:02}:{m:02}");
            let t = PickupTime::parse(&s).unwrap();
            prop_assert_eq!(t.to_string(), s);
        }

        #[test]
        fn single_digit_hours_accepted(h in 0_u8..10, m in 0_u8..60) {
            let s = format!("{h}:{m:02}");
            prop_assert!(is_valid_pickup_time(&s));
        }

        #[test]
        fn out_of_range_hours_rejected(h in 24_u8..100, m in 0_u8..60) {
            let s = format!("{h:02}:{m:02}");
            prop_assert!(!is_valid_pickup_time(&s));
        }

        #[test]
        fn out_of_range_minutes_rejected(h in 0_u8..24, m in 60_u8..100) {
            let s = format!("{h:02}:{m:02}");
            prop_assert!(!is_valid_pickup_time(&s));
        }

        #[test]
        fn lexicographic_matches_chronological(
            a in (0_u8..24, 0_u8..60),
            b in (0_u8..24, 0_u8..60),
        ) {
            let ta = PickupTime::new(a.0, a.1).unwrap();
            let tb = PickupTime::new(b.0, b.1).unwrap();
            prop_assert_eq!(ta.cmp(&tb), ta.to_string().cmp(&tb.to_string()));
        }
    }
}
