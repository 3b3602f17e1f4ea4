//! Japanese era (和暦) decision dates.

use lazy_static::lazy_static;
use regex::Regex;
use time::{Date, Month};

lazy_static! {
    static ref WAREKI_RE: Regex = Regex::new(
        r"(令和|平成|昭和)\s*([0-9]+)\s*年\s*([0-9]+)\s*月\s*([0-9]+)\s*日"
    )
    .expect("valid regex");
}

/// Supported eras with the Western year preceding each era's first year.
const ERAS: &[(&str, i32)] = &[("令和", 2018), ("平成", 1988), ("昭和", 1925)];

/// Chronological sort key of a decision date.
///
/// `Unknown` orders before every known date, so records whose date could not
/// be read collect at the oldest end of a chronological listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecisionDate {
    Unknown,
    Known(Date),
}

impl DecisionDate {
    pub fn date(self) -> Option<Date> {
        match self {
            DecisionDate::Known(d) => Some(d),
            DecisionDate::Unknown => None,
        }
    }
}

/// Parse `令和3年5月1日`-style text. Anything unreadable becomes
/// [`DecisionDate::Unknown`]; this never fails.
pub fn parse_wareki(text: Option<&str>) -> DecisionDate {
    text.and_then(parse_known)
        .map(DecisionDate::Known)
        .unwrap_or(DecisionDate::Unknown)
}

fn parse_known(text: &str) -> Option<Date> {
    let caps = WAREKI_RE.captures(text)?;
    let offset = ERAS.iter().find(|(era, _)| *era == &caps[1]).map(|&(_, o)| o)?;
    let year: i32 = caps[2].parse().ok()?;
    let month: u8 = caps[3].parse().ok()?;
    let day: u8 = caps[4].parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(offset.checked_add(year)?, month, day).ok()
}
