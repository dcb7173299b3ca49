//! Weekly schedule shapes produced by the skeleton builder.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::time::ClockTime;

/// Activity label carried by every study block until the text generator
/// assigns a subject to it.
pub const PLACEHOLDER_ACTIVITY: &str = "{{SUBJECT}}";

/// Calendar day, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Zero-based index from Monday.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday: {0:?}")]
pub struct ParseWeekdayError(pub String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts English full and short names and Turkish names, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "monday" | "mon" | "pazartesi" => Weekday::Monday,
            "tuesday" | "tue" | "tues" | "salı" | "sali" => Weekday::Tuesday,
            "wednesday" | "wed" | "çarşamba" | "carsamba" => Weekday::Wednesday,
            "thursday" | "thu" | "thurs" | "perşembe" | "persembe" => Weekday::Thursday,
            "friday" | "fri" | "cuma" => Weekday::Friday,
            "saturday" | "sat" | "cumartesi" => Weekday::Saturday,
            "sunday" | "sun" | "pazar" => Weekday::Sunday,
            _ => return Err(ParseWeekdayError(s.to_string())),
        };
        Ok(day)
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What a block of time is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    School,
    Course,
    Enrichment,
    UserActivity,
    Study,
    Break,
}

impl BlockKind {
    /// Fixed commitments are copied verbatim; filler is synthesized.
    pub fn is_filler(&self) -> bool {
        matches!(self, BlockKind::Study | BlockKind::Break)
    }

    /// Serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::School => "school",
            BlockKind::Course => "course",
            BlockKind::Enrichment => "enrichment",
            BlockKind::UserActivity => "user-activity",
            BlockKind::Study => "study",
            BlockKind::Break => "break",
        }
    }
}

/// A contiguous interval within one day. `start < end` always holds for
/// blocks emitted by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: ClockTime,
    pub end: ClockTime,
    pub activity: String,
    pub kind: BlockKind,
}

impl TimeBlock {
    pub fn new(start: ClockTime, end: ClockTime, activity: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            start,
            end,
            activity: activity.into(),
            kind,
        }
    }

    pub fn duration_minutes(&self) -> u16 {
        self.start.minutes_until(self.end)
    }

    /// True while the block still waits for a subject.
    pub fn is_placeholder(&self) -> bool {
        self.activity == PLACEHOLDER_ACTIVITY
    }

    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One weekday and its blocks ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub blocks: Vec<TimeBlock>,
}

impl DaySchedule {
    pub fn study_minutes(&self) -> u32 {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Study)
            .map(|b| u32::from(b.duration_minutes()))
            .sum()
    }
}

/// Seven days, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSkeleton {
    pub days: Vec<DaySchedule>,
}

impl WeekSkeleton {
    pub fn day(&self, day: Weekday) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Number of study blocks still carrying the placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.blocks.iter())
            .filter(|b| b.is_placeholder())
            .count()
    }

    pub fn total_study_minutes(&self) -> u32 {
        self.days.iter().map(DaySchedule::study_minutes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_weekday_parse_variants() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("sat".parse::<Weekday>().unwrap(), Weekday::Saturday);
        assert_eq!("Çarşamba".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert_eq!("PAZAR".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_order_and_weekend() {
        assert!(Weekday::Monday < Weekday::Sunday);
        assert_eq!(Weekday::ALL.iter().filter(|d| d.is_weekend()).count(), 2);
        assert_eq!(Weekday::Thursday.index(), 3);
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Monday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }

    #[test]
    fn test_block_serialization_shape() {
        let block = TimeBlock::new(t("15:45"), t("16:25"), PLACEHOLDER_ACTIVITY, BlockKind::Study);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["start"], "15:45");
        assert_eq!(json["end"], "16:25");
        assert_eq!(json["kind"], "study");
        assert!(block.is_placeholder());

        let user = TimeBlock::new(t("19:00"), t("20:00"), "Piano", BlockKind::UserActivity);
        assert_eq!(serde_json::to_value(&user).unwrap()["kind"], "user-activity");
    }

    #[test]
    fn test_overlap() {
        let a = TimeBlock::new(t("10:00"), t("11:00"), "a", BlockKind::Course);
        let b = TimeBlock::new(t("10:30"), t("12:00"), "b", BlockKind::Course);
        let c = TimeBlock::new(t("11:00"), t("12:00"), "c", BlockKind::Course);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
