//! Student profile submitted by the planning wizard.
//!
//! The profile is untrusted client state. Every field deserializes leniently:
//! anything missing or of the wrong shape collapses to "disabled" or "empty"
//! so that the skeleton builder never has to reject input.

use serde::{Deserialize, Deserializer, Serialize};

use super::schedule::{Weekday, PLACEHOLDER_ACTIVITY};
use super::time::{lenient as lenient_time, ClockTime};

/// Default study block length in minutes.
pub const DEFAULT_STUDY_MINUTES: u16 = 40;
/// Default break block length in minutes.
pub const DEFAULT_BREAK_MINUTES: u16 = 10;

/// Complete wizard state for one schedule build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub subjects: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub goals: String,

    #[serde(deserialize_with = "lenient_object")]
    pub school: TimeWindow,
    #[serde(deserialize_with = "lenient_object")]
    pub weekday_course: ToggleWindow,
    #[serde(deserialize_with = "lenient_object")]
    pub saturday_course: ToggleWindow,
    #[serde(deserialize_with = "lenient_object")]
    pub sunday_course: ToggleWindow,
    #[serde(deserialize_with = "lenient_object")]
    pub enrichment: RecurringWindow,
    #[serde(deserialize_with = "lenient_list")]
    pub custom_blocks: Vec<CustomBlock>,
    #[serde(deserialize_with = "lenient_object")]
    pub morning_study: MorningStudy,

    #[serde(deserialize_with = "lenient_time")]
    pub day_end: Option<ClockTime>,
    /// `"<study>+<break>"` in minutes, e.g. `"40+10"`.
    #[serde(deserialize_with = "lenient_string")]
    pub tempo: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub read_book_before_sleep: bool,
}

impl StudentProfile {
    /// Parsed study/break tempo, falling back to 40+10.
    pub fn tempo(&self) -> Tempo {
        Tempo::parse(&self.tempo)
    }
}

/// A start/end pair where either side may be unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    #[serde(deserialize_with = "lenient_time")]
    pub start: Option<ClockTime>,
    #[serde(deserialize_with = "lenient_time")]
    pub end: Option<ClockTime>,
}

impl TimeWindow {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds, only when set and `start < end`.
    pub fn span(&self) -> Option<(ClockTime, ClockTime)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}

/// A window that only applies when switched on (weekend/weekday courses).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleWindow {
    #[serde(deserialize_with = "lenient_bool")]
    pub enabled: bool,
    #[serde(flatten)]
    pub window: TimeWindow,
}

/// A switched window restricted to a set of weekdays (enrichment program).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringWindow {
    #[serde(deserialize_with = "lenient_bool")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient_days")]
    pub days: Vec<Weekday>,
    #[serde(flatten)]
    pub window: TimeWindow,
}

impl RecurringWindow {
    pub fn applies_on(&self, day: Weekday) -> bool {
        self.enabled && self.days.contains(&day)
    }
}

/// Optional early-morning study session that moves the day's start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorningStudy {
    #[serde(deserialize_with = "lenient_bool")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient_days")]
    pub days: Vec<Weekday>,
    #[serde(deserialize_with = "lenient_time")]
    pub start: Option<ClockTime>,
}

impl MorningStudy {
    /// Start time when the session is enabled for `day`.
    pub fn start_on(&self, day: Weekday) -> Option<ClockTime> {
        if self.enabled && self.days.contains(&day) {
            self.start
        } else {
            None
        }
    }
}

/// What a user-defined block represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomBlockKind {
    PrivateLesson,
    SocialActivity,
    Break,
    #[default]
    Other,
}

impl CustomBlockKind {
    pub fn default_label(&self) -> &'static str {
        match self {
            CustomBlockKind::PrivateLesson => "Private Lesson",
            CustomBlockKind::SocialActivity => "Social Activity",
            CustomBlockKind::Break => "Break",
            CustomBlockKind::Other => "Activity",
        }
    }
}

impl From<String> for CustomBlockKind {
    fn from(s: String) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "privatelesson" | "lesson" | "tutor" | "ozelders" | "özelders" => Self::PrivateLesson,
            "socialactivity" | "social" | "sosyalaktivite" | "sosyal" => Self::SocialActivity,
            "break" | "rest" | "mola" => Self::Break,
            _ => Self::Other,
        }
    }
}

impl<'de> Deserialize<'de> for CustomBlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) => CustomBlockKind::from(s),
            _ => CustomBlockKind::Other,
        })
    }
}

/// Which days a recurring user-defined block applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DaySelector {
    Day(Weekday),
    EveryDay,
    Weekdays,
    Weekend,
    /// Unrecognized selector; matches no day.
    #[default]
    Never,
}

impl DaySelector {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DaySelector::Day(d) => *d == day,
            DaySelector::EveryDay => true,
            DaySelector::Weekdays => !day.is_weekend(),
            DaySelector::Weekend => day.is_weekend(),
            DaySelector::Never => false,
        }
    }
}

impl From<&str> for DaySelector {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "everyday" | "daily" | "all" | "hergün" | "hergun" => Self::EveryDay,
            "weekdays" | "weekday" | "haftaiçi" | "haftaici" => Self::Weekdays,
            "weekend" | "weekends" | "haftasonu" => Self::Weekend,
            _ => s.parse().map(Self::Day).unwrap_or(Self::Never),
        }
    }
}

impl Serialize for DaySelector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DaySelector::Day(d) => d.serialize(serializer),
            DaySelector::EveryDay => serializer.serialize_str("everyday"),
            DaySelector::Weekdays => serializer.serialize_str("weekdays"),
            DaySelector::Weekend => serializer.serialize_str("weekend"),
            DaySelector::Never => serializer.serialize_str("never"),
        }
    }
}

impl<'de> Deserialize<'de> for DaySelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) => DaySelector::from(s.as_str()),
            _ => DaySelector::Never,
        })
    }
}

/// A recurring user-defined commitment (private lesson, social activity, break).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomBlock {
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    pub kind: CustomBlockKind,
    pub day: DaySelector,
    #[serde(flatten)]
    pub window: TimeWindow,
}

impl CustomBlock {
    /// The label to show, falling back to the kind's default name. The study
    /// placeholder is never accepted as a label.
    pub fn display_label(&self) -> String {
        let label = self.label.trim();
        if label.is_empty() || label == PLACEHOLDER_ACTIVITY {
            self.kind.default_label().to_string()
        } else {
            label.to_string()
        }
    }
}

/// Study/break filler lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    pub study_minutes: u16,
    pub break_minutes: u16,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            study_minutes: DEFAULT_STUDY_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl Tempo {
    /// Parse `"<study>+<break>"`. Anything else yields the 40+10 default.
    ///
    /// A study length must be positive and shorter than a day; a zero break
    /// is accepted and produces back-to-back study blocks.
    pub fn parse(raw: &str) -> Self {
        let Some((study, brk)) = raw.trim().split_once('+') else {
            return Self::default();
        };
        match (study.trim().parse::<u16>(), brk.trim().parse::<u16>()) {
            (Ok(study), Ok(brk)) if study > 0 && study < 1440 && brk < 1440 => Self {
                study_minutes: study,
                break_minutes: brk,
            },
            _ => Self::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
    let mut days: Vec<Weekday> = lenient_strings(deserializer)?
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    days.sort();
    days.dedup();
    Ok(days)
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(v @ serde_json::Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => T::default(),
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_parse() {
        assert_eq!(
            Tempo::parse("30+5"),
            Tempo {
                study_minutes: 30,
                break_minutes: 5
            }
        );
        assert_eq!(
            Tempo::parse(" 50 + 0 "),
            Tempo {
                study_minutes: 50,
                break_minutes: 0
            }
        );
    }

    #[test]
    fn test_tempo_malformed_falls_back() {
        for raw in ["", "40", "40-10", "abc+10", "0+10", "+", "40+x", "2000+10"] {
            assert_eq!(Tempo::parse(raw), Tempo::default(), "input {raw:?}");
        }
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let p: StudentProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(p, StudentProfile::default());
        assert_eq!(p.tempo(), Tempo::default());
    }

    #[test]
    fn test_wrong_shapes_are_defaulted() {
        let p: StudentProfile = serde_json::from_str(
            r#"{
                "school": "8-15",
                "weekdayCourse": {"enabled": "yes", "start": 17},
                "customBlocks": [42, {"label": "Piano", "day": "tuesday", "start": "19:00", "end": "20:00"}],
                "dayEnd": "late",
                "tempo": 40,
                "readBookBeforeSleep": null,
                "subjects": ["Math", 3, "", " Physics "]
            }"#,
        )
        .unwrap();
        assert_eq!(p.school, TimeWindow::default());
        assert!(!p.weekday_course.enabled);
        assert!(p.weekday_course.window.start.is_none());
        assert_eq!(p.custom_blocks.len(), 1);
        assert_eq!(p.custom_blocks[0].day, DaySelector::Day(Weekday::Tuesday));
        assert!(p.day_end.is_none());
        assert_eq!(p.tempo, "40");
        assert!(!p.read_book_before_sleep);
        assert_eq!(p.subjects, vec!["Math".to_string(), "Physics".to_string()]);
    }

    #[test]
    fn test_full_profile_parses() {
        let p: StudentProfile = serde_json::from_str(
            r#"{
                "school": {"start": "08:40", "end": "15:45"},
                "saturdayCourse": {"enabled": true, "start": "10:00", "end": "13:00"},
                "enrichment": {"enabled": true, "days": ["Wednesday", "friday", "bogus"], "start": "16:30", "end": "18:00"},
                "morningStudy": {"enabled": true, "days": ["monday"], "start": "06:30"},
                "customBlocks": [{"label": "", "kind": "privateLesson", "day": "weekend", "start": "14:00", "end": "15:00"}],
                "dayEnd": "22:00",
                "tempo": "30+5",
                "readBookBeforeSleep": true
            }"#,
        )
        .unwrap();
        assert_eq!(p.school.span().unwrap().1.to_string(), "15:45");
        assert!(p.saturday_course.enabled);
        assert_eq!(p.enrichment.days, vec![Weekday::Wednesday, Weekday::Friday]);
        assert!(p.enrichment.applies_on(Weekday::Friday));
        assert!(!p.enrichment.applies_on(Weekday::Monday));
        assert_eq!(
            p.morning_study.start_on(Weekday::Monday).unwrap().to_string(),
            "06:30"
        );
        assert!(p.morning_study.start_on(Weekday::Tuesday).is_none());
        assert_eq!(p.custom_blocks[0].kind, CustomBlockKind::PrivateLesson);
        assert_eq!(p.custom_blocks[0].display_label(), "Private Lesson");
        assert!(p.read_book_before_sleep);
        assert_eq!(p.tempo().study_minutes, 30);
    }

    #[test]
    fn test_inverted_window_has_no_span() {
        let w = TimeWindow::new(
            ClockTime::from_hm(15, 0).unwrap(),
            ClockTime::from_hm(9, 0).unwrap(),
        );
        assert!(w.span().is_none());
    }

    #[test]
    fn test_day_selector_matching() {
        assert!(DaySelector::EveryDay.matches(Weekday::Sunday));
        assert!(DaySelector::Weekdays.matches(Weekday::Friday));
        assert!(!DaySelector::Weekdays.matches(Weekday::Saturday));
        assert!(DaySelector::Weekend.matches(Weekday::Saturday));
        assert!(!DaySelector::Weekend.matches(Weekday::Monday));
        assert!(DaySelector::Day(Weekday::Monday).matches(Weekday::Monday));
        assert!(!DaySelector::Never.matches(Weekday::Monday));
    }

    #[test]
    fn test_day_selector_aliases() {
        assert_eq!(DaySelector::from("Every Day"), DaySelector::EveryDay);
        assert_eq!(DaySelector::from("Hafta içi"), DaySelector::Weekdays);
        assert_eq!(DaySelector::from("hafta sonu"), DaySelector::Weekend);
        assert_eq!(DaySelector::from("Cumartesi"), DaySelector::Day(Weekday::Saturday));
        assert_eq!(DaySelector::from("someday"), DaySelector::Never);
    }

    #[test]
    fn test_custom_kind_unknown_is_other() {
        let k: CustomBlockKind = serde_json::from_str("\"gaming\"").unwrap();
        assert_eq!(k, CustomBlockKind::Other);
        let k: CustomBlockKind = serde_json::from_str("\"social_activity\"").unwrap();
        assert_eq!(k, CustomBlockKind::SocialActivity);
    }

    #[test]
    fn test_custom_block_with_malformed_kind_is_kept() {
        let p: StudentProfile = serde_json::from_str(
            r#"{"customBlocks": [
                {"label": "Chess", "kind": null, "day": "monday", "start": "18:00", "end": "19:00"},
                {"label": "Swim", "kind": 3, "day": "monday", "start": "19:30", "end": "20:15"},
                {"label": "Choir", "kind": {"x": 1}, "day": "friday", "start": "17:00", "end": "18:00"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(p.custom_blocks.len(), 3);
        assert!(p.custom_blocks.iter().all(|c| c.kind == CustomBlockKind::Other));
        assert_eq!(p.custom_blocks[1].display_label(), "Swim");
        assert!(p.custom_blocks[1].window.span().is_some());
    }

    #[test]
    fn test_placeholder_label_falls_back_to_kind_name() {
        let block = CustomBlock {
            label: format!(" {PLACEHOLDER_ACTIVITY} "),
            kind: CustomBlockKind::SocialActivity,
            ..Default::default()
        };
        assert_eq!(block.display_label(), "Social Activity");
    }
}
