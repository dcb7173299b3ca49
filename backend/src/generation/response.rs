//! Parsing of the text generator's reply.
//!
//! The reply is only trusted for labels. Timing, fixed commitments and the
//! set of blocks come from the skeleton; the reply's study block labels are
//! matched back onto it by day and start time.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::api::{
    BlockKind, ClockTime, DaySchedule, PlanNarrative, WeekSkeleton, Weekday, PLACEHOLDER_ACTIVITY,
};

/// Label given to study blocks the reply did not fill.
pub const FALLBACK_ACTIVITY: &str = "Self Study";

/// The reply could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("reply contains no JSON object")]
    NoJson,
    #[error("reply is not valid plan JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("reply has no \"days\" field")]
    MissingDays,
}

/// A skeleton with its study blocks labeled, plus the narrative fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub days: Vec<DaySchedule>,
    pub narrative: PlanNarrative,
    /// Study blocks that fell back to [`FALLBACK_ACTIVITY`].
    pub unfilled: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reply {
    days: Option<Vec<ReplyDay>>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    tips: Vec<String>,
    #[serde(default)]
    weekly_goals: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplyDay {
    day: serde_json::Value,
    blocks: Vec<serde_json::Value>,
}

/// The text between the first `{` and the last `}`, inclusive.
///
/// Drops markdown fences and any chatter the model wraps around its JSON.
pub fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

/// Parse `reply` and merge its labels into `skeleton`.
pub fn parse_reply(reply: &str, skeleton: &WeekSkeleton) -> Result<GeneratedPlan, ResponseError> {
    let json = extract_json(reply).ok_or(ResponseError::NoJson)?;
    let parsed: Reply = serde_json::from_str(json)?;
    let days = parsed.days.ok_or(ResponseError::MissingDays)?;

    let labels = collect_labels(&days);
    let (days, unfilled) = merge_labels(skeleton, &labels);
    if unfilled > 0 {
        warn!(unfilled, "Reply left study blocks unlabeled; using fallback");
    }

    Ok(GeneratedPlan {
        days,
        narrative: PlanNarrative {
            summary: parsed.summary.trim().to_string(),
            tips: clean_list(parsed.tips),
            weekly_goals: clean_list(parsed.weekly_goals),
        },
        unfilled,
    })
}

/// Usable `(day, start) -> label` pairs. Entries with an unknown day, an
/// unparseable start or a blank or placeholder label are skipped; for a
/// repeated key the first entry wins.
fn collect_labels(days: &[ReplyDay]) -> HashMap<(Weekday, ClockTime), String> {
    let mut labels = HashMap::new();
    for day in days {
        let Some(weekday) = day.day.as_str().and_then(|d| d.parse::<Weekday>().ok()) else {
            continue;
        };
        for block in &day.blocks {
            let start = block
                .get("start")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<ClockTime>().ok());
            let activity = block
                .get("activity")
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|a| !a.is_empty() && *a != PLACEHOLDER_ACTIVITY);
            if let (Some(start), Some(activity)) = (start, activity) {
                labels
                    .entry((weekday, start))
                    .or_insert_with(|| activity.to_string());
            }
        }
    }
    labels
}

fn merge_labels(
    skeleton: &WeekSkeleton,
    labels: &HashMap<(Weekday, ClockTime), String>,
) -> (Vec<DaySchedule>, usize) {
    let mut unfilled = 0;
    let days = skeleton
        .days
        .iter()
        .map(|day| {
            let mut day = day.clone();
            for block in day.blocks.iter_mut().filter(|b| b.kind == BlockKind::Study) {
                match labels.get(&(day.day, block.start)) {
                    Some(label) => block.activity = label.clone(),
                    None => {
                        block.activity = FALLBACK_ACTIVITY.to_string();
                        unfilled += 1;
                    }
                }
            }
            day
        })
        .collect();
    (days, unfilled)
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
