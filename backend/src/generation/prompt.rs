//! Prompt construction for plan generation.

use std::fmt::Write;

use crate::api::{StudentProfile, WeekSkeleton, PLACEHOLDER_ACTIVITY};

/// System instruction sent with every plan request.
pub const SYSTEM_PROMPT: &str = "You are an experienced study coach. You assign subjects to \
    the free study blocks of a student's weekly timetable and give short, practical advice. \
    You never move, add or remove blocks. You answer with a single JSON object and nothing else.";

/// Render the user prompt for `skeleton`.
///
/// Every block is listed as `HH:MM-HH:MM kind activity`; study blocks carry
/// the placeholder the model is asked to replace.
pub fn build_prompt(profile: &StudentProfile, skeleton: &WeekSkeleton) -> String {
    let mut out = String::new();

    out.push_str("Student\n");
    if !profile.name.trim().is_empty() {
        let _ = writeln!(out, "- Name: {}", profile.name.trim());
    }
    if !profile.grade.trim().is_empty() {
        let _ = writeln!(out, "- Grade: {}", profile.grade.trim());
    }
    let subjects: Vec<&str> = profile
        .subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if subjects.is_empty() {
        out.push_str("- Subjects: choose a balanced mix suitable for the grade\n");
    } else {
        let _ = writeln!(out, "- Subjects: {}", subjects.join(", "));
    }
    if !profile.goals.trim().is_empty() {
        let _ = writeln!(out, "- Goals: {}", profile.goals.trim());
    }

    out.push_str("\nWeekly timetable\n");
    for day in &skeleton.days {
        let _ = writeln!(out, "{}:", day.day);
        if day.blocks.is_empty() {
            out.push_str("  (no blocks)\n");
        }
        for block in &day.blocks {
            let _ = writeln!(
                out,
                "  {}-{} {} {}",
                block.start,
                block.end,
                block.kind.as_str(),
                block.activity
            );
        }
    }

    let _ = write!(
        out,
        "\nTask\n\
         Replace every {placeholder} with one subject name. Spread the subjects across the \
         week, favour the student's goals and avoid the same subject in consecutive blocks.\n\
         Reply with JSON of exactly this shape:\n\
         {{\"days\": [{{\"day\": \"monday\", \"blocks\": [{{\"start\": \"15:45\", \"end\": \"16:25\", \
         \"activity\": \"Mathematics\"}}]}}], \"summary\": \"...\", \"tips\": [\"...\"], \
         \"weeklyGoals\": [\"...\"]}}\n\
         List only the study blocks under \"days\", keyed by their start time.\n",
        placeholder = PLACEHOLDER_ACTIVITY
    );

    out
}
