//! Weekly schedule skeleton builder.
//!
//! Lays out a student's fixed commitments for each day of the week and fills
//! the free time around them with alternating study and break blocks. Study
//! blocks carry [`PLACEHOLDER_ACTIVITY`]; naming their subjects is left to the
//! text generator.
//!
//! The builder is a pure function of the profile: no clock, no randomness,
//! no I/O, and no failure mode. Degenerate input only yields sparse output.

use crate::models::profile::{StudentProfile, Tempo};
use crate::models::schedule::{
    BlockKind, DaySchedule, TimeBlock, WeekSkeleton, Weekday, PLACEHOLDER_ACTIVITY,
};
use crate::models::time::ClockTime;

/// Where the day starts on weekends without a morning session.
pub const WEEKEND_START: ClockTime = ClockTime(9 * 60);
/// Day end used when the profile does not set one.
pub const DEFAULT_DAY_END: ClockTime = ClockTime(22 * 60);
/// Length of the optional reading block before sleep.
pub const READING_MINUTES: u16 = 30;

pub const SCHOOL_ACTIVITY: &str = "School";
pub const COURSE_ACTIVITY: &str = "Course";
pub const ENRICHMENT_ACTIVITY: &str = "Enrichment Program";
pub const READING_ACTIVITY: &str = "Reading";
pub const BREAK_ACTIVITY: &str = "Break";

/// Build the seven-day skeleton for `profile`, Monday through Sunday.
pub fn build(profile: &StudentProfile) -> WeekSkeleton {
    let tempo = profile.tempo();
    let day_end = profile.day_end.unwrap_or(DEFAULT_DAY_END);

    let days = Weekday::ALL
        .iter()
        .map(|&day| build_day(profile, day, tempo, day_end))
        .collect();

    WeekSkeleton { days }
}

fn build_day(profile: &StudentProfile, day: Weekday, tempo: Tempo, day_end: ClockTime) -> DaySchedule {
    let mut fixed = fixed_blocks(profile, day, day_end);
    // Stable: commitments starting together keep their precedence order.
    fixed.sort_by_key(|b| b.start);

    let mut cursor = start_cursor(profile, day);
    let mut blocks = Vec::with_capacity(fixed.len() * 4 + 16);

    for block in fixed {
        // Gaps before a commitment are filled up to its start, even past
        // day end; only the trailing gap stops at day end.
        fill_gap(&mut blocks, &mut cursor, block.start, tempo);
        // Overlapping commitments are kept as given; the cursor only moves forward.
        cursor = cursor.max(block.end);
        blocks.push(block);
    }
    fill_gap(&mut blocks, &mut cursor, day_end, tempo);

    blocks.sort_by_key(|b| b.start);
    DaySchedule { day, blocks }
}

/// Fixed commitments for `day`, in precedence order.
fn fixed_blocks(profile: &StudentProfile, day: Weekday, day_end: ClockTime) -> Vec<TimeBlock> {
    let mut blocks = Vec::new();
    let weekend = day.is_weekend();

    let mut push = |span: Option<(ClockTime, ClockTime)>, activity: &str, kind: BlockKind| {
        if let Some((start, end)) = span {
            blocks.push(TimeBlock::new(start, end, activity, kind));
        }
    };

    if !weekend {
        push(profile.school.span(), SCHOOL_ACTIVITY, BlockKind::School);
        if profile.weekday_course.enabled {
            push(profile.weekday_course.window.span(), COURSE_ACTIVITY, BlockKind::Course);
        }
    }
    if day == Weekday::Saturday && profile.saturday_course.enabled {
        push(profile.saturday_course.window.span(), COURSE_ACTIVITY, BlockKind::Course);
    }
    if day == Weekday::Sunday && profile.sunday_course.enabled {
        push(profile.sunday_course.window.span(), COURSE_ACTIVITY, BlockKind::Course);
    }
    if profile.enrichment.applies_on(day) {
        push(profile.enrichment.window.span(), ENRICHMENT_ACTIVITY, BlockKind::Enrichment);
    }
    for custom in profile.custom_blocks.iter().filter(|c| c.day.matches(day)) {
        push(custom.window.span(), &custom.display_label(), BlockKind::UserActivity);
    }
    if profile.read_book_before_sleep {
        let span = day_end
            .checked_sub(READING_MINUTES)
            .map(|start| (start, day_end));
        push(span, READING_ACTIVITY, BlockKind::UserActivity);
    }

    blocks
}

/// Morning session start if enabled for the day, else school end on
/// weekdays, else [`WEEKEND_START`]. A weekday without a usable school
/// window also starts at [`WEEKEND_START`].
fn start_cursor(profile: &StudentProfile, day: Weekday) -> ClockTime {
    if let Some(start) = profile.morning_study.start_on(day) {
        return start;
    }
    if day.is_weekend() {
        return WEEKEND_START;
    }
    profile
        .school
        .span()
        .map(|(_, end)| end)
        .unwrap_or(WEEKEND_START)
}

/// Fill `[cursor, limit)` with study/break pairs.
///
/// A study block is only placed when a full one fits; a break only when a
/// full break fits after it. Whatever is left is not filled.
fn fill_gap(out: &mut Vec<TimeBlock>, cursor: &mut ClockTime, limit: ClockTime, tempo: Tempo) {
    while cursor.minutes_until(limit) >= tempo.study_minutes {
        let Some(study_end) = cursor.checked_add(tempo.study_minutes) else {
            return;
        };
        out.push(TimeBlock::new(*cursor, study_end, PLACEHOLDER_ACTIVITY, BlockKind::Study));
        *cursor = study_end;

        if tempo.break_minutes == 0 {
            continue;
        }
        if cursor.minutes_until(limit) < tempo.break_minutes {
            return;
        }
        let Some(break_end) = cursor.checked_add(tempo.break_minutes) else {
            return;
        };
        out.push(TimeBlock::new(*cursor, break_end, BREAK_ACTIVITY, BlockKind::Break));
        *cursor = break_end;
    }
}
