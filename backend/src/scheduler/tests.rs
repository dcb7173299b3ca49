//! Unit and property tests for the skeleton builder.

use proptest::prelude::*;

use super::skeleton::*;
use crate::models::profile::{
    CustomBlock, CustomBlockKind, DaySelector, MorningStudy, RecurringWindow, StudentProfile,
    TimeWindow, ToggleWindow,
};
use crate::models::schedule::{BlockKind, DaySchedule, TimeBlock, Weekday, PLACEHOLDER_ACTIVITY};
use crate::models::time::ClockTime;

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::new(t(start), t(end))
}

fn school_profile() -> StudentProfile {
    StudentProfile {
        school: window("08:40", "15:45"),
        day_end: Some(t("21:30")),
        tempo: "40+10".to_string(),
        ..Default::default()
    }
}

fn fillers(day: &DaySchedule) -> Vec<&TimeBlock> {
    day.blocks.iter().filter(|b| b.kind.is_filler()).collect()
}

#[test]
fn test_week_has_seven_days_in_order() {
    let week = build(&StudentProfile::default());
    let days: Vec<Weekday> = week.days.iter().map(|d| d.day).collect();
    assert_eq!(days, Weekday::ALL.to_vec());
}

#[test]
fn test_school_only_on_weekdays() {
    let week = build(&school_profile());
    for day in &week.days {
        let has_school = day.blocks.iter().any(|b| b.kind == BlockKind::School);
        assert_eq!(has_school, !day.day.is_weekend(), "{}", day.day);
    }
}

#[test]
fn test_weekday_starts_at_school_end() {
    let week = build(&school_profile());
    let monday = week.day(Weekday::Monday).unwrap();
    let first_filler = fillers(monday)[0];
    assert_eq!(first_filler.start, t("15:45"));
    assert!(monday.blocks.iter().all(|b| b.start >= t("08:40")));
}

#[test]
fn test_weekend_starts_at_nine() {
    let week = build(&school_profile());
    let saturday = week.day(Weekday::Saturday).unwrap();
    assert_eq!(saturday.blocks[0].start, WEEKEND_START);
}

#[test]
fn test_weekday_without_school_starts_at_nine() {
    let profile = StudentProfile {
        school: TimeWindow {
            start: Some(t("08:00")),
            end: None,
        },
        ..Default::default()
    };
    let week = build(&profile);
    assert_eq!(week.day(Weekday::Tuesday).unwrap().blocks[0].start, WEEKEND_START);
}

#[test]
fn test_default_day_end_is_used() {
    let week = build(&StudentProfile::default());
    let sunday = week.day(Weekday::Sunday).unwrap();
    let last = sunday.blocks.last().unwrap();
    assert!(last.end <= DEFAULT_DAY_END);
}

#[test]
fn test_morning_study_moves_cursor() {
    let profile = StudentProfile {
        morning_study: MorningStudy {
            enabled: true,
            days: vec![Weekday::Wednesday],
            start: Some(t("06:30")),
        },
        ..school_profile()
    };
    let week = build(&profile);

    let wednesday = week.day(Weekday::Wednesday).unwrap();
    assert_eq!(wednesday.blocks[0].start, t("06:30"));
    assert_eq!(wednesday.blocks[0].kind, BlockKind::Study);
    // 06:30-08:40 holds two study/break pairs; the last 30 minutes stay free.
    let before_school: Vec<_> = wednesday.blocks.iter().filter(|b| b.end <= t("08:40")).collect();
    assert_eq!(before_school.len(), 4);
    assert_eq!(before_school[3].kind, BlockKind::Break);
    assert_eq!(before_school[3].end, t("08:10"));

    let thursday = week.day(Weekday::Thursday).unwrap();
    assert_eq!(fillers(thursday)[0].start, t("15:45"));
}

#[test]
fn test_course_windows_respect_their_days() {
    let profile = StudentProfile {
        weekday_course: ToggleWindow {
            enabled: true,
            window: window("17:00", "19:00"),
        },
        saturday_course: ToggleWindow {
            enabled: true,
            window: window("10:00", "13:00"),
        },
        sunday_course: ToggleWindow {
            enabled: false,
            window: window("10:00", "13:00"),
        },
        ..school_profile()
    };
    let week = build(&profile);
    let courses = |d: Weekday| {
        week.day(d)
            .unwrap()
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Course)
            .map(|b| (b.start, b.end))
            .collect::<Vec<_>>()
    };
    assert_eq!(courses(Weekday::Friday), vec![(t("17:00"), t("19:00"))]);
    assert_eq!(courses(Weekday::Saturday), vec![(t("10:00"), t("13:00"))]);
    assert!(courses(Weekday::Sunday).is_empty());
}

#[test]
fn test_enrichment_only_on_configured_days() {
    let profile = StudentProfile {
        enrichment: RecurringWindow {
            enabled: true,
            days: vec![Weekday::Tuesday, Weekday::Saturday],
            window: window("16:00", "18:00"),
        },
        ..school_profile()
    };
    let week = build(&profile);
    for day in &week.days {
        let has = day.blocks.iter().any(|b| b.kind == BlockKind::Enrichment);
        assert_eq!(has, matches!(day.day, Weekday::Tuesday | Weekday::Saturday));
    }
}

#[test]
fn test_custom_block_selectors() {
    let custom = |label: &str, day: DaySelector| CustomBlock {
        label: label.to_string(),
        kind: CustomBlockKind::SocialActivity,
        day,
        window: window("19:00", "20:00"),
    };
    let profile = StudentProfile {
        custom_blocks: vec![
            custom("Football", DaySelector::Weekdays),
            custom("Family", DaySelector::Weekend),
            custom("Piano", DaySelector::Day(Weekday::Monday)),
        ],
        ..school_profile()
    };
    let week = build(&profile);
    let labels = |d: Weekday| {
        week.day(d)
            .unwrap()
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::UserActivity)
            .map(|b| b.activity.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(labels(Weekday::Monday), vec!["Football", "Piano"]);
    assert_eq!(labels(Weekday::Tuesday), vec!["Football"]);
    assert_eq!(labels(Weekday::Sunday), vec!["Family"]);
}

#[test]
fn test_inverted_commitment_is_dropped() {
    let profile = StudentProfile {
        custom_blocks: vec![CustomBlock {
            label: "Backwards".to_string(),
            kind: CustomBlockKind::Other,
            day: DaySelector::EveryDay,
            window: window("20:00", "19:00"),
        }],
        ..school_profile()
    };
    let week = build(&profile);
    assert!(week
        .days
        .iter()
        .flat_map(|d| d.blocks.iter())
        .all(|b| b.activity != "Backwards" && b.start < b.end));
}

#[test]
fn test_short_gap_is_left_unfilled() {
    // 15:45-16:15 is shorter than one 40-minute study block.
    let profile = StudentProfile {
        weekday_course: ToggleWindow {
            enabled: true,
            window: window("16:15", "18:00"),
        },
        ..school_profile()
    };
    let week = build(&profile);
    let monday = week.day(Weekday::Monday).unwrap();
    assert!(monday
        .blocks
        .iter()
        .all(|b| !(b.kind.is_filler() && b.start < t("16:15"))));
    let course = monday.blocks.iter().position(|b| b.kind == BlockKind::Course).unwrap();
    assert_eq!(monday.blocks[course + 1].start, t("18:00"));
}

#[test]
fn test_break_dropped_when_it_does_not_fit() {
    // 15:45-16:30 fits one study block (to 16:25) but not the 10-minute break.
    let profile = StudentProfile {
        weekday_course: ToggleWindow {
            enabled: true,
            window: window("16:30", "18:00"),
        },
        ..school_profile()
    };
    let week = build(&profile);
    let monday = week.day(Weekday::Monday).unwrap();
    let before: Vec<_> = monday
        .blocks
        .iter()
        .filter(|b| b.kind.is_filler() && b.start < t("16:30"))
        .collect();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].kind, BlockKind::Study);
    assert_eq!(before[0].end, t("16:25"));
}

#[test]
fn test_day_end_before_cursor_emits_no_trailing_filler() {
    let profile = StudentProfile {
        day_end: Some(t("15:00")),
        ..school_profile()
    };
    let week = build(&profile);
    let monday = week.day(Weekday::Monday).unwrap();
    assert!(fillers(monday).is_empty());
    assert_eq!(monday.blocks.len(), 1);
}

#[test]
fn test_gap_before_late_commitment_is_filled() {
    let profile = StudentProfile {
        day_end: Some(t("21:00")),
        custom_blocks: vec![CustomBlock {
            label: "Late show".to_string(),
            kind: CustomBlockKind::Other,
            day: DaySelector::Day(Weekday::Saturday),
            window: window("22:30", "23:30"),
        }],
        ..school_profile()
    };
    let week = build(&profile);
    let saturday = week.day(Weekday::Saturday).unwrap();

    let late: Vec<_> = fillers(saturday)
        .into_iter()
        .filter(|b| b.start >= t("20:40"))
        .map(|b| (b.start.to_string(), b.end.to_string(), b.kind))
        .collect();
    assert_eq!(
        late,
        vec![
            ("20:40".to_string(), "21:20".to_string(), BlockKind::Study),
            ("21:20".to_string(), "21:30".to_string(), BlockKind::Break),
            ("21:30".to_string(), "22:10".to_string(), BlockKind::Study),
            ("22:10".to_string(), "22:20".to_string(), BlockKind::Break),
        ]
    );
    let show = saturday.blocks.last().unwrap();
    assert_eq!(show.activity, "Late show");
    assert_eq!(show.start, t("22:30"));

    // Without a later commitment the day still stops at day end.
    let monday = week.day(Weekday::Monday).unwrap();
    assert!(fillers(monday).iter().all(|b| b.end <= t("21:00")));
}

#[test]
fn test_placeholder_custom_label_is_replaced() {
    let profile = StudentProfile {
        custom_blocks: vec![CustomBlock {
            label: PLACEHOLDER_ACTIVITY.to_string(),
            kind: CustomBlockKind::PrivateLesson,
            day: DaySelector::Day(Weekday::Tuesday),
            window: window("18:00", "19:00"),
        }],
        ..school_profile()
    };
    let week = build(&profile);
    let tuesday = week.day(Weekday::Tuesday).unwrap();
    let lesson = tuesday
        .blocks
        .iter()
        .find(|b| b.kind == BlockKind::UserActivity)
        .unwrap();
    assert_eq!(lesson.activity, "Private Lesson");
    assert!(tuesday
        .blocks
        .iter()
        .filter(|b| b.activity == PLACEHOLDER_ACTIVITY)
        .all(|b| b.kind == BlockKind::Study));
}

#[test]
fn test_overlapping_commitments_are_kept_and_sorted() {
    // Known boundary case: a lesson inside school hours is neither rejected
    // nor merged; both blocks are emitted and only ordered by start.
    let profile = StudentProfile {
        custom_blocks: vec![CustomBlock {
            label: "Violin".to_string(),
            kind: CustomBlockKind::PrivateLesson,
            day: DaySelector::Day(Weekday::Monday),
            window: window("14:00", "16:30"),
        }],
        ..school_profile()
    };
    let week = build(&profile);
    let monday = week.day(Weekday::Monday).unwrap();

    let school = &monday.blocks[0];
    let violin = &monday.blocks[1];
    assert_eq!(school.kind, BlockKind::School);
    assert_eq!(violin.activity, "Violin");
    assert!(school.overlaps(violin));
    // Filler resumes after the later of the two ends.
    assert_eq!(monday.blocks[2].start, t("16:30"));
    assert_eq!(monday.blocks[2].kind, BlockKind::Study);
}

#[test]
fn test_zero_break_tempo_packs_study_blocks() {
    let profile = StudentProfile {
        tempo: "60+0".to_string(),
        day_end: Some(t("12:00")),
        ..Default::default()
    };
    let week = build(&profile);
    let saturday = week.day(Weekday::Saturday).unwrap();
    assert_eq!(saturday.blocks.len(), 3);
    assert!(saturday.blocks.iter().all(|b| b.kind == BlockKind::Study));
    assert_eq!(saturday.blocks[2].end, t("12:00"));
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

fn clock(min: u16, max: u16) -> impl Strategy<Value = ClockTime> {
    (min..max).prop_map(|m| ClockTime::from_minutes(m).unwrap())
}

fn arb_window() -> impl Strategy<Value = TimeWindow> {
    (clock(0, 1380), 10u16..240).prop_map(|(start, len)| TimeWindow {
        start: Some(start),
        end: start.checked_add(len).or(ClockTime::from_minutes(1439)),
    })
}

fn arb_days() -> impl Strategy<Value = Vec<Weekday>> {
    proptest::sample::subsequence(Weekday::ALL.to_vec(), 0..=7)
}

fn arb_selector() -> impl Strategy<Value = DaySelector> {
    prop_oneof![
        proptest::sample::select(Weekday::ALL.to_vec()).prop_map(DaySelector::Day),
        Just(DaySelector::EveryDay),
        Just(DaySelector::Weekdays),
        Just(DaySelector::Weekend),
        Just(DaySelector::Never),
    ]
}

fn arb_custom() -> impl Strategy<Value = CustomBlock> {
    ("[a-z]{3,8}", arb_selector(), arb_window()).prop_map(|(label, day, window)| CustomBlock {
        label,
        kind: CustomBlockKind::Other,
        day,
        window,
    })
}

prop_compose! {
    fn arb_profile()(
        school in (clock(360, 600), 240u16..480).prop_map(|(s, len)| TimeWindow {
            start: Some(s),
            end: s.checked_add(len),
        }),
        weekday_course in (any::<bool>(), arb_window()),
        saturday_course in (any::<bool>(), arb_window()),
        sunday_course in (any::<bool>(), arb_window()),
        enrichment in (any::<bool>(), arb_days(), arb_window()),
        custom_blocks in proptest::collection::vec(arb_custom(), 0..4),
        morning in (any::<bool>(), arb_days(), clock(300, 480)),
        day_end in clock(1080, 1439),
        study in 10u16..90,
        brk in 0u16..30,
        read in any::<bool>(),
    ) -> StudentProfile {
        StudentProfile {
            school,
            weekday_course: ToggleWindow { enabled: weekday_course.0, window: weekday_course.1 },
            saturday_course: ToggleWindow { enabled: saturday_course.0, window: saturday_course.1 },
            sunday_course: ToggleWindow { enabled: sunday_course.0, window: sunday_course.1 },
            enrichment: RecurringWindow { enabled: enrichment.0, days: enrichment.1, window: enrichment.2 },
            custom_blocks,
            morning_study: MorningStudy { enabled: morning.0, days: morning.1, start: Some(morning.2) },
            day_end: Some(day_end),
            tempo: format!("{study}+{brk}"),
            read_book_before_sleep: read,
            ..Default::default()
        }
    }
}

/// Expected start of filling for `day`, mirroring the documented rule.
fn expected_cursor(profile: &StudentProfile, day: Weekday) -> ClockTime {
    if let Some(start) = profile.morning_study.start_on(day) {
        start
    } else if day.is_weekend() {
        WEEKEND_START
    } else {
        profile.school.span().map(|(_, e)| e).unwrap_or(WEEKEND_START)
    }
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(profile in arb_profile()) {
        prop_assert_eq!(build(&profile), build(&profile));
    }

    #[test]
    fn prop_blocks_sorted_and_non_empty(profile in arb_profile()) {
        for day in build(&profile).days {
            prop_assert!(day.blocks.iter().all(|b| b.start < b.end));
            prop_assert!(day.blocks.windows(2).all(|w| w[0].start <= w[1].start));
        }
    }

    #[test]
    fn prop_tempo_lengths_exact(profile in arb_profile()) {
        let tempo = profile.tempo();
        for day in build(&profile).days {
            for b in &day.blocks {
                match b.kind {
                    BlockKind::Study => prop_assert_eq!(b.duration_minutes(), tempo.study_minutes),
                    BlockKind::Break => prop_assert_eq!(b.duration_minutes(), tempo.break_minutes),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn prop_placeholder_only_on_study(profile in arb_profile()) {
        for day in build(&profile).days {
            for b in &day.blocks {
                prop_assert_eq!(b.kind == BlockKind::Study, b.activity == PLACEHOLDER_ACTIVITY);
            }
        }
    }

    #[test]
    fn prop_filler_never_overlaps_anything(profile in arb_profile()) {
        for day in build(&profile).days {
            for (i, a) in day.blocks.iter().enumerate() {
                if !a.kind.is_filler() {
                    continue;
                }
                for (j, b) in day.blocks.iter().enumerate() {
                    prop_assert!(i == j || !a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_filler_within_day_bounds(profile in arb_profile()) {
        // Filler ends by day end unless a later commitment pulls the sweep
        // on, in which case it ends by that commitment's start.
        let day_end = profile.day_end.unwrap();
        for day in build(&profile).days {
            let cursor = expected_cursor(&profile, day.day);
            let last_fixed_start = day
                .blocks
                .iter()
                .filter(|b| !b.kind.is_filler())
                .map(|b| b.start)
                .max();
            let limit = last_fixed_start.map_or(day_end, |s| s.max(day_end));
            for b in day.blocks.iter().filter(|b| b.kind.is_filler()) {
                prop_assert!(b.start >= cursor && b.end <= limit);
            }
        }
    }

    #[test]
    fn prop_gaps_shorter_than_one_slot(profile in arb_profile()) {
        // Tiling: from the cursor to day end, every uncovered stretch is
        // shorter than the longer of the two tempo lengths.
        let tempo = profile.tempo();
        let slack = tempo.study_minutes.max(tempo.break_minutes);
        let day_end = profile.day_end.unwrap();
        for day in build(&profile).days {
            let mut covered_to = expected_cursor(&profile, day.day);
            for b in &day.blocks {
                if b.start > covered_to && covered_to < day_end {
                    let gap = covered_to.minutes_until(b.start.min(day_end));
                    prop_assert!(gap < slack, "gap of {} min before {:?} on {}", gap, b, day.day);
                }
                covered_to = covered_to.max(b.end);
            }
            if covered_to < day_end {
                prop_assert!(covered_to.minutes_until(day_end) < slack);
            }
        }
    }

    #[test]
    fn prop_fixed_commitments_preserved(profile in arb_profile()) {
        let week = build(&profile);
        for day in &week.days {
            for custom in profile.custom_blocks.iter().filter(|c| c.day.matches(day.day)) {
                if let Some((start, end)) = custom.window.span() {
                    prop_assert!(day.blocks.iter().any(|b| b.start == start
                        && b.end == end
                        && b.activity == custom.label
                        && b.kind == BlockKind::UserActivity));
                }
            }
            if !day.day.is_weekend() {
                let (start, end) = profile.school.span().unwrap();
                prop_assert!(day.blocks.iter().any(|b| b.kind == BlockKind::School
                    && b.start == start && b.end == end && b.activity == SCHOOL_ACTIVITY));
            }
            if profile.enrichment.applies_on(day.day) {
                let (start, end) = profile.enrichment.window.span().unwrap();
                prop_assert!(day.blocks.iter().any(|b| b.kind == BlockKind::Enrichment
                    && b.start == start && b.end == end));
            }
        }
    }
}
