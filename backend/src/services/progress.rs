//! Weekly progress summaries over study records.
//!
//! Weeks run Monday through Sunday. The summary always carries seven daily
//! entries so charts can plot empty days as zero.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::{StudyRecord, UserId, Weekday};
use crate::db::repository::{RecordRepository, RepositoryResult};

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub day: Weekday,
    pub minutes: u32,
    pub questions_solved: u32,
    pub correct_answers: u32,
}

/// Totals for one subject over the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectTotals {
    pub subject: String,
    pub minutes: u32,
    pub questions_solved: u32,
    pub correct_answers: u32,
    /// `correct / solved`, absent when no questions were solved.
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_minutes: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub days: Vec<DailyTotals>,
    /// Sorted by minutes, most studied first.
    pub subjects: Vec<SubjectTotals>,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Summarize the records that fall in the week starting at `week_start`.
/// Records outside that week are ignored.
pub fn summarize_week(records: &[StudyRecord], week_start: NaiveDate) -> WeeklySummary {
    let week_end = week_start + Duration::days(6);

    let mut days: Vec<DailyTotals> = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            DailyTotals {
                date,
                day: date.weekday().into(),
                minutes: 0,
                questions_solved: 0,
                correct_answers: 0,
            }
        })
        .collect();
    let mut subjects: BTreeMap<String, (u32, u32, u32)> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|r| r.date >= week_start && r.date <= week_end)
    {
        let index = (record.date - week_start).num_days() as usize;
        let day = &mut days[index];
        day.minutes += record.minutes;
        day.questions_solved += record.questions_solved;
        day.correct_answers += record.correct_answers;

        let entry = subjects
            .entry(record.subject.trim().to_string())
            .or_default();
        entry.0 += record.minutes;
        entry.1 += record.questions_solved;
        entry.2 += record.correct_answers;
    }

    let mut subjects: Vec<SubjectTotals> = subjects
        .into_iter()
        .map(|(subject, (minutes, solved, correct))| SubjectTotals {
            subject,
            minutes,
            questions_solved: solved,
            correct_answers: correct,
            accuracy: (solved > 0).then(|| f64::from(correct) / f64::from(solved)),
        })
        .collect();
    // Stable sort keeps subjects with equal minutes in name order.
    subjects.sort_by(|a, b| b.minutes.cmp(&a.minutes));

    WeeklySummary {
        week_start,
        week_end,
        total_minutes: days.iter().map(|d| d.minutes).sum(),
        total_questions: days.iter().map(|d| d.questions_solved).sum(),
        total_correct: days.iter().map(|d| d.correct_answers).sum(),
        days,
        subjects,
    }
}

/// Load `user_id`'s records for the week containing `date` and summarize them.
pub async fn weekly_summary<R>(
    repo: &R,
    user_id: UserId,
    date: NaiveDate,
) -> RepositoryResult<WeeklySummary>
where
    R: RecordRepository + ?Sized,
{
    let start = week_start(date);
    let records = repo
        .list_study_records(user_id, Some(start), Some(start + Duration::days(6)))
        .await?;
    Ok(summarize_week(&records, start))
}
