//! Property tests for the session materializer.

use chrono::{Days, NaiveDate};
use coachtrack::models::{weekday_index, DateRange, ScheduleRule, SessionStatus, WallClockTime};
use coachtrack::scheduler::{materialize, materialize_with, MatchPolicy};
use proptest::prelude::*;

fn rule_strategy() -> impl Strategy<Value = ScheduleRule> {
    (-2i32..9, 0u32..23, 0u32..60, 0usize..3).prop_map(|(day, hour, minute, kind)| {
        ScheduleRule {
            day_of_week: day,
            start_time: WallClockTime::from_hm(hour, minute).unwrap(),
            end_time: WallClockTime::from_hm(hour + 1, minute).unwrap(),
            session_type: ["practice", "match", "recovery"][kind].to_string(),
        }
    })
}

fn range_strategy() -> impl Strategy<Value = DateRange> {
    (0u64..3650, 0u32..120).prop_map(|(offset, days)| {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset);
        DateRange::starting_at(start, days)
    })
}

fn matching<'a>(rules: &'a [ScheduleRule], date: NaiveDate) -> Vec<&'a ScheduleRule> {
    rules
        .iter()
        .filter(|r| r.day_of_week >= 0 && r.day_of_week as u32 == weekday_index(date))
        .collect()
}

proptest! {
    #[test]
    fn prop_records_fall_inside_range_in_order(
        rules in prop::collection::vec(rule_strategy(), 0..8),
        range in range_strategy(),
    ) {
        let records = materialize(&rules, &range);
        for pair in records.windows(2) {
            prop_assert!(pair[0].scheduled_date <= pair[1].scheduled_date);
        }
        for record in &records {
            prop_assert!(range.contains(record.scheduled_date));
            prop_assert_eq!(record.status, SessionStatus::Scheduled);
        }
    }

    #[test]
    fn prop_first_match_emits_first_rule_of_weekday(
        rules in prop::collection::vec(rule_strategy(), 0..8),
        range in range_strategy(),
    ) {
        let records = materialize(&rules, &range);
        let mut expected = Vec::new();
        for date in range.days() {
            if let Some(rule) = matching(&rules, date).first() {
                expected.push((date, rule.start_time, rule.session_type.clone()));
            }
        }
        let actual: Vec<_> = records
            .iter()
            .map(|r| (r.scheduled_date, r.start_time, r.session_type.clone()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_every_match_counts_all_rules(
        rules in prop::collection::vec(rule_strategy(), 0..8),
        range in range_strategy(),
    ) {
        let records = materialize_with(&rules, &range, MatchPolicy::EveryMatch);
        let expected: usize = range.days().map(|d| matching(&rules, d).len()).sum();
        prop_assert_eq!(records.len(), expected);

        let first = materialize_with(&rules, &range, MatchPolicy::FirstMatch);
        prop_assert!(first.len() <= records.len());
    }

    #[test]
    fn prop_inverted_range_is_empty(
        rules in prop::collection::vec(rule_strategy(), 0..8),
        offset in 0u64..3650,
        back in 1u64..30,
    ) {
        let end = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(offset);
        let start = end + Days::new(back);
        prop_assert!(materialize(&rules, &DateRange::new(start, end)).is_empty());
    }

    #[test]
    fn prop_out_of_range_weekdays_never_match(
        day in prop_oneof![-100i32..0, 7i32..100],
        range in range_strategy(),
    ) {
        let rules = vec![ScheduleRule {
            day_of_week: day,
            start_time: WallClockTime::from_hm(6, 0).unwrap(),
            end_time: WallClockTime::from_hm(7, 0).unwrap(),
            session_type: "practice".to_string(),
        }];
        prop_assert!(materialize_with(&rules, &range, MatchPolicy::EveryMatch).is_empty());
    }
}

#[test]
fn test_full_week_covers_each_weekday_once() {
    let rules: Vec<ScheduleRule> = (0..7)
        .map(|day| ScheduleRule {
            day_of_week: day,
            start_time: WallClockTime::from_hm(7, 0).unwrap(),
            end_time: WallClockTime::from_hm(8, 0).unwrap(),
            session_type: format!("day-{}", day),
        })
        .collect();
    // 2024-03-03 is a Sunday
    let range = DateRange::parse("2024-03-03", "2024-03-09").unwrap();

    let records = materialize(&rules, &range);
    assert_eq!(records.len(), 7);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.session_type, format!("day-{}", i));
        assert_eq!(weekday_index(record.scheduled_date), i as u32);
    }
}
