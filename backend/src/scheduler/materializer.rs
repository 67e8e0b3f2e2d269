use serde::{Deserialize, Serialize};

use crate::models::{weekday_index, DateRange, ScheduleRule, SessionRecord};

/// How rules sharing a weekday are expanded on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Only the first rule (in input order) matching the weekday is emitted.
    #[default]
    FirstMatch,
    /// Every matching rule is emitted, in input order.
    EveryMatch,
}

/// Expand `rules` over `range`, taking the first matching rule per date.
///
/// Returns records in ascending date order. An empty rule set or an inverted
/// range yields an empty vector; dates without a matching rule are skipped.
pub fn materialize(rules: &[ScheduleRule], range: &DateRange) -> Vec<SessionRecord> {
    materialize_with(rules, range, MatchPolicy::FirstMatch)
}

/// Expand `rules` over `range` using an explicit [`MatchPolicy`].
pub fn materialize_with(
    rules: &[ScheduleRule],
    range: &DateRange,
    policy: MatchPolicy,
) -> Vec<SessionRecord> {
    if rules.is_empty() || range.is_empty() {
        return Vec::new();
    }

    let mut records = Vec::new();
    for date in range.days() {
        let weekday = weekday_index(date);
        let mut matching = rules.iter().filter(|rule| rule.matches(weekday));
        match policy {
            MatchPolicy::FirstMatch => {
                if let Some(rule) = matching.next() {
                    records.push(SessionRecord::from_rule(date, rule));
                }
            }
            MatchPolicy::EveryMatch => {
                records.extend(matching.map(|rule| SessionRecord::from_rule(date, rule)));
            }
        }
    }
    records
}
