//! Workout streaks and achievement badges
//!
//! Badges are a fixed table of records, each carrying a pure predicate over
//! the profile and the full workout history. Nothing is memoized: the board is
//! re-evaluated from scratch every time it is asked for, so a streak badge
//! locks again once the streak breaks.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{UserProfile, WorkoutSession};

/// Weight lost (kg) needed for the weight-loss badge
pub const WEIGHT_LOSS_BADGE_KG: f64 = 10.0;

/// Lifted volume (kg) a single session needs for the heavy-lifter badge
pub const HEAVY_LIFTER_VOLUME_KG: f64 = 5000.0;

/// Count the current run of consecutive workout days
///
/// Dates are deduplicated. The run must end today or yesterday, otherwise the
/// streak is 0; from the most recent date it counts back one day at a time
/// and stops at the first gap.
pub fn workout_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let Some(&latest) = days.iter().next_back() else {
        return 0;
    };

    let yesterday = today.checked_sub_days(Days::new(1));
    if latest != today && Some(latest) != yesterday {
        return 0;
    }

    let mut streak = 0;
    let mut cursor = Some(latest);
    while let Some(day) = cursor.filter(|day| days.contains(day)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

/// Streak over the UTC calendar dates of the given sessions
pub fn session_streak(workouts: &[WorkoutSession], today: NaiveDate) -> u32 {
    workout_streak(workouts.iter().map(WorkoutSession::day), today)
}

/// Stable badge identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeId {
    FirstWorkout,
    ThreeDayStreak,
    WeightLoss10,
    ThirtyDayStreak,
    Club10,
    HeavyLifter,
}

/// Inputs every badge predicate sees
#[derive(Debug, Clone, Copy)]
pub struct BadgeContext<'a> {
    pub profile: &'a UserProfile,
    pub workouts: &'a [WorkoutSession],
    pub today: NaiveDate,
}

impl BadgeContext<'_> {
    fn streak(&self) -> u32 {
        session_streak(self.workouts, self.today)
    }
}

/// A catalog entry
#[derive(Clone, Copy)]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    predicate: fn(&BadgeContext<'_>) -> bool,
}

impl Badge {
    pub fn is_unlocked(&self, ctx: &BadgeContext<'_>) -> bool {
        (self.predicate)(ctx)
    }
}

impl std::fmt::Debug for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Badge")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

fn has_any_workout(ctx: &BadgeContext<'_>) -> bool {
    !ctx.workouts.is_empty()
}

fn three_day_streak(ctx: &BadgeContext<'_>) -> bool {
    ctx.streak() >= 3
}

fn lost_ten_kg(ctx: &BadgeContext<'_>) -> bool {
    ctx.profile
        .weight_lost_kg()
        .is_some_and(|lost| lost >= WEIGHT_LOSS_BADGE_KG)
}

fn thirty_day_streak(ctx: &BadgeContext<'_>) -> bool {
    ctx.streak() >= 30
}

fn ten_workouts(ctx: &BadgeContext<'_>) -> bool {
    ctx.workouts.len() >= 10
}

fn heavy_session(ctx: &BadgeContext<'_>) -> bool {
    ctx.workouts
        .iter()
        .any(|session| session.volume_kg() >= HEAVY_LIFTER_VOLUME_KG)
}

/// The badge catalog, in display order
pub static BADGES: [Badge; 6] = [
    Badge {
        id: BadgeId::FirstWorkout,
        name: "First Steps",
        description: "Log your first workout",
        predicate: has_any_workout,
    },
    Badge {
        id: BadgeId::ThreeDayStreak,
        name: "On Fire",
        description: "Work out 3 days in a row",
        predicate: three_day_streak,
    },
    Badge {
        id: BadgeId::WeightLoss10,
        name: "Weight Crusher",
        description: "Lose 10 kg from your starting weight",
        predicate: lost_ten_kg,
    },
    Badge {
        id: BadgeId::ThirtyDayStreak,
        name: "Unstoppable",
        description: "Work out 30 days in a row",
        predicate: thirty_day_streak,
    },
    Badge {
        id: BadgeId::Club10,
        name: "Club 10",
        description: "Complete 10 workouts",
        predicate: ten_workouts,
    },
    Badge {
        id: BadgeId::HeavyLifter,
        name: "Heavy Lifter",
        description: "Lift 5,000 kg of total volume in a single session",
        predicate: heavy_session,
    },
];

/// Evaluated badge for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStatus {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

/// Look up a catalog entry
pub fn badge(id: BadgeId) -> &'static Badge {
    BADGES
        .iter()
        .find(|badge| badge.id == id)
        .unwrap_or(&BADGES[0])
}

/// Evaluate every badge, in catalog order
pub fn evaluate_badges(ctx: &BadgeContext<'_>) -> Vec<BadgeStatus> {
    BADGES
        .iter()
        .map(|badge| BadgeStatus {
            id: badge.id,
            name: badge.name.to_string(),
            description: badge.description.to_string(),
            unlocked: badge.is_unlocked(ctx),
        })
        .collect()
}

/// Ids of the currently unlocked badges
pub fn unlocked_badges(ctx: &BadgeContext<'_>) -> Vec<BadgeId> {
    BADGES
        .iter()
        .filter(|badge| badge.is_unlocked(ctx))
        .map(|badge| badge.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::{ActivityLevel, FitnessGoal, Gender};
    use crate::models::{Exercise, WeightEntry};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today() - Days::new(n)
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Alex".to_string(),
            gender: Gender::Female,
            age: 28,
            weight_kg: 70.0,
            height_cm: 168.0,
            goal: FitnessGoal::LoseWeight,
            activity_level: ActivityLevel::LightlyActive,
            weight_history: vec![],
        }
    }

    fn session_on(day: NaiveDate, exercises: Vec<Exercise>) -> WorkoutSession {
        let date = Utc.from_utc_datetime(&day.and_hms_opt(18, 30, 0).unwrap());
        WorkoutSession {
            id: Uuid::new_v4(),
            date,
            name: "Session".to_string(),
            exercises,
            duration_minutes: 30,
            calories_burned: 170,
            goal: None,
            goal_achieved: None,
        }
    }

    // =========================================================================
    // Streak Tests
    // =========================================================================

    #[rstest]
    #[case(vec![0, 1, 2], 3)]
    #[case(vec![0, 3], 1)]
    #[case(vec![3], 0)]
    #[case(vec![], 0)]
    #[case(vec![1, 2, 3, 5], 3)]
    #[case(vec![0, 0, 1, 1], 2)]
    #[case(vec![2, 1, 0], 3)]
    fn test_workout_streak(#[case] offsets: Vec<u64>, #[case] expected: u32) {
        let dates = offsets.into_iter().map(days_ago);
        assert_eq!(workout_streak(dates, today()), expected);
    }

    #[test]
    fn test_streak_counts_days_not_sessions() {
        let workouts = vec![
            session_on(today(), vec![]),
            session_on(today(), vec![]),
            session_on(today(), vec![]),
        ];
        assert_eq!(session_streak(&workouts, today()), 1);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = vec![
            today,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        ];
        assert_eq!(workout_streak(dates, today), 3);
    }

    // =========================================================================
    // Badge Tests
    // =========================================================================

    #[test]
    fn test_no_badges_for_new_user() {
        let p = profile();
        let ctx = BadgeContext { profile: &p, workouts: &[], today: today() };
        assert!(unlocked_badges(&ctx).is_empty());
        assert_eq!(evaluate_badges(&ctx).len(), BADGES.len());
    }

    #[test]
    fn test_first_workout_badge() {
        let p = profile();
        let workouts = vec![session_on(days_ago(40), vec![])];
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert_eq!(unlocked_badges(&ctx), vec![BadgeId::FirstWorkout]);
    }

    #[test]
    fn test_club_10_threshold() {
        let p = profile();
        // Spread out so streak badges stay locked; order should not matter
        let mut workouts: Vec<WorkoutSession> =
            (0..9).map(|i| session_on(days_ago(100 + i * 3), vec![])).collect();
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(!badge(BadgeId::Club10).is_unlocked(&ctx));

        workouts.insert(4, session_on(days_ago(500), vec![]));
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(badge(BadgeId::Club10).is_unlocked(&ctx));

        workouts.reverse();
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(badge(BadgeId::Club10).is_unlocked(&ctx));
    }

    #[test]
    fn test_heavy_lifter_at_exact_volume() {
        let p = profile();
        let workouts = vec![session_on(
            days_ago(10),
            vec![Exercise::new("Squat", 10, 10, 50.0)],
        )];
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(badge(BadgeId::HeavyLifter).is_unlocked(&ctx));
    }

    #[test]
    fn test_heavy_lifter_volume_is_per_session() {
        let p = profile();
        let workouts = vec![
            session_on(days_ago(10), vec![Exercise::new("Squat", 5, 10, 50.0)]),
            session_on(days_ago(12), vec![Exercise::new("Squat", 5, 10, 50.0)]),
        ];
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(!badge(BadgeId::HeavyLifter).is_unlocked(&ctx));
    }

    #[test]
    fn test_weight_loss_badge() {
        let mut p = profile();
        p.weight_history = vec![
            WeightEntry { date: days_ago(60), weight_kg: 80.0 },
            WeightEntry { date: days_ago(1), weight_kg: 70.0 },
        ];
        let ctx = BadgeContext { profile: &p, workouts: &[], today: today() };
        assert!(badge(BadgeId::WeightLoss10).is_unlocked(&ctx));

        p.weight_kg = 70.5;
        let ctx = BadgeContext { profile: &p, workouts: &[], today: today() };
        assert!(!badge(BadgeId::WeightLoss10).is_unlocked(&ctx));
    }

    #[test]
    fn test_weight_loss_badge_without_history() {
        let p = profile();
        let ctx = BadgeContext { profile: &p, workouts: &[], today: today() };
        assert!(!badge(BadgeId::WeightLoss10).is_unlocked(&ctx));
    }

    #[test]
    fn test_streak_badges_relock_when_streak_breaks() {
        let p = profile();
        let workouts: Vec<WorkoutSession> =
            (0..3).map(|i| session_on(days_ago(i), vec![])).collect();

        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(badge(BadgeId::ThreeDayStreak).is_unlocked(&ctx));

        let later = today() + Days::new(3);
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: later };
        assert!(!badge(BadgeId::ThreeDayStreak).is_unlocked(&ctx));
    }

    #[test]
    fn test_thirty_day_streak() {
        let p = profile();
        let workouts: Vec<WorkoutSession> =
            (1..=30).map(|i| session_on(days_ago(i), vec![])).collect();
        let ctx = BadgeContext { profile: &p, workouts: &workouts, today: today() };
        assert!(badge(BadgeId::ThirtyDayStreak).is_unlocked(&ctx));
        assert!(badge(BadgeId::ThreeDayStreak).is_unlocked(&ctx));
    }
}
