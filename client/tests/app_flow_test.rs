//! Integration tests for the application state: onboarding, workouts,
//! meals and the derived dashboard views

mod common;

use chrono::{Days, TimeZone, Utc};
use common::{test_profile, today, TestApp, SALAD_JSON};
use fitcoach_client::ai::WorkoutPlan;
use fitcoach_client::error::{AiError, AnalysisError, LoggingError};
use fitcoach_client::AppError;
use fitcoach_shared::{BadgeId, Exercise, ProfileError};
use rstest::rstest;

#[test]
fn test_views_require_profile() {
    let app = TestApp::new();
    assert!(matches!(app.state.daily_summary(today(), 0), Err(AppError::MissingProfile)));
    assert!(matches!(app.state.calorie_breakdown(), Err(AppError::MissingProfile)));
    assert!(app.state.bmi().is_none());
}

#[test]
fn test_onboarding_validates_and_seeds_history() {
    let mut app = TestApp::new();

    let mut bad = test_profile();
    bad.age = 0;
    assert!(matches!(
        app.state.complete_onboarding(bad, today()),
        Err(AppError::Profile(ProfileError::InvalidField { .. }))
    ));
    assert!(app.state.profile().is_none());

    app.state.complete_onboarding(test_profile(), today()).unwrap();
    let profile = app.state.profile().unwrap();
    assert_eq!(profile.weight_history.len(), 1);
    assert_eq!(profile.starting_weight_kg(), Some(80.0));

    assert_eq!(app.state.calorie_breakdown().unwrap().daily_target, 1636);
    let bmi = app.state.bmi().unwrap();
    assert_eq!(bmi.value, 24.7);
}

#[test]
fn test_record_weight_keeps_history_chronological() {
    let mut app = TestApp::onboarded();
    let next_week = today().checked_add_days(Days::new(7)).unwrap();

    app.state.record_weight(next_week, 78.5).unwrap();
    app.state.record_weight(next_week, 78.0).unwrap();

    let profile = app.state.profile().unwrap();
    assert_eq!(profile.weight_kg, 78.0);
    assert_eq!(profile.weight_history.len(), 3);
    assert_eq!(profile.weight_lost_kg(), Some(2.0));

    let err = app.state.record_weight(today().pred_opt().unwrap(), 79.0).unwrap_err();
    assert!(matches!(err, AppError::Profile(ProfileError::UnorderedHistory { .. })));
    assert_eq!(app.state.profile().unwrap().weight_kg, 78.0);
}

#[test]
fn test_same_day_weigh_in_keeps_starting_weight() {
    let mut app = TestApp::onboarded();
    app.state.record_weight(today(), 82.0).unwrap();

    let profile = app.state.profile().unwrap();
    assert_eq!(profile.weight_kg, 82.0);
    assert_eq!(profile.weight_history.len(), 2);
    assert_eq!(profile.starting_weight_kg(), Some(80.0));
    assert_eq!(profile.weight_lost_kg(), Some(-2.0));
}

#[tokio::test]
async fn test_manual_workout_flow() {
    let mut app = TestApp::onboarded();
    app.state.start_workout().unwrap();

    let tracker = app.state.tracker_mut();
    tracker.rename("Morning Run").unwrap();
    tracker.add_exercise(Exercise::new("Intervals", 6, 1, 0.0)).unwrap();
    tracker.set_goal(Some("Sub 5 min km".to_string())).unwrap();

    let finished_at = Utc.with_ymd_and_hms(2024, 6, 10, 7, 30, 0).unwrap();
    let session = app.state.finish_workout(finished_at).unwrap();
    assert!(!app.state.tracker().is_logging());
    assert_eq!(app.state.store().workouts(), &[session.clone()]);

    assert!(app.state.set_goal_achieved(session.id, true));
    assert_eq!(app.state.store().workouts()[0].goal_achieved, Some(true));
    assert!(!app.state.set_goal_achieved(uuid::Uuid::new_v4(), true));

    assert_eq!(app.state.streak(today()), 1);
    let week = app.state.weekly_activity(today());
    assert_eq!(week.len(), 7);
    assert_eq!(week[6].workouts, 1);
    assert_eq!(week[6].calories_burned, session.calories_burned);

    let badges = app.state.badges(today()).unwrap();
    assert!(badges.iter().any(|b| b.id == BadgeId::FirstWorkout && b.unlocked));
    assert!(badges.iter().any(|b| b.id == BadgeId::Club10 && !b.unlocked));
}

#[tokio::test]
async fn test_rejected_finish_keeps_logging() {
    let mut app = TestApp::onboarded();
    app.state.start_workout().unwrap();

    assert!(matches!(
        app.state.finish_workout(Utc::now()),
        Err(AppError::Logging(LoggingError::MissingName))
    ));
    assert!(app.state.tracker().is_logging());
    assert!(app.state.store().workouts().is_empty());

    app.state.cancel_workout().unwrap();
    assert!(app.state.store().workouts().is_empty());
}

#[tokio::test]
async fn test_generated_workout_uses_plan() {
    let mut app = TestApp::onboarded();
    app.generator.reply(
        r#"{"workoutName": "Leg Day", "strategy": "Heavy compounds",
            "exercises": [{"name": "Back Squat", "sets": 5, "reps": 5, "weightSuggestion": 90},
                          {"name": "Calf Raise", "sets": 3, "reps": 15, "weightSuggestion": 0}]}"#,
    );

    let plan = app.state.start_generated_workout().await.unwrap();
    assert_eq!(plan.workout_name, "Leg Day");

    let active = app.state.tracker().active().unwrap();
    assert_eq!(active.name, "Leg Day");
    assert_eq!(active.exercises.len(), 2);
    assert_eq!(active.exercises[0].weight_kg, 90.0);
}

#[tokio::test]
async fn test_generated_workout_falls_back_and_refuses_while_logging() {
    let mut app = TestApp::onboarded();
    app.generator.fail(AiError::Api {
        status: 503,
        message: "overloaded".to_string(),
    });

    let plan = app.state.start_generated_workout().await.unwrap();
    assert_eq!(plan, WorkoutPlan::fallback());
    assert_eq!(app.state.tracker().active().unwrap().exercises.len(), 3);

    let calls = app.generator.requests().len();
    assert!(matches!(
        app.state.start_generated_workout().await,
        Err(AppError::Logging(LoggingError::AlreadyLogging))
    ));
    assert_eq!(app.generator.requests().len(), calls);
}

#[tokio::test]
async fn test_meal_from_photo_updates_daily_summary() {
    let mut app = TestApp::onboarded();
    app.generator.reply(SALAD_JSON);

    let meal = app
        .state
        .log_meal_from_photo(&[0xFF, 0xD8, 0xFF], "image/jpeg", Some("blob:salad".to_string()))
        .await
        .unwrap();
    assert_eq!(meal.image_ref.as_deref(), Some("blob:salad"));

    let summary = app.state.daily_summary(meal.day(), 4200).unwrap();
    assert_eq!(summary.calories_consumed, 420.0);
    assert_eq!(summary.macros.protein, 35.0);
    assert_eq!(summary.calorie_target, 1636);
    assert_eq!(summary.calories_remaining, 1216.0);
    assert_eq!(summary.step_goal, 10_000);
}

#[rstest]
#[case::service_error(Err(AiError::Malformed("missing field `fat`".to_string())))]
#[case::unparseable_reply(Ok("Looks like a tasty salad!"))]
#[case::negative_macros(Ok(r#"{"name": "Toast", "calories": -80, "protein": 3, "carbs": 14, "fat": 1, "description": "Toast"}"#))]
#[tokio::test]
async fn test_failed_photo_analysis_logs_nothing(#[case] answer: Result<&str, AiError>) {
    let mut app = TestApp::onboarded();
    match answer {
        Ok(text) => app.generator.reply(text),
        Err(err) => app.generator.fail(err),
    }

    let result = app
        .state
        .log_meal_from_photo(&[0xFF, 0xD8, 0xFF], "image/jpeg", Some("blob:toast".to_string()))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Analysis(AnalysisError { cause: AiError::Malformed(_) }))
    ));
    assert!(app.state.store().meals().is_empty());
    assert_eq!(app.state.daily_summary(today(), 0).unwrap().calories_consumed, 0.0);
}

#[test]
fn test_two_step_meal_logging() {
    let mut app = TestApp::onboarded();
    app.generator.reply(SALAD_JSON);

    let analysis = tokio_test::block_on(app.state.analyze_meal(&[1, 2, 3], "image/png")).unwrap();
    assert!(app.state.store().meals().is_empty());

    app.state.accept_meal(&analysis, None, Utc::now());
    assert_eq!(app.state.store().meals().len(), 1);
    assert_eq!(app.state.store().meals()[0].name, "Chicken Salad");
}

#[tokio::test]
async fn test_chat_appends_both_turns() {
    let mut app = TestApp::onboarded();
    app.generator.reply("Start with three full-body sessions a week.");
    app.generator.fail(AiError::EmptyResponse);

    let reply = app.state.send_chat_message("How often should I train?").await.unwrap();
    assert_eq!(reply.unwrap().text, "Start with three full-body sessions a week.");

    let fallback = app.state.send_chat_message("And cardio?").await.unwrap().unwrap();
    assert_eq!(fallback.text, fitcoach_client::ai::coach::FALLBACK_COACH_REPLY);

    let chat = app.state.chat();
    assert_eq!(chat.len(), 4);
    let requests = app.generator.requests();
    assert_eq!(requests[1].history.len(), 2);
}

#[tokio::test]
async fn test_dashboard_insight() {
    let mut app = TestApp::onboarded();
    app.generator.reply("You're 60% of the way to your step goal, keep it up!\n");

    let insight = app.state.dashboard_insight(6000).await.unwrap();
    assert_eq!(insight, "You're 60% of the way to your step goal, keep it up!");

    let insight = app.state.dashboard_insight(6000).await.unwrap();
    assert_eq!(insight, fitcoach_client::ai::coach::FALLBACK_INSIGHT);
}
