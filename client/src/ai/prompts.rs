//! Prompt and context construction

use fitcoach_shared::{UserProfile, WorkoutSession};

/// Workouts summarized in the coaching context
pub const COACH_CONTEXT_WORKOUTS: usize = 5;

/// Workouts summarized in the plan request
pub const PLAN_CONTEXT_WORKOUTS: usize = 3;

pub const FOOD_ANALYSIS_PROMPT: &str = "Identify the food in this photo and estimate its \
nutritional content for the portion shown. Give a short name, total calories (kcal), protein, \
carbs and fat in grams, and a one-sentence description. Respond only with JSON.";

const COACH_PERSONA: &str = "You are FitCoach, an upbeat and knowledgeable personal trainer \
and nutrition coach. Keep answers short, practical and encouraging. Use the user's profile and \
recent workouts below to personalise your advice. Do not give medical diagnoses.";

/// User profile lines shared by every prompt
fn profile_block(profile: &UserProfile) -> String {
    format!(
        "Name: {}\nAge: {}\nGender: {}\nHeight: {} cm\nWeight: {} kg\nGoal: {}\nActivity level: {}",
        profile.name,
        profile.age,
        profile.gender,
        profile.height_cm,
        profile.weight_kg,
        profile.goal.label(),
        profile.activity_level.label(),
    )
}

/// Coaching context block with the most recent workouts
///
/// `workouts` is newest first, as held by the session store.
pub fn coaching_context(profile: &UserProfile, workouts: &[WorkoutSession]) -> String {
    let mut context = format!("{}\n\nUser profile:\n{}\n\nRecent workouts:\n", COACH_PERSONA, profile_block(profile));

    if workouts.is_empty() {
        context.push_str("- none logged yet\n");
    }
    for workout in workouts.iter().take(COACH_CONTEXT_WORKOUTS) {
        context.push_str(&format!(
            "- {}: {} ({} exercises, {} min, {} kcal)\n",
            workout.day(),
            workout.name,
            workout.exercises.len(),
            workout.duration_minutes,
            workout.calories_burned,
        ));
    }
    context
}

/// One-sentence dashboard insight request
pub fn dashboard_insight_prompt(
    profile: &UserProfile,
    calories_burned: u32,
    calories_consumed: f64,
    steps: u32,
) -> String {
    format!(
        "{}\n\nToday so far: {} kcal burned, {} kcal consumed, {} steps.\n\
         Write exactly one short, motivating sentence for this user's dashboard. \
         No greeting, no emoji.",
        profile_block(profile),
        calories_burned,
        calories_consumed.round(),
        steps,
    )
}

/// Workout plan request with up to three recent sessions
pub fn workout_plan_prompt(profile: &UserProfile, workouts: &[WorkoutSession]) -> String {
    let mut prompt = format!(
        "Design the next workout session for this user.\n\n{}\n\nRecent workouts:\n",
        profile_block(profile)
    );

    if workouts.is_empty() {
        prompt.push_str("- none logged yet\n");
    }
    for workout in workouts.iter().take(PLAN_CONTEXT_WORKOUTS) {
        prompt.push_str(&format!(
            "- {}: {} ({} exercises)\n",
            workout.day(),
            workout.name,
            workout.exercises.len()
        ));
    }

    prompt.push_str(
        "\nBalance the plan against the recent sessions. Give the workout a name, a short \
         strategy, and a list of exercises with sets, reps and a suggested weight in kg \
         (0 for bodyweight).",
    );
    prompt
}
