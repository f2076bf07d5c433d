use crate::features::StudentProfile;
use crate::rating::PerformanceRating;

pub const IMPROVE_PARTICIPATION: &str = "Improve participation in class activities.";
pub const INCREASE_STUDY_HOURS: &str = "Increase study hours to enhance learning outcomes.";
pub const IMPROVE_ATTENDANCE: &str = "Try to improve attendance to avoid missing critical content.";
pub const MANAGE_STRESS: &str = "Consider stress management strategies to improve focus.";
pub const SLEEP_MORE: &str = "Aim for at least 6-8 hours of sleep per night for optimal performance.";
pub const JOIN_EXTRACURRICULAR: &str = "Engage in extracurricular activities to develop holistic skills.";
pub const KEEP_IT_UP: &str = "Maintain your excellent habits!";

/// The profile fields the advice rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HabitSnapshot {
    pub attendance: f64,
    pub extracurricular: bool,
    pub stress: f64,
    pub sleep: f64,
}

impl From<&StudentProfile> for HabitSnapshot {
    fn from(profile: &StudentProfile) -> Self {
        HabitSnapshot {
            attendance: profile.attendance,
            extracurricular: profile.extracurricular,
            stress: profile.stress,
            sleep: profile.sleep,
        }
    }
}

/// Suggestions in display order. Never empty.
pub fn advise(rating: PerformanceRating, habits: &HabitSnapshot) -> Vec<String> {
    let mut advice = Vec::new();

    if rating.value() < 3 {
        advice.push(IMPROVE_PARTICIPATION);
        advice.push(INCREASE_STUDY_HOURS);
    }
    if habits.attendance < 75.0 {
        advice.push(IMPROVE_ATTENDANCE);
    }
    if habits.stress > 7.0 {
        advice.push(MANAGE_STRESS);
    }
    if habits.sleep < 6.0 {
        advice.push(SLEEP_MORE);
    }
    if !habits.extracurricular {
        advice.push(JOIN_EXTRACURRICULAR);
    }

    if advice.is_empty() {
        advice.push(KEEP_IT_UP);
    }

    advice.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habits(attendance: f64, extracurricular: bool, stress: f64, sleep: f64) -> HabitSnapshot {
        HabitSnapshot {
            attendance,
            extracurricular,
            stress,
            sleep,
        }
    }

    #[test]
    fn struggling_student_gets_every_suggestion_in_order() {
        let advice = advise(
            PerformanceRating::from_score(45.0),
            &habits(60.0, false, 8.0, 5.0),
        );
        assert_eq!(
            advice,
            vec![
                IMPROVE_PARTICIPATION,
                INCREASE_STUDY_HOURS,
                IMPROVE_ATTENDANCE,
                MANAGE_STRESS,
                SLEEP_MORE,
                JOIN_EXTRACURRICULAR,
            ]
        );
    }

    #[test]
    fn healthy_habits_get_the_default_message() {
        let advice = advise(PerformanceRating::from_score(92.0), &habits(90.0, true, 3.0, 8.0));
        assert_eq!(advice, vec![KEEP_IT_UP]);
    }

    #[test]
    fn thresholds_are_strict() {
        let advice = advise(PerformanceRating::from_score(55.0), &habits(75.0, true, 7.0, 6.0));
        assert_eq!(advice, vec![KEEP_IT_UP]);
    }

    #[test]
    fn rules_fire_independently() {
        let advice = advise(PerformanceRating::from_score(88.0), &habits(90.0, true, 9.5, 8.0));
        assert_eq!(advice, vec![MANAGE_STRESS]);

        let advice = advise(PerformanceRating::from_score(20.0), &habits(90.0, true, 2.0, 8.0));
        assert_eq!(advice, vec![IMPROVE_PARTICIPATION, INCREASE_STUDY_HOURS]);
    }
}
