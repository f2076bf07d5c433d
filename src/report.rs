use crate::advice::{advise, HabitSnapshot};
use crate::error::ReportError;
use crate::features::{ChartData, FeatureVector, ProfileForm, StudentProfile};
use crate::model::{ModelKind, ModelRegistry};
use crate::rating::PerformanceRating;
use serde::{Deserialize, Serialize};

/// What to do with numeric inputs outside their control's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Log a warning and score the value unchanged.
    #[default]
    PassThrough,
    /// Refuse the submission with `InputOutOfRange`.
    Reject,
}

/// Form submission: the model selector plus every profile field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub model: String,
    #[serde(flatten)]
    pub profile: ProfileForm,
}

/// A profile that passed category resolution and range policy.
#[derive(Debug, Clone)]
pub struct Submission {
    pub model: ModelKind,
    pub profile: StudentProfile,
    pub features: FeatureVector,
}

impl Submission {
    pub fn prepare(request: ReportRequest, policy: RangePolicy) -> Result<Self, ReportError> {
        let model: ModelKind = request.model.parse()?;
        let profile = StudentProfile::try_from(request.profile)?;

        for violation in profile.range_violations() {
            match policy {
                RangePolicy::PassThrough => tracing::warn!(
                    field = violation.field,
                    value = violation.value,
                    min = violation.min,
                    max = violation.max,
                    "input outside form range, scoring unchanged"
                ),
                RangePolicy::Reject => return Err(violation.into()),
            }
        }

        let features = FeatureVector::assemble(&profile);
        Ok(Submission {
            model,
            profile,
            features,
        })
    }
}

/// Everything the results panel shows for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub model: ModelKind,
    pub score: f64,
    pub rating: PerformanceRating,
    pub stars: String,
    pub advice: Vec<String>,
    pub chart: ChartData,
}

/// Runs predict, classify and advise for a prepared submission.
pub fn build_report(
    registry: &ModelRegistry,
    submission: &Submission,
) -> Result<PerformanceReport, ReportError> {
    let score = registry.predict(submission.model, &submission.features)?;
    let rating = PerformanceRating::from_score(score);
    let advice = advise(rating, &HabitSnapshot::from(&submission.profile));

    tracing::info!(
        model = %submission.model,
        score,
        rating = rating.value(),
        suggestions = advice.len(),
        "performance report generated"
    );

    Ok(PerformanceReport {
        model: submission.model,
        score,
        rating,
        stars: rating.stars(),
        advice,
        chart: submission.features.chart(),
    })
}
