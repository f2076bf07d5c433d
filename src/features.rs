use crate::encoding::{Answer, Category, Department, FamilyIncome, Gender, Grade, ParentEducation};
use crate::error::ReportError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 18;

/// Chart labels, in the column order the models were trained against.
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "Department",
    "Attendance",
    "Midterm",
    "Final",
    "Assignments",
    "Quizzes",
    "Participation",
    "Projects",
    "Grade",
    "Study Hours",
    "Extracurricular",
    "Internet",
    "Parent Edu",
    "Income",
    "Stress",
    "Sleep",
];

/// Raw form submission: categorical answers as labels, numbers as entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    pub gender: String,
    pub age: i32,
    pub department: String,
    pub attendance: f64,
    pub midterm: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
    pub assignments: f64,
    pub quizzes: f64,
    pub participation: f64,
    pub projects: f64,
    pub grade: String,
    pub study_hours: f64,
    pub extracurricular: String,
    pub internet: String,
    pub parent_education: String,
    pub family_income: String,
    pub stress: f64,
    pub sleep: f64,
}

/// One student's inputs with every categorical answer resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub gender: Gender,
    pub age: i32,
    pub department: Department,
    pub attendance: f64,
    pub midterm: f64,
    pub final_score: f64,
    pub assignments: f64,
    pub quizzes: f64,
    pub participation: f64,
    pub projects: f64,
    pub grade: Grade,
    pub study_hours: f64,
    pub extracurricular: bool,
    pub internet: bool,
    pub parent_education: ParentEducation,
    pub family_income: FamilyIncome,
    pub stress: f64,
    pub sleep: f64,
}

impl TryFrom<ProfileForm> for StudentProfile {
    type Error = ReportError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        Ok(StudentProfile {
            gender: Gender::from_label(&form.gender)?,
            age: form.age,
            department: Department::from_label(&form.department)?,
            attendance: form.attendance,
            midterm: form.midterm,
            final_score: form.final_score,
            assignments: form.assignments,
            quizzes: form.quizzes,
            participation: form.participation,
            projects: form.projects,
            grade: Grade::from_label(&form.grade)?,
            study_hours: form.study_hours,
            extracurricular: Answer::parse_flag("extracurricular", &form.extracurricular)?,
            internet: Answer::parse_flag("internet access", &form.internet)?,
            parent_education: ParentEducation::from_label(&form.parent_education)?,
            family_income: FamilyIncome::from_label(&form.family_income)?,
            stress: form.stress,
            sleep: form.sleep,
        })
    }
}

/// A numeric input that falls outside the range its form control allows.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl From<RangeViolation> for ReportError {
    fn from(violation: RangeViolation) -> Self {
        ReportError::InputOutOfRange {
            field: violation.field,
            value: violation.value,
            min: violation.min,
            max: violation.max,
        }
    }
}

impl StudentProfile {
    /// Numeric fields outside their control's range, in feature order.
    ///
    /// Values are never clamped; callers decide whether to warn or reject.
    pub fn range_violations(&self) -> Vec<RangeViolation> {
        let checks = [
            ("age", f64::from(self.age), 10.0, 100.0),
            ("attendance", self.attendance, 0.0, 100.0),
            ("midterm", self.midterm, 0.0, 100.0),
            ("final", self.final_score, 0.0, 100.0),
            ("assignments", self.assignments, 0.0, 100.0),
            ("quizzes", self.quizzes, 0.0, 100.0),
            ("participation", self.participation, 0.0, 100.0),
            ("projects", self.projects, 0.0, 100.0),
            ("study_hours", self.study_hours, 0.0, 100.0),
            ("stress", self.stress, 1.0, 10.0),
            ("sleep", self.sleep, 0.0, 24.0),
        ];

        checks
            .into_iter()
            .filter(|&(_, value, min, max)| !(min..=max).contains(&value))
            .map(|(field, value, min, max)| RangeViolation {
                field,
                value,
                min,
                max,
            })
            .collect()
    }
}

/// Model input: 18 numbers in training order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn assemble(profile: &StudentProfile) -> Self {
        FeatureVector([
            f64::from(profile.gender.code()),
            f64::from(profile.age),
            f64::from(profile.department.code()),
            profile.attendance,
            profile.midterm,
            profile.final_score,
            profile.assignments,
            profile.quizzes,
            profile.participation,
            profile.projects,
            f64::from(profile.grade.code()),
            profile.study_hours,
            f64::from(Answer::from(profile.extracurricular).code()),
            f64::from(Answer::from(profile.internet).code()),
            f64::from(profile.parent_education.code()),
            f64::from(profile.family_income.code()),
            profile.stress,
            profile.sleep,
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Single-row matrix, the shape the models predict over.
    pub fn to_row(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, column)| self.0[column])
    }

    pub fn chart(&self) -> ChartData {
        ChartData {
            labels: FEATURE_LABELS.to_vec(),
            values: self.0.to_vec(),
        }
    }

    /// Writes `feature,value` rows for download.
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["feature", "value"])?;
        for (label, value) in FEATURE_LABELS.iter().zip(self.0.iter()) {
            writer.write_record([label.to_string(), value.to_string()])?;
        }
        writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }
}

/// Bar chart of the submitted inputs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<&'static str>,
    pub values: Vec<f64>,
}
