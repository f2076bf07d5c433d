use crate::error::ReportError;
use serde::Serialize;

/// A closed set of form labels with fixed integer codes.
///
/// `code` is spelled out per variant; `ALL` lists the variants in code
/// order and drives label lookup. The models were trained against exactly
/// these codes.
pub trait Category: Sized + Copy + PartialEq + 'static {
    /// Form field the labels belong to, used in error messages.
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn code(self) -> u8;

    fn from_label(label: &str) -> Result<Self, ReportError> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.label() == label)
            .ok_or_else(|| ReportError::CategoryUnrecognized {
                field: Self::FIELD,
                label: label.to_string(),
            })
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|value| value.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Category for Gender {
    const FIELD: &'static str = "gender";
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];

    fn code(self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    Mathematics,
    Engineering,
    Business,
    ComputerScience,
    Biology,
}

impl Category for Department {
    const FIELD: &'static str = "department";
    const ALL: &'static [Self] = &[
        Department::Mathematics,
        Department::Engineering,
        Department::Business,
        Department::ComputerScience,
        Department::Biology,
    ];

    fn code(self) -> u8 {
        match self {
            Department::Mathematics => 0,
            Department::Engineering => 1,
            Department::Business => 2,
            Department::ComputerScience => 3,
            Department::Biology => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Department::Mathematics => "Mathematics",
            Department::Engineering => "Engineering",
            Department::Business => "Business",
            Department::ComputerScience => "CS",
            Department::Biology => "Biology",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Category for Grade {
    const FIELD: &'static str = "grade";
    const ALL: &'static [Self] = &[Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    fn code(self) -> u8 {
        match self {
            Grade::A => 0,
            Grade::B => 1,
            Grade::C => 2,
            Grade::D => 3,
            Grade::F => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Yes/No radio answer, shared by the extracurricular and internet flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    No,
    Yes,
}

impl Category for Answer {
    const FIELD: &'static str = "yes/no flag";
    const ALL: &'static [Self] = &[Answer::No, Answer::Yes];

    fn code(self) -> u8 {
        match self {
            Answer::No => 0,
            Answer::Yes => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Answer::No => "No",
            Answer::Yes => "Yes",
        }
    }
}

impl Answer {
    /// Parses a Yes/No answer, reporting `field` on failure.
    pub fn parse_flag(field: &'static str, label: &str) -> Result<bool, ReportError> {
        Answer::from_label(label)
            .map(|answer| answer == Answer::Yes)
            .map_err(|_| ReportError::CategoryUnrecognized {
                field,
                label: label.to_string(),
            })
    }
}

impl From<bool> for Answer {
    fn from(flag: bool) -> Self {
        if flag {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentEducation {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
    Other,
}

impl Category for ParentEducation {
    const FIELD: &'static str = "parent education";
    const ALL: &'static [Self] = &[
        ParentEducation::HighSchool,
        ParentEducation::Bachelors,
        ParentEducation::Masters,
        ParentEducation::Phd,
        ParentEducation::Other,
    ];

    fn code(self) -> u8 {
        match self {
            ParentEducation::HighSchool => 0,
            ParentEducation::Bachelors => 1,
            ParentEducation::Masters => 2,
            ParentEducation::Phd => 3,
            ParentEducation::Other => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ParentEducation::HighSchool => "High School",
            ParentEducation::Bachelors => "Bachelor's",
            ParentEducation::Masters => "Master's",
            ParentEducation::Phd => "PhD",
            ParentEducation::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyIncome {
    Low,
    Medium,
    High,
}

impl Category for FamilyIncome {
    const FIELD: &'static str = "family income";
    const ALL: &'static [Self] = &[FamilyIncome::Low, FamilyIncome::Medium, FamilyIncome::High];

    fn code(self) -> u8 {
        match self {
            FamilyIncome::Low => 0,
            FamilyIncome::Medium => 1,
            FamilyIncome::High => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FamilyIncome::Low => "Low",
            FamilyIncome::Medium => "Medium",
            FamilyIncome::High => "High",
        }
    }
}

/// Label sets for every categorical control, in code order.
#[derive(Debug, Clone, Serialize)]
pub struct EncodingTables {
    pub gender: Vec<&'static str>,
    pub department: Vec<&'static str>,
    pub grade: Vec<&'static str>,
    pub yes_no: Vec<&'static str>,
    pub parent_education: Vec<&'static str>,
    pub family_income: Vec<&'static str>,
}

impl EncodingTables {
    pub fn new() -> Self {
        Self {
            gender: Gender::labels(),
            department: Department::labels(),
            grade: Grade::labels(),
            yes_no: Answer::labels(),
            parent_education: ParentEducation::labels(),
            family_income: FamilyIncome::labels(),
        }
    }
}

impl Default for EncodingTables {
    fn default() -> Self {
        Self::new()
    }
}
