//! Synthetic school dataset
//!
//! Structure is fixed, content is random: every generation yields the same
//! record counts and relationship cardinalities, while names, birth dates
//! and mark percentages differ from run to run.

use super::names::{
    FET_PHASE_SUBJECTS, FIRST_NAMES_FEMALE, FIRST_NAMES_MALE, PROVINCES, SCHOOLS,
    SENIOR_PHASE_SUBJECTS, STAFF_ROLES, SURNAMES,
};
use chrono::{Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Grades offered by every mock school
pub const GRADES: std::ops::RangeInclusive<u8> = 8..=12;

/// Learners enrolled per grade per school
pub const LEARNERS_PER_GRADE: u32 = 12;

/// Terms in an academic year
pub const TERMS: std::ops::RangeInclusive<u8> = 1..=4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub school_id: u32,
    pub name: String,
    pub emis_number: String,
    pub province: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub learner_id: u64,
    pub school_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub grade: u8,
    pub gender: String,
    pub date_of_birth: String,
    pub admission_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub staff_id: u64,
    pub school_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub email: String,
}

/// One parent per learner link; siblings do not share parent records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub parent_id: u64,
    pub school_id: u32,
    pub learner_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub cellphone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub learner_id: u64,
    pub subject_code: String,
    pub subject: String,
    pub term: u8,
    pub year: i32,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
    pub id: String,
    pub name: String,
}

/// Record and relationship counts, for structural comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub schools: usize,
    pub learners: usize,
    pub staff: usize,
    pub parents: usize,
    pub marks: usize,
    /// Learners with exactly two parent records
    pub two_parent_learners: usize,
}

/// The full in-memory corpus
#[derive(Debug, Clone)]
pub struct MockDataset {
    pub year: i32,
    pub schools: Vec<School>,
    pub learners: Vec<Learner>,
    pub staff: Vec<StaffMember>,
    pub parents: Vec<Parent>,
    pub marks: Vec<Mark>,
}

/// Subjects taken in a grade: (code, name)
pub fn subjects_for_grade(grade: u8) -> &'static [(&'static str, &'static str)] {
    if grade <= 9 {
        SENIOR_PHASE_SUBJECTS
    } else {
        FET_PHASE_SUBJECTS
    }
}

/// Parent records for the learner at 1-based position `n` in its school
pub fn parents_for_position(n: u32) -> usize {
    if n % 3 == 0 {
        1
    } else {
        2
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

fn cellphone<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = ["072", "073", "082", "083", "084"][rng.random_range(0..5)];
    format!("{} {:03} {:04}", prefix, rng.random_range(0..1000), rng.random_range(0..10000))
}

impl MockDataset {
    /// Generate for the current academic year with thread-local randomness
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng(), Utc::now().year())
    }

    /// Generate with an explicit RNG and year
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, year: i32) -> Self {
        let mut dataset = Self {
            year,
            schools: Vec::new(),
            learners: Vec::new(),
            staff: Vec::new(),
            parents: Vec::new(),
            marks: Vec::new(),
        };

        for (i, &(school_id, name)) in SCHOOLS.iter().enumerate() {
            dataset.schools.push(School {
                school_id,
                name: name.to_string(),
                emis_number: format!("7{:08}", u64::from(school_id) * 37 + i as u64),
                province: PROVINCES[i % PROVINCES.len()].to_string(),
            });
            dataset.generate_staff(rng, school_id);
            dataset.generate_learners(rng, school_id);
        }

        dataset
    }

    fn generate_staff<R: Rng + ?Sized>(&mut self, rng: &mut R, school_id: u32) {
        for (n, role) in STAFF_ROLES.iter().enumerate() {
            let pool = if rng.random_bool(0.5) {
                FIRST_NAMES_FEMALE
            } else {
                FIRST_NAMES_MALE
            };
            let first_name = pick(rng, pool);
            let last_name = pick(rng, SURNAMES);
            self.staff.push(StaffMember {
                staff_id: u64::from(school_id) * 100 + n as u64 + 1,
                school_id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                role: role.to_string(),
                email: format!(
                    "{}.{}@school{}.example.org",
                    first_name.to_lowercase(),
                    last_name.to_lowercase().replace(' ', ""),
                    school_id
                ),
            });
        }
    }

    fn generate_learners<R: Rng + ?Sized>(&mut self, rng: &mut R, school_id: u32) {
        let mut n: u32 = 0;
        for grade in GRADES {
            for _ in 0..LEARNERS_PER_GRADE {
                n += 1;
                let learner_id = u64::from(school_id) * 1000 + u64::from(n);
                let female = rng.random_bool(0.5);
                let first_name = pick(
                    rng,
                    if female {
                        FIRST_NAMES_FEMALE
                    } else {
                        FIRST_NAMES_MALE
                    },
                );
                let last_name = pick(rng, SURNAMES);
                let birth_year = self.year - 6 - i32::from(grade);

                self.learners.push(Learner {
                    learner_id,
                    school_id,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    grade,
                    gender: if female { "F" } else { "M" }.to_string(),
                    date_of_birth: format!(
                        "{}-{:02}-{:02}",
                        birth_year,
                        rng.random_range(1..=12),
                        rng.random_range(1..=28)
                    ),
                    admission_number: format!("{}/{:04}", school_id, n),
                });

                self.generate_parents(rng, school_id, learner_id, last_name, n);
                self.generate_marks(rng, learner_id, grade);
            }
        }
    }

    fn generate_parents<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        school_id: u32,
        learner_id: u64,
        last_name: &str,
        position: u32,
    ) {
        let count = parents_for_position(position);
        for k in 0..count {
            let (relationship, pool) = match (count, k) {
                (2, 0) => ("Mother", FIRST_NAMES_FEMALE),
                (2, _) => ("Father", FIRST_NAMES_MALE),
                _ if rng.random_bool(0.7) => ("Mother", FIRST_NAMES_FEMALE),
                _ => ("Guardian", FIRST_NAMES_MALE),
            };
            self.parents.push(Parent {
                parent_id: learner_id * 10 + k as u64 + 1,
                school_id,
                learner_id,
                first_name: pick(rng, pool).to_string(),
                last_name: last_name.to_string(),
                relationship: relationship.to_string(),
                cellphone: cellphone(rng),
            });
        }
    }

    fn generate_marks<R: Rng + ?Sized>(&mut self, rng: &mut R, learner_id: u64, grade: u8) {
        for &(code, subject) in subjects_for_grade(grade) {
            for term in TERMS {
                self.marks.push(Mark {
                    learner_id,
                    subject_code: code.to_string(),
                    subject: subject.to_string(),
                    term,
                    year: self.year,
                    percentage: rng.random_range(30..=100),
                });
            }
        }
    }

    pub fn summary(&self) -> DatasetSummary {
        let two_parent_learners = self
            .learners
            .iter()
            .filter(|l| {
                self.parents
                    .iter()
                    .filter(|p| p.learner_id == l.learner_id)
                    .count()
                    == 2
            })
            .count();

        DatasetSummary {
            schools: self.schools.len(),
            learners: self.learners.len(),
            staff: self.staff.len(),
            parents: self.parents.len(),
            marks: self.marks.len(),
            two_parent_learners,
        }
    }
}
