//! Filtered views over the mock dataset
//!
//! Every operation is a pure projection: no IO, no panics, and unknown ids
//! or lookup types simply produce empty collections.

use super::dataset::{
    subjects_for_grade, Learner, LookupItem, Mark, MockDataset, Parent, School, StaffMember,
    GRADES,
};
use super::names::{LANGUAGES, RACES, RELATIONSHIPS};
use crate::error::BridgeResult;
use crate::resolver::{MarkFilter, Page, ResourceRequest};
use serde_json::Value;
use std::collections::BTreeMap;

/// Read-only access to a generated dataset
#[derive(Debug, Clone)]
pub struct MockDataProvider {
    dataset: MockDataset,
}

impl MockDataProvider {
    /// Generate a fresh dataset
    pub fn new() -> Self {
        Self::from_dataset(MockDataset::generate())
    }

    pub fn from_dataset(dataset: MockDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &MockDataset {
        &self.dataset
    }

    pub fn get_schools(&self) -> Vec<School> {
        self.dataset.schools.clone()
    }

    pub fn get_learners(&self, school_id: u32, page: Page) -> Vec<Learner> {
        self.dataset
            .learners
            .iter()
            .filter(|l| l.school_id == school_id)
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    pub fn get_staff(&self, school_id: u32) -> Vec<StaffMember> {
        self.dataset
            .staff
            .iter()
            .filter(|s| s.school_id == school_id)
            .cloned()
            .collect()
    }

    pub fn get_parents(&self, school_id: u32) -> Vec<Parent> {
        self.dataset
            .parents
            .iter()
            .filter(|p| p.school_id == school_id)
            .cloned()
            .collect()
    }

    pub fn get_marks(&self, learner_id: u64, filter: MarkFilter) -> Vec<Mark> {
        self.dataset
            .marks
            .iter()
            .filter(|m| m.learner_id == learner_id)
            .filter(|m| filter.term.is_none_or(|t| m.term == t))
            .filter(|m| filter.year.is_none_or(|y| m.year == y))
            .cloned()
            .collect()
    }

    pub fn get_lookup(&self, lookup_type: &str) -> Vec<LookupItem> {
        match lookup_type.trim().to_ascii_lowercase().as_str() {
            "genders" => pairs(&[("M", "Male"), ("F", "Female")]),
            "grades" => GRADES
                .map(|g| LookupItem {
                    id: g.to_string(),
                    name: format!("Grade {}", g),
                })
                .collect(),
            "races" => pairs(RACES),
            "languages" => pairs(LANGUAGES),
            "relationships" => pairs(RELATIONSHIPS),
            "subjects" => {
                let mut subjects = BTreeMap::new();
                for grade in GRADES {
                    for &(code, name) in subjects_for_grade(grade) {
                        subjects.insert(code, name);
                    }
                }
                subjects
                    .into_iter()
                    .map(|(id, name)| LookupItem {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Project the dataset for a resolver request
    pub fn resolve(&self, request: &ResourceRequest) -> BridgeResult<Value> {
        let value = match request {
            ResourceRequest::Schools => serde_json::to_value(self.get_schools())?,
            ResourceRequest::Learners { school_id, page } => {
                serde_json::to_value(self.get_learners(*school_id, *page))?
            }
            ResourceRequest::Staff { school_id } => {
                serde_json::to_value(self.get_staff(*school_id))?
            }
            ResourceRequest::Parents { school_id } => {
                serde_json::to_value(self.get_parents(*school_id))?
            }
            ResourceRequest::Marks { learner_id, filter } => {
                serde_json::to_value(self.get_marks(*learner_id, *filter))?
            }
            ResourceRequest::Lookup { lookup_type } => {
                serde_json::to_value(self.get_lookup(lookup_type))?
            }
        };
        Ok(value)
    }
}

fn pairs(items: &[(&str, &str)]) -> Vec<LookupItem> {
    items
        .iter()
        .map(|(id, name)| LookupItem {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}
