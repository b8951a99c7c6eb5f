//! Synthetic stand-in for the D6 API
//!
//! Serves sandbox mode and acts as the last resolver tier when no upstream
//! version answers. The dataset is generated once, then only read.

pub mod dataset;
mod names;
pub mod provider;

pub use dataset::{
    DatasetSummary, Learner, LookupItem, Mark, MockDataset, Parent, School, StaffMember,
};
pub use provider::MockDataProvider;
