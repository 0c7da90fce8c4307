//! Activity model

use super::SectionId;
use serde::{Deserialize, Serialize};

/// Kind of graded activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Written assignment
    Assignment,
    /// Practical exercise
    Practice,
    /// Project
    Project,
    /// Exam
    Exam,
}

/// An activity assigned within a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity identifier
    pub id: u64,

    /// Section the activity belongs to
    pub section_id: SectionId,

    /// Title shown to students
    pub title: String,

    /// Kind of activity
    pub kind: ActivityKind,

    /// Academic period code the activity was assigned in
    pub period: String,
}
