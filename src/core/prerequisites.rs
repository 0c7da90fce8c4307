//! Prerequisite checks and the course dependency graph
//!
//! Only mandatory edges ever block enrollment; optional edges are kept for
//! display. The checker itself is pure: callers build the set of approved
//! course codes (see [`approved_courses`]) and pass it in.

use crate::core::models::EnrollmentRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use thiserror::Error;

/// Errors raised while building a prerequisite graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A course listed as its own prerequisite
    #[error("Course '{0}' cannot be its own prerequisite")]
    SelfReference(String),

    /// The graph has a dependency cycle through these courses
    #[error("Cycle detected in prerequisite graph involving: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Directed edge: `course` requires `prerequisite`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    /// Course that has the requirement
    pub course: String,
    /// Course that must be approved first
    pub prerequisite: String,
    /// Whether the edge blocks enrollment
    #[serde(rename = "is_mandatory", default = "default_mandatory")]
    pub mandatory: bool,
}

const fn default_mandatory() -> bool {
    true
}

impl PrerequisiteEdge {
    /// Create a new edge
    #[must_use]
    pub fn new(course: &str, prerequisite: &str, mandatory: bool) -> Self {
        Self {
            course: course.to_string(),
            prerequisite: prerequisite.to_string(),
            mandatory,
        }
    }
}

/// Whether every mandatory prerequisite among `edges` is in `approved`.
///
/// `edges` are the target course's prerequisite edges. Optional edges are
/// ignored, and a course with no mandatory edges is always eligible.
#[must_use]
pub fn meets_prerequisites(edges: &[PrerequisiteEdge], approved: &HashSet<String>) -> bool {
    edges
        .iter()
        .filter(|edge| edge.mandatory)
        .all(|edge| approved.contains(&edge.prerequisite))
}

/// Mandatory prerequisites among `edges` that are not in `approved`, in
/// declaration order.
#[must_use]
pub fn missing_prerequisites(
    edges: &[PrerequisiteEdge],
    approved: &HashSet<String>,
) -> Vec<String> {
    edges
        .iter()
        .filter(|edge| edge.mandatory && !approved.contains(&edge.prerequisite))
        .map(|edge| edge.prerequisite.clone())
        .collect()
}

/// Course codes a student has approved: completed with an A, B or C.
#[must_use]
pub fn approved_courses<'a, I>(records: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a EnrollmentRecord>,
{
    records
        .into_iter()
        .filter(|record| record.is_approved())
        .map(|record| record.course_code.clone())
        .collect()
}

/// Prerequisite graph over course codes
///
/// Kept in both directions:
/// - `requirements`: course -> its prerequisite edges
/// - `dependents`: course -> courses that require it
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    requirements: HashMap<String, Vec<PrerequisiteEdge>>,
    dependents: HashMap<String, Vec<String>>,
    courses: Vec<String>,
}

impl PrerequisiteGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a list of edges
    ///
    /// # Errors
    /// Returns [`GraphError::SelfReference`] on the first reflexive edge.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = PrerequisiteEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_prerequisite(edge)?;
        }
        Ok(graph)
    }

    /// Add a course with no edges
    pub fn add_course(&mut self, code: &str) {
        if !self.requirements.contains_key(code) {
            self.courses.push(code.to_string());
            self.requirements.insert(code.to_string(), Vec::new());
            self.dependents.insert(code.to_string(), Vec::new());
        }
    }

    /// Add an edge. Re-adding an existing pair updates its mandatory flag.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfReference`] when a course requires itself.
    pub fn add_prerequisite(&mut self, edge: PrerequisiteEdge) -> Result<(), GraphError> {
        if edge.course == edge.prerequisite {
            return Err(GraphError::SelfReference(edge.course));
        }

        self.add_course(&edge.course);
        self.add_course(&edge.prerequisite);

        if let Some(dependents) = self.dependents.get_mut(&edge.prerequisite) {
            if !dependents.contains(&edge.course) {
                dependents.push(edge.course.clone());
            }
        }

        if let Some(edges) = self.requirements.get_mut(&edge.course) {
            let existing = edges
                .iter()
                .position(|e| e.prerequisite == edge.prerequisite);
            match existing {
                Some(idx) => edges[idx].mandatory = edge.mandatory,
                None => edges.push(edge),
            }
        }

        Ok(())
    }

    /// All prerequisite edges of a course (empty for unknown courses)
    #[must_use]
    pub fn prerequisites_of(&self, code: &str) -> &[PrerequisiteEdge] {
        self.requirements.get(code).map_or(&[], Vec::as_slice)
    }

    /// Mandatory prerequisite codes of a course
    #[must_use]
    pub fn mandatory_prerequisites(&self, code: &str) -> Vec<&str> {
        self.prerequisites_of(code)
            .iter()
            .filter(|e| e.mandatory)
            .map(|e| e.prerequisite.as_str())
            .collect()
    }

    /// Optional (informational) prerequisite codes of a course
    #[must_use]
    pub fn optional_prerequisites(&self, code: &str) -> Vec<&str> {
        self.prerequisites_of(code)
            .iter()
            .filter(|e| !e.mandatory)
            .map(|e| e.prerequisite.as_str())
            .collect()
    }

    /// Courses that list `code` as a prerequisite
    #[must_use]
    pub fn dependents(&self, code: &str) -> &[String] {
        self.dependents.get(code).map_or(&[], Vec::as_slice)
    }

    /// Whether a student with `approved` courses may enroll in `code`
    #[must_use]
    pub fn meets_prerequisites(&self, code: &str, approved: &HashSet<String>) -> bool {
        meets_prerequisites(self.prerequisites_of(code), approved)
    }

    /// Mandatory prerequisites of `code` still missing from `approved`
    #[must_use]
    pub fn missing_prerequisites(&self, code: &str, approved: &HashSet<String>) -> Vec<String> {
        missing_prerequisites(self.prerequisites_of(code), approved)
    }

    /// Number of courses in the graph
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Check the graph is acyclic and return the courses in an order where
    /// every prerequisite precedes the courses that require it.
    ///
    /// # Errors
    /// Returns [`GraphError::Cycle`] listing the courses left on a cycle.
    pub fn validate(&self) -> Result<Vec<String>, GraphError> {
        let mut indegree: HashMap<&str, usize> = self
            .courses
            .iter()
            .map(|c| (c.as_str(), self.prerequisites_of(c).len()))
            .collect();

        let mut queue: VecDeque<&str> = self
            .courses
            .iter()
            .map(String::as_str)
            .filter(|c| indegree.get(c).copied().unwrap_or(0) == 0)
            .collect();

        let mut order = Vec::with_capacity(self.courses.len());

        while let Some(course) = queue.pop_front() {
            order.push(course.to_string());

            for child in self.dependents(course) {
                if let Some(entry) = indegree.get_mut(child.as_str()) {
                    *entry = entry.saturating_sub(1);
                    if *entry == 0 {
                        queue.push_back(child.as_str());
                    }
                }
            }
        }

        if order.len() == self.courses.len() {
            Ok(order)
        } else {
            let mut stuck: Vec<String> = indegree
                .into_iter()
                .filter(|(_, remaining)| *remaining > 0)
                .map(|(course, _)| course.to_string())
                .collect();
            stuck.sort();
            Err(GraphError::Cycle(stuck))
        }
    }
}

impl fmt::Display for PrerequisiteGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prerequisite graph ({} courses):", self.courses.len())?;
        writeln!(f)?;

        let mut sorted_courses = self.courses.clone();
        sorted_courses.sort();

        for code in sorted_courses {
            let edges = self.prerequisites_of(&code);
            if edges.is_empty() {
                writeln!(f, "  {code} → (no prerequisites)")?;
            } else {
                let labels: Vec<String> = edges
                    .iter()
                    .map(|e| {
                        if e.mandatory {
                            e.prerequisite.clone()
                        } else {
                            format!("{} (optional)", e.prerequisite)
                        }
                    })
                    .collect();
                writeln!(f, "  {code} → {}", labels.join(", "))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_mandatory_prerequisites_is_vacuously_met() {
        assert!(meets_prerequisites(&[], &approved(&[])));
        assert!(meets_prerequisites(&[], &approved(&["MATH101"])));

        let optional_only = [PrerequisiteEdge::new("CS201", "CS101", false)];
        assert!(meets_prerequisites(&optional_only, &approved(&[])));
    }

    #[test]
    fn test_optional_edge_ignored() {
        let edges = [
            PrerequisiteEdge::new("PHYS201", "MATH101", true),
            PrerequisiteEdge::new("PHYS201", "PHYS101", false),
        ];
        assert!(meets_prerequisites(&edges, &approved(&["MATH101"])));
    }

    #[test]
    fn test_missing_mandatory_blocks() {
        let edges = [
            PrerequisiteEdge::new("CS301", "CS201", true),
            PrerequisiteEdge::new("CS301", "MATH201", true),
        ];
        assert!(!meets_prerequisites(&edges, &approved(&["CS201"])));
        assert_eq!(missing_prerequisites(&edges, &approved(&["CS201"])), vec!["MATH201"]);
        assert!(meets_prerequisites(&edges, &approved(&["CS201", "MATH201"])));
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut graph = PrerequisiteGraph::new();
        let err = graph
            .add_prerequisite(PrerequisiteEdge::new("CS101", "CS101", true))
            .unwrap_err();
        assert_eq!(err, GraphError::SelfReference("CS101".to_string()));
        assert_eq!(graph.course_count(), 0);
    }

    #[test]
    fn test_graph_both_directions() {
        let mut graph = PrerequisiteGraph::new();
        graph
            .add_prerequisite(PrerequisiteEdge::new("CS201", "CS101", true))
            .unwrap();
        graph
            .add_prerequisite(PrerequisiteEdge::new("CS201", "MATH101", false))
            .unwrap();

        assert_eq!(graph.course_count(), 3);
        assert_eq!(graph.mandatory_prerequisites("CS201"), vec!["CS101"]);
        assert_eq!(graph.optional_prerequisites("CS201"), vec!["MATH101"]);
        assert_eq!(graph.dependents("CS101"), ["CS201".to_string()]);
        assert!(graph.prerequisites_of("UNKNOWN").is_empty());
    }

    #[test]
    fn test_duplicate_edge_updates_flag() {
        let mut graph = PrerequisiteGraph::new();
        graph
            .add_prerequisite(PrerequisiteEdge::new("CS201", "CS101", true))
            .unwrap();
        graph
            .add_prerequisite(PrerequisiteEdge::new("CS201", "CS101", false))
            .unwrap();

        assert_eq!(graph.prerequisites_of("CS201").len(), 1);
        assert!(graph.mandatory_prerequisites("CS201").is_empty());
        assert_eq!(graph.dependents("CS101").len(), 1);
    }

    #[test]
    fn test_validate_orders_prerequisites_first() {
        let graph = PrerequisiteGraph::from_edges(vec![
            PrerequisiteEdge::new("CS301", "CS201", true),
            PrerequisiteEdge::new("CS201", "CS101", true),
        ])
        .unwrap();
        let order = graph.validate().unwrap();

        let pos = |c: &str| order.iter().position(|x| x == c).unwrap();
        assert!(pos("CS101") < pos("CS201"));
        assert!(pos("CS201") < pos("CS301"));
    }

    #[test]
    fn test_validate_detects_cycle() {
        let mut graph = PrerequisiteGraph::new();
        graph
            .add_prerequisite(PrerequisiteEdge::new("A", "B", true))
            .unwrap();
        graph
            .add_prerequisite(PrerequisiteEdge::new("B", "A", false))
            .unwrap();
        graph.add_course("C");

        let err = graph.validate().unwrap_err();
        assert_eq!(err, GraphError::Cycle(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_display() {
        let mut graph = PrerequisiteGraph::new();
        graph
            .add_prerequisite(PrerequisiteEdge::new("CS201", "CS101", false))
            .unwrap();
        let display = graph.to_string();
        assert!(display.contains("CS201 → CS101 (optional)"));
        assert!(display.contains("CS101 → (no prerequisites)"));
    }
}
