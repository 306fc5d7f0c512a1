//! Registry report types: serializable snapshots of the sorted views.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{CourseId, Level, UserId};
use crate::registry::Registry;

/// A point-in-time report over a registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryReport {
    /// When the report was generated.
    pub created_at: DateTime<Utc>,
    /// Number of registered users of any role.
    pub user_count: usize,
    /// Number of registered courses.
    pub course_count: usize,
    /// Students in ascending GPA order.
    pub students_by_gpa: Vec<StudentStanding>,
    /// Courses from beginner to advanced.
    pub courses_by_difficulty: Vec<CourseSummary>,
}

/// One row of the GPA view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub gpa: f64,
    pub enrolled_courses: Vec<CourseId>,
}

/// One row of the difficulty view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    pub level: Level,
    pub capacity: u32,
    pub enrolled: usize,
    pub average_rating: f64,
    pub rating_count: usize,
    pub price: f64,
    pub modules: usize,
}

impl RegistryReport {
    /// Build a report from the registry's current state.
    pub fn from_registry(registry: &Registry) -> Self {
        let students_by_gpa = registry
            .students_sorted_by_gpa()
            .into_iter()
            .filter_map(|user| {
                let record = user.as_student()?;
                Some(StudentStanding {
                    id: user.id,
                    gpa: record.calculate_gpa(),
                    enrolled_courses: record.enrolled_courses().to_vec(),
                    name: user.name,
                    email: user.email,
                })
            })
            .collect();

        let courses_by_difficulty = registry
            .courses_sorted_by_difficulty()
            .into_iter()
            .map(|c| CourseSummary {
                id: c.id(),
                level: c.level,
                capacity: c.capacity(),
                enrolled: c.enrolled_students().len(),
                average_rating: c.average_rating(),
                rating_count: c.ratings().len(),
                price: c.price,
                modules: c.modules().len(),
                title: c.title,
            })
            .collect();

        Self {
            created_at: Utc::now(),
            user_count: registry.users().len(),
            course_count: registry.courses().len(),
            students_by_gpa,
            courses_by_difficulty,
        }
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }
}
