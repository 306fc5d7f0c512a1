//! Per-student academic record: enrollments, grades, submitted ratings.

use std::collections::BTreeMap;

use crate::model::CourseId;

/// Lowest grade a ledger entry may hold.
pub const MIN_GRADE: f64 = 0.0;
/// Highest grade a ledger entry may hold.
pub const MAX_GRADE: f64 = 100.0;

/// Academic data carried by a student account.
///
/// Every course in `enrolled` has an entry in `grades`. The reverse does not
/// always hold; see [`Student::modify_grade`].
#[derive(Debug, Clone, Default)]
pub struct Student {
    enrolled: Vec<CourseId>,
    grades: BTreeMap<CourseId, f64>,
    rated: BTreeMap<CourseId, f64>,
}

impl Student {
    /// Add `course` to the enrolled list and start its grade at `0.0`.
    ///
    /// Called by the enrollment policy after the course side has accepted
    /// the student. Re-adding an existing course is a no-op.
    pub fn add_course_enrollment(&mut self, course: CourseId) {
        if self.enrolled.contains(&course) {
            return;
        }
        self.enrolled.push(course);
        self.grades.insert(course, 0.0);
    }

    /// Remove `course` from the enrolled list and the grade ledger.
    ///
    /// Returns `true` if either entry existed.
    pub fn remove_course_enrollment(&mut self, course: CourseId) -> bool {
        let before = self.enrolled.len();
        self.enrolled.retain(|c| *c != course);
        let course_removed = self.enrolled.len() != before;
        let grade_removed = self.grades.remove(&course).is_some();
        course_removed || grade_removed
    }

    pub fn enrolled_courses(&self) -> &[CourseId] {
        &self.enrolled
    }

    pub fn is_enrolled(&self, course: CourseId) -> bool {
        self.enrolled.contains(&course)
    }

    pub fn grade(&self, course: CourseId) -> Option<f64> {
        self.grades.get(&course).copied()
    }

    /// Grade ledger in course-id order.
    pub fn grades(&self) -> impl Iterator<Item = (CourseId, f64)> + '_ {
        self.grades.iter().map(|(c, g)| (*c, *g))
    }

    /// Adjust the grade for `course` by `delta`.
    ///
    /// A missing entry counts as `0.0`, even when the student was never
    /// enrolled through [`Course::enroll`](crate::model::Course::enroll).
    /// That lets a grade exist without an enrollment, which is kept for
    /// compatibility; the registry-level entry point rejects it.
    ///
    /// Returns `false` and leaves the ledger untouched when the result would
    /// fall outside `[0, 100]`. No entry is created for a rejected change.
    pub fn modify_grade(&mut self, course: CourseId, delta: f64) -> bool {
        let current = self.grades.get(&course).copied().unwrap_or(0.0);
        let candidate = current + delta;
        if !(MIN_GRADE..=MAX_GRADE).contains(&candidate) {
            tracing::debug!(%course, current, delta, "grade change rejected");
            return false;
        }
        self.grades.insert(course, candidate);
        true
    }

    /// Unweighted mean of every recorded grade, `0.0` with no grades.
    pub fn calculate_gpa(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        self.grades.values().sum::<f64>() / self.grades.len() as f64
    }

    /// The rating this student gave `course`, if any.
    pub fn rating_for(&self, course: CourseId) -> Option<f64> {
        self.rated.get(&course).copied()
    }

    pub fn rated_courses(&self) -> impl Iterator<Item = (CourseId, f64)> + '_ {
        self.rated.iter().map(|(c, r)| (*c, *r))
    }

    pub(crate) fn record_rating(&mut self, course: CourseId, value: f64) {
        self.rated.insert(course, value);
    }

    /// Drop every trace of `course`, including the submitted rating.
    /// Used when the course itself leaves the registry.
    pub(crate) fn forget_course(&mut self, course: CourseId) {
        self.remove_course_enrollment(course);
        self.rated.remove(&course);
    }
}
