//! Registry error types.
//!
//! Every variant is recoverable: the operation that produced it has not
//! touched any state, so the caller can show the message and ask again.

use thiserror::Error;

use crate::model::{CourseId, Role, UserId};

/// Errors returned by registry, enrollment and search operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The student is already a member of the course.
    #[error("student {student} is already enrolled in course {course}")]
    AlreadyEnrolled { student: UserId, course: CourseId },

    /// The course has no seats left.
    #[error("course {course} is full ({capacity} seats)")]
    CourseFull { course: CourseId, capacity: u32 },

    /// No matching user, or the user is not on the course's list.
    #[error("{0}")]
    UserNotFound(String),

    /// A grade change would leave the grade outside `[0, 100]`.
    #[error("grade {attempted} is outside the 0-100 range")]
    GradeOutOfRange { attempted: f64 },

    /// A search query that can never match.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("course {0} was not found")]
    CourseNotFound(CourseId),

    #[error("user {0} is not a student")]
    NotAStudent(UserId),

    #[error("user {0} is not an instructor")]
    NotAnInstructor(UserId),

    #[error("a user with id {0} already exists")]
    DuplicateUser(UserId),

    #[error("a course with id {0} already exists")]
    DuplicateCourse(CourseId),

    /// Id `0` is the search cancel sentinel and cannot name a user.
    #[error("user id {0} is reserved, ids start at 1")]
    ReservedUserId(UserId),

    #[error("course {0} must have at least one seat")]
    ZeroCapacity(CourseId),

    /// A rating outside the configured range.
    #[error("rating {value} must be between {min} and {max}")]
    RatingOutOfRange { value: f64, min: f64, max: f64 },

    /// The student has already rated this course.
    #[error("student {student} already rated course {course} ({rating})")]
    AlreadyRated {
        student: UserId,
        course: CourseId,
        rating: f64,
    },
}

impl RegistryError {
    /// No user with `id`, phrased for the role being searched.
    pub fn user_not_found(id: impl std::fmt::Display, role: Option<Role>) -> Self {
        let noun = role.map_or_else(|| "user".to_string(), |r| r.to_string());
        RegistryError::UserNotFound(format!("The {noun} with the id of: {id} was not found."))
    }

    /// `student` is not on the course's registered list.
    pub fn not_registered(student: UserId, course: CourseId) -> Self {
        RegistryError::UserNotFound(format!(
            "student {student} is not on the registered list of course {course}"
        ))
    }

    /// Returns `true` if the error means a handle no longer resolves.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::UserNotFound(_) | RegistryError::CourseNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
