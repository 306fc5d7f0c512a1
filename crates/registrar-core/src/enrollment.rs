//! Enrollment policy: the enroll/drop transition for a (course, student) pair.
//!
//! Both sides of the relationship change in the same call. All checks run
//! before the first write, so a rejected call leaves course and student as
//! they were.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{RegistryError, Result};
use crate::model::{Course, CourseId, User, UserId};

/// Date format used on enrollment receipts.
pub const RECEIPT_DATE_FORMAT: &str = "%d/%m/%Y";

/// One-shot notice emitted on a successful enrollment. Not stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentReceipt {
    pub course: CourseId,
    pub course_title: String,
    pub student: UserId,
    pub student_name: String,
    pub date: NaiveDate,
}

impl fmt::Display for EnrollmentReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Receipt ---")?;
        writeln!(f, "Course: {}", self.course_title)?;
        writeln!(f, "Student name: {}", self.student_name)?;
        writeln!(f, "Registering date: {}", self.date.format(RECEIPT_DATE_FORMAT))?;
        write!(f, "---------------")
    }
}

impl Course {
    /// Enroll `student` today. See [`Course::enroll_on`].
    pub fn enroll(&mut self, student: &mut User) -> Result<EnrollmentReceipt> {
        self.enroll_on(student, chrono::Local::now().date_naive())
    }

    /// Enroll `student`, stamping the receipt with `date`.
    ///
    /// Fails with `AlreadyEnrolled` if the student is a member already and
    /// with `CourseFull` if every seat is taken.
    pub fn enroll_on(&mut self, student: &mut User, date: NaiveDate) -> Result<EnrollmentReceipt> {
        let student_id = student.id;
        let Some(record) = student.as_student_mut() else {
            return Err(RegistryError::NotAStudent(student_id));
        };
        if self.is_enrolled(student_id) {
            return Err(RegistryError::AlreadyEnrolled {
                student: student_id,
                course: self.id(),
            });
        }
        if self.is_full() {
            return Err(RegistryError::CourseFull {
                course: self.id(),
                capacity: self.capacity(),
            });
        }

        self.enrolled.push(student_id);
        record.add_course_enrollment(self.id());

        Ok(EnrollmentReceipt {
            course: self.id(),
            course_title: self.title.clone(),
            student: student_id,
            student_name: student.name.clone(),
            date,
        })
    }

    /// Remove `student` from this course and the course from the student's
    /// record.
    ///
    /// Fails with `UserNotFound` if the student is not a member.
    pub fn drop_student(&mut self, student: &mut User) -> Result<()> {
        let student_id = student.id;
        let Some(record) = student.as_student_mut() else {
            return Err(RegistryError::NotAStudent(student_id));
        };
        if !self.is_enrolled(student_id) {
            return Err(RegistryError::not_registered(student_id, self.id()));
        }

        self.enrolled.retain(|id| *id != student_id);
        record.remove_course_enrollment(self.id());
        Ok(())
    }
}
