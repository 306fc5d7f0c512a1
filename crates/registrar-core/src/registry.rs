//! The registry: owner of every user and course, plus derived views.
//!
//! Operations that touch both a course and a student go through here so
//! that the two sides are looked up and changed together.

use crate::config::RegistrarConfig;
use crate::enrollment::EnrollmentReceipt;
use crate::error::{RegistryError, Result};
use crate::model::{Account, Course, CourseId, Role, User, UserId};
use crate::search::{self, SearchOutcome};

/// All users and courses known to the engine.
#[derive(Debug, Default)]
pub struct Registry {
    users: Vec<User>,
    courses: Vec<Course>,
    config: RegistrarConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistrarConfig) -> Self {
        Self {
            users: Vec::new(),
            courses: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Population bookkeeping
    // -----------------------------------------------------------------------

    /// Register a user. Ids must be positive and unique.
    pub fn add_user(&mut self, user: User) -> Result<()> {
        if user.id.0 == 0 {
            return Err(RegistryError::ReservedUserId(user.id));
        }
        if self.find_user_by_id(user.id).is_some() {
            return Err(RegistryError::DuplicateUser(user.id));
        }
        tracing::debug!(user = %user.id, role = %user.role(), "user added");
        self.users.push(user);
        Ok(())
    }

    /// Remove a user, returning `false` if nobody has that id.
    ///
    /// A removed student is also taken off every course's member list.
    pub fn remove_user(&mut self, id: UserId) -> bool {
        let Some(pos) = self.users.iter().position(|u| u.id == id) else {
            return false;
        };
        let user = self.users.remove(pos);
        if let Some(record) = user.as_student() {
            for course_id in record.enrolled_courses() {
                if let Some(course) = self.courses.iter_mut().find(|c| c.id() == *course_id) {
                    course.enrolled.retain(|s| *s != id);
                }
            }
        }
        tracing::info!(user = %id, name = %user.name, "user removed");
        true
    }

    pub fn find_user_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Case-insensitive email lookup.
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim().to_lowercase();
        self.users
            .iter()
            .find(|u| u.email.trim().to_lowercase() == email)
    }

    /// Register a course. It needs at least one seat and a unique id.
    pub fn add_course(&mut self, course: Course) -> Result<()> {
        if course.capacity() == 0 {
            return Err(RegistryError::ZeroCapacity(course.id()));
        }
        if self.find_course_by_id(course.id()).is_some() {
            return Err(RegistryError::DuplicateCourse(course.id()));
        }
        tracing::debug!(course = %course.id(), level = %course.level, "course added");
        self.courses.push(course);
        Ok(())
    }

    /// Remove a course, returning `false` if it does not exist.
    ///
    /// Every student loses the enrollment, grade and rating for the course
    /// and every instructor stops teaching it, in the same call.
    pub fn remove_course(&mut self, id: CourseId) -> bool {
        let Some(pos) = self.courses.iter().position(|c| c.id() == id) else {
            return false;
        };
        let course = self.courses.remove(pos);
        for user in &mut self.users {
            match &mut user.account {
                Account::Student(record) => record.forget_course(id),
                Account::Instructor(instructor) => {
                    instructor.remove_teaching_course(id);
                }
                Account::Admin => {}
            }
        }
        tracing::info!(
            course = %id,
            title = %course.title,
            released = course.enrolled_students().len(),
            "course removed"
        );
        true
    }

    pub fn find_course_by_id(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn students(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role() == Role::Student)
    }

    /// Courses `instructor` teaches, in assignment order.
    pub fn courses_taught_by(&self, instructor: UserId) -> Vec<&Course> {
        let Some(teaching) = self
            .find_user_by_id(instructor)
            .and_then(User::as_instructor)
        else {
            return Vec::new();
        };
        teaching
            .teaching_courses()
            .iter()
            .filter_map(|id| self.find_course_by_id(*id))
            .collect()
    }

    /// Students currently on `course`'s member list.
    pub fn roster_of(&self, course: CourseId) -> Vec<&User> {
        self.find_course_by_id(course)
            .map(|c| {
                c.enrolled_students()
                    .iter()
                    .filter_map(|id| self.find_user_by_id(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    /// Enroll a student in a course today.
    pub fn enroll(&mut self, course: CourseId, student: UserId) -> Result<EnrollmentReceipt> {
        let today = chrono::Local::now().date_naive();
        self.enroll_on(course, student, today)
    }

    /// Enroll a student, stamping the receipt with `date`.
    pub fn enroll_on(
        &mut self,
        course: CourseId,
        student: UserId,
        date: chrono::NaiveDate,
    ) -> Result<EnrollmentReceipt> {
        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id() == course)
            .ok_or(RegistryError::CourseNotFound(course))?;
        let student = self
            .users
            .iter_mut()
            .find(|u| u.id == student)
            .ok_or_else(|| RegistryError::user_not_found(student, Some(Role::Student)))?;

        match course.enroll_on(student, date) {
            Ok(receipt) => {
                tracing::info!(
                    course = %receipt.course,
                    student = %receipt.student,
                    date = %receipt.date.format(crate::enrollment::RECEIPT_DATE_FORMAT),
                    "{} enrolled in {}",
                    receipt.student_name,
                    receipt.course_title
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::debug!("enrollment rejected: {e}");
                Err(e)
            }
        }
    }

    /// Drop a student from a course.
    pub fn drop_student(&mut self, course: CourseId, student: UserId) -> Result<()> {
        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id() == course)
            .ok_or(RegistryError::CourseNotFound(course))?;
        let student = self
            .users
            .iter_mut()
            .find(|u| u.id == student)
            .ok_or_else(|| RegistryError::user_not_found(student, Some(Role::Student)))?;

        course.drop_student(student)?;
        tracing::info!(course = %course.id(), student = %student.id, "student dropped");
        Ok(())
    }

    /// Submit a student's rating for a course and return the new average.
    ///
    /// The student must be enrolled, the value must be inside the configured
    /// range, and each student rates a course at most once.
    pub fn rate_course(&mut self, course: CourseId, student: UserId, value: f64) -> Result<f64> {
        let (min, max) = (self.config.min_rating, self.config.max_rating);
        let in_range = self.config.rating_in_range(value);

        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id() == course)
            .ok_or(RegistryError::CourseNotFound(course))?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == student)
            .ok_or_else(|| RegistryError::user_not_found(student, Some(Role::Student)))?;
        let record = user
            .as_student_mut()
            .ok_or(RegistryError::NotAStudent(student))?;

        if !course.is_enrolled(student) {
            return Err(RegistryError::not_registered(student, course.id()));
        }
        if !in_range {
            return Err(RegistryError::RatingOutOfRange { value, min, max });
        }
        if let Some(rating) = record.rating_for(course.id()) {
            return Err(RegistryError::AlreadyRated {
                student,
                course: course.id(),
                rating,
            });
        }

        record.record_rating(course.id(), value);
        let average = course.add_rating(value);
        tracing::info!(course = %course.id(), %student, value, average, "course rated");
        Ok(average)
    }

    /// Instructor-side grade adjustment; returns the committed grade.
    ///
    /// Unlike [`Student::modify_grade`](crate::record::Student::modify_grade)
    /// this refuses students who are not on the course's member list, so a
    /// stale handle to a dropped or removed course cannot create a grade.
    pub fn modify_grade(&mut self, course: CourseId, student: UserId, delta: f64) -> Result<f64> {
        let course = self
            .courses
            .iter()
            .find(|c| c.id() == course)
            .ok_or(RegistryError::CourseNotFound(course))?;
        if !course.is_enrolled(student) {
            return Err(RegistryError::not_registered(student, course.id()));
        }
        let course = course.id();

        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == student)
            .ok_or_else(|| RegistryError::user_not_found(student, Some(Role::Student)))?;
        let record = user
            .as_student_mut()
            .ok_or(RegistryError::NotAStudent(student))?;

        let current = record.grade(course).unwrap_or(0.0);
        if !record.modify_grade(course, delta) {
            return Err(RegistryError::GradeOutOfRange {
                attempted: current + delta,
            });
        }
        let grade = record.grade(course).unwrap_or(current + delta);
        tracing::info!(%course, %student, delta, grade, "grade updated");
        Ok(grade)
    }

    /// Make `instructor` responsible for `course`.
    pub fn assign_instructor(&mut self, course: CourseId, instructor: UserId) -> Result<()> {
        if self.find_course_by_id(course).is_none() {
            return Err(RegistryError::CourseNotFound(course));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == instructor)
            .ok_or_else(|| RegistryError::user_not_found(instructor, Some(Role::Instructor)))?;
        let teaching = user
            .as_instructor_mut()
            .ok_or(RegistryError::NotAnInstructor(instructor))?;
        teaching.add_teaching_course(course);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Students in ascending GPA order.
    ///
    /// The returned users are copies taken now; later grade changes do not
    /// show up in them. Ties keep registration order.
    pub fn students_sorted_by_gpa(&self) -> Vec<User> {
        let mut ranked: Vec<(f64, &User)> = self
            .students()
            .filter_map(|u| u.gpa().map(|gpa| (gpa, u)))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, u)| u.clone()).collect()
    }

    /// Courses from beginner to advanced, as copies. Ties keep insertion
    /// order.
    pub fn courses_sorted_by_difficulty(&self) -> Vec<Course> {
        let mut sorted = self.courses.clone();
        sorted.sort_by_key(|c| c.level);
        sorted
    }

    /// Search every registered user with the configured page size.
    pub fn search(&self, query: &str, role: Option<Role>) -> Result<SearchOutcome<'_>> {
        search::find_paged(&self.users, query, role, self.config.search_page_size)
    }
}
