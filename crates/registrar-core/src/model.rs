//! Core data model types for registrar.
//!
//! Users and courses refer to each other by id only. The [`Registry`]
//! owns both populations, so neither side can outlive the other through a
//! dangling handle.
//!
//! [`Registry`]: crate::registry::Registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rating::RatingLedger;
use crate::record::Student;

/// Caller-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-assigned course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u32);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a user plays in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Instructor => write!(f, "instructor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" | "teacher" => Ok(Role::Instructor),
            "admin" | "administrator" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Course difficulty, ordered `Beginner < Intermediate < Advanced`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown course level: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Role-specific data carried by a [`User`].
#[derive(Debug, Clone)]
pub enum Account {
    Student(Student),
    Instructor(Instructor),
    Admin,
}

/// A registered user. Identity is the `id` alone.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Free text. Uniqueness is checked by whoever creates the user.
    pub email: String,
    pub account: Account,
}

impl User {
    pub fn student(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_account(id, name, email, Account::Student(Student::default()))
    }

    pub fn instructor(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_account(id, name, email, Account::Instructor(Instructor::default()))
    }

    pub fn admin(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_account(id, name, email, Account::Admin)
    }

    /// Build a user with a fresh, empty account for `role`.
    pub fn with_role(id: u32, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let account = match role {
            Role::Student => Account::Student(Student::default()),
            Role::Instructor => Account::Instructor(Instructor::default()),
            Role::Admin => Account::Admin,
        };
        Self::with_account(id, name, email, account)
    }

    fn with_account(
        id: u32,
        name: impl Into<String>,
        email: impl Into<String>,
        account: Account,
    ) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            email: email.into(),
            account,
        }
    }

    pub fn role(&self) -> Role {
        match self.account {
            Account::Student(_) => Role::Student,
            Account::Instructor(_) => Role::Instructor,
            Account::Admin => Role::Admin,
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match &self.account {
            Account::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_student_mut(&mut self) -> Option<&mut Student> {
        match &mut self.account {
            Account::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instructor(&self) -> Option<&Instructor> {
        match &self.account {
            Account::Instructor(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_instructor_mut(&mut self) -> Option<&mut Instructor> {
        match &mut self.account {
            Account::Instructor(i) => Some(i),
            _ => None,
        }
    }

    /// GPA for students, `None` for every other role.
    pub fn gpa(&self) -> Option<f64> {
        self.as_student().map(Student::calculate_gpa)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}). Email: {} Role: {}",
            self.name,
            self.id,
            self.email,
            self.role()
        )
    }
}

/// Courses an instructor is responsible for.
#[derive(Debug, Clone, Default)]
pub struct Instructor {
    teaching: Vec<CourseId>,
}

impl Instructor {
    /// Returns `false` if the course was already on the list.
    pub fn add_teaching_course(&mut self, course: CourseId) -> bool {
        if self.teaching.contains(&course) {
            return false;
        }
        self.teaching.push(course);
        true
    }

    pub fn remove_teaching_course(&mut self, course: CourseId) -> bool {
        let before = self.teaching.len();
        self.teaching.retain(|c| *c != course);
        self.teaching.len() != before
    }

    pub fn teaches(&self, course: CourseId) -> bool {
        self.teaching.contains(&course)
    }

    pub fn teaching_courses(&self) -> &[CourseId] {
        &self.teaching
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// A single lesson inside a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub duration_minutes: u32,
}

impl Lesson {
    pub fn new(title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            title: title.into(),
            duration_minutes,
        }
    }
}

/// A titled group of lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub title: String,
    #[serde(default)]
    lessons: Vec<Lesson>,
}

impl Module {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lessons: Vec::new(),
        }
    }

    pub fn add_lesson(&mut self, lesson: Lesson) {
        self.lessons.push(lesson);
    }

    /// Remove every lesson whose title matches, ignoring case.
    pub fn remove_lesson(&mut self, title: &str) -> bool {
        let before = self.lessons.len();
        self.lessons
            .retain(|l| !l.title.eq_ignore_ascii_case(title.trim()));
        self.lessons.len() != before
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|l| l.duration_minutes).sum()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} lessons)", self.title, self.lessons.len())
    }
}

/// A course offering.
///
/// The member set is only changed through the enrollment policy
/// ([`Course::enroll`] / [`Course::drop_student`]) so the student side is
/// always updated in the same step.
#[derive(Debug, Clone)]
pub struct Course {
    id: CourseId,
    capacity: u32,
    pub title: String,
    pub price: f64,
    pub level: Level,
    modules: Vec<Module>,
    pub(crate) enrolled: Vec<UserId>,
    pub(crate) ratings: RatingLedger,
}

impl Course {
    pub fn new(id: u32, capacity: u32, title: impl Into<String>, price: f64, level: Level) -> Self {
        Self {
            id: CourseId(id),
            capacity,
            title: title.into(),
            price,
            level,
            modules: Vec::new(),
            enrolled: Vec::new(),
            ratings: RatingLedger::default(),
        }
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn enrolled_students(&self) -> &[UserId] {
        &self.enrolled
    }

    pub fn is_enrolled(&self, student: UserId) -> bool {
        self.enrolled.contains(&student)
    }

    pub fn is_full(&self) -> bool {
        self.enrolled.len() >= self.capacity as usize
    }

    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled.len() as u32)
    }

    /// Record a rating and return the new average.
    ///
    /// Any value is accepted here; range and once-per-student checks belong
    /// to [`Registry::rate_course`](crate::registry::Registry::rate_course).
    pub fn add_rating(&mut self, value: f64) -> f64 {
        self.ratings.add(value)
    }

    pub fn average_rating(&self) -> f64 {
        self.ratings.average()
    }

    pub fn ratings(&self) -> &[f64] {
        self.ratings.values()
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_mut(&mut self, title: &str) -> Option<&mut Module> {
        self.modules
            .iter_mut()
            .find(|m| m.title.eq_ignore_ascii_case(title.trim()))
    }

    /// Multi-line summary for listings.
    pub fn info(&self) -> String {
        format!(
            "{}\nID: {}\n{} Students\nProviding {} Modules\nRatings: {:.1}\nPrice: {:.2}",
            self.title,
            self.id,
            self.enrolled.len(),
            self.modules.len(),
            self.average_rating(),
            self.price
        )
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Course {}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}
