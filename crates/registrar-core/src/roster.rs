//! TOML roster parser.
//!
//! A roster describes a population (users and courses) plus the
//! enrollment, grade and rating actions to replay against a fresh
//! [`Registry`]. Loading a roster never writes anything back.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::RegistrarConfig;
use crate::model::{Course, CourseId, Lesson, Level, Module, Role, User, UserId};
use crate::registry::Registry;

/// Intermediate TOML structure for roster files.
#[derive(Debug, Deserialize)]
struct TomlRoster {
    #[serde(default)]
    users: Vec<TomlUser>,
    #[serde(default)]
    courses: Vec<TomlCourse>,
    #[serde(default)]
    enrollments: Vec<TomlEnrollment>,
}

#[derive(Debug, Deserialize)]
struct TomlUser {
    id: u32,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default = "default_role")]
    role: String,
}

fn default_role() -> String {
    "student".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlCourse {
    id: u32,
    title: String,
    #[serde(default)]
    capacity: Option<u32>,
    #[serde(default)]
    price: f64,
    #[serde(default = "default_level")]
    level: String,
    #[serde(default)]
    instructor: Option<u32>,
    #[serde(default)]
    modules: Vec<TomlModule>,
}

fn default_level() -> String {
    "beginner".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlModule {
    title: String,
    #[serde(default)]
    lessons: Vec<TomlLesson>,
}

#[derive(Debug, Deserialize)]
struct TomlLesson {
    title: String,
    #[serde(default)]
    duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct TomlEnrollment {
    course: u32,
    student: u32,
    #[serde(default)]
    grade_delta: Option<f64>,
    #[serde(default)]
    rating: Option<f64>,
}

/// A course as declared in a roster, with its optional instructor.
#[derive(Debug, Clone)]
pub struct RosterCourse {
    pub course: Course,
    pub instructor: Option<UserId>,
}

/// An enrollment to replay, optionally followed by a grade change and a
/// rating from the student.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEnrollment {
    pub course: CourseId,
    pub student: UserId,
    pub grade_delta: Option<f64>,
    pub rating: Option<f64>,
}

/// A parsed roster file.
#[derive(Debug, Clone)]
pub struct Roster {
    pub users: Vec<User>,
    pub courses: Vec<RosterCourse>,
    pub enrollments: Vec<RosterEnrollment>,
}

/// Parse a roster file.
pub fn parse_roster(path: &Path, config: &RegistrarConfig) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    parse_roster_str(&content, path, config)
}

/// Parse a roster from a TOML string (useful for testing).
pub fn parse_roster_str(
    content: &str,
    source_path: &Path,
    config: &RegistrarConfig,
) -> Result<Roster> {
    let parsed: TomlRoster = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let users = parsed
        .users
        .into_iter()
        .map(|u| {
            let role: Role = u
                .role
                .parse()
                .map_err(|e: String| anyhow::anyhow!("user {}: {}", u.id, e))?;
            Ok(User::with_role(u.id, u.name, u.email, role))
        })
        .collect::<Result<Vec<_>>>()?;

    let courses = parsed
        .courses
        .into_iter()
        .map(|c| {
            let level: Level = c
                .level
                .parse()
                .map_err(|e: String| anyhow::anyhow!("course {}: {}", c.id, e))?;
            let capacity = c.capacity.unwrap_or(config.default_capacity);
            let mut course = Course::new(c.id, capacity, c.title, c.price, level);
            for m in c.modules {
                let mut module = Module::new(m.title);
                for l in m.lessons {
                    module.add_lesson(Lesson::new(l.title, l.duration_minutes));
                }
                course.add_module(module);
            }
            Ok(RosterCourse {
                course,
                instructor: c.instructor.map(UserId),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let enrollments = parsed
        .enrollments
        .into_iter()
        .map(|e| RosterEnrollment {
            course: CourseId(e.course),
            student: UserId(e.student),
            grade_delta: e.grade_delta,
            rating: e.rating,
        })
        .collect();

    Ok(Roster {
        users,
        courses,
        enrollments,
    })
}

/// A warning from roster validation or replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// What the warning is about, e.g. `user 3` or `course 1`.
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn about(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            message: message.into(),
        }
    }
}

/// Check a roster for problems the engine would reject or silently accept.
pub fn validate_roster(roster: &Roster) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_users = HashSet::new();
    let mut seen_emails = HashSet::new();
    for user in &roster.users {
        if user.id.0 == 0 {
            warnings.push(ValidationWarning::about(
                format!("user {}", user.id),
                "id 0 is reserved for cancelling a search",
            ));
        }
        if !seen_users.insert(user.id) {
            warnings.push(ValidationWarning::about(
                format!("user {}", user.id),
                format!("duplicate user ID: {}", user.id),
            ));
        }
        let email = user.email.trim().to_lowercase();
        if !email.is_empty() && !seen_emails.insert(email) {
            warnings.push(ValidationWarning::about(
                format!("user {}", user.id),
                format!("email already used: {}", user.email),
            ));
        }
        if user.name.trim().is_empty() {
            warnings.push(ValidationWarning::about(
                format!("user {}", user.id),
                "name is empty",
            ));
        }
    }

    let roles: HashMap<UserId, Role> = roster.users.iter().map(|u| (u.id, u.role())).collect();

    let mut seen_courses = HashSet::new();
    for entry in &roster.courses {
        let id = entry.course.id();
        if !seen_courses.insert(id) {
            warnings.push(ValidationWarning::about(
                format!("course {id}"),
                format!("duplicate course ID: {id}"),
            ));
        }
        if entry.course.capacity() == 0 {
            warnings.push(ValidationWarning::about(
                format!("course {id}"),
                "capacity is 0, nobody can enroll",
            ));
        }
        if entry.course.price < 0.0 {
            warnings.push(ValidationWarning::about(
                format!("course {id}"),
                "price is negative",
            ));
        }
        if let Some(instructor) = entry.instructor {
            match roles.get(&instructor) {
                None => warnings.push(ValidationWarning::about(
                    format!("course {id}"),
                    format!("instructor {instructor} is not in the roster"),
                )),
                Some(Role::Instructor) => {}
                Some(role) => warnings.push(ValidationWarning::about(
                    format!("course {id}"),
                    format!("user {instructor} is a {role}, not an instructor"),
                )),
            }
        }
    }

    let mut seats: HashMap<CourseId, u32> = HashMap::new();
    for e in &roster.enrollments {
        let subject = format!("enrollment {}/{}", e.course, e.student);
        if !seen_courses.contains(&e.course) {
            warnings.push(ValidationWarning::about(
                subject.clone(),
                format!("course {} is not in the roster", e.course),
            ));
        }
        match roles.get(&e.student) {
            None => warnings.push(ValidationWarning::about(
                subject.clone(),
                format!("student {} is not in the roster", e.student),
            )),
            Some(Role::Student) => {}
            Some(role) => warnings.push(ValidationWarning::about(
                subject.clone(),
                format!("user {} is a {role}, not a student", e.student),
            )),
        }
        *seats.entry(e.course).or_default() += 1;
    }

    for entry in &roster.courses {
        let taken = seats.get(&entry.course.id()).copied().unwrap_or(0);
        if taken > entry.course.capacity() {
            warnings.push(ValidationWarning::about(
                format!("course {}", entry.course.id()),
                format!(
                    "{taken} enrollments for {} seats, the rest will be rejected",
                    entry.course.capacity()
                ),
            ));
        }
    }

    warnings
}

/// A registry built from a roster, with every action that failed.
#[derive(Debug)]
pub struct Replay {
    pub registry: Registry,
    pub issues: Vec<ValidationWarning>,
}

impl Roster {
    /// Load the roster into a fresh registry.
    ///
    /// Actions the engine rejects are skipped and reported in
    /// [`Replay::issues`]; the rest still apply.
    pub fn replay(self, config: RegistrarConfig) -> Replay {
        let mut registry = Registry::with_config(config);
        let mut issues = Vec::new();
        let mut note = |subject: String, err: &dyn std::fmt::Display| {
            tracing::warn!("{subject}: {err}");
            issues.push(ValidationWarning::about(subject, err.to_string()));
        };

        for user in self.users {
            let subject = format!("user {}", user.id);
            if let Err(e) = registry.add_user(user) {
                note(subject, &e);
            }
        }

        for entry in self.courses {
            let id = entry.course.id();
            if let Err(e) = registry.add_course(entry.course) {
                note(format!("course {id}"), &e);
                continue;
            }
            if let Some(instructor) = entry.instructor {
                if let Err(e) = registry.assign_instructor(id, instructor) {
                    note(format!("course {id}"), &e);
                }
            }
        }

        for e in self.enrollments {
            let subject = format!("enrollment {}/{}", e.course, e.student);
            if let Err(err) = registry.enroll(e.course, e.student) {
                note(subject, &err);
                continue;
            }
            if let Some(delta) = e.grade_delta {
                if let Err(err) = registry.modify_grade(e.course, e.student, delta) {
                    note(subject.clone(), &err);
                }
            }
            if let Some(rating) = e.rating {
                if let Err(err) = registry.rate_course(e.course, e.student, rating) {
                    note(subject, &err);
                }
            }
        }

        Replay { registry, issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[users]]
id = 1
name = "Mazen"
email = "Mazen@GroupWork.com"
role = "student"

[[users]]
id = 2
name = "Meshal"
email = "Meshal@GroupWork.com"

[[users]]
id = 3
name = "Rayan"
email = "Rayan@GroupWork.com"
role = "instructor"

[[courses]]
id = 1
title = "Learn Java fundamentals in two weeks!"
capacity = 20
price = 23.99
level = "beginner"
instructor = 3

[[courses.modules]]
title = "Getting started"
lessons = [
    { title = "Installing the JDK", duration_minutes = 15 },
    { title = "Hello world", duration_minutes = 20 },
]

[[courses]]
id = 3
title = "Take your java skills to the next level"
capacity = 1
level = "advanced"

[[enrollments]]
course = 1
student = 1
grade_delta = 80.0
rating = 5.0

[[enrollments]]
course = 1
student = 2
grade_delta = 90.0
"#;

    fn config() -> RegistrarConfig {
        RegistrarConfig::default()
    }

    #[test]
    fn parse_valid_toml() {
        let roster = parse_roster_str(VALID_TOML, &PathBuf::from("r.toml"), &config()).unwrap();
        assert_eq!(roster.users.len(), 3);
        assert_eq!(roster.users[1].role(), Role::Student);
        assert_eq!(roster.courses.len(), 2);
        assert_eq!(roster.courses[0].instructor, Some(UserId(3)));
        assert_eq!(roster.courses[0].course.modules()[0].total_minutes(), 35);
        assert_eq!(roster.courses[1].course.level, Level::Advanced);
        assert_eq!(roster.enrollments[0].grade_delta, Some(80.0));
        assert!(validate_roster(&roster).is_empty());
    }

    #[test]
    fn missing_capacity_uses_config_default() {
        let toml = r#"
[[courses]]
id = 1
title = "No capacity"
"#;
        let roster = parse_roster_str(toml, &PathBuf::from("r.toml"), &config()).unwrap();
        assert_eq!(roster.courses[0].course.capacity(), 15);
        assert_eq!(roster.courses[0].course.level, Level::Beginner);
    }

    #[test]
    fn unknown_role_is_an_error() {
        let toml = r#"
[[users]]
id = 1
name = "X"
role = "janitor"
"#;
        let err = parse_roster_str(toml, &PathBuf::from("r.toml"), &config()).unwrap_err();
        assert!(err.to_string().contains("unknown role"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_roster_str(bad, &PathBuf::from("bad.toml"), &config()).is_err());
    }

    #[test]
    fn validate_flags_duplicates_and_bad_references() {
        let toml = r#"
[[users]]
id = 1
name = "Mazen"
email = "a@x.com"

[[users]]
id = 1
name = "Again"
email = "A@X.com"

[[users]]
id = 4
name = "Osama"
role = "admin"

[[courses]]
id = 1
title = "Java"
capacity = 0
instructor = 4

[[enrollments]]
course = 9
student = 4
"#;
        let roster = parse_roster_str(toml, &PathBuf::from("r.toml"), &config()).unwrap();
        let warnings = validate_roster(&roster);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate user ID")));
        assert!(messages.iter().any(|m| m.contains("email already used")));
        assert!(messages.iter().any(|m| m.contains("capacity is 0")));
        assert!(messages.iter().any(|m| m.contains("not an instructor")));
        assert!(messages.iter().any(|m| m.contains("course 9 is not in the roster")));
        assert!(messages.iter().any(|m| m.contains("not a student")));
    }

    #[test]
    fn validate_flags_oversubscribed_course() {
        let toml = r#"
[[users]]
id = 1
name = "A"
[[users]]
id = 2
name = "B"

[[courses]]
id = 1
title = "Tiny"
capacity = 1

[[enrollments]]
course = 1
student = 1
[[enrollments]]
course = 1
student = 2
"#;
        let roster = parse_roster_str(toml, &PathBuf::from("r.toml"), &config()).unwrap();
        let warnings = validate_roster(&roster);
        assert!(warnings.iter().any(|w| w.message.contains("2 enrollments for 1 seats")));
    }

    #[test]
    fn replay_builds_registry() {
        let roster = parse_roster_str(VALID_TOML, &PathBuf::from("r.toml"), &config()).unwrap();
        let replay = roster.replay(config());
        assert!(replay.issues.is_empty(), "{:?}", replay.issues);

        let r = &replay.registry;
        assert_eq!(r.users().len(), 3);
        assert_eq!(r.courses_taught_by(UserId(3)).len(), 1);
        let course = r.find_course_by_id(CourseId(1)).unwrap();
        assert_eq!(course.enrolled_students().len(), 2);
        assert_eq!(course.average_rating(), 5.0);

        let ids: Vec<u32> = r.students_sorted_by_gpa().iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn replay_reports_rejected_actions_and_keeps_going() {
        let toml = r#"
[[users]]
id = 1
name = "A"
[[users]]
id = 2
name = "B"

[[courses]]
id = 1
title = "Tiny"
capacity = 1

[[enrollments]]
course = 1
student = 1
grade_delta = 120.0
rating = 9.0

[[enrollments]]
course = 1
student = 2
"#;
        let roster = parse_roster_str(toml, &PathBuf::from("r.toml"), &config()).unwrap();
        let replay = roster.replay(config());
        let messages: Vec<&str> = replay.issues.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages.len(), 3, "{messages:?}");
        assert!(messages[0].contains("outside the 0-100 range"));
        assert!(messages[1].contains("must be between"));
        assert!(messages[2].contains("is full"));
        assert_eq!(
            replay
                .registry
                .find_course_by_id(CourseId(1))
                .unwrap()
                .enrolled_students(),
            &[UserId(1)]
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, VALID_TOML).unwrap();
        let roster = parse_roster(&path, &config()).unwrap();
        assert_eq!(roster.users.len(), 3);
        assert!(parse_roster(&dir.path().join("missing.toml"), &config()).is_err());
    }
}
