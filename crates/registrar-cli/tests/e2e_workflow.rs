//! End-to-end tests: roster file -> replayed registry -> views and report.

use std::path::Path;

use registrar_core::config::RegistrarConfig;
use registrar_core::model::{CourseId, Level, Role, UserId};
use registrar_core::report::RegistryReport;
use registrar_core::roster::{parse_roster, parse_roster_str, validate_roster};
use registrar_core::search::SearchOutcome;
use registrar_core::RegistryError;

const TERM: &str = r#"
[[users]]
id = 1
name = "Mazen"
email = "Mazen@GroupWork.com"

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
id = 10
title = "Take your java skills to the next level"
capacity = 1
level = "advanced"

[[courses]]
id = 11
title = "Learn Java fundamentals"
capacity = 2
level = "beginner"
instructor = 3

[[enrollments]]
course = 11
student = 1
grade_delta = 70.0

[[enrollments]]
course = 10
student = 1
grade_delta = 90.0
rating = 5.0

[[enrollments]]
course = 10
student = 2
"#;

#[test]
fn term_replays_into_consistent_registry() {
    let config = RegistrarConfig::default();
    let roster = parse_roster_str(TERM, Path::new("term.toml"), &config).unwrap();

    let warnings = validate_roster(&roster);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].message.contains("2 enrollments for 1 seats"));

    let replay = roster.replay(config);
    assert_eq!(replay.issues.len(), 1);
    assert!(replay.issues[0].message.contains("is full"));

    let mut registry = replay.registry;
    let mazen = registry.find_user_by_id(UserId(1)).unwrap();
    assert_eq!(mazen.gpa(), Some(80.0));
    assert_eq!(registry.courses_taught_by(UserId(3))[0].id(), CourseId(11));

    // Meshal was turned away, so the GPA view puts them first at 0.
    let order: Vec<UserId> = registry
        .students_sorted_by_gpa()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(order, vec![UserId(2), UserId(1)]);

    // Dropping frees the seat for the next student.
    registry.drop_student(CourseId(10), UserId(1)).unwrap();
    registry.enroll(CourseId(10), UserId(2)).unwrap();
    registry.modify_grade(CourseId(10), UserId(2), 95.0).unwrap();
    let order: Vec<UserId> = registry
        .students_sorted_by_gpa()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(order, vec![UserId(1), UserId(2)]);

    // The rating survives the drop but is gone with the course.
    let advanced = registry.find_course_by_id(CourseId(10)).unwrap();
    assert_eq!(advanced.average_rating(), 5.0);
    assert!(registry.remove_course(CourseId(10)));
    let meshal = registry.find_user_by_id(UserId(2)).unwrap();
    assert_eq!(meshal.gpa(), Some(0.0));

    let levels: Vec<Level> = registry
        .courses_sorted_by_difficulty()
        .iter()
        .map(|c| c.level)
        .collect();
    assert_eq!(levels, vec![Level::Beginner]);
}

#[test]
fn search_over_replayed_registry() {
    let config = RegistrarConfig::default();
    let replay = parse_roster_str(TERM, Path::new("term.toml"), &config)
        .unwrap()
        .replay(config);
    let registry = replay.registry;

    let outcome = registry.search("m", Some(Role::Student)).unwrap();
    assert_eq!(
        outcome,
        SearchOutcome::Matches {
            users: vec![
                registry.find_user_by_id(UserId(1)).unwrap(),
                registry.find_user_by_id(UserId(2)).unwrap(),
            ],
            total: 2,
        }
    );

    let rayan = registry.search("ray", None).unwrap().single().unwrap();
    assert_eq!(rayan.role(), Role::Instructor);

    let err = registry.search("3", Some(Role::Student)).unwrap_err();
    assert_eq!(
        err,
        RegistryError::UserNotFound("The student with the id of: 3 was not found.".into())
    );
    assert_eq!(registry.search("0", None).unwrap(), SearchOutcome::Cancelled);
}

#[test]
fn report_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("term.toml");
    std::fs::write(&path, TERM).unwrap();

    let config = RegistrarConfig::default();
    let replay = parse_roster(&path, &config).unwrap().replay(config);
    let report = RegistryReport::from_registry(&replay.registry);

    assert_eq!(report.user_count, 3);
    assert_eq!(report.course_count, 2);
    assert_eq!(report.students_by_gpa[1].name, "Mazen");
    assert_eq!(report.students_by_gpa[1].enrolled_courses.len(), 2);
    assert_eq!(report.courses_by_difficulty[0].id, CourseId(11));
    assert_eq!(report.courses_by_difficulty[1].rating_count, 1);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"students_by_gpa\""));
}
