//! The `registrar report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use registrar_core::report::RegistryReport;

pub fn execute(roster_path: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let replay = super::load_registry(&roster_path, config_path)?;
    let report = RegistryReport::from_registry(&replay.registry);

    match format.as_str() {
        "json" => {
            println!("{}", report.to_json()?);
        }
        "text" => print_text(&report),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_text(report: &RegistryReport) {
    println!(
        "{} users, {} courses",
        report.user_count, report.course_count
    );

    println!("\nStudents sorted by GPA:");
    if report.students_by_gpa.is_empty() {
        println!("  No students found.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Name", "Email", "Courses", "GPA"]);
        for s in &report.students_by_gpa {
            table.add_row(vec![
                s.id.to_string(),
                s.name.clone(),
                s.email.clone(),
                s.enrolled_courses.len().to_string(),
                format!("{:.2}", s.gpa),
            ]);
        }
        println!("{table}");
    }

    println!("\nCourses sorted by difficulty:");
    if report.courses_by_difficulty.is_empty() {
        println!("  No courses found.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "ID", "Title", "Level", "Seats", "Rating", "Price", "Modules",
        ]);
        for c in &report.courses_by_difficulty {
            table.add_row(vec![
                c.id.to_string(),
                c.title.clone(),
                c.level.to_string(),
                format!("{}/{}", c.enrolled, c.capacity),
                format!("{:.1} ({})", c.average_rating, c.rating_count),
                format!("{:.2}", c.price),
                c.modules.to_string(),
            ]);
        }
        println!("{table}");
    }
}
