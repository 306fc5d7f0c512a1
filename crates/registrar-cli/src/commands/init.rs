//! The `registrar init` command.

use std::path::Path;

use anyhow::{Context, Result};

/// Starter files, in the order they are written.
const STARTER_FILES: [(&str, &str); 2] = [
    ("registrar.toml", SAMPLE_CONFIG),
    ("rosters/example.toml", EXAMPLE_ROSTER),
];

pub fn execute() -> Result<()> {
    for (path, content) in STARTER_FILES {
        write_unless_exists(Path::new(path), content)?;
    }

    println!("\nNext steps:");
    println!("  1. Edit rosters/example.toml with your users and courses");
    println!("  2. Run: registrar validate --roster rosters/example.toml");
    println!("  3. Run: registrar report --roster rosters/example.toml");

    Ok(())
}

/// Write `content` to `path`, creating parent directories. An existing file
/// is left alone.
fn write_unless_exists(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# registrar configuration

search_page_size = 10
min_rating = 1.0
max_rating = 5.0
default_capacity = 15
"#;

const EXAMPLE_ROSTER: &str = r#"[[users]]
id = 1
name = "Mazen"
email = "Mazen@GroupWork.com"
role = "student"

[[users]]
id = 2
name = "Meshal"
email = "Meshal@GroupWork.com"
role = "student"

[[users]]
id = 3
name = "Rayan"
email = "Rayan@GroupWork.com"
role = "instructor"

[[users]]
id = 4
name = "Osama"
email = "Osama@GroupWork.com"
role = "admin"

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
    { title = "Hello, world", duration_minutes = 20 },
]

[[courses]]
id = 2
title = "Java OOP from zero to hero in 30 days!"
capacity = 30
price = 43.99
level = "intermediate"
instructor = 3

[[courses]]
id = 3
title = "Take your java skills to the next level in just 20 days!"
capacity = 10
price = 67.99
level = "advanced"

[[enrollments]]
course = 1
student = 1
grade_delta = 82.5
rating = 5.0

[[enrollments]]
course = 2
student = 1
grade_delta = 74.0

[[enrollments]]
course = 1
student = 2
grade_delta = 91.0
rating = 4.0
"#;
