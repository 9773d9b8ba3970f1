//! The `gradebook init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gradebook.toml").exists() {
        println!("gradebook.toml already exists, skipping.");
    } else {
        std::fs::write("gradebook.toml", SAMPLE_CONFIG)?;
        println!("Created gradebook.toml");
    }

    std::fs::create_dir_all("snapshots")?;
    let example_path = std::path::Path::new("snapshots/example.json");
    if example_path.exists() {
        println!("snapshots/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SNAPSHOT)?;
        println!("Created snapshots/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: gradebook validate");
    println!("  2. Run: gradebook course --course \"CS 246\"");
    println!("  3. Run: gradebook term --term \"Fall 2025\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradebook configuration

data = "snapshots/example.json"

# Lowest value shown for a course's worst-case grade
range_floor = 32

# Credits for courses that do not record any
default_credits = 0.5

# Grade needed for a course's credits to count as earned
passing_grade = 50

# GPA cutoffs, highest first. Omit to use the built-in 4.0 scale.
# [[gpa_scale]]
# min_percent = 90
# gpa = 4.0
"#;

const EXAMPLE_SNAPSHOT: &str = include_str!("../../../../snapshots/example.json");
