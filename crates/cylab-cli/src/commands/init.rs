//! The `cylab init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("cylab.toml").exists() {
        println!("cylab.toml already exists, skipping.");
    } else {
        std::fs::write("cylab.toml", SAMPLE_CONFIG)?;
        println!("Created cylab.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust cylab.toml for your laboratory");
    println!("  2. Run: cylab shell");
    println!("  3. Run: cylab report --input <export.csv>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# cylab configuration

# Highest accepted compressive strength, in MPa
max_strength = 100.0

# CSV exports are written to <export_dir>/<export_prefix>_YYYYMMDD.csv
export_prefix = "ensayos_concreto"
export_dir = "."

# Cap on histogram bins
histogram_max_bins = 10

# Date format used in tables (chrono strftime syntax)
display_date_format = "%d/%m/%Y"
"#;
