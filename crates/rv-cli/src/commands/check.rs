use std::path::Path;

use colored::Colorize;

use super::plural;

pub fn run(dir: &Path) -> Result<(), String> {
    let pack = super::load_pack(dir)?;
    let report = pack.check().map_err(|e| e.to_string())?;

    for warning in &report.warnings {
        eprintln!("  {} {warning}", "warning:".yellow());
    }
    for error in &report.errors {
        eprintln!("  {} {error}", "error:".red());
    }

    let errors = report.errors.len();
    let warnings = report.warnings.len();
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            plural(errors),
            plural(warnings)
        ));
    }

    println!("  All checks passed for '{}'.", dir.display());
    println!(
        "  {} dialogue{}, {} interactable{}, {} item{}",
        report.dialogues,
        plural(report.dialogues),
        report.definitions,
        plural(report.definitions),
        report.items,
        plural(report.items),
    );
    if warnings > 0 {
        println!("  {warnings} warning{}", plural(warnings));
    }

    Ok(())
}
