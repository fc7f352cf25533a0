//! Tool availability report.

use console::style;

use crate::ocr::tools::check_tools;

/// Print availability of the external binaries the pipeline shells
/// out to.
pub fn cmd_check() -> anyhow::Result<()> {
    println!("\n{}", style("Extraction Tool Status").bold());
    println!("{}", "-".repeat(40));

    let mut all_found = true;
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<12} {}", tool, status);
    }

    if all_found {
        println!("\n{} All extraction tools available", style("✓").green());
    } else {
        println!(
            "\n{} Install poppler-utils and tesseract-ocr (Bangla rolls also need tesseract-ocr-ben)",
            style("!").yellow()
        );
    }
    Ok(())
}
