//! External tool discovery.

/// Binaries the extraction pipeline shells out to.
pub const REQUIRED_TOOLS: [&str; 4] = ["pdftotext", "pdfinfo", "pdftoppm", "tesseract"];

/// Check whether a binary is available on PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Report availability of every external tool the pipeline uses.
pub fn check_tools() -> Vec<(&'static str, bool)> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| (*tool, check_binary(tool)))
        .collect()
}
