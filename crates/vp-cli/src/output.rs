//! Output formatting utilities.

use vp_canonical::ConformanceReport;
use vp_core::{AuthorshipReport, VerificationReport};

/// Prints a verification report as pretty JSON.
pub fn print_report(report: &VerificationReport) {
    println!("{}", report.to_json_pretty());
}

/// Prints one line per failing vector, or a success line.
pub fn print_conformance(report: &ConformanceReport) {
    if report.is_success() {
        println!("All conformance vectors passed.");
        return;
    }
    for failure in &report.failures {
        println!("FAIL: {}", failure);
    }
}

/// Prints authorship findings followed by a summary line.
pub fn print_findings(report: &AuthorshipReport) {
    for finding in &report.findings {
        println!("{}", finding);
    }
    if report.passed() {
        println!("Authorship check passed.");
    } else {
        println!("Authorship check failed.");
    }
}
