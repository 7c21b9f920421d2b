//! List checks command implementation.

use presubmit_checks::all_checks;

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for check in all_checks() {
        println!(
            "{:<10} {:<25} {}",
            check.code(),
            check.name(),
            check.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - PS001, PS002, PS003 (default)");
    println!("  strict       - All checks, BUG field required");
    println!("  minimal      - PS003 only");

    println!("\nUse --checks to filter specific checks, e.g.:");
    println!("  presubmit check --checks gn-no-mixing-sources api/BUILD.gn");
    println!("  presubmit check --checks PS001 --bug webrtc:1234");
}
