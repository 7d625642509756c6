use crate::verify::Verifier;
use std::path::PathBuf;
use std::time::Instant;

pub fn run(dir: PathBuf, json: bool) -> anyhow::Result<()> {
    if !dir.exists() {
        anyhow::bail!("input directory does not exist: {}", dir.display());
    }

    let start = Instant::now();
    let verifier = Verifier::new(dir);
    let summary = verifier.verify();
    let elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for report in &summary.reports {
            eprintln!("Checking: {}", report.relationship);
            eprintln!("  {}", report.status);
            eprintln!();
        }

        eprintln!("Verification summary:");
        eprintln!("  Relationships checked: {}", summary.checked);
        eprintln!("  Passed: {}", summary.passed);
        eprintln!("  Failed: {}", summary.failed);
        eprintln!("  Time: {:.3?}", elapsed);
        eprintln!();

        if summary.all_passed {
            eprintln!("Result: PASSED - dataset is consistent and ready for loading");
        } else {
            eprintln!("Result: FAILED - review the errors above and regenerate the dataset");
        }
    }

    // Exit code
    if !summary.all_passed {
        std::process::exit(1);
    }

    Ok(())
}
