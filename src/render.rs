use job_tracker::workflows::tracking::{RunSummary, SheetStatus, WorkbookSummary};

pub fn run_summary(summary: &RunSummary) {
    println!("Job application tracking run");
    println!(
        "Started {} / finished {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "LinkedIn session: {}",
        if summary.linkedin_signed_in {
            "signed in"
        } else {
            "not signed in"
        }
    );

    println!("\nWorksheets");
    for sheet in &summary.sheets {
        match &sheet.status {
            SheetStatus::Updated { rows } => println!("- {}: {} rows updated", sheet.title, rows),
            SheetStatus::MissingColumns => {
                println!("- {}: skipped (no URL/Decision columns)", sheet.title)
            }
            SheetStatus::Failed { reason } => println!("- {}: failed ({})", sheet.title, reason),
        }
    }

    println!("\nTotal rows updated: {}", summary.total_updated());
}

pub fn workbook_summary(summary: &WorkbookSummary) {
    println!("Job application summary");
    println!(
        "{} applications, {} awaiting a status",
        summary.applications, summary.pending
    );

    println!("\nBy decision");
    if summary.by_decision.is_empty() {
        println!("- none recorded");
    }
    for (decision, count) in summary.ranked_decisions() {
        println!("- {decision}: {count}");
    }

    println!("\nBy portal");
    for (domain, count) in &summary.by_domain {
        println!("- {}: {}", domain.label(), count);
    }

    if !summary.skipped_sheets.is_empty() {
        println!(
            "\nSkipped worksheets without URL/Decision columns: {}",
            summary.skipped_sheets.join(", ")
        );
    }
}

pub fn workbook_summary_json(summary: &WorkbookSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(body) => println!("{body}"),
        Err(err) => eprintln!("unable to encode summary: {err}"),
    }
}
