use crate::infra::{ConfiguredStore, Engine};
use clap::Args;
use rfp_engine::catalog::{QuestionCatalog, QuestionId};
use rfp_engine::comparison::{ComparisonSummary, StarRating};
use rfp_engine::config::AppConfig;
use rfp_engine::error::AppError;
use rfp_engine::responses::{
    classify_edit, ResponseLifecycleManager, ResponseValue, SubjectId,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_VENDORS: [&str; 3] = ["acme", "beacon", "cobalt"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// RFP identifier the walkthrough answers for
    #[arg(long, default_value = "rfp-demo")]
    pub(crate) subject: String,
    /// Vendor to include in the comparison (repeatable; defaults to three sample vendors)
    #[arg(long = "vendor")]
    pub(crate) vendors: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ResetArgs {
    /// Store file to clear instead of the configured RFP_STORE_PATH
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { subject, vendors } = args;
    let vendors = if vendors.is_empty() {
        DEFAULT_VENDORS.iter().map(|vendor| vendor.to_string()).collect()
    } else {
        vendors
    };

    let quiet_period = Duration::from_millis(500);
    let engine = Engine::with_store(ConfiguredStore::open(None)?, quiet_period);
    let manager = engine.autosave.manager();
    let subject = SubjectId::new(subject);
    let followup = SubjectId::new(format!("{subject}-followup"));

    println!("RFP response engine demo ({subject})");

    let description = QuestionId::new("company_description");
    let record = manager.record_answer(
        &subject,
        &description,
        Some(ResponseValue::text("Regional integrator")),
    );
    println!("  answered {description}: {}", record.status.label());
    let record = manager.mark_complete(&subject, &description)?;
    println!("  marked complete: {}", record.status.label());
    let edit = classify_edit(
        Some(&record),
        Some(&ResponseValue::text("Regional integrator since 2009")),
    );
    println!("  editing a completed answer is an {}", edit.label());
    let record = manager.record_answer(
        &subject,
        &description,
        Some(ResponseValue::text("Regional integrator since 2009")),
    );
    println!("  after edit: {}", record.status.label());

    if let Some(prefilled) = manager.resolve(&followup, &description) {
        println!(
            "  {followup} reuses the answer: {} ({})",
            render_value(prefilled.value.as_ref()),
            prefilled.status.label()
        );
    }

    let overview = QuestionId::new("solution_overview");
    let start = Instant::now();
    for (offset, text) in [(0, "Phased"), (150, "Phased rollout"), (300, "Phased rollout in 3 waves")] {
        engine.autosave.on_change(
            subject.clone(),
            overview.clone(),
            Some(ResponseValue::text(text)),
            start + Duration::from_millis(offset),
        );
    }
    let written = engine
        .autosave
        .flush_due(start + Duration::from_millis(300) + quiet_period);
    println!(
        "  autosave coalesced 3 keystrokes into {} write(s)",
        written.len()
    );

    let stats = manager.catalog_progress(&subject);
    println!(
        "\nProgress: {} completed, {} in progress, {} remaining ({}%)",
        stats.completed, stats.in_progress, stats.remaining, stats.percentage
    );

    let opened = engine.comparisons.open(subject.clone(), vendors)?;
    let session_id = opened.session_id.clone();
    for section in &opened.sections {
        for (offset, question_id) in section.weights.keys().enumerate() {
            for (rank, vendor) in opened.vendors.iter().enumerate() {
                engine.comparisons.rate(
                    &session_id,
                    &vendor.vendor_id,
                    question_id,
                    sample_stars(rank, offset).stars(),
                )?;
            }
        }
    }
    let change = engine
        .comparisons
        .set_weight(&session_id, &QuestionId::new("pricing_model"), 50)?;
    println!(
        "\nReviewer asked for pricing_model = {}, applied {} ({})",
        change.requested, change.applied, change.section.status_label
    );

    let summary = engine.comparisons.summary(&session_id)?;
    println!("\n{}", render_comparison(&summary));
    Ok(())
}

pub(crate) fn run_reset(args: ResetArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let Some(path) = args.store.or(config.storage.store_path) else {
        println!("No RFP_STORE_PATH configured; the in-memory store starts empty on every run.");
        return Ok(());
    };

    let store = ConfiguredStore::open(Some(path.as_path()))?;
    let manager = ResponseLifecycleManager::new(Arc::new(store), Arc::new(QuestionCatalog::standard()));
    let cleared = manager.reset_demo();
    println!(
        "Cleared responses for {cleared} subject(s) and the shared answers in {}",
        path.display()
    );
    Ok(())
}

/// Deterministic half-star pattern so demo output is stable between runs.
fn sample_stars(vendor_rank: usize, question_offset: usize) -> StarRating {
    let halves = 10 - ((vendor_rank * 3 + question_offset) % 7);
    StarRating::new(halves as f64 / 2.0).unwrap_or_default()
}

fn render_value(value: Option<&ResponseValue>) -> String {
    match value {
        None => "(empty)".to_string(),
        Some(ResponseValue::Text(text)) => format!("\"{text}\""),
        Some(other) => serde_json::to_string(other).unwrap_or_else(|_| "(unprintable)".to_string()),
    }
}

pub(crate) fn render_comparison(summary: &ComparisonSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Comparison {} for {}",
        summary.session_id, summary.subject_id
    );

    let _ = write!(output, "{:<12}", "vendor");
    for section in &summary.sections {
        let _ = write!(output, " {:>26}", section.section);
    }
    let _ = writeln!(output, " {:>8} {:>6}", "overall", "match");

    for vendor in &summary.vendors {
        let _ = write!(output, "{:<12}", vendor.vendor_id);
        for score in &vendor.section_scores {
            let _ = write!(output, " {:>26.1}", score.score);
        }
        let _ = writeln!(
            output,
            " {:>8.1} {:>5}%",
            vendor.overall_score, vendor.match_percentage
        );
    }

    for section in &summary.sections {
        let _ = writeln!(
            output,
            "  {}: {} of 100 ({})",
            section.section, section.total, section.status_label
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfp_engine::comparison::ComparisonRegistry;

    #[test]
    fn sample_stars_stay_on_the_grid() {
        for rank in 0..5 {
            for offset in 0..6 {
                let stars = sample_stars(rank, offset).stars();
                assert!((2.0..=5.0).contains(&stars));
            }
        }
        assert_eq!(sample_stars(0, 0).stars(), 5.0);
    }

    #[test]
    fn comparison_table_lists_every_vendor_and_section() {
        let registry = ComparisonRegistry::new(Arc::new(QuestionCatalog::standard()));
        let summary = registry
            .open(
                SubjectId::new("rfp-1"),
                vec!["acme".to_string(), "beacon".to_string()],
            )
            .expect("session opens");

        let table = render_comparison(&summary);
        assert!(table.contains("acme"));
        assert!(table.contains("beacon"));
        assert!(table.contains("Pricing & Commercials: 100 of 100 (Balanced)"));
    }

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            subject: "rfp-test".to_string(),
            vendors: Vec::new(),
        };
        run_demo(args).expect("demo completes");
    }

    #[test]
    fn render_value_formats_shapes() {
        assert_eq!(render_value(None), "(empty)");
        assert_eq!(render_value(Some(&ResponseValue::text("hi"))), "\"hi\"");
        assert_eq!(
            render_value(Some(&ResponseValue::list(["a", "b"]))),
            "[\"a\",\"b\"]"
        );
    }
}
