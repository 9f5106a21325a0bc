use benefit_navigator::config::AppConfig;
use benefit_navigator::eligibility::{
    load_answers, metadata, CycleResult, EligibilityRegistry, EvaluationContext, FormData,
    FormProgress, RegistryState, StrategyKind,
};
use benefit_navigator::error::AppError;
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Upper bound on cycles; a fixed point is normally reached after the first.
const MAX_CYCLES: usize = 8;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// CSV file with `field,value` rows holding the user's answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Optional CSV file used to prefill newly revealed sections
    #[arg(long)]
    pub(crate) prefill: Option<PathBuf>,
    /// Section strategy (`ordered` or `rapid`); defaults to APP_SECTION_STRATEGY
    #[arg(long)]
    pub(crate) strategy: Option<StrategyKind>,
    /// Evaluation date used for age calculations (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationReport {
    pub(crate) strategy: StrategyKind,
    pub(crate) today: NaiveDate,
    pub(crate) cycles: usize,
    #[serde(flatten)]
    pub(crate) cycle: CycleResult,
    pub(crate) progress: FormProgress,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        answers,
        prefill,
        strategy,
        today,
        json,
    } = args;

    let strategy = match strategy {
        Some(kind) => kind,
        None => AppConfig::load()?.eligibility.strategy,
    };
    let answers = load_answers(&answers)?;
    let prefill = prefill.map(load_answers).transpose()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let report = evaluate_answers(&answers, prefill.as_ref(), strategy, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Repeat cycles until neither the registry state nor the answers change. Prefilled values
/// are merged into the working answers after every cycle and reported together.
pub(crate) fn evaluate_answers(
    answers: &FormData,
    prefill: Option<&FormData>,
    strategy: StrategyKind,
    today: NaiveDate,
) -> EvaluationReport {
    let registry = EligibilityRegistry::from_kind(strategy);
    let context = EvaluationContext::new(today);

    let mut state = RegistryState::default();
    let mut working = answers.clone();
    let mut prefilled = FormData::new();
    let mut cycles = 0;

    let mut cycle = loop {
        let (next, cycle) = registry.evaluate(&state, &working, prefill, &context);
        cycles += 1;

        prefilled = prefilled.merged(&cycle.prefilled_fields);
        let next_working = working.merged(&cycle.prefilled_fields);
        let settled = next == state && next_working == working;

        state = next;
        working = next_working;
        if settled || cycles >= MAX_CYCLES {
            break cycle;
        }
    };
    cycle.prefilled_fields = prefilled;

    let progress = FormProgress::from_cycle(&cycle, &working);

    EvaluationReport {
        strategy,
        today,
        cycles,
        cycle,
        progress,
    }
}

pub(crate) fn render_text(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let cycle = &report.cycle;

    let _ = writeln!(
        out,
        "Eligibility screening ({} strategy, {})",
        report.strategy, report.today
    );
    let _ = writeln!(
        out,
        "Progress: {}/{} fields ({}%)",
        report.progress.filled, report.progress.total, report.progress.percent
    );

    let _ = writeln!(out, "\nResults");
    for result in &cycle.all {
        let _ = writeln!(
            out,
            "- [{}] {}: {}",
            result.status.label(),
            result.subsidy_name,
            result.reason
        );
        if let Some(url) = &result.url {
            let _ = writeln!(out, "    {url}");
        }
    }

    if !cycle.prefilled_fields.is_empty() {
        let _ = writeln!(out, "\nPrefilled");
        for (field, value) in cycle.prefilled_fields.iter() {
            let rendered = serde_json::to_string(value).unwrap_or_default();
            let _ = writeln!(out, "- {}: {}", metadata(field).label, rendered);
        }
    }

    let open: Vec<_> = cycle
        .visible_sections
        .iter()
        .filter(|section| !section.fields.is_empty())
        .collect();
    if open.is_empty() {
        let _ = writeln!(out, "\nNo further questions.");
    } else {
        let _ = writeln!(out, "\nNext questions");
        for section in open {
            let _ = writeln!(out, "{}:", section.title);
            for &field in &section.fields {
                let marker = if cycle.missing_fields.contains(&field) {
                    "*"
                } else {
                    " "
                };
                let _ = writeln!(out, "  {marker} {}", metadata(field).label);
            }
        }
    }

    out
}
