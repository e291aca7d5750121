use crate::infra::{load_registry, parse_date};
use chrono::NaiveDate;
use clap::Args;
use licensing::eligibility::{
    ApplicationIntent, Clock, FixedClock, LicenseApplication, LicenseEligibilityEngine,
    LicenseValidationResult, PersonId, RuleBook, SystemClock,
};
use licensing::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Applicant birth date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) birth_date: NaiveDate,
    /// Requested category codes, comma separated (e.g. B,C1)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) categories: Vec<String>,
    /// NEW_LICENSE, LEARNERS_PERMIT, RENEWAL or UPGRADE
    #[arg(long, default_value = "NEW_LICENSE")]
    pub(crate) intent: String,
    /// Person identifier used for the registry lookup
    #[arg(long, default_value = "walk-in")]
    pub(crate) person: String,
    /// JSON registry snapshot keyed by person id
    #[arg(long)]
    pub(crate) registry: Option<PathBuf>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        birth_date,
        categories,
        intent,
        person,
        registry,
        today,
    } = args;

    let intent = ApplicationIntent::parse(&intent)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown application intent '{intent}'")))?;
    let registry = load_registry(registry.as_deref())?;
    let today = today.unwrap_or_else(|| SystemClock.today());

    let engine = LicenseEligibilityEngine::new(
        Arc::new(RuleBook::standard()),
        Arc::new(registry),
        FixedClock(today),
    );

    let application = LicenseApplication {
        intent,
        requested_categories: categories,
        birth_date,
        person_id: PersonId(person),
        external_permit: None,
        external_license: None,
    };

    let result = engine.validate_application(&application).await;
    let summary = engine.summary(&application.person_id).await;

    println!("License Eligibility Check");
    println!("=========================");
    println!("Person       : {}", application.person_id.0);
    println!("Intent       : {}", intent.label());
    println!("Evaluated on : {}", today);
    println!(
        "Held         : {}",
        render_codes(summary.held_categories.iter().map(|code| code.code()))
    );
    println!();
    render_result(&result);

    Ok(())
}

fn render_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    let joined = codes.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

fn render_result(result: &LicenseValidationResult) {
    let verdict = if result.is_valid() {
        "ADMISSIBLE"
    } else {
        "REJECTED"
    };
    println!("Verdict      : {verdict}");
    println!("Message      : {}", result.message());

    for violation in result.age_violations() {
        println!("  - age: {}", violation.describe());
    }
    if !result.missing_prerequisites().is_empty() {
        println!(
            "  - missing prerequisites: {}",
            render_codes(result.missing_prerequisites().iter().map(|code| code.code()))
        );
    }
    for combination in result.invalid_combinations() {
        println!("  - invalid: {combination}");
    }
}
