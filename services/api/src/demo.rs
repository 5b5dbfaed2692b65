use crate::infra::{InMemoryCandidateRepository, InMemorySessionStore};
use candidature::error::AppError;
use candidature::workflows::candidature::{
    CandidatureService, ConfirmationView, SessionId, StepOutcome, StepSubmission, STEPS,
};
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[arg(long, default_value = "Test")]
    pub(crate) first_name: String,
    #[arg(long, default_value = "User")]
    pub(crate) last_name: String,
    #[arg(long, default_value = "test.user@example.com")]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Describe prior experience; omitting it skips the experience step.
    #[arg(long)]
    pub(crate) experience: Option<String>,
    /// Availability date (YYYY-MM-DD). Defaults to immediate availability.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) available_from: Option<NaiveDate>,
    /// Refuse the RGPD consent to see the final step rejected.
    #[arg(long)]
    pub(crate) decline_consent: bool,
    /// Print the confirmation as JSON instead of the summary lines.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SchemaArgs {
    /// Print the step table as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = CandidatureService::new(
        Arc::new(InMemoryCandidateRepository::default()),
        Arc::new(InMemorySessionStore::default()),
    );
    let session = SessionId::generate();

    println!("Candidature wizard demo");
    for submission in demo_submissions(&args) {
        let view = match service.current_step(&session) {
            Ok(view) => view,
            Err(err) => {
                println!("  Wizard unavailable: {}", err);
                return Ok(());
            }
        };
        println!("\n{} ({})", view.title, view.label);

        match service.submit(&session, submission) {
            Ok(StepOutcome::Advanced(next)) => println!("  -> step {}", next.number()),
            Ok(StepOutcome::Completed(candidate)) => {
                let confirmation = ConfirmationView::from(&candidate);
                println!("\n{} ({})", confirmation.title, candidate.full_name());
                if args.json {
                    match serde_json::to_string_pretty(&confirmation) {
                        Ok(json) => println!("{}", json),
                        Err(err) => println!("  Confirmation payload unavailable: {}", err),
                    }
                } else {
                    for line in &confirmation.summary {
                        println!("  {}", line);
                    }
                }
                return Ok(());
            }
            Ok(StepOutcome::Invalid(view)) => {
                println!("  Step rejected:");
                for violation in &view.errors {
                    println!("    {}: {}", violation.field, violation.message);
                }
                return Ok(());
            }
            Ok(other) => println!("  Unexpected outcome: {:?}", other),
            Err(err) => {
                println!("  Submission failed: {}", err);
                return Ok(());
            }
        }
    }

    Ok(())
}

fn demo_submissions(args: &DemoArgs) -> Vec<StepSubmission> {
    let checked = |value: bool| value.then(|| "1".to_string());

    let mut submissions = vec![StepSubmission {
        first_name: Some(args.first_name.clone()),
        last_name: Some(args.last_name.clone()),
        email: Some(args.email.clone()),
        phone: args.phone.clone(),
        has_experience: checked(args.experience.is_some()),
        ..StepSubmission::default()
    }];

    if let Some(details) = &args.experience {
        submissions.push(StepSubmission {
            experience_details: Some(details.clone()),
            ..StepSubmission::default()
        });
    }

    submissions.push(StepSubmission {
        availability_date: args
            .available_from
            .map(|date| date.format("%Y-%m-%d").to_string()),
        is_immediately_available: checked(args.available_from.is_none()),
        ..StepSubmission::default()
    });

    submissions.push(StepSubmission {
        consent_rgpd: checked(!args.decline_consent),
        ..StepSubmission::default()
    });

    submissions
}

pub(crate) fn print_schema(args: SchemaArgs) -> Result<(), AppError> {
    if args.json {
        match serde_json::to_string_pretty(&STEPS) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Step table unavailable: {}", err),
        }
        return Ok(());
    }

    for spec in STEPS.iter() {
        println!("Étape {} - {}", spec.step, spec.label);
        if spec.fields.is_empty() {
            println!("  (confirmation, no inputs)");
        }
        for field in spec.fields {
            println!(
                "  {:<24} {:<9} {:<9} {}",
                field.field.key(),
                field.kind.as_str(),
                if field.required { "required" } else { "optional" },
                field.label
            );
        }
    }

    Ok(())
}
