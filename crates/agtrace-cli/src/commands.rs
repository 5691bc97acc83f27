use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use agtrace_gateway::StaticIdentity;
use agtrace_payload::EventPayload;
use agtrace_service::{
    BatchTraceabilityService, BatchView, EventForm, EventType, HistoryState, PropagationStatus,
    SubmissionReceipt,
};
use agtrace_timeline::{present, summarize};

use crate::cli::*;
use crate::config::CliConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::demo(),
    };
    let service = build_service(&config)?;
    service.connect().await?;

    match cli.command {
        Command::List(args) => cmd_list(&service, args, cli.format).await,
        Command::Show(args) => cmd_show(&service, args, cli.format).await,
        Command::Events => cmd_events(&service, &config, cli.format).await,
        Command::Record(args) => cmd_record(&service, args, cli.format).await,
    }
}

fn build_service(config: &CliConfig) -> anyhow::Result<BatchTraceabilityService> {
    let ledger = config.build_ledger().context("seeding in-memory ledger")?;
    Ok(BatchTraceabilityService::new(
        Arc::new(ledger),
        Arc::new(StaticIdentity::new(config.identity.actor())),
        config.service.clone(),
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_list(
    service: &BatchTraceabilityService,
    args: ListArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let batches = service.list_batches(args.limit).await?;
    if format == OutputFormat::Json {
        return print_json(&batches);
    }

    if batches.is_empty() {
        println!("No batches on the ledger.");
        return Ok(());
    }
    for batch in &batches {
        let summary = summarize(batch);
        println!(
            "{}  {}  {}  {}",
            summary.id.yellow().bold(),
            summary.product_type.bold(),
            summary.creator_display.cyan(),
            summary.created_display.dimmed()
        );
    }
    Ok(())
}

async fn cmd_show(
    service: &BatchTraceabilityService,
    args: ShowArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let view = service.load_view(args.batch.get()).await?;
    if format == OutputFormat::Json {
        return print_json(&view);
    }
    print_view(&view);
    Ok(())
}

fn print_view(view: &BatchView) {
    let summary = summarize(&view.batch);
    println!("Batch {}  {}", summary.id.yellow().bold(), summary.product_type.bold());
    println!("  Creator: {}", summary.creator_display.cyan());
    println!("  Created: {}", summary.created_display);
    println!();

    let events = match &view.history {
        HistoryState::Loaded { events } => events,
        HistoryState::Unavailable { reason } => {
            println!("{} History could not be loaded: {}", "!".red().bold(), reason);
            return;
        }
    };
    if events.is_empty() {
        println!("No events recorded yet.");
        return;
    }

    for entry in present(events) {
        let marker = if entry.is_latest { "●".green().bold() } else { "○".normal() };
        println!(
            "{} {}  {}  by {}",
            marker,
            entry.label.bold(),
            entry.display_timestamp.dimmed(),
            entry.actor_display.cyan()
        );
        match EventPayload::parse(&entry.event.data_ref) {
            Some(fields) => {
                if let Some(location) = &fields.location {
                    println!("    Location: {location}");
                }
                if let Some(notes) = &fields.notes {
                    println!("    Notes: {notes}");
                }
                if let Some(score) = fields.quality_score {
                    println!("    Quality: {}", score.to_string().green());
                }
                if let Some(cert) = &fields.certificate_ref {
                    println!("    Certificate: {cert}");
                }
                if let Some(by) = &fields.recorded_by {
                    println!("    Recorded by: {by}");
                }
            }
            None => println!("    {}", entry.data_display),
        }
    }
}

async fn cmd_events(
    service: &BatchTraceabilityService,
    config: &CliConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let options = service.eligible_event_types().await;
    if format == OutputFormat::Json {
        return print_json(&options);
    }

    let actor = config.identity.actor();
    let role = actor
        .role()
        .map(|r| r.to_string())
        .unwrap_or_else(|| format!("unregistered ({})", actor.role_code));
    println!("{} as {}", actor.label.bold(), role.yellow());
    if options.is_empty() {
        println!("  No event types available for this role.");
    }
    for option in &options {
        println!("  {} {}", "•".green(), option.label);
    }
    Ok(())
}

async fn cmd_record(
    service: &BatchTraceabilityService,
    args: RecordArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let event_type = EventType::from(args.event_type);
    let form = EventForm::new(event_type, args.location)
        .with_notes(args.notes)
        .with_quality(args.quality_score, args.certificate);
    let receipt = service.submit_form(args.batch.get(), form).await?;
    if format == OutputFormat::Json {
        return print_json(&receipt);
    }
    print_receipt(&receipt);
    Ok(())
}

fn print_receipt(receipt: &SubmissionReceipt) {
    println!(
        "{} {} recorded for batch {}",
        "✓".green().bold(),
        receipt.event_type.label().bold(),
        receipt.batch_id.to_string().yellow()
    );
    println!("  Transaction: {}", receipt.tx_hash.short_hex().cyan());
    println!("  Payload: {}", receipt.payload_digest.short_hex().dimmed());
    match receipt.status {
        PropagationStatus::Confirmed => println!("  Status: {}", receipt.status.to_string().green()),
        PropagationStatus::PendingPropagation => println!(
            "  Status: {} (accepted, not yet visible to reads)",
            receipt.status.to_string().yellow()
        ),
    }
}
