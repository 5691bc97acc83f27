use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use agtrace_types::{BatchId, EventType};

#[derive(Parser)]
#[command(
    name = "agtrace",
    about = "agtrace: farm-to-shelf batch traceability",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file. Without one, a small demo ledger is used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List batches on the ledger
    List(ListArgs),
    /// Show a batch and its event timeline
    Show(ShowArgs),
    /// Show the event types the configured identity may record
    Events,
    /// Record an event against a batch
    Record(RecordArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Batch id, with or without a leading '#'
    pub batch: BatchId,
}

#[derive(Args)]
pub struct RecordArgs {
    pub batch: BatchId,
    #[arg(short = 't', long = "type")]
    pub event_type: EventKind,
    #[arg(short, long)]
    pub location: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// 1 to 10, quality checks only
    #[arg(long)]
    pub quality_score: Option<u8>,
    /// Certificate reference, quality checks only
    #[arg(long, default_value = "")]
    pub certificate: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EventKind {
    Harvest,
    Shipment,
    Processing,
    QualityCheck,
    Sale,
}

impl From<EventKind> for EventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Harvest => EventType::Harvest,
            EventKind::Shipment => EventType::Shipment,
            EventKind::Processing => EventType::Processing,
            EventKind::QualityCheck => EventType::QualityCheck,
            EventKind::Sale => EventType::Sale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_command() {
        let cli = Cli::try_parse_from([
            "agtrace",
            "record",
            "#42",
            "--type",
            "quality-check",
            "--location",
            "Akure mill",
            "--quality-score",
            "8",
        ])
        .unwrap();
        match cli.command {
            Command::Record(args) => {
                assert_eq!(args.batch, BatchId::new(42).unwrap());
                assert_eq!(EventType::from(args.event_type), EventType::QualityCheck);
                assert_eq!(args.quality_score, Some(8));
                assert!(args.notes.is_empty());
            }
            _ => panic!("expected record"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn rejects_zero_batch_id() {
        assert!(Cli::try_parse_from(["agtrace", "show", "0"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["agtrace", "list", "--format", "json", "-v", "-n", "5"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::List(ListArgs { limit: Some(5) })));
    }
}
