use clap::Parser;
use order_summarizer::ClientFilter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "order_summarizer")]
#[command(about = "Summarize order statuses by zone and client", long_about = None)]
pub struct Cli {
    /// Order file to summarize (.xlsx, .xls or .csv)
    pub input: PathBuf,

    /// Configuration file (defaults to ./summarizer.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the generated workbook
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Also write the JSON summary response to this file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Rows shown per preview table
    #[arg(long)]
    pub preview: Option<usize>,

    /// Only show clients in this zone
    #[arg(long)]
    pub zone: Option<String>,

    /// Only show this client
    #[arg(long)]
    pub client: Option<String>,

    /// Only show clients in this state
    #[arg(long)]
    pub state: Option<String>,

    /// Minimum Completion% (0-100)
    #[arg(long)]
    pub min_completion: Option<f64>,

    /// Only show clients with at least one cancelled order
    #[arg(long)]
    pub cancelled_only: bool,
}

impl Cli {
    pub fn client_filter(&self) -> ClientFilter {
        ClientFilter {
            zone: self.zone.clone(),
            client: self.client.clone(),
            state: self.state.clone(),
            min_completion_pct: self.min_completion,
            cancelled_only: self.cancelled_only,
        }
    }
}
