use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use openspace_core::{
    select_content, ChartOutcome, ChartPageController, ChartRequest, CoreConfig,
    HttpPatientLookup, OfflinePatientLookup, PatientLookup, PatientRecord, SessionContext,
    CHART_TABS, DEFAULT_APP_NAME, DEFAULT_PATIENT_API_TIMEOUT_SECS, DEFAULT_PATIENT_LIST_PATH,
    DEFAULT_SESSION_IDLE_MINUTES,
};
use openspace_types::PatientId;

#[derive(Parser)]
#[command(name = "openspace")]
#[command(about = "Openspace patient chart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chart tabs in navigation order
    Tabs,
    /// Print the placeholder record used when a patient cannot be loaded
    Placeholder {
        /// Patient id
        id: String,
    },
    /// Render a chart page to stdout
    Render {
        /// Patient id
        id: String,
        /// Tab identifier (defaults to summary)
        #[arg(long)]
        tab: Option<String>,
        /// Patient API base URL; without it the placeholder record is used
        #[arg(long)]
        api_url: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Tabs) => {
            for meta in CHART_TABS.iter() {
                let id = meta.tab.id();
                let fallback = if select_content(id).kind().id() == id {
                    ""
                } else {
                    " (shows summary)"
                };
                let special = if meta.special { " *" } else { "" };
                println!("{:<14} {}{}{}", id, meta.label, special, fallback);
            }
        }
        Some(Commands::Placeholder { id }) => {
            let id = PatientId::parse(&id)?;
            let record = PatientRecord::placeholder(id);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Some(Commands::Render { id, tab, api_url }) => {
            let request = ChartRequest { id: Some(id), tab };
            let runtime = tokio::runtime::Runtime::new()?;
            let html = match api_url {
                Some(url) => {
                    let cfg = Arc::new(CoreConfig::new(
                        url,
                        Duration::from_secs(DEFAULT_PATIENT_API_TIMEOUT_SECS),
                        DEFAULT_PATIENT_LIST_PATH.to_string(),
                        DEFAULT_APP_NAME.to_string(),
                        chrono::Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES),
                    )?);
                    let lookup = HttpPatientLookup::new(&cfg)?;
                    runtime.block_on(render(ChartPageController::new(cfg, lookup), &request))
                }
                None => runtime.block_on(render(
                    ChartPageController::new(Arc::new(CoreConfig::default()), OfflinePatientLookup),
                    &request,
                )),
            }?;
            println!("{}", html);
        }
        None => {
            println!("Use 'openspace --help' for commands");
        }
    }

    Ok(())
}

async fn render<L: PatientLookup>(
    controller: ChartPageController<L>,
    request: &ChartRequest,
) -> anyhow::Result<String> {
    let now = chrono::Local::now().naive_local();
    let (outcome, _) = controller.handle(request, SessionContext::new(), now).await;
    match outcome {
        ChartOutcome::Page(page) => Ok(page.html),
        ChartOutcome::Redirect(to) => anyhow::bail!("no valid patient id; would redirect to {to}"),
    }
}
