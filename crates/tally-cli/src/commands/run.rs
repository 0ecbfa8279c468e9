//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{ConfigError, Credentials, Settings, StoreBackend, SUPABASE_KEY, SUPABASE_URL};
use crate::error::Result;
use crate::output::Formatter;
use tally_domain::traits::{LlmProvider, TransactionSink};
use tally_extractor::ExtractionAgent;
use tally_llm::GeminiProvider;
use tally_pipeline::{BatchOrchestrator, BatchRun, PdfTextExtractor, PipelineConfig};
use tally_store::{RestSink, SqliteSink};
use tracing::info;

/// Apply command-line overrides on top of the loaded settings.
pub fn apply_overrides(args: &RunArgs, settings: &mut Settings) {
    if let Some(input) = &args.input {
        settings.pipeline.input_dir = input.clone();
    }
    if let Some(concurrency) = args.concurrency {
        settings.pipeline.concurrency = concurrency;
    }
    if let Some(store) = args.store {
        settings.store.backend = store.into();
    }
    if let Some(database) = &args.database {
        settings.store.sqlite_path = database.clone();
    }
}

/// Execute the run command.
///
/// Settings are validated once, after overrides. Credentials are checked before any
/// file is touched.
pub async fn execute_run(args: RunArgs, mut settings: Settings, formatter: &Formatter) -> Result<()> {
    apply_overrides(&args, &mut settings);
    settings.validate()?;

    let credentials = Credentials::from_env(settings.store.backend)?;

    let provider = GeminiProvider::new(credentials.google_api_key.clone(), settings.llm.model.clone())?
        .with_endpoint(settings.llm.endpoint.clone());
    info!("Using model {}", provider.model());
    let agent = ExtractionAgent::new(provider, settings.extractor.clone());

    let run = match settings.store.backend {
        StoreBackend::Rest => {
            let store = credentials.store.as_ref().ok_or_else(|| {
                ConfigError::MissingCredentials(vec![SUPABASE_URL, SUPABASE_KEY])
            })?;
            let sink = RestSink::new(&store.url, store.key.clone())?;
            info!("Writing to {}", sink.endpoint());
            run_batch(agent, sink, settings.pipeline).await?
        }
        StoreBackend::Sqlite => {
            let sink = SqliteSink::new(&settings.store.sqlite_path)?;
            info!("Writing to {}", settings.store.sqlite_path.display());
            run_batch(agent, sink, settings.pipeline).await?
        }
    };

    println!("{}", formatter.format_run(&run)?);

    Ok(())
}

/// Run one batch over the PDF reader with the given agent and sink.
pub async fn run_batch<L, S>(agent: ExtractionAgent<L>, sink: S, config: PipelineConfig) -> Result<BatchRun>
where
    L: LlmProvider,
    S: TransactionSink,
{
    let orchestrator = BatchOrchestrator::new(PdfTextExtractor::new(), agent, sink, config);
    Ok(orchestrator.run().await?)
}
