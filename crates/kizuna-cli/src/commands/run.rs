//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{Config, LlmSettings};
use crate::error::Result;
use crate::output::Formatter;
use kizuna_llm::ChatCompletionsProvider;
use kizuna_tracker::{read_episodes_from_path, write_records, DatasetFormat, EpisodeProcessor};
use tracing::{info, warn};

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut tracker_config = config.tracker.clone();
    if let Some(mode) = args.history_mode {
        tracker_config.history_mode = mode.into();
    }

    let mut episodes = read_episodes_from_path(&args.input)?;
    if let Some(limit) = args.limit {
        episodes.truncate(limit);
    }

    let provider = build_provider(&config.llm, &args, tracker_config.request_timeout())?;
    info!(model = provider.model(), "Using chat completions oracle");

    let mut processor = EpisodeProcessor::new(provider, tracker_config)?;
    let report = processor.process_episodes(&episodes).await;

    let format = output_format(&args);
    write_records(&args.output, &report.records, format)?;

    println!("{}", formatter.format_summary(&report.summary, &args.output)?);
    Ok(())
}

fn build_provider(
    settings: &LlmSettings,
    args: &RunArgs,
    timeout: std::time::Duration,
) -> Result<ChatCompletionsProvider> {
    let endpoint = args.endpoint.as_deref().unwrap_or(&settings.endpoint);
    let model = args.model.as_deref().unwrap_or(&settings.model);

    let provider = ChatCompletionsProvider::new(endpoint, model)?.with_timeout(timeout)?;

    Ok(match settings.api_key() {
        Some(key) => provider.with_api_key(key),
        None => {
            warn!(
                env = %settings.api_key_env,
                "API key variable is not set, sending unauthenticated requests"
            );
            provider
        }
    })
}

fn output_format(args: &RunArgs) -> DatasetFormat {
    args.format
        .map(Into::into)
        .or_else(|| DatasetFormat::from_path(&args.output))
        .unwrap_or_default()
}
