use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;
use std::time::Duration;

use lib_predict::loggers::setup_logging;
use lib_predict::{
    AsyncFailFastTcpProcessor, ExampleProcessingEventHandler, ExampleReadError, FetchState, StringExample,
    StringPrediction,
};
use tokio::signal;

mod submit_logic;
use submit_logic::{config, handler::LoggingHandler, output, signals};

const APP_NAME: &str = "predict-submit";
const SUBMISSION_GRACE: Duration = Duration::from_secs(5);

fn open_input(config: &config::Config) -> Result<Box<dyn Read + Send>> {
    match &config.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open input {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

fn main() -> Result<()> {
    let (config, notes) = config::load_config();
    let log_level = config.log_level.as_deref().unwrap_or("info");
    if let Some(path) = setup_logging(APP_NAME, config.log_dir.as_deref(), log_level)? {
        log::info!("Logging to {}", path.display());
    }
    for note in notes {
        log::log!(note.level, "{}", note.message);
    }

    let connection = config.to_connection_config().context("Invalid connection settings")?;
    let factory = Arc::new(connection.to_factory());

    // The prediction loop below blocks, so the runtime only hosts the producer and the signal task.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build the tokio runtime")?;

    let examples = BufReader::new(open_input(&config)?)
        .lines()
        .map(|line| line.map(StringExample::from).map_err(ExampleReadError::from));

    let processor = AsyncFailFastTcpProcessor::new(factory, runtime.handle().clone(), examples);

    let progress = processor.progress();
    runtime.spawn(signals::handle_interrupts(signal::ctrl_c, progress, |code| {
        std::process::exit(code);
    }));

    let (logging_handler, submission_done) = LoggingHandler::new();
    let handler: Arc<dyn ExampleProcessingEventHandler> = Arc::new(logging_handler);
    let predictions = processor
        .submit_examples::<StringPrediction>(Some(handler))
        .with_context(|| format!("Failed to reach the prediction daemon at {}:{}", connection.host, connection.port))?;

    output::write_predictions(&mut io::stdout().lock(), predictions).context("Failed to write predictions")?;

    // The daemon can close its side before the producer has finished.
    if submission_done.recv_timeout(SUBMISSION_GRACE).is_err() {
        log::warn!("Submission still running after the last prediction; not waiting for it.");
    }

    log::info!(
        "Done: {} submitted, {} skipped, {} fetched (submission {}, fetch {})",
        processor.get_total_submitted(),
        processor.get_total_skipped(),
        processor.get_total_fetched(),
        processor.get_submission_state(),
        processor.get_fetch_state()
    );

    // Don't wait on a producer still blocked in a write.
    runtime.shutdown_background();

    if processor.get_fetch_state() == FetchState::PredictionFetchFault
        || processor.get_submission_state().is_fault()
    {
        anyhow::bail!("Run ended with a fault");
    }
    Ok(())
}
