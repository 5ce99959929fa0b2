use clap::Parser;
use horo_scan::core::Storage;
use horo_scan::utils::error::ErrorSeverity;
use horo_scan::utils::{logger, validation::Validate};
use horo_scan::{
    load_reference_data, AppConfig, CaptureStateMachine, CliConfig, ConsoleRenderer, FileCamera,
    FortuneEngine, HttpFaceAnalyzer, HttpRemedyNarrator, LocalStorage, ReadingError,
};

async fn run(cli: &CliConfig) -> horo_scan::Result<()> {
    let mut config = AppConfig::from_file(&cli.config)?;
    if let Some(scan_delay) = cli.scan_delay {
        config.capture.scan_delay_seconds = scan_delay;
    }
    config.validate()?;

    let storage = LocalStorage::new(config.data.base_path.clone());
    let reference = load_reference_data(&storage, &config.data).await?;
    reference.validate()?;

    let engine = FortuneEngine::new(
        reference,
        HttpFaceAnalyzer::new(config.service.analysis_endpoint.clone()),
        HttpRemedyNarrator::new(config.service.narrative_endpoint.clone()),
    );
    let mut renderer = ConsoleRenderer::new();

    let image = cli.image.as_deref().ok_or(ReadingError::NoSnapshot)?;
    let mut capture = CaptureStateMachine::new(FileCamera::new(image), config.capture_settings());
    tracing::info!("📷 Scanning for {}s", config.capture.scan_delay_seconds);
    capture.scan().await?;

    let face = engine.analyze(capture.snapshot(), &mut renderer).await?;
    let reading = engine
        .read(
            capture.snapshot(),
            face.as_ref(),
            cli.birthdate.as_deref(),
            &mut renderer,
        )
        .await?;

    if let Some(remedy) = &cli.remedy {
        engine.preview(&reading, remedy, &mut renderer);
    }

    if let Some(output) = &cli.output {
        let json = serde_json::to_vec_pretty(&reading)?;
        LocalStorage::new(".".to_string())
            .write_file(output, &json)
            .await?;
        tracing::info!("📁 Reading saved to: {}", output);
    }

    Ok(())
}

fn report(e: &ReadingError) -> i32 {
    tracing::error!(
        "❌ Reading failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.log_format, cli.verbose);

    tracing::info!("Starting horo-scan");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        let exit_code = report(&e);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
