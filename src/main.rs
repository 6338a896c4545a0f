use anyhow::{Context, Result};
use stepwise::cli::commands::{RunCommand, ValidateCommand};
use stepwise::cli::output::*;
use stepwise::cli::{Cli, Command};
use stepwise::text::TextPipelineConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let config = TextPipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;
    let name = config.name.clone().unwrap_or_else(|| cmd.file.clone());
    info!("Loaded pipeline '{}' with {} steps", name, config.steps.len());

    let context = config.context(cmd.variable.iter().cloned());
    for (key, value) in &cmd.variable {
        info!("Variable override: {} = {}", key, value);
    }

    let fan_out = config
        .to_pipeline()
        .context("Failed to build pipeline")?
        .build_fan_out();

    let results: Vec<String> = if cmd.single {
        fan_out
            .transform(&cmd.input, None, &context)
            .context("Pipeline run failed")?
            .into_iter()
            .collect()
    } else {
        fan_out
            .run(&cmd.input, &context)
            .collect::<Result<Vec<_>, _>>()
            .context("Pipeline run failed")?
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} {} produced no results", WARN, style(&name).bold());
        return Ok(());
    }

    for (index, value) in results.iter().enumerate() {
        println!("{}", format_result(index, value));
    }
    println!(
        "\n{} {} produced {} result(s)",
        CHECK,
        style(&name).bold(),
        style(results.len()).cyan()
    );

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let result = TextPipelineConfig::from_file(&cmd.file)
        .and_then(|config| config.to_pipeline().map(|_| config));

    match result {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("{}", format_pipeline(&config));

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}
