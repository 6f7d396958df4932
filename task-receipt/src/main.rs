use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use task_receipt::cli::{Cli, Command};
use task_receipt::{Config, PrintService, Priority, Receipt, html, logger, ruler, tasks};
use ticket_printer::AnyPrinter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.printer.clone(), cli.profile.clone());

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    if let Err(e) = logger::init_logger_with_file(level, config.log_json, config.log_dir.as_deref())
    {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn connect(config: &Config) -> anyhow::Result<PrintService<AnyPrinter>> {
    let profile = config.printer_profile()?;
    let target = config.target()?;
    let printer = AnyPrinter::connect(&target)?.with_timeout(config.timeout());
    tracing::info!(printer = %printer, profile = profile.name, "printer selected");

    Ok(PrintService::new(printer, profile).with_retry(config.retries, config.retry_delay()))
}

async fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
    match command {
        Command::Print {
            title,
            description,
            priority,
            sample,
        } => {
            let task = match (sample, title) {
                (Some(n), _) => tasks::sample(n)?,
                (None, Some(title)) => {
                    tasks::Task::new(title, description, Priority::try_from(priority)?)
                }
                (None, None) => anyhow::bail!("either --title or --sample is required"),
            };
            connect(config)?.print_receipt(&task.receipt()).await?;
            println!("Printed: {}", task.title);
        }
        Command::PrintAll { file } => {
            let tasks = match file {
                Some(path) => tasks::load_tasks(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => tasks::test_suite(),
            };
            let report = connect(config)?.print_batch(&tasks).await?;

            for title in &report.printed {
                println!("OK    {}", title);
            }
            for (title, error) in &report.failed {
                println!("FAIL  {}: {}", title, error);
            }
            println!("{}/{} printed", report.printed.len(), report.total());

            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::PrintImage { path } => {
            connect(config)?.print_image(&path).await?;
            println!("Printed image: {}", path.display());
        }
        Command::Text { text } => {
            connect(config)?.print_text(&text).await?;
            println!("Printed text");
        }
        Command::Preview {
            title,
            description,
            priority,
            ruler: ruler_limit,
        } => {
            let task = match ruler_limit {
                Some(limit) => tasks::ruler_task(limit),
                None => tasks::Task::new(title, description, Priority::try_from(priority)?),
            };
            write_preview(&task.receipt(), &config.preview_dir)?;
        }
        Command::Ruler { limit, interval } => {
            let text = ruler::build(limit, interval);
            println!("{}", text);
            println!();
            println!("Total characters: {}", text.chars().count());
        }
        Command::Grid { lines } => {
            connect(config)?
                .print_text(&ruler::length_test(lines))
                .await?;
            println!("Printed length test ({} lines)", lines.max(4));
        }
        Command::Samples => {
            for (i, task) in tasks::samples().iter().enumerate() {
                println!("{}. {} [{}]", i + 1, task.title, task.priority);
            }
        }
        Command::Status => {
            let service = connect(config)?;
            let state = if service.is_online().await {
                "online"
            } else {
                "offline"
            };
            println!("{}: {}", service.printer(), state);
            if state == "offline" {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Write `receipt.txt` and `receipt.html` and echo the text preview
fn write_preview(receipt: &Receipt, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let text = receipt.preview();
    let txt_path = dir.join("receipt.txt");
    fs::write(&txt_path, format!("{}\n", text))
        .with_context(|| format!("writing {}", txt_path.display()))?;

    let html_path = dir.join("receipt.html");
    html::save_html(
        &html_path,
        receipt.title(),
        receipt.description(),
        receipt.priority(),
        receipt.timestamp(),
    )
    .with_context(|| format!("writing {}", html_path.display()))?;

    println!("{}", text);
    println!();
    println!("Text preview: {}", txt_path.display());
    println!("HTML preview: {}", html_path.display());
    tracing::info!(dir = %dir.display(), "preview written");
    Ok(())
}
