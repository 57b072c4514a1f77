use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use surfcrew::{Job, ModelConfig, Runner, RunnerConfig};

#[derive(Parser)]
#[command(name = "surfcrew")]
#[command(about = "Crew-of-agents browser automation")]
#[command(version)]
struct Cli {
    /// Page to start from
    #[arg(long, default_value = "https://www.destandaard.be")]
    url: String,

    /// What to do on the page
    #[arg(
        long,
        default_value = "Give a quick overview of the 10 latest news articles. No need to search!"
    )]
    task: String,

    /// Extra guideline for the planner
    #[arg(
        long,
        default_value = "Only do a 2 step plan because the info is on the main page."
    )]
    plan_guide: String,

    /// Where dumps, screenshots and the token log land (wiped on start)
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Wait for Enter after each plan step
    #[arg(long)]
    pause: bool,

    /// Model for the planner crew
    #[arg(long)]
    planner_model: Option<String>,

    /// Model for the element-selection crew
    #[arg(long)]
    scraper_model: Option<String>,

    /// Model for the extraction crew
    #[arg(long)]
    extractor_model: Option<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> surfcrew::Result<()> {
    // Provider keys come from the environment; .env.local wins over .env.
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename_override(".env.local");

    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let mut models = ModelConfig::default();
    if let Some(m) = cli.planner_model {
        models.planner = m;
    }
    if let Some(m) = cli.scraper_model {
        models.scraper = m;
    }
    if let Some(m) = cli.extractor_model {
        models.extractor = m;
    }

    let mut runner = Runner::new(&RunnerConfig {
        headless: cli.headless,
        output_dir: cli.output_dir,
        pause_between_steps: cli.pause,
        models,
    })
    .await?;

    let job = Job {
        url: cli.url,
        task: cli.task,
        plan_guide: cli.plan_guide,
    };

    let result = runner.run(&job).await;
    runner.close().await?;

    let report = result?;
    println!();
    println!("✓ {} steps executed in {}ms", report.steps_executed, report.duration_ms);
    if let Some(answer) = report.answer {
        println!();
        println!("{}", answer);
    }

    Ok(())
}
