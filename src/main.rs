use catalog_scraper::{Backend, CatalogSession, Config, FailurePolicy, logging, runner, session};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Course list, one code per line; lines starting with `#` are skipped
    #[clap(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the CSV results
    #[clap(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep going when a course lookup fails and list the failures at the end
    #[clap(short, long)]
    keep_going: bool,

    /// Upper bound on waiting for a page or element
    #[clap(short, long, value_name = "SECONDS")]
    wait: Option<u64>,

    /// Drive a headless Chromium instead of posting the form directly
    #[clap(short, long)]
    browser: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(wait) = self.wait {
            config.wait_timeout_secs = wait;
        }
        if self.keep_going {
            config.on_failure = FailurePolicy::Skip;
        }
        if self.browser {
            config.backend = Backend::Browser;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    logging::setup_logging(&config.log_level);

    // A bad course list must fail before any page is requested
    let codes = match runner::read_course_list(&config.input_path).await {
        Ok(codes) => codes,
        Err(err) => {
            error!(error = %err, "could not load course list");
            return ExitCode::FAILURE;
        }
    };
    info!(
        courses = codes.len(),
        input = %config.input_path.display(),
        backend = ?config.backend,
        "course list loaded"
    );

    let mut session = match session::open(&config).await {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "could not open catalog session");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runner::run_codes(session.as_mut(), &codes, &config).await;

    // Release the session whether or not the batch succeeded
    if let Err(err) = session.close().await {
        warn!(error = %err, "failed to close catalog session");
    }

    match outcome {
        Ok(report) if report.failures.is_empty() => ExitCode::SUCCESS,
        Ok(report) => {
            for failed in &report.failures {
                warn!(course = %failed.code, error = %failed.error, "course not exported");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, kind = ?err.kind(), "batch aborted");
            ExitCode::FAILURE
        }
    }
}
