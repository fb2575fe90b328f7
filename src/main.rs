use std::env;
use std::io;
use std::process;

use chrono::{DateTime, Utc};
use scraps::csv::{read_config, read_script, write_events};
use scraps::{Config, Engine, FakeClock};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .expect("usage: scraps <script.csv> [config.csv]");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let config = match args.next() {
        Some(config_path) => read_config(&config_path).unwrap_or_else(|e| {
            error!(path = config_path, "{e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    // replay time is measured from the epoch so output is reproducible
    let start = DateTime::<Utc>::UNIX_EPOCH;
    let clock = FakeClock::new(start);
    let engine = Engine::new(config, clock.clone(), start).unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });
    info!(config = ?engine.config(), "starting replay");

    let steps = read_script(path.clone(), start).unwrap_or_else(|e| {
        error!(path, "{e}");
        process::exit(1);
    });
    let (step_sender, step_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in steps {
            match result {
                Ok(step) => {
                    step_sender.send(step).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    // the clock moves as each step is pulled, right before it executes
    let commands = ReceiverStream::new(step_receiver).map(|step| {
        clock.set(step.at);
        step.command
    });
    engine.run(commands).await;

    if let Err(e) = write_events(io::stdout().lock(), &engine.list_events(0, 0)) {
        error!("{e}");
        process::exit(1);
    }
}
