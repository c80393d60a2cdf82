mod config;
mod shell;

use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use ttdb_engine::globe::Viewport;
use ttdb_engine::{EngineConfig, Session};

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    database: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--db" {
            let Some(path) = args.next() else {
                anyhow::bail!("--db expects a path");
            };
            parsed.database = Some(PathBuf::from(path));
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }

    Ok(parsed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;
    let cfg = config::load_or_default();
    if let Err(err) = config::save(&cfg) {
        tracing::debug!(error = %err, "could not persist navigator config");
    }
    let database = args.database.unwrap_or_else(|| cfg.database.clone());

    let engine_cfg = EngineConfig {
        refresh_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        animation_tick: Duration::from_millis(cfg.tick_interval_ms.max(1)),
        ..EngineConfig::default()
    };
    let mut session = Session::open(&database, engine_cfg);
    session.globe.viewport = Viewport {
        width: cfg.viewport_width,
        height: cfg.viewport_height,
    };

    tracing::info!(database = %database.display(), "navigator started");
    println!("{}", session.status());
    println!("{}", session.tour_note());
    session.drain_events();

    let mut ticker = tokio::time::interval(Duration::from_millis(cfg.tick_interval_ms.max(1)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.tick(Instant::now());
                for event in session.drain_events() {
                    shell::report_event(&session, &event);
                }
            }
            line = lines.next_line() => {
                let Some(input) = line? else {
                    break;
                };
                if !shell::handle_line(&mut session, input.trim()) {
                    break;
                }
            }
        }
    }

    Ok(())
}
