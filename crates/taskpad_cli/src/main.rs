//! `taskpad` entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the store.
//! - Hand stdin/stdout to the command loop.

use log::{error, info};
use std::io;
use std::process::ExitCode;
use taskpad_cli::{App, AppConfig, Console};
use taskpad_core::db::open_db;
use taskpad_core::{init_logging, OpenAiGateway, SystemClock};

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskpad: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is best-effort; the REPL works without it.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("taskpad: logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=startup module=cli status=error error={err}");
            eprintln!("taskpad: cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let gateway = OpenAiGateway::new(config.gateway.clone());
    info!(
        "event=startup module=cli status=ok gateway_enabled={}",
        gateway.is_enabled()
    );
    let clock = SystemClock;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());

    let mut app = App::new(&conn, &gateway, &clock, console);
    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=shutdown module=cli status=error error={err}");
            eprintln!("taskpad: {err}");
            ExitCode::FAILURE
        }
    }
}
