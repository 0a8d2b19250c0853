//! warden entry point.
//!
//! Takes no arguments: the supervisor starts immediately with defaults,
//! optionally overridden by a `warden.toml` in the working directory. One
//! background worker owns the whole supervision loop; this foreground
//! thread only displays the status text the worker pushes over a channel
//! and never calls into it.

use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use warden::config::SupervisorConfig;
use warden::housekeeping::WinlogonRegistry;
use warden::launcher::CommandLauncher;
use warden::process::SystemProcessTable;
use warden::supervisor::{ChannelStatusSink, Supervisor};
use warden::windows::DesktopWindowSurface;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match SupervisorConfig::load(Path::new("warden.toml")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let (status_tx, status_rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        let launcher = CommandLauncher::new(
            config.launch_command.clone(),
            config.launch_args.clone(),
        );
        let mut supervisor = Supervisor::new(
            config,
            SystemProcessTable::new(),
            DesktopWindowSurface,
            launcher,
            Box::new(WinlogonRegistry),
            Box::new(ChannelStatusSink::new(status_tx)),
        )?;
        Ok::<_, anyhow::Error>(supervisor.run())
    });

    // Drain status updates until the worker drops its sender.
    for message in status_rx {
        println!("{} {message}", "warden".cyan().bold());
    }

    match worker.join() {
        Ok(Ok(reason)) => {
            eprintln!(
                "{} {reason}. Human intervention required.",
                "supervision stopped:".red().bold()
            );
            ExitCode::FAILURE
        }
        Ok(Err(e)) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
        Err(_) => {
            eprintln!("{} worker thread panicked", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
