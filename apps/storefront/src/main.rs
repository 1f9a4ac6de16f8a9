mod config;
mod input;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
    thread,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{spawn_backend, BackendEvent, HttpProductsApi, Storefront};
use crossbeam_channel::{select, unbounded, Receiver};
use tracing::{debug, info, warn};

use crate::{
    config::{load_settings, SettingsOverrides},
    input::{apply, parse_command, Flow, HELP},
};

#[derive(Parser, Debug)]
#[command(about = "Terminal storefront for the web-larek catalog")]
struct Args {
    /// TOML file with settings; a missing file is ignored.
    #[arg(long, default_value = "storefront.toml")]
    config: PathBuf,
    #[arg(long)]
    api_origin: Option<String>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    cdn_url: Option<String>,
    #[arg(long)]
    log_filter: Option<String>,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_origin: self.api_origin.clone(),
            api_url: self.api_url.clone(),
            cdn_url: self.cdn_url.clone(),
            log_filter: self.log_filter.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config, args.overrides())?;

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(io::stderr)
        .init();
    info!(api = %settings.api_url, cdn = %settings.cdn_url, "starting storefront");

    let api = Arc::new(HttpProductsApi::new(&settings.api_url, &settings.cdn_url));
    let (shop, cmd_rx) = Storefront::new();
    let (event_tx, event_rx) = unbounded::<BackendEvent>();
    let backend = spawn_backend(api, cmd_rx, event_tx).context("failed to start backend thread")?;
    let lines = spawn_stdin_reader()?;

    shop.controller.init();
    println!("{}", shop.controller.render());
    println!("type 'help' for commands");

    run(&shop, &event_rx, &lines);

    // Dropping the controller closes the command queue, which ends the backend.
    drop(shop);
    if backend.join().is_err() {
        warn!("backend thread panicked");
    }
    Ok(())
}

fn run(shop: &Storefront, events: &Receiver<BackendEvent>, lines: &Receiver<String>) {
    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => {
                    shop.controller.handle_backend_event(event);
                    println!("{}", shop.controller.render());
                }
                Err(_) => {
                    warn!("backend stopped");
                    return;
                }
            },
            recv(lines) -> line => {
                let Ok(line) = line else {
                    debug!("stdin closed");
                    return;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line).and_then(|command| apply(shop, command)) {
                    Ok(Flow::Render) => println!("{}", shop.controller.render()),
                    Ok(Flow::Help) => println!("{HELP}"),
                    Ok(Flow::Quit) => return,
                    Err(err) => println!("! {err}"),
                }
            }
        }
    }
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("storefront-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to start stdin reader")?;
    Ok(rx)
}
