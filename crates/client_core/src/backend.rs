//! Bridge between the single-threaded UI loop and the async remote client.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::Product,
    protocol::{OrderPayload, OrderSuccess},
};
use tracing::{debug, error, info};

use crate::api::ProductsApi;

pub const COMMAND_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    FetchCatalog,
    SubmitOrder(OrderPayload),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchCatalog => "fetch_catalog",
            BackendCommand::SubmitOrder(_) => "submit_order",
        }
    }
}

/// Completion of a backend command, handed back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    CatalogLoaded(Result<Vec<Product>, String>),
    OrderCompleted(Result<OrderSuccess, String>),
}

pub async fn process_command(api: &dyn ProductsApi, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::FetchCatalog => BackendEvent::CatalogLoaded(
            api.get_products_list()
                .await
                .map_err(|err| err.to_string()),
        ),
        BackendCommand::SubmitOrder(order) => BackendEvent::OrderCompleted(
            api.create_order(&order)
                .await
                .map_err(|err| err.to_string()),
        ),
    }
}

/// Runs commands one at a time on a dedicated thread with its own runtime
/// until the command sender is dropped.
pub fn spawn_backend(
    api: Arc<dyn ProductsApi>,
    cmd_rx: Receiver<BackendCommand>,
    event_tx: Sender<BackendEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("storefront-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build backend runtime: {err}");
                    return;
                }
            };

            runtime.block_on(async move {
                info!("backend worker ready");
                while let Ok(cmd) = cmd_rx.recv() {
                    let name = cmd.name();
                    debug!(command = name, "processing backend command");
                    let event = process_command(api.as_ref(), cmd).await;
                    if event_tx.send(event).is_err() {
                        debug!(command = name, "ui loop gone, dropping backend result");
                        break;
                    }
                }
                info!("backend worker stopped");
            });
        })
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
