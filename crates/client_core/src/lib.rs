//! Storefront client core: remote client, event bus, application state,
//! view components and the controller that ties them together.

pub mod api;
pub mod backend;
pub mod bus;
pub mod controller;
pub mod error;
pub mod state;
pub mod views;

pub use api::{HttpProductsApi, ProductsApi};
pub use backend::{process_command, spawn_backend, BackendCommand, BackendEvent};
pub use bus::{AppEvent, EventBus, EventFilter, EventKind, SubscriptionId};
pub use controller::{CheckoutStep, Controller, DispatchError};
pub use error::ClientError;
pub use state::{AppState, FormErrors};

use std::rc::Rc;

use crossbeam_channel::{bounded, Receiver};

/// Bus, state and controller wired together, with the receiving end of the
/// backend command queue.
pub struct Storefront {
    pub events: Rc<EventBus>,
    pub state: Rc<AppState>,
    pub controller: Rc<Controller>,
}

impl Storefront {
    pub fn new() -> (Self, Receiver<BackendCommand>) {
        let (cmd_tx, cmd_rx) = bounded(backend::COMMAND_QUEUE_CAPACITY);
        let events = EventBus::new();
        let state = AppState::new(Rc::clone(&events));
        let controller = Controller::new(Rc::clone(&events), Rc::clone(&state), cmd_tx);
        (
            Self {
                events,
                state,
                controller,
            },
            cmd_rx,
        )
    }

    pub fn emit(&self, event: AppEvent) {
        self.events.emit(&event);
    }
}
