//! Line commands typed by the user, translated into bus events.

use client_core::{views::ModalKind, AppEvent, Storefront};
use shared::domain::{FormField, PAYMENT_CARD, PAYMENT_CASH};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  catalog            close any modal and show the catalog
  show <n>           open product <n> from the catalog
  add                add the previewed product to the basket
  basket             open the basket
  remove <n>         remove basket row <n>
  order              start checkout from the open basket
  pay <card|cash>    choose a payment method
  address <text>     set the delivery address
  next               continue to contact details
  email <text>       set the contact email
  phone <text>       set the contact phone
  submit             place the order
  close              close the modal
  scroll <n>         scroll the catalog to product <n>
  help               show this help
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Catalog,
    Show(usize),
    Add,
    Basket,
    Remove(usize),
    Order,
    Pay(String),
    Address(String),
    Next,
    Email(String),
    Phone(String),
    Submit,
    Close,
    Scroll(usize),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("payment must be '{PAYMENT_CARD}' or '{PAYMENT_CASH}'")]
    InvalidPayment,
    #[error("no product at position {0}")]
    NoSuchItem(usize),
    #[error("open a product first")]
    NothingPreviewed,
    #[error("this command needs the {0} to be open")]
    NotOpen(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Render,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "catalog" | "home" => Command::Catalog,
        "show" => Command::Show(position(rest, "show")?),
        "add" | "buy" => Command::Add,
        "basket" => Command::Basket,
        "remove" => Command::Remove(position(rest, "remove")?),
        "order" | "checkout" => Command::Order,
        "pay" => match rest.to_ascii_lowercase().as_str() {
            "" => return Err(InputError::MissingArgument("pay")),
            PAYMENT_CARD => Command::Pay(PAYMENT_CARD.to_string()),
            PAYMENT_CASH => Command::Pay(PAYMENT_CASH.to_string()),
            _ => return Err(InputError::InvalidPayment),
        },
        // Free text may legitimately be cleared, so an empty value is allowed.
        "address" => Command::Address(rest.to_string()),
        "next" => Command::Next,
        "email" => Command::Email(rest.to_string()),
        "phone" => Command::Phone(rest.to_string()),
        "submit" | "pay-now" => Command::Submit,
        "close" | "back" => Command::Close,
        "scroll" => Command::Scroll(position(rest, "scroll")?),
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn position(raw: &str, verb: &'static str) -> Result<usize, InputError> {
    if raw.is_empty() {
        return Err(InputError::MissingArgument(verb));
    }
    raw.parse::<usize>()
        .map_err(|_| InputError::InvalidNumber(raw.to_string()))
}

fn require_open(shop: &Storefront, kind: ModalKind, name: &'static str) -> Result<(), InputError> {
    if shop.controller.mounted() == Some(kind) {
        Ok(())
    } else {
        Err(InputError::NotOpen(name))
    }
}

/// Forwards a command to the bus, the way a rendered view forwards clicks
/// and keystrokes.
pub fn apply(shop: &Storefront, command: Command) -> Result<Flow, InputError> {
    let controller = &shop.controller;
    match command {
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
        Command::Catalog | Command::Close => controller.close_modal(),
        Command::Show(position) => {
            let item = controller
                .catalog_item(position)
                .ok_or(InputError::NoSuchItem(position))?;
            shop.emit(AppEvent::CardSelect(item));
        }
        Command::Add => {
            let item = controller
                .previewed_item()
                .ok_or(InputError::NothingPreviewed)?;
            shop.emit(AppEvent::CardAdd(item));
        }
        Command::Basket => shop.emit(AppEvent::BasketOpen),
        Command::Remove(position) => {
            require_open(shop, ModalKind::Basket, "basket")?;
            let id = controller
                .basket_item(position)
                .ok_or(InputError::NoSuchItem(position))?;
            shop.emit(AppEvent::BasketRemove(id));
        }
        Command::Order => {
            require_open(shop, ModalKind::Basket, "basket")?;
            shop.emit(AppEvent::OrderOpen);
        }
        Command::Pay(method) => {
            require_open(shop, ModalKind::Order, "delivery form")?;
            shop.emit(AppEvent::input(FormField::Payment, method));
        }
        Command::Address(address) => {
            require_open(shop, ModalKind::Order, "delivery form")?;
            shop.emit(AppEvent::input(FormField::Address, address));
        }
        Command::Next => {
            require_open(shop, ModalKind::Order, "delivery form")?;
            shop.emit(AppEvent::OrderSubmit);
        }
        Command::Email(email) => {
            require_open(shop, ModalKind::Contacts, "contacts form")?;
            shop.emit(AppEvent::input(FormField::Email, email));
        }
        Command::Phone(phone) => {
            require_open(shop, ModalKind::Contacts, "contacts form")?;
            shop.emit(AppEvent::input(FormField::Phone, phone));
        }
        Command::Submit => {
            require_open(shop, ModalKind::Contacts, "contacts form")?;
            shop.emit(AppEvent::ContactsSubmit);
        }
        Command::Scroll(position) => controller.scroll_to(position.saturating_sub(1)),
    }
    Ok(Flow::Render)
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
