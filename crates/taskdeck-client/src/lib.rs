pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod store;
pub mod trace;

pub use config::ClientConfig;
pub use controller::{
  Controller,
  ViewModel
};
pub use debounce::Debouncer;
pub use error::ApiError;
pub use gateway::{
  Gateway,
  HttpGateway
};
pub use notify::{
  Level,
  LogNotifier,
  Notice,
  Notifier
};
pub use store::{
  Collection,
  Store
};
pub use trace::init_tracing;
