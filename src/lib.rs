//! A JSON-RPC client assembled from runtime-extensible modules.
//!
//! Members are bound from [`Method`] descriptors (an endpoint, a munger
//! pipeline, and a property flag) onto [`Module`] namespaces, which can be
//! extended with `attach_methods` / `attach_modules` at any time.
pub mod builtins;
pub mod client;
pub mod constants;
pub mod libs;
pub mod module;

pub use client::Client;
pub use module::{Error, Method, Module, ModuleKind, ModuleSpec, PlainModule, Result};
