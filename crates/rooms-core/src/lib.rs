//! Addon skeleton for the Rooms AI workflow engine.
//!
//! Every addon exposes a closed set of named actions behind one entry point:
//!
//! ```text
//! host ──invoke(instance, action, params)──▶ AddonRegistry
//!                                              │
//!                                              ▼
//!                                   AddonInstance::invoke
//!                                     │ enabled? known name?
//!                                     ▼
//!                               Addon::handle(Action, Parameters)
//!                                     │
//!                                     ▼
//!                      ActionResult { data } | { error: {kind, message} }
//! ```
//!
//! - [`AddonConfig`] / [`AddonDescriptor`] - base configuration composed with
//!   addon-specific settings
//! - [`ActionKind`] - a closed, statically named action set
//! - [`Parameters`] - typed access to loosely-typed workflow parameters
//! - [`ActionResult`] / [`ActionError`] - the result envelope and error kinds
//! - [`CredentialProvider`] - host-owned secret lookup
//!
//! # Example
//!
//! ```ignore
//! use rooms_core::{AddonConfig, AddonInstance, ExampleAddon, Parameters};
//!
//! let addon = ExampleAddon::new(AddonConfig::new("tpl", "template", "Template", "demo"));
//! let result = addon.invoke("example", Parameters::new().with("param1", "hi")).await;
//! ```

pub mod action;
pub mod addon;
pub mod credentials;
pub mod error;
pub mod example;
pub mod params;
pub mod registry;
pub mod result;
pub mod tracing;

pub use action::{ActionDefinition, ActionKind, ActionOverride, ParamSpec, ParamType};
pub use addon::{Addon, AddonConfig, AddonDescriptor, AddonInstance, BoxFuture, invoke_until};
pub use credentials::{Credential, CredentialProvider, StaticCredentials};
pub use error::{ActionError, ErrorKind, Outcome};
pub use example::{ExampleAddon, TemplateAction};
pub use params::Parameters;
pub use registry::{AddonRegistry, RegistryError};
pub use result::{ActionResult, ErrorBody};
pub use crate::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
