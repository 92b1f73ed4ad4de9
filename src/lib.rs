//! rust-netconf - NETCONF protocol client core
//!
//! This library manages a single stateful session to a network device and
//! exposes the NETCONF operation set (get, get-config, edit-config,
//! copy-config, validate, lock/unlock, commit, discard-changes, get-schema,
//! delete-config, raw dispatch) as request/response calls over that session.
//!
//! The transport (typically SSH with the netconf subsystem) is a pluggable
//! collaborator behind the [`Transport`] trait; device-specific extensions
//! (capability advertisement formats, file transfer, proprietary verbs)
//! build on the [`CapabilityReporter`] and [`FileTransfer`] traits and
//! [`NetconfClient::dispatch`].
//!
//! # Example
//!
//! ```ignore
//! use rust_netconf::{Datastore, EditConfigOptions, Filter, NetconfClient};
//!
//! // SshTransport implements rust_netconf::Transport
//! let mut client = NetconfClient::new(SshTransport::new("198.51.100.1:830")?);
//!
//! // The session is established lazily on first use
//! let config = client.get_config(None, &[Filter::subtree("<interfaces/>")])?;
//!
//! client.locked(Datastore::Candidate, |c| {
//!     c.edit_config(
//!         "<interfaces><interface><name>ge-0/0/0</name></interface></interfaces>",
//!         &EditConfigOptions::default(),
//!     )?;
//!     c.commit()
//! })?;
//! ```

pub mod capabilities;
pub mod client;
mod error;
pub mod request_builder;
pub mod session;
pub mod transport;
pub mod types;
pub mod xml;

pub use capabilities::{CapabilitySet, OperationProfile, capability_summary, device_operations};
pub use client::{BASE_RPC, CapabilityReporter, FileTransfer, NetconfClient};
pub use error::{NetconfError, Result};
pub use request_builder::RpcRequest;
pub use session::Session;
pub use transport::Transport;
pub use types::{
    Config, ConfigFormat, ConfigSource, Datastore, DefaultOperation, EditConfigOptions,
    ErrorOption, Filter, FilterSeq, SchemaFormat, TestOption, WithDefaults,
};
