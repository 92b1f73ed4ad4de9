//! The NETCONF client: one method per protocol operation
//!
//! Every operation funnels through a single guarded entry point that
//! ensures the session is connected, exchanges the envelope, and decodes
//! the reply into the data payload or a structured rpc error. The client
//! holds no lock table and performs no capability enforcement: the device
//! is authoritative for both, and callers wanting proactive checks consult
//! [`OperationProfile`](crate::capabilities::OperationProfile) first.

use std::path::Path;

use tracing::debug;

use crate::capabilities::{self, CapabilitySet, OperationProfile};
use crate::error::{NetconfError, Result};
use crate::request_builder::RpcRequest;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{
    Config, ConfigSource, Datastore, EditConfigOptions, Filter, SchemaFormat, WithDefaults,
};
use crate::xml;

/// Base RPC methods every NETCONF device supports
pub const BASE_RPC: &[&str] = &["get_config", "edit_config", "get_capabilities", "get"];

/// A stateful client for one NETCONF session.
///
/// Owns the session exclusively; one caller context at a time. Concurrent
/// use from multiple execution contexts requires a distinct client (and
/// transport) per context.
#[derive(Debug)]
pub struct NetconfClient<T> {
    session: Session<T>,
}

impl<T: Transport> NetconfClient<T> {
    /// Create a client over the given transport. The connection is
    /// established lazily on the first operation.
    pub fn new(transport: T) -> Self {
        Self {
            session: Session::new(transport),
        }
    }

    /// Borrow the underlying session
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// The capability set captured at session establishment
    pub fn capabilities(&self) -> Option<&CapabilitySet> {
        self.session.capabilities()
    }

    /// The operation profile derived from the captured capabilities,
    /// recomputed on demand
    pub fn operations(&self) -> Option<OperationProfile> {
        self.session.capabilities().map(CapabilitySet::operations)
    }

    /// Names of the base RPC methods
    pub fn get_base_rpc(&self) -> &'static [&'static str] {
        BASE_RPC
    }

    /// Shared dispatch entry: connect if needed, exchange, decode
    fn execute(&mut self, request: RpcRequest) -> Result<String> {
        self.session.ensure_connected()?;
        let reply = self.session.send(&request)?;
        xml::decode_reply(&reply)
    }

    /// Retrieve running configuration and device state information.
    ///
    /// `with_defaults` depends on the `:with-defaults` capability and is
    /// passed through without a client-side check.
    pub fn get(&mut self, filter: &[Filter], with_defaults: Option<WithDefaults>) -> Result<String> {
        let request = RpcRequest::get(filter, with_defaults)?;
        self.execute(request)
    }

    /// Retrieve all or part of a configuration datastore.
    /// `source` defaults to the running datastore.
    pub fn get_config(&mut self, source: Option<Datastore>, filter: &[Filter]) -> Result<String> {
        let request = RpcRequest::get_config(source, filter)?;
        self.execute(request)
    }

    /// Load configuration into the target datastore (candidate by default)
    pub fn edit_config(
        &mut self,
        config: impl Into<Config>,
        options: &EditConfigOptions,
    ) -> Result<String> {
        let request = RpcRequest::edit_config(config.into(), options)?;
        self.execute(request)
    }

    /// Validate the contents of the given configuration source
    /// (candidate by default)
    pub fn validate(&mut self, source: Option<ConfigSource>) -> Result<String> {
        let request = RpcRequest::validate(source)?;
        self.execute(request)
    }

    /// Replace the target datastore with the contents of the source
    pub fn copy_config(&mut self, source: ConfigSource, target: ConfigSource) -> Result<String> {
        let request = RpcRequest::copy_config(source, target)?;
        self.execute(request)
    }

    /// Delete a configuration datastore
    pub fn delete_config(&mut self, target: ConfigSource) -> Result<String> {
        let request = RpcRequest::delete_config(target)?;
        self.execute(request)
    }

    /// Execute a free-form RPC on the device, e.g. a vendor-specific verb.
    ///
    /// `rpc_command` is parsed before anything is sent; unparsable XML
    /// fails with [`NetconfError::MalformedRequest`] and no network I/O.
    pub fn dispatch(
        &mut self,
        rpc_command: &str,
        source: Option<Datastore>,
        filter: &[Filter],
    ) -> Result<String> {
        let request = RpcRequest::raw(rpc_command, source, filter)?;
        self.execute(request)
    }

    /// Lock a datastore (candidate by default).
    ///
    /// The device enforces mutual exclusion; a lock already held elsewhere
    /// surfaces as an rpc error, never a queued wait.
    pub fn lock(&mut self, target: Option<Datastore>) -> Result<String> {
        self.execute(RpcRequest::lock(target))
    }

    /// Release a datastore lock previously obtained with `lock`.
    /// Matching unlock to a prior lock is the caller's responsibility.
    pub fn unlock(&mut self, target: Option<Datastore>) -> Result<String> {
        self.execute(RpcRequest::unlock(target))
    }

    /// Run an operation with the target datastore locked, unlocking
    /// afterwards even when the operation fails.
    ///
    /// The operation's error wins over an unlock failure; an unlock failure
    /// after a successful operation surfaces.
    pub fn locked<R>(
        &mut self,
        target: Datastore,
        operation: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.lock(Some(target))?;
        let outcome = operation(self);
        let unlocked = self.unlock(Some(target));
        match outcome {
            Ok(value) => {
                unlocked?;
                Ok(value)
            }
            Err(error) => {
                if let Err(unlock_error) = unlocked {
                    debug!(error = %unlock_error, "unlock after failed operation also failed");
                }
                Err(error)
            }
        }
    }

    /// Revert the candidate datastore to the running configuration.
    /// Uncommitted changes are discarded.
    pub fn discard_changes(&mut self) -> Result<String> {
        self.execute(RpcRequest::discard_changes())
    }

    /// Commit the candidate configuration as the new running configuration.
    ///
    /// Sent while a confirmed commit is outstanding, this finalizes it.
    pub fn commit(&mut self) -> Result<String> {
        self.execute(RpcRequest::commit(false, None, None))
    }

    /// Start a confirmed commit: reverted by the device unless a follow-up
    /// commit arrives within `timeout` seconds (default 600 when omitted).
    ///
    /// `persist` makes the pending confirmation survive this session's
    /// termination; a later session supplies the same token to confirm or
    /// cancel. Depends on the `:confirmed-commit` capability.
    pub fn commit_confirmed(
        &mut self,
        timeout: Option<u32>,
        persist: Option<&str>,
    ) -> Result<String> {
        self.execute(RpcRequest::commit(true, timeout, persist))
    }

    /// Retrieve a named schema from the device; the representation defaults
    /// to YANG when `format` is omitted
    pub fn get_schema(
        &mut self,
        identifier: &str,
        version: Option<&str>,
        format: Option<SchemaFormat>,
    ) -> Result<String> {
        self.execute(RpcRequest::get_schema(identifier, version, format))
    }

    /// Close the session. The next operation reconnects.
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }
}

/// Device-family capability advertisement.
///
/// The base implementation reports a JSON summary; device families with
/// their own advertisement format override this.
pub trait CapabilityReporter {
    /// Device information and supported rpc methods, as a string
    fn get_capabilities(&mut self) -> Result<String>;
}

impl<T: Transport> CapabilityReporter for NetconfClient<T> {
    fn get_capabilities(&mut self) -> Result<String> {
        self.session.ensure_connected()?;
        let capabilities = self
            .session
            .capabilities()
            .ok_or_else(|| NetconfError::Connection("capabilities not captured".into()))?;
        capabilities::capability_summary(capabilities)
    }
}

/// File transfer extension point.
///
/// No default behavior: device families wire these to their own mechanism
/// (SCP, SFTP, proprietary RPCs). Un-overridden calls fail with
/// [`NetconfError::NotImplemented`].
pub trait FileTransfer {
    /// Copy a file to the remote host
    fn put_file(&mut self, source: &Path, destination: &Path) -> Result<()> {
        let _ = (source, destination);
        Err(NetconfError::NotImplemented("put_file"))
    }

    /// Fetch a file from the remote host
    fn fetch_file(&mut self, source: &Path, destination: &Path) -> Result<()> {
        let _ = (source, destination);
        Err(NetconfError::NotImplemented("fetch_file"))
    }
}

impl<T: Transport> FileTransfer for NetconfClient<T> {}
