//! Session state and the connection-ensuring guard
//!
//! A [`Session`] owns the transport handle exclusively and captures the
//! server's capabilities exactly once per connect cycle. Every dispatch
//! funnels through [`Session::ensure_connected`] + [`Session::send`], so
//! the connect-if-needed check lives in one place.

use tracing::{debug, trace};

use crate::capabilities::CapabilitySet;
use crate::error::Result;
use crate::request_builder::RpcRequest;
use crate::transport::Transport;

/// The live connection to one device: transport handle, captured
/// capability set, and the message-id counter
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    capabilities: Option<CapabilitySet>,
    next_message_id: u64,
}

impl<T: Transport> Session<T> {
    /// Wrap a transport; no connection is made until first use
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            capabilities: None,
            next_message_id: 1,
        }
    }

    /// Connect if the transport is not already connected.
    ///
    /// Idempotent: a no-op on a connected session. On a fresh connect the
    /// hello capabilities are captured into the session's [`CapabilitySet`].
    /// Establishment failures propagate unmodified; retry policy belongs to
    /// the transport or the caller.
    pub fn ensure_connected(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            return Ok(());
        }
        debug!("establishing netconf session");
        self.transport.connect()?;
        let capabilities =
            CapabilitySet::from_uris(self.transport.hello_capabilities().iter().cloned());
        debug!(capabilities = capabilities.len(), "session established");
        self.capabilities = Some(capabilities);
        Ok(())
    }

    /// Whether the underlying transport reports a usable channel
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The capability set captured at session establishment, if connected
    /// at least once
    pub fn capabilities(&self) -> Option<&CapabilitySet> {
        self.capabilities.as_ref()
    }

    /// Serialize the request into its `<rpc>` envelope and exchange it for
    /// the raw reply. Message-ids increase monotonically per session.
    pub fn send(&mut self, request: &RpcRequest) -> Result<String> {
        let message_id = self.next_message_id;
        self.next_message_id += 1;
        let envelope = request.to_envelope(message_id)?;
        trace!(message_id, "sending rpc");
        self.transport.send_rpc(&envelope)
    }

    /// Tear down the transport and drop the captured capabilities.
    /// The next operation reconnects and captures a fresh set.
    pub fn close(&mut self) -> Result<()> {
        debug!("closing netconf session");
        self.capabilities = None;
        self.transport.close()
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
