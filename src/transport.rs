//! Transport collaborator boundary
//!
//! The byte-stream channel to the device (typically SSH with the netconf
//! subsystem) lives outside this crate. Any stack can plug in by
//! implementing [`Transport`]; the client core only ever talks through it.

use crate::error::Result;

/// An authenticated request/response channel to one device.
///
/// Implementations own connection establishment, authentication, and
/// message framing. `send_rpc` blocks for the full network round trip;
/// NETCONF sessions carry one outstanding request at a time, so a response
/// is fully received before the next request is issued. Callers needing
/// bounded waits impose timeouts at this layer.
pub trait Transport {
    /// Establish the channel. Errors propagate unmodified; no retry here.
    fn connect(&mut self) -> Result<()>;

    /// Whether the channel is currently usable
    fn is_connected(&self) -> bool;

    /// Capability URIs from the server's hello, available after `connect`
    fn hello_capabilities(&self) -> &[String];

    /// Exchange one serialized `<rpc>` envelope for the raw reply document
    fn send_rpc(&mut self, request: &str) -> Result<String>;

    /// Tear down the channel
    fn close(&mut self) -> Result<()>;
}
