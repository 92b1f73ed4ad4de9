//! Capability negotiation results and the operation policy resolver
//!
//! The server's hello capabilities are captured once per session into a
//! [`CapabilitySet`] and never mutated afterwards. What the device can do is
//! derived on demand as an [`OperationProfile`], keyed by well-known URI
//! fragments; capabilities this module does not recognize are preserved but
//! not interpreted.

use serde::Serialize;

use crate::error::Result;
use crate::types::Datastore;

/// The capability URIs advertised by the server, frozen at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    /// Advertised URIs in their original order
    uris: Vec<String>,
    /// Newline-joined buffer for fragment membership queries
    joined: String,
}

impl CapabilitySet {
    /// Capture a capability set from advertised URIs
    pub fn from_uris<I>(uris: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let uris: Vec<String> = uris.into_iter().collect();
        let joined = uris.join("\n");
        Self { uris, joined }
    }

    /// Test whether any advertised URI contains the given fragment,
    /// e.g. `":candidate"` or a full URI
    pub fn supports(&self, fragment: &str) -> bool {
        self.joined.contains(fragment)
    }

    /// The advertised URIs in their original order
    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.uris.iter()
    }

    /// Derive the operation profile for this capability set
    pub fn operations(&self) -> OperationProfile {
        device_operations(&self.uris)
    }
}

/// High-level behaviors derived from the negotiated capabilities.
///
/// Recomputed on demand, never stored session state. Serializes for the
/// JSON capability report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationProfile {
    pub supports_commit: bool,
    pub supports_defaults: bool,
    pub supports_confirm_commit: bool,
    pub supports_startup: bool,
    pub supports_xpath: bool,
    pub supports_writable_running: bool,
    pub supports_validate: bool,
    /// Datastores that may be locked, in fixed [running, candidate, startup]
    /// order, filtered by capability support
    pub lock_datastore: Vec<Datastore>,
    pub supports_lock: bool,
}

/// Derive the operation profile from the server's hello capabilities.
///
/// Pure and deterministic: the same input always yields the same profile,
/// no I/O, input left untouched.
pub fn device_operations(server_capabilities: &[String]) -> OperationProfile {
    let capabilities = server_capabilities.join("\n");

    let supports_commit = capabilities.contains(":candidate");
    let supports_defaults = capabilities.contains(":with-defaults");
    let supports_confirm_commit = capabilities.contains(":confirmed-commit");
    let supports_startup = capabilities.contains(":startup");
    let supports_xpath = capabilities.contains(":xpath");
    let supports_writable_running = capabilities.contains(":writable-running");
    let supports_validate = capabilities.contains(":writable-validate");

    let mut lock_datastore = Vec::new();
    if supports_writable_running {
        lock_datastore.push(Datastore::Running);
    }
    if supports_commit {
        lock_datastore.push(Datastore::Candidate);
    }
    if supports_startup {
        lock_datastore.push(Datastore::Startup);
    }
    let supports_lock = !lock_datastore.is_empty();

    OperationProfile {
        supports_commit,
        supports_defaults,
        supports_confirm_commit,
        supports_startup,
        supports_xpath,
        supports_writable_running,
        supports_validate,
        lock_datastore,
        supports_lock,
    }
}

/// JSON document shape of [`capability_summary`]
#[derive(Serialize)]
struct CapabilityReport<'a> {
    network_api: &'static str,
    rpc: &'static [&'static str],
    device_operations: OperationProfile,
    server_capabilities: &'a [String],
}

/// Format a capability set as a JSON summary: network API name, base RPC
/// names, derived operation profile, and the advertised URIs.
///
/// Device families with richer advertisement formats override
/// `CapabilityReporter` instead.
pub fn capability_summary(capabilities: &CapabilitySet) -> Result<String> {
    let report = CapabilityReport {
        network_api: "netconf",
        rpc: crate::client::BASE_RPC,
        device_operations: capabilities.operations(),
        server_capabilities: capabilities.uris(),
    };
    Ok(serde_json::to_string(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(uris: &[&str]) -> Vec<String> {
        uris.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_capability_set() {
        let capabilities = caps(&[
            "urn:ietf:params:netconf:base:1.1",
            "urn:ietf:params:netconf:capability:candidate:1.0",
            "urn:ietf:params:netconf:capability:confirmed-commit:1.1",
            "urn:ietf:params:netconf:capability:startup:1.0",
            "urn:ietf:params:netconf:capability:writable-running:1.0",
        ]);
        let profile = device_operations(&capabilities);

        assert!(profile.supports_commit);
        assert!(profile.supports_confirm_commit);
        assert!(profile.supports_startup);
        assert!(profile.supports_writable_running);
        assert_eq!(
            profile.lock_datastore,
            vec![Datastore::Running, Datastore::Candidate, Datastore::Startup]
        );
        assert!(profile.supports_lock);
    }

    #[test]
    fn test_base_only_capability_set() {
        let capabilities = caps(&["urn:ietf:params:netconf:base:1.0"]);
        let profile = device_operations(&capabilities);

        assert!(!profile.supports_commit);
        assert!(!profile.supports_defaults);
        assert!(!profile.supports_confirm_commit);
        assert!(!profile.supports_startup);
        assert!(!profile.supports_xpath);
        assert!(!profile.supports_writable_running);
        assert!(!profile.supports_validate);
        assert!(profile.lock_datastore.is_empty());
        assert!(!profile.supports_lock);
    }

    #[test]
    fn test_resolver_is_pure() {
        let capabilities = caps(&[
            "urn:ietf:params:netconf:capability:candidate:1.0",
            "urn:ietf:params:netconf:capability:xpath:1.0",
        ]);
        let first = device_operations(&capabilities);
        let second = device_operations(&capabilities);

        assert_eq!(first, second);
    }

    #[test]
    fn test_lock_datastore_invariants() {
        // Each lockable datastore implies its gating capability, and
        // supports_lock tracks list non-emptiness.
        let sets = [
            caps(&["urn:ietf:params:netconf:capability:candidate:1.0"]),
            caps(&["urn:ietf:params:netconf:capability:writable-running:1.0"]),
            caps(&["urn:ietf:params:netconf:capability:startup:1.0"]),
            caps(&["urn:ietf:params:netconf:base:1.0"]),
        ];

        for capabilities in &sets {
            let profile = device_operations(capabilities);
            if profile.lock_datastore.contains(&Datastore::Candidate) {
                assert!(profile.supports_commit);
            }
            if profile.lock_datastore.contains(&Datastore::Running) {
                assert!(profile.supports_writable_running);
            }
            if profile.lock_datastore.contains(&Datastore::Startup) {
                assert!(profile.supports_startup);
            }
            assert_eq!(profile.supports_lock, !profile.lock_datastore.is_empty());
        }
    }

    #[test]
    fn test_capability_set_membership() {
        let set = CapabilitySet::from_uris(caps(&[
            "urn:ietf:params:netconf:capability:candidate:1.0",
            "http://example.com/proprietary",
        ]));

        assert!(set.supports(":candidate"));
        assert!(set.supports("http://example.com/proprietary"));
        assert!(!set.supports(":startup"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_capability_summary_json() {
        let set = CapabilitySet::from_uris(caps(&[
            "urn:ietf:params:netconf:capability:candidate:1.0",
        ]));
        let summary = capability_summary(&set).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();

        assert_eq!(parsed["network_api"], "netconf");
        assert_eq!(parsed["device_operations"]["supports_commit"], true);
        assert_eq!(parsed["device_operations"]["lock_datastore"][0], "candidate");
        assert_eq!(
            parsed["server_capabilities"][0],
            "urn:ietf:params:netconf:capability:candidate:1.0"
        );
        assert!(parsed["rpc"].as_array().unwrap().len() == 4);
    }
}
