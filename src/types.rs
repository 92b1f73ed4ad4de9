//! NETCONF operation parameter types
//!
//! These types name the datastores, filters, and option values that the
//! request builder turns into protocol elements. They carry no validation
//! against the negotiated capability set: the device is authoritative, and
//! callers wanting proactive checks consult the `OperationProfile` first.

use serde::Serialize;

/// A named configuration datastore on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Datastore {
    /// The active configuration
    Running,
    /// The staging datastore committed to running via `commit`
    Candidate,
    /// The configuration loaded at boot
    Startup,
}

impl Datastore {
    /// Protocol name of the datastore element
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Candidate => "candidate",
            Self::Startup => "startup",
        }
    }
}

impl std::fmt::Display for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter expression restricting what a get/get-config call returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Subtree filter criteria, given as a serialized XML fragment
    Subtree(String),
    /// XPath select expression (depends on the `:xpath` capability)
    Xpath(String),
}

impl Filter {
    /// Create a subtree filter from an XML fragment
    pub fn subtree(criteria: impl Into<String>) -> Self {
        Self::Subtree(criteria.into())
    }

    /// Create an XPath filter from a select expression
    pub fn xpath(select: impl Into<String>) -> Self {
        Self::Xpath(select.into())
    }
}

/// An ordered filter sequence, frozen before request construction.
///
/// Filters given as a growable collection are normalized into this immutable
/// form so that building the request cannot observe later mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSeq(Box<[Filter]>);

impl FilterSeq {
    /// True when no filter was given
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of filter expressions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The filters in their original order
    pub fn as_slice(&self) -> &[Filter] {
        &self.0
    }

    /// Iterate the filters in their original order
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }
}

impl From<&[Filter]> for FilterSeq {
    fn from(filters: &[Filter]) -> Self {
        Self(filters.into())
    }
}

impl From<Vec<Filter>> for FilterSeq {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters.into_boxed_slice())
    }
}

impl From<Filter> for FilterSeq {
    fn from(filter: Filter) -> Self {
        Self(Box::new([filter]))
    }
}

impl FromIterator<Filter> for FilterSeq {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `with-defaults` retrieval modes (RFC 6243)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithDefaults {
    ReportAll,
    ReportAllTagged,
    Trim,
    Explicit,
}

impl WithDefaults {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReportAll => "report-all",
            Self::ReportAllTagged => "report-all-tagged",
            Self::Trim => "trim",
            Self::Explicit => "explicit",
        }
    }
}

/// `default-operation` values for edit-config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOperation {
    Merge,
    Replace,
    None,
}

impl DefaultOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Replace => "replace",
            Self::None => "none",
        }
    }
}

/// `test-option` values for edit-config (depends on the `:validate` capability)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOption {
    TestThenSet,
    Set,
}

impl TestOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TestThenSet => "test-then-set",
            Self::Set => "set",
        }
    }
}

/// `error-option` values for edit-config.
///
/// `RollbackOnError` depends on the `:rollback-on-error` capability; it is
/// passed through without a client-side capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOption {
    StopOnError,
    ContinueOnError,
    RollbackOnError,
}

impl ErrorOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StopOnError => "stop-on-error",
            Self::ContinueOnError => "continue-on-error",
            Self::RollbackOnError => "rollback-on-error",
        }
    }
}

/// Encoding of the config payload handed to edit-config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// Structured XML, parsed and embedded under `<config>`
    #[default]
    Xml,
    /// Device-native text, embedded verbatim under `<config-text>`
    Text,
}

/// Schema representations for get-schema (RFC 6022)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yang,
    Yin,
    Xsd,
    Rng,
    Rnc,
}

impl SchemaFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yang => "yang",
            Self::Yin => "yin",
            Self::Xsd => "xsd",
            Self::Rng => "rng",
            Self::Rnc => "rnc",
        }
    }
}

/// Source or target of copy-config/validate/delete-config: a named
/// datastore, a URL, or an inline config subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Datastore(Datastore),
    Url(String),
    /// Inline `<config>` subtree as serialized XML
    Config(String),
}

impl From<Datastore> for ConfigSource {
    fn from(datastore: Datastore) -> Self {
        Self::Datastore(datastore)
    }
}

/// Config payload for edit-config: a serialized string or a pre-built
/// element tree rooted under a `config` node
#[derive(Debug, Clone, PartialEq)]
pub enum Config {
    Text(String),
    Element(crate::xml::Element),
}

impl From<&str> for Config {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Config {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<crate::xml::Element> for Config {
    fn from(element: crate::xml::Element) -> Self {
        Self::Element(element)
    }
}

/// Options for edit-config, with protocol defaults on `Default`
#[derive(Debug, Clone, Default)]
pub struct EditConfigOptions {
    /// Datastore being edited; `None` means candidate
    pub target: Option<Datastore>,
    /// Encoding of the config payload
    pub format: ConfigFormat,
    pub default_operation: Option<DefaultOperation>,
    pub test_option: Option<TestOption>,
    pub error_option: Option<ErrorOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datastore_names() {
        assert_eq!(Datastore::Running.as_str(), "running");
        assert_eq!(Datastore::Candidate.to_string(), "candidate");
        assert_eq!(Datastore::Startup.as_str(), "startup");
    }

    #[test]
    fn test_filter_seq_preserves_order() {
        let filters = vec![
            Filter::subtree("<interfaces/>"),
            Filter::subtree("<system/>"),
            Filter::subtree("<routing/>"),
        ];
        let seq = FilterSeq::from(filters.clone());

        assert_eq!(seq.len(), 3);
        let collected: Vec<&Filter> = seq.iter().collect();
        assert_eq!(collected[0], &filters[0]);
        assert_eq!(collected[1], &filters[1]);
        assert_eq!(collected[2], &filters[2]);
    }

    #[test]
    fn test_filter_seq_from_single() {
        let seq = FilterSeq::from(Filter::xpath("/interfaces/interface"));
        assert_eq!(seq.len(), 1);
        assert!(!seq.is_empty());
    }

    #[test]
    fn test_option_values() {
        assert_eq!(DefaultOperation::None.as_str(), "none");
        assert_eq!(TestOption::TestThenSet.as_str(), "test-then-set");
        assert_eq!(ErrorOption::RollbackOnError.as_str(), "rollback-on-error");
        assert_eq!(WithDefaults::ReportAllTagged.as_str(), "report-all-tagged");
        assert_eq!(SchemaFormat::Yang.as_str(), "yang");
    }
}
