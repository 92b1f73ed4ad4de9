//! Client-side RPC request building
//!
//! One constructor per NETCONF operation, each producing an [`RpcRequest`]
//! element tree, plus the `<rpc>` envelope serialization. Construction is
//! where malformed caller input fails, before any network I/O.
//!
//! Parameters that depend on optional capabilities (with-defaults,
//! rollback-on-error) are passed through without a client-side capability
//! check; an unsupported parameter surfaces as an rpc error from the device.

use crate::error::{NetconfError, Result};
use crate::types::{
    Config, ConfigFormat, ConfigSource, Datastore, EditConfigOptions, Filter, FilterSeq,
    SchemaFormat, WithDefaults,
};
use crate::xml::{self, BASE_NS, Element, MONITORING_NS, WITH_DEFAULTS_NS, local_name};

/// A single NETCONF request, rooted at its operation element
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    operation: Element,
}

impl RpcRequest {
    /// Retrieve running configuration and device state.
    ///
    /// `with_defaults` depends on the `:with-defaults` capability and is
    /// passed through unchecked.
    pub fn get(filter: &[Filter], with_defaults: Option<WithDefaults>) -> Result<Self> {
        let filter = FilterSeq::from(filter);
        let mut operation = Element::new("get");
        if let Some(element) = filter_element(&filter)? {
            operation.push(element);
        }
        if let Some(mode) = with_defaults {
            operation.push(Element::with_ns("with-defaults", WITH_DEFAULTS_NS).text(mode.as_str()));
        }
        Ok(Self { operation })
    }

    /// Retrieve all or part of a configuration datastore.
    /// `source` defaults to the running datastore.
    pub fn get_config(source: Option<Datastore>, filter: &[Filter]) -> Result<Self> {
        let filter = FilterSeq::from(filter);
        let source = source.unwrap_or(Datastore::Running);
        let mut operation =
            Element::new("get-config").child(Element::new("source").child(datastore_element(source)));
        if let Some(element) = filter_element(&filter)? {
            operation.push(element);
        }
        Ok(Self { operation })
    }

    /// Load configuration into the target datastore.
    /// The target defaults to the candidate datastore.
    pub fn edit_config(config: Config, options: &EditConfigOptions) -> Result<Self> {
        let target = options.target.unwrap_or(Datastore::Candidate);
        let mut operation =
            Element::new("edit-config").child(Element::new("target").child(datastore_element(target)));

        if let Some(value) = options.default_operation {
            operation.push(Element::new("default-operation").text(value.as_str()));
        }
        if let Some(value) = options.test_option {
            operation.push(Element::new("test-option").text(value.as_str()));
        }
        if let Some(value) = options.error_option {
            operation.push(Element::new("error-option").text(value.as_str()));
        }

        operation.push(config_element(config, options.format)?);
        Ok(Self { operation })
    }

    /// Validate the contents of the given configuration source.
    /// Defaults to the candidate datastore.
    pub fn validate(source: Option<ConfigSource>) -> Result<Self> {
        let source = source.unwrap_or(ConfigSource::Datastore(Datastore::Candidate));
        let operation =
            Element::new("validate").child(Element::new("source").child(source_element(source)?));
        Ok(Self { operation })
    }

    /// Replace the target datastore with the contents of the source
    pub fn copy_config(source: ConfigSource, target: ConfigSource) -> Result<Self> {
        let operation = Element::new("copy-config")
            .child(Element::new("target").child(source_element(target)?))
            .child(Element::new("source").child(source_element(source)?));
        Ok(Self { operation })
    }

    /// Delete a configuration datastore
    pub fn delete_config(target: ConfigSource) -> Result<Self> {
        let operation =
            Element::new("delete-config").child(Element::new("target").child(source_element(target)?));
        Ok(Self { operation })
    }

    /// Lock a datastore; defaults to candidate
    pub fn lock(target: Option<Datastore>) -> Self {
        let target = target.unwrap_or(Datastore::Candidate);
        Self {
            operation: Element::new("lock")
                .child(Element::new("target").child(datastore_element(target))),
        }
    }

    /// Release a datastore lock; defaults to candidate
    pub fn unlock(target: Option<Datastore>) -> Self {
        let target = target.unwrap_or(Datastore::Candidate);
        Self {
            operation: Element::new("unlock")
                .child(Element::new("target").child(datastore_element(target))),
        }
    }

    /// Revert the candidate datastore to the running configuration
    pub fn discard_changes() -> Self {
        Self {
            operation: Element::new("discard-changes"),
        }
    }

    /// Commit the candidate datastore.
    ///
    /// With `confirmed`, the commit auto-reverts unless a follow-up commit
    /// arrives within `timeout` seconds (device default 600 when omitted).
    /// `persist` tags the pending confirmation with a token that survives
    /// this session's termination. A plain commit sent while a confirmed
    /// commit is outstanding finalizes it.
    pub fn commit(confirmed: bool, timeout: Option<u32>, persist: Option<&str>) -> Self {
        let mut operation = Element::new("commit");
        if confirmed {
            operation.push(Element::new("confirmed"));
            if let Some(seconds) = timeout {
                operation.push(Element::new("confirm-timeout").text(seconds.to_string()));
            }
            if let Some(token) = persist {
                operation.push(Element::new("persist").text(token));
            }
        }
        Self { operation }
    }

    /// Retrieve a named schema from the device.
    /// The format element is omitted when `None`; the device then defaults
    /// to the YANG representation.
    pub fn get_schema(
        identifier: &str,
        version: Option<&str>,
        format: Option<SchemaFormat>,
    ) -> Self {
        let mut operation = Element::with_ns("get-schema", MONITORING_NS)
            .child(Element::new("identifier").text(identifier));
        if let Some(version) = version {
            operation.push(Element::new("version").text(version));
        }
        if let Some(format) = format {
            operation.push(Element::new("format").text(format.as_str()));
        }
        Self { operation }
    }

    /// Build a free-form operation from a raw XML command.
    ///
    /// The escape hatch for vendor-specific RPCs. The command is parsed
    /// first: unparsable XML fails with [`NetconfError::MalformedRequest`]
    /// before anything reaches the wire. `source` and `filter`, when given,
    /// are appended as children of the command element.
    pub fn raw(rpc_command: &str, source: Option<Datastore>, filter: &[Filter]) -> Result<Self> {
        let mut operation =
            xml::parse(rpc_command).map_err(|e| NetconfError::MalformedRequest(e.to_string()))?;

        if let Some(datastore) = source {
            operation.push(Element::new("source").child(datastore_element(datastore)));
        }
        let filter = FilterSeq::from(filter);
        if let Some(element) = filter_element(&filter)? {
            operation.push(element);
        }
        Ok(Self { operation })
    }

    /// The operation element this request is rooted at
    pub fn operation(&self) -> &Element {
        &self.operation
    }

    /// Serialize the full `<rpc>` envelope with the given message-id
    pub fn to_envelope(&self, message_id: u64) -> Result<String> {
        let rpc = Element::new("rpc")
            .attr("message-id", message_id.to_string())
            .attr("xmlns", BASE_NS)
            .child(self.operation.clone());
        xml::serialize(&rpc)
    }
}

fn datastore_element(datastore: Datastore) -> Element {
    Element::new(datastore.as_str())
}

fn source_element(source: ConfigSource) -> Result<Element> {
    match source {
        ConfigSource::Datastore(datastore) => Ok(datastore_element(datastore)),
        ConfigSource::Url(url) => Ok(Element::new("url").text(url)),
        ConfigSource::Config(fragment) => {
            let parsed = xml::parse(&fragment)
                .map_err(|e| NetconfError::MalformedRequest(e.to_string()))?;
            Ok(wrap_in_config(parsed))
        }
    }
}

fn config_element(config: Config, format: ConfigFormat) -> Result<Element> {
    match (config, format) {
        (Config::Element(element), _) => Ok(wrap_in_config(element)),
        (Config::Text(text), ConfigFormat::Xml) => {
            let parsed =
                xml::parse(&text).map_err(|e| NetconfError::MalformedRequest(e.to_string()))?;
            Ok(wrap_in_config(parsed))
        }
        // Device-native text goes through verbatim; its syntax is the
        // device's to judge.
        (Config::Text(text), ConfigFormat::Text) => Ok(Element::new("config-text").text(text)),
    }
}

fn wrap_in_config(element: Element) -> Element {
    if local_name(&element.name) == "config" {
        element
    } else {
        Element::new("config").child(element)
    }
}

/// Build the `<filter>` element from a normalized sequence.
///
/// Subtree criteria are embedded in order under one filter element. An
/// XPath filter maps to a `select` attribute and cannot be combined with
/// other expressions.
fn filter_element(filter: &FilterSeq) -> Result<Option<Element>> {
    if filter.is_empty() {
        return Ok(None);
    }

    if filter.len() == 1
        && let Filter::Xpath(select) = &filter.as_slice()[0]
    {
        return Ok(Some(
            Element::new("filter").attr("type", "xpath").attr("select", select),
        ));
    }

    let mut element = Element::new("filter").attr("type", "subtree");
    for entry in filter.iter() {
        match entry {
            Filter::Subtree(criteria) => {
                let parsed = xml::parse(criteria)
                    .map_err(|e| NetconfError::MalformedRequest(e.to_string()))?;
                element.push(parsed);
            }
            Filter::Xpath(_) => {
                return Err(NetconfError::MalformedRequest(
                    "an xpath filter cannot be combined with other filters".into(),
                ));
            }
        }
    }
    Ok(Some(element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefaultOperation, ErrorOption, TestOption};

    fn envelope(request: &RpcRequest) -> String {
        request.to_envelope(1).unwrap()
    }

    #[test]
    fn test_get_config_defaults_to_running() {
        let request = RpcRequest::get_config(None, &[]).unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<get-config><source><running/></source></get-config>"));
    }

    #[test]
    fn test_envelope_carries_message_id_and_namespace() {
        let request = RpcRequest::discard_changes();
        let xml = request.to_envelope(42).unwrap();

        assert!(xml.starts_with(&format!(r#"<rpc message-id="42" xmlns="{BASE_NS}">"#)));
        assert!(xml.contains("<discard-changes/>"));
    }

    #[test]
    fn test_filter_order_preserved() {
        let filters = vec![
            Filter::subtree("<interfaces/>"),
            Filter::subtree("<system/>"),
            Filter::subtree("<routing/>"),
        ];
        let request = RpcRequest::get_config(None, &filters).unwrap();
        let xml = envelope(&request);

        assert!(xml.contains(
            r#"<filter type="subtree"><interfaces/><system/><routing/></filter>"#
        ));
    }

    #[test]
    fn test_xpath_filter_select_attribute() {
        let request = RpcRequest::get(&[Filter::xpath("/interfaces/interface")], None).unwrap();
        let xml = envelope(&request);

        assert!(xml.contains(r#"<filter type="xpath" select="/interfaces/interface"/>"#));
    }

    #[test]
    fn test_xpath_filter_cannot_be_combined() {
        let filters = vec![Filter::xpath("/a"), Filter::subtree("<b/>")];
        let result = RpcRequest::get(&filters, None);

        assert!(matches!(result, Err(NetconfError::MalformedRequest(_))));
    }

    #[test]
    fn test_get_with_defaults_passthrough() {
        let request = RpcRequest::get(&[], Some(WithDefaults::Trim)).unwrap();
        let xml = envelope(&request);

        assert!(xml.contains(&format!(
            r#"<with-defaults xmlns="{WITH_DEFAULTS_NS}">trim</with-defaults>"#
        )));
    }

    #[test]
    fn test_edit_config_options_and_wrapping() {
        let options = EditConfigOptions {
            default_operation: Some(DefaultOperation::Merge),
            test_option: Some(TestOption::TestThenSet),
            error_option: Some(ErrorOption::RollbackOnError),
            ..Default::default()
        };
        let request =
            RpcRequest::edit_config(Config::from("<interfaces><interface/></interfaces>"), &options)
                .unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<target><candidate/></target>"));
        assert!(xml.contains("<default-operation>merge</default-operation>"));
        assert!(xml.contains("<test-option>test-then-set</test-option>"));
        assert!(xml.contains("<error-option>rollback-on-error</error-option>"));
        assert!(xml.contains("<config><interfaces><interface/></interfaces></config>"));
    }

    #[test]
    fn test_edit_config_keeps_existing_config_root() {
        let request = RpcRequest::edit_config(
            Config::from("<config><system/></config>"),
            &EditConfigOptions::default(),
        )
        .unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<config><system/></config>"));
        assert!(!xml.contains("<config><config>"));
    }

    #[test]
    fn test_edit_config_rejects_malformed_config() {
        let result = RpcRequest::edit_config(
            Config::from("<broken"),
            &EditConfigOptions::default(),
        );
        assert!(matches!(result, Err(NetconfError::MalformedRequest(_))));
    }

    #[test]
    fn test_confirmed_commit_request() {
        let request = RpcRequest::commit(true, Some(120), Some("tok1"));
        let xml = envelope(&request);

        assert!(xml.contains("<confirmed/>"));
        assert!(xml.contains("<confirm-timeout>120</confirm-timeout>"));
        assert!(xml.contains("<persist>tok1</persist>"));
    }

    #[test]
    fn test_plain_commit_request() {
        let request = RpcRequest::commit(false, None, None);
        let xml = envelope(&request);

        assert!(xml.contains("<commit/>"));
        assert!(!xml.contains("confirmed"));
    }

    #[test]
    fn test_confirmed_commit_without_timeout_omits_element() {
        let request = RpcRequest::commit(true, None, None);
        let xml = envelope(&request);

        assert!(xml.contains("<commit><confirmed/></commit>"));
    }

    #[test]
    fn test_get_schema_format_omitted_by_default() {
        let request = RpcRequest::get_schema("ietf-interfaces", None, None);
        let xml = envelope(&request);

        assert!(xml.contains(&format!(r#"<get-schema xmlns="{MONITORING_NS}">"#)));
        assert!(xml.contains("<identifier>ietf-interfaces</identifier>"));
        assert!(!xml.contains("<format>"));

        let with_format =
            RpcRequest::get_schema("ietf-interfaces", Some("2018-02-20"), Some(SchemaFormat::Yin));
        let xml = envelope(&with_format);
        assert!(xml.contains("<version>2018-02-20</version>"));
        assert!(xml.contains("<format>yin</format>"));
    }

    #[test]
    fn test_copy_config_inline_source() {
        let request = RpcRequest::copy_config(
            ConfigSource::Config("<system><host-name>r1</host-name></system>".into()),
            ConfigSource::Datastore(Datastore::Startup),
        )
        .unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<target><startup/></target>"));
        assert!(xml.contains("<source><config><system>"));
    }

    #[test]
    fn test_delete_config_url_target() {
        let request =
            RpcRequest::delete_config(ConfigSource::Url("file://backup.conf".into())).unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<delete-config><target><url>file://backup.conf</url></target></delete-config>"));
    }

    #[test]
    fn test_raw_dispatch_appends_source_and_filter() {
        let request = RpcRequest::raw(
            "<get-chassis-inventory/>",
            Some(Datastore::Running),
            &[Filter::subtree("<chassis/>")],
        )
        .unwrap();
        let xml = envelope(&request);

        assert!(xml.contains("<get-chassis-inventory>"));
        assert!(xml.contains("<source><running/></source>"));
        assert!(xml.contains(r#"<filter type="subtree"><chassis/></filter>"#));
    }

    #[test]
    fn test_raw_dispatch_rejects_malformed_command() {
        let result = RpcRequest::raw("<not-xml", None, &[]);
        assert!(matches!(result, Err(NetconfError::MalformedRequest(_))));
    }

    #[test]
    fn test_lock_unlock_default_to_candidate() {
        let lock = envelope(&RpcRequest::lock(None));
        let unlock = envelope(&RpcRequest::unlock(Some(Datastore::Running)));

        assert!(lock.contains("<lock><target><candidate/></target></lock>"));
        assert!(unlock.contains("<unlock><target><running/></target></unlock>"));
    }
}
