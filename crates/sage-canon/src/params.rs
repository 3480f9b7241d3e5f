//! `SignatureInputParams`: the ordered covered-component list plus the
//! `@signature-params` metadata (spec.md §4.1).

use crate::error::CanonError;

/// One covered component, as named by the caller.
///
/// The `identifier` text is preserved verbatim as the left-hand side of the
/// emitted signature-base line and inside the `@signature-params` component
/// list, per spec.md §4.1 ("Component identifier syntax is preserved
/// verbatim"). [`CoveredComponent::kind`] parses it once to decide how the
/// value is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredComponent {
    identifier: String,
}

/// What a parsed [`CoveredComponent`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ComponentKind {
    Method,
    Authority,
    Scheme,
    Path,
    Query,
    QueryParam(String),
    RequestTarget,
    TargetUri,
    Status,
    Field(String),
}

impl CoveredComponent {
    /// Wraps a raw component identifier string (e.g. `"@method"`,
    /// `"via"`, or `"@query-param";name="id"`), preserved verbatim for output.
    pub fn new(identifier: impl Into<String>) -> Self {
        CoveredComponent {
            identifier: identifier.into(),
        }
    }

    /// `"@method"`.
    pub fn method() -> Self {
        CoveredComponent::new("\"@method\"")
    }

    /// `"@authority"`.
    pub fn authority() -> Self {
        CoveredComponent::new("\"@authority\"")
    }

    /// `"@scheme"`.
    pub fn scheme() -> Self {
        CoveredComponent::new("\"@scheme\"")
    }

    /// `"@path"`.
    pub fn path() -> Self {
        CoveredComponent::new("\"@path\"")
    }

    /// `"@query"`.
    pub fn query() -> Self {
        CoveredComponent::new("\"@query\"")
    }

    /// `"@query-param";name="<name>"`.
    pub fn query_param(name: &str) -> Self {
        CoveredComponent::new(format!("\"@query-param\";name=\"{name}\""))
    }

    /// `"@request-target"`.
    pub fn request_target() -> Self {
        CoveredComponent::new("\"@request-target\"")
    }

    /// `"@target-uri"`.
    pub fn target_uri() -> Self {
        CoveredComponent::new("\"@target-uri\"")
    }

    /// `"@status"`.
    pub fn status() -> Self {
        CoveredComponent::new("\"@status\"")
    }

    /// A lowercased HTTP field name, e.g. `"via"`.
    pub fn field(name: &str) -> Self {
        CoveredComponent::new(format!("\"{}\"", name.to_ascii_lowercase()))
    }

    /// The identifier text exactly as it will appear on the output line.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn kind(&self) -> Result<ComponentKind, CanonError> {
        let (name, params) = parse_identifier(&self.identifier)?;
        let kind = match name.as_str() {
            "@method" => ComponentKind::Method,
            "@authority" => ComponentKind::Authority,
            "@scheme" => ComponentKind::Scheme,
            "@path" => ComponentKind::Path,
            "@query" => ComponentKind::Query,
            "@query-param" => {
                let param_name = params
                    .iter()
                    .find(|(k, _)| k == "name")
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| CanonError::MalformedIdentifier(self.identifier.clone()))?;
                ComponentKind::QueryParam(param_name)
            }
            "@request-target" => ComponentKind::RequestTarget,
            "@target-uri" => ComponentKind::TargetUri,
            "@status" => ComponentKind::Status,
            other if other.starts_with('@') => {
                return Err(CanonError::MalformedIdentifier(self.identifier.clone()));
            }
            other => ComponentKind::Field(other.to_ascii_lowercase()),
        };
        Ok(kind)
    }
}

/// Parses `"name"` or `"name";k1="v1";k2=42` into the quoted name and an
/// ordered list of its parameters. This is a minimal subset of RFC-8941
/// structured-field item syntax sufficient for the component identifiers
/// spec.md §4.1 actually uses (`keyid`/`alg`/`nonce` quoted strings,
/// `created`/`expires` bare integers, `@query-param`'s `name` parameter).
fn parse_identifier(raw: &str) -> Result<(String, Vec<(String, String)>), CanonError> {
    let malformed = || CanonError::MalformedIdentifier(raw.to_string());
    let raw = raw.trim();
    if !raw.starts_with('"') {
        return Err(malformed());
    }
    let close = raw[1..].find('"').ok_or_else(malformed)? + 1;
    let name = raw[1..close].to_string();
    let rest = raw[close + 1..].trim();

    let mut params = Vec::new();
    for part in rest.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut kv = part.splitn(2, '=');
        let key = kv.next().ok_or_else(malformed)?.trim().to_string();
        let value = kv.next().ok_or_else(malformed)?.trim();
        let value = value.trim_matches('"').to_string();
        params.push((key, value));
    }
    Ok((name, params))
}

/// The `@signature-params` metadata: `keyid`/`alg`/`nonce` are quoted
/// strings, `created`/`expires` are bare integers, per spec.md §4.1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureParams {
    pub keyid: Option<String>,
    pub alg: Option<String>,
    pub created: Option<i64>,
    pub expires: Option<i64>,
    pub nonce: Option<String>,
}

impl SignatureParams {
    /// Renders the parameter tail following the covered-component list, e.g.
    /// `;keyid="test-key";alg="ed25519";created=1719234000`.
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        if let Some(keyid) = &self.keyid {
            out.push_str(&format!(";keyid=\"{keyid}\""));
        }
        if let Some(alg) = &self.alg {
            out.push_str(&format!(";alg=\"{alg}\""));
        }
        if let Some(created) = self.created {
            out.push_str(&format!(";created={created}"));
        }
        if let Some(expires) = self.expires {
            out.push_str(&format!(";expires={expires}"));
        }
        if let Some(nonce) = &self.nonce {
            out.push_str(&format!(";nonce=\"{nonce}\""));
        }
        out
    }
}

/// The full `SignatureInputParams`: an ordered covered-component list plus
/// the trailing `@signature-params` metadata.
#[derive(Debug, Clone, Default)]
pub struct SignatureInputParams {
    pub components: Vec<CoveredComponent>,
    pub params: SignatureParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_identifier() {
        let (name, params) = parse_identifier("\"@method\"").unwrap();
        assert_eq!(name, "@method");
        assert!(params.is_empty());
    }

    #[test]
    fn parses_identifier_with_param() {
        let (name, params) = parse_identifier("\"@query-param\";name=\"id\"").unwrap();
        assert_eq!(name, "@query-param");
        assert_eq!(params, vec![("name".to_string(), "id".to_string())]);
    }

    #[test]
    fn rejects_unquoted_identifier() {
        assert!(parse_identifier("@method").is_err());
    }

    #[test]
    fn query_param_kind_requires_name_param() {
        let component = CoveredComponent::new("\"@query-param\"");
        assert!(component.kind().is_err());
    }
}
