//! Deterministic construction of the RFC-9421 signature base string
//! (spec.md §4.1).

use url::Url;

use crate::error::CanonError;
use crate::params::{ComponentKind, SignatureInputParams};
use crate::request::SignatureBaseRequest;

/// Builds the signature base string for `req` covering the components named
/// in `input`, in a single pass: the first unresolved component aborts the
/// whole build with no partial output, per spec.md §4.1.
pub fn build_signature_base(
    req: &SignatureBaseRequest,
    input: &SignatureInputParams,
) -> Result<String, CanonError> {
    let url = Url::parse(req.target_uri())
        .map_err(|_| CanonError::MalformedIdentifier(req.target_uri().to_string()))?;

    let mut lines = Vec::with_capacity(input.components.len() + 1);
    for component in &input.components {
        let value = resolve_component(req, &url, component.kind()?)?;
        lines.push(format!("{}: {value}", component.identifier()));
    }

    let component_list = input
        .components
        .iter()
        .map(|c| c.identifier().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(format!(
        "\"@signature-params\": ({component_list}){}",
        input.params.render()
    ));

    Ok(lines.join("\n"))
}

fn resolve_component(
    req: &SignatureBaseRequest,
    url: &Url,
    kind: ComponentKind,
) -> Result<String, CanonError> {
    match kind {
        ComponentKind::Method => Ok(req.method().to_ascii_uppercase()),
        ComponentKind::Authority => Ok(authority(req, url)),
        ComponentKind::Scheme => Ok(url.scheme().to_ascii_lowercase()),
        ComponentKind::Path => Ok(path(url)),
        ComponentKind::Query => Ok(query(url)),
        ComponentKind::QueryParam(name) => query_param(url, &name),
        ComponentKind::RequestTarget => Ok(format!(
            "{} {}{}",
            req.method().to_ascii_uppercase(),
            path(url),
            query(url)
        )),
        ComponentKind::TargetUri => Ok(req.target_uri().to_string()),
        ComponentKind::Status => Err(CanonError::StatusOnRequest),
        ComponentKind::Field(name) => field_value(req, &name),
    }
}

fn authority(req: &SignatureBaseRequest, url: &Url) -> String {
    if let Some(values) = req.headers().values("host") {
        if let Some(first) = values.first() {
            return first.to_ascii_lowercase();
        }
    }
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}").to_ascii_lowercase(),
        None => host.to_ascii_lowercase(),
    }
}

fn path(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn query(url: &Url) -> String {
    match url.query() {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => String::new(),
    }
}

fn query_param(url: &Url, name: &str) -> Result<String, CanonError> {
    let mut matches = url
        .query_pairs()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned());
    let first = matches
        .next()
        .ok_or_else(|| CanonError::ComponentNotFound(format!("@query-param;name=\"{name}\"")))?;
    if matches.next().is_some() {
        // RFC-9421 leaves repeated-name behavior underspecified; spec.md §9
        // Open Question 1 recommends failing rather than silently taking
        // the first value.
        return Err(CanonError::ComponentNotFound(format!(
            "@query-param;name=\"{name}\" is multi-valued"
        )));
    }
    Ok(first)
}

fn field_value(req: &SignatureBaseRequest, name: &str) -> Result<String, CanonError> {
    let values = req
        .headers()
        .values(name)
        .ok_or_else(|| CanonError::ComponentNotFound(name.to_string()))?;
    Ok(values
        .iter()
        .map(|v| v.trim())
        .collect::<Vec<_>>()
        .join(", "))
}
