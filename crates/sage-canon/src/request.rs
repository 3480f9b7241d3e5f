//! An HTTP-shaped request description: the minimal surface the
//! canonicalizer needs to resolve every derived and field component.
//!
//! This is deliberately not tied to any particular HTTP client/server
//! crate's request type, matching the reference workspace's pattern of
//! accepting borrowed, library-agnostic metadata at its signing/verification
//! boundary (see e.g. `x402-reqwest`'s `HttpRequestMeta`-style helpers)
//! rather than depending on `axum` or `reqwest` types from a leaf crate.

/// An HTTP header field: one name and all the values it appeared with, in
/// the order they were received on the wire.
#[derive(Debug, Clone)]
pub struct HeaderField {
    name: String,
    values: Vec<String>,
}

/// The ordered set of headers carried by a [`SignatureBaseRequest`].
///
/// Lookup by name is case-insensitive, matching HTTP field-name semantics;
/// insertion order (and within-name value order) is preserved so
/// multi-valued headers (e.g. `Via`) concatenate deterministically.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    fields: Vec<HeaderField>,
}

impl Headers {
    /// An empty header set.
    pub fn new() -> Self {
        Headers::default()
    }

    /// Appends a value for `name`, creating the field if this is its first occurrence.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        if let Some(field) = self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&name))
        {
            field.values.push(value);
        } else {
            self.fields.push(HeaderField {
                name,
                values: vec![value],
            });
        }
        self
    }

    /// Builder-style variant of [`Headers::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// All values recorded for `name`, in order of appearance, or `None` if absent.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.values.as_slice())
    }
}

/// The HTTP-shaped request a [`crate::build_signature_base`] call canonicalizes.
///
/// `target_uri` must be the full request URI exactly as received (spec.md
/// §4.1 `@target-uri`); derived components like `@authority` and `@path` are
/// computed from it unless a `Host` header overrides the authority.
#[derive(Debug, Clone)]
pub struct SignatureBaseRequest {
    method: String,
    target_uri: String,
    headers: Headers,
}

impl SignatureBaseRequest {
    /// Builds a request description from a method and full target URI.
    pub fn new(method: impl Into<String>, target_uri: impl Into<String>) -> Self {
        SignatureBaseRequest {
            method: method.into(),
            target_uri: target_uri.into(),
            headers: Headers::new(),
        }
    }

    /// Attaches a header set, replacing any previously attached one.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn target_uri(&self) -> &str {
        &self.target_uri
    }

    pub(crate) fn headers(&self) -> &Headers {
        &self.headers
    }
}
