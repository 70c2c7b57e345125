//! Header names, typed header values and media types.
//!
//! # Design Decisions
//! - Name identity is case-insensitive; the canonical spelling is kept for output
//! - Each name owns the textual form of its values (`header_text`)
//! - Values are typed by the name's kind; a mismatch is rejected when the value
//!   enters an entity, so `header_text` itself never fails

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Error raised for invalid header names or values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("Invalid header name {0:?}")]
    InvalidName(String),

    #[error("Invalid value for header {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// The kind of value a header carries. Decides parsing and textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Text,
    Number,
    MediaType,
}

/// Where a header may legally appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderScope {
    /// Request only (e.g. `Accept`, `Host`).
    Request,
    /// Response only (e.g. `Server`, `Set-Cookie`).
    Response,
    /// Entity headers, valid in both directions.
    Entity,
}

impl HeaderScope {
    pub fn is_response(&self) -> bool {
        matches!(self, HeaderScope::Response | HeaderScope::Entity)
    }

    pub fn is_request(&self) -> bool {
        matches!(self, HeaderScope::Request | HeaderScope::Entity)
    }
}

/// A typed header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Text(String),
    Number(u64),
    MediaType(MediaType),
}

impl HeaderValue {
    fn kind(&self) -> HeaderKind {
        match self {
            HeaderValue::Text(_) => HeaderKind::Text,
            HeaderValue::Number(_) => HeaderKind::Number,
            HeaderValue::MediaType(_) => HeaderKind::MediaType,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Number(value)
    }
}

impl From<MediaType> for HeaderValue {
    fn from(value: MediaType) -> Self {
        HeaderValue::MediaType(value)
    }
}

/// A case-insensitive header name.
#[derive(Debug, Clone)]
pub struct HttpHeaderName {
    name: Cow<'static, str>,
    kind: HeaderKind,
    scope: HeaderScope,
}

impl HttpHeaderName {
    pub const ACCEPT: HttpHeaderName = Self::constant("Accept", HeaderKind::Text, HeaderScope::Request);
    pub const ALLOW: HttpHeaderName = Self::constant("Allow", HeaderKind::Text, HeaderScope::Response);
    pub const CONTENT_LENGTH: HttpHeaderName =
        Self::constant("Content-Length", HeaderKind::Number, HeaderScope::Entity);
    pub const CONTENT_RANGE: HttpHeaderName =
        Self::constant("Content-Range", HeaderKind::Text, HeaderScope::Entity);
    pub const CONTENT_TYPE: HttpHeaderName =
        Self::constant("Content-Type", HeaderKind::MediaType, HeaderScope::Entity);
    pub const HOST: HttpHeaderName = Self::constant("Host", HeaderKind::Text, HeaderScope::Request);
    pub const LOCATION: HttpHeaderName = Self::constant("Location", HeaderKind::Text, HeaderScope::Response);
    pub const SERVER: HttpHeaderName = Self::constant("Server", HeaderKind::Text, HeaderScope::Response);
    pub const SET_COOKIE: HttpHeaderName =
        Self::constant("Set-Cookie", HeaderKind::Text, HeaderScope::Response);
    pub const USER_AGENT: HttpHeaderName =
        Self::constant("User-Agent", HeaderKind::Text, HeaderScope::Request);
    pub const WWW_AUTHENTICATE: HttpHeaderName =
        Self::constant("WWW-Authenticate", HeaderKind::Text, HeaderScope::Response);

    const KNOWN: [HttpHeaderName; 11] = [
        Self::ACCEPT,
        Self::ALLOW,
        Self::CONTENT_LENGTH,
        Self::CONTENT_RANGE,
        Self::CONTENT_TYPE,
        Self::HOST,
        Self::LOCATION,
        Self::SERVER,
        Self::SET_COOKIE,
        Self::USER_AGENT,
        Self::WWW_AUTHENTICATE,
    ];

    const fn constant(name: &'static str, kind: HeaderKind, scope: HeaderScope) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind,
            scope,
        }
    }

    /// Look up a header name.
    ///
    /// Well-known names resolve to their constant regardless of case. Any other
    /// valid token becomes a text header usable in both directions, spelled in
    /// title case (`x-test` becomes `X-Test`).
    pub fn with(name: &str) -> Result<Self, HeaderError> {
        if name.is_empty() || !name.bytes().all(is_token_char) {
            return Err(HeaderError::InvalidName(name.to_string()));
        }

        if let Some(known) = Self::KNOWN.iter().find(|k| k.name.eq_ignore_ascii_case(name)) {
            return Ok(known.clone());
        }

        Ok(Self {
            name: Cow::Owned(title_case(name)),
            kind: HeaderKind::Text,
            scope: HeaderScope::Entity,
        })
    }

    /// Canonical spelling.
    pub fn value(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    pub fn scope(&self) -> HeaderScope {
        self.scope
    }

    /// Check that a value is acceptable for this header.
    pub fn check_value(&self, value: &HeaderValue) -> Result<(), HeaderError> {
        if value.kind() != self.kind {
            return Err(self.invalid_value(format!(
                "expected {:?} value, got {:?}",
                self.kind,
                value.kind()
            )));
        }

        if let HeaderValue::Text(text) = value {
            if !text.bytes().all(is_field_value_byte) {
                return Err(self.invalid_value("control character in value".to_string()));
            }
        }

        Ok(())
    }

    /// Parse wire text into a value of this header's kind.
    pub fn parse_value(&self, text: &str) -> Result<HeaderValue, HeaderError> {
        match self.kind {
            HeaderKind::Text => Ok(HeaderValue::Text(text.to_string())),
            HeaderKind::Number => text
                .trim()
                .parse::<u64>()
                .map(HeaderValue::Number)
                .map_err(|e| self.invalid_value(e.to_string())),
            HeaderKind::MediaType => MediaType::parse(text)
                .map(HeaderValue::MediaType)
                .map_err(|e| self.invalid_value(e.to_string())),
        }
    }

    /// The wire text for a value of this header.
    pub fn header_text(&self, value: &HeaderValue) -> String {
        match value {
            HeaderValue::Text(text) => text.clone(),
            HeaderValue::Number(number) => number.to_string(),
            HeaderValue::MediaType(media_type) => media_type.to_string(),
        }
    }

    fn invalid_value(&self, reason: String) -> HeaderError {
        HeaderError::InvalidValue {
            name: self.name.to_string(),
            reason,
        }
    }
}

impl PartialEq for HttpHeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for HttpHeaderName {}

impl Hash for HttpHeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.name.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for HttpHeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Bytes allowed in a field value: tab, visible ASCII, space and obs-text.
fn is_field_value_byte(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b != 0x7f)
}

fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// A charset name such as `UTF-8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetName(Cow<'static, str>);

impl CharsetName {
    pub const UTF_8: CharsetName = CharsetName(Cow::Borrowed("UTF-8"));
    pub const ISO_8859_1: CharsetName = CharsetName(Cow::Borrowed("ISO-8859-1"));

    pub fn with(name: &str) -> Result<Self, HeaderError> {
        if name.is_empty() || !name.bytes().all(is_token_char) {
            return Err(HeaderError::InvalidValue {
                name: "charset".to_string(),
                reason: format!("invalid charset {:?}", name),
            });
        }
        Ok(CharsetName(Cow::Owned(name.to_string())))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharsetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `type/subtype` media type with its parameters, in order.
///
/// Parameter names are kept lower case. `charset` is also exposed typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    type_name: Cow<'static, str>,
    subtype: Cow<'static, str>,
    parameters: Vec<(String, String)>,
    charset: Option<CharsetName>,
}

impl MediaType {
    pub const TEXT_PLAIN: MediaType = Self::constant("text", "plain");
    pub const TEXT_HTML: MediaType = Self::constant("text", "html");
    pub const APPLICATION_JSON: MediaType = Self::constant("application", "json");
    pub const APPLICATION_OCTET_STREAM: MediaType = Self::constant("application", "octet-stream");
    pub const APPLICATION_FORM_URLENCODED: MediaType =
        Self::constant("application", "x-www-form-urlencoded");
    pub const MULTIPART_FORM_DATA: MediaType = Self::constant("multipart", "form-data");

    const fn constant(type_name: &'static str, subtype: &'static str) -> Self {
        Self {
            type_name: Cow::Borrowed(type_name),
            subtype: Cow::Borrowed(subtype),
            parameters: Vec::new(),
            charset: None,
        }
    }

    /// Parse `type/subtype *(; name=value)`. Values may be quoted.
    pub fn parse(text: &str) -> Result<Self, HeaderError> {
        let invalid = |reason: &str| HeaderError::InvalidValue {
            name: "media type".to_string(),
            reason: format!("{}: {:?}", reason, text),
        };

        let mut parts = split_parameters(text);
        let essence = parts.next().unwrap_or_default().trim();
        let (type_name, subtype) = essence
            .split_once('/')
            .ok_or_else(|| invalid("missing '/'"))?;
        if type_name.is_empty()
            || subtype.is_empty()
            || !type_name.bytes().all(is_token_char)
            || !subtype.bytes().all(is_token_char)
        {
            return Err(invalid("invalid type or subtype"));
        }

        let mut media_type = Self {
            type_name: Cow::Owned(type_name.to_ascii_lowercase()),
            subtype: Cow::Owned(subtype.to_ascii_lowercase()),
            parameters: Vec::new(),
            charset: None,
        };
        for parameter in parts {
            if parameter.trim().is_empty() {
                continue;
            }
            let (name, value) = parameter
                .split_once('=')
                .ok_or_else(|| invalid("parameter without '='"))?;
            media_type = media_type.set_parameter(name.trim(), &unquote(value.trim()))?;
        }
        Ok(media_type)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn charset(&self) -> Option<&CharsetName> {
        self.charset.as_ref()
    }

    /// Parameters in their original order, names lower case.
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Value of one parameter, matched case-insensitively.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_charset(self, charset: CharsetName) -> Self {
        let mut media_type = self.replace_parameter("charset", charset.value().to_string());
        media_type.charset = Some(charset);
        media_type
    }

    /// Set or replace a parameter, keeping its position when replaced.
    pub fn set_parameter(self, name: &str, value: &str) -> Result<Self, HeaderError> {
        let invalid = |reason: String| HeaderError::InvalidValue {
            name: "media type parameter".to_string(),
            reason,
        };
        if name.is_empty() || !name.bytes().all(is_token_char) {
            return Err(invalid(format!("invalid parameter name {:?}", name)));
        }
        if !value.bytes().all(|b| is_field_value_byte(b) && b != b'\t') {
            return Err(invalid(format!("invalid value for parameter {}", name)));
        }

        if name.eq_ignore_ascii_case("charset") {
            return Ok(self.set_charset(CharsetName::with(value)?));
        }
        Ok(self.replace_parameter(name, value.to_string()))
    }

    fn replace_parameter(mut self, name: &str, value: String) -> Self {
        match self
            .parameters
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.parameters.push((name.to_ascii_lowercase(), value)),
        }
        self
    }

    /// True when type and subtype match, ignoring parameters.
    pub fn same_essence(&self, other: &MediaType) -> bool {
        self.type_name.eq_ignore_ascii_case(&other.type_name)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
    }
}

/// Split on `;` outside quoted strings.
fn split_parameters(text: &str) -> impl Iterator<Item = &str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                pieces.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces.into_iter()
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => {
            let mut text = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => text.extend(chars.next()),
                    c => text.push(c),
                }
            }
            text
        }
        None => value.to_string(),
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.subtype)?;
        for (name, value) in &self.parameters {
            if !value.is_empty() && value.bytes().all(is_token_char) {
                write!(f, "; {}={}", name, value)?;
            } else {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {}=\"{}\"", name, escaped)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve_case_insensitively() {
        let name = HttpHeaderName::with("content-type").unwrap();
        assert_eq!(name, HttpHeaderName::CONTENT_TYPE);
        assert_eq!(name.value(), "Content-Type");
        assert_eq!(name.kind(), HeaderKind::MediaType);
    }

    #[test]
    fn custom_names_are_title_cased() {
        let name = HttpHeaderName::with("x-test").unwrap();
        assert_eq!(name.to_string(), "X-Test");
        assert_eq!(name, HttpHeaderName::with("X-TEST").unwrap());
        assert_eq!(name.scope(), HeaderScope::Entity);
    }

    #[test]
    fn invalid_names_rejected() {
        assert!(HttpHeaderName::with("").is_err());
        assert!(HttpHeaderName::with("bad name").is_err());
        assert!(HttpHeaderName::with("colon:").is_err());
    }

    #[test]
    fn value_kind_checked() {
        let result = HttpHeaderName::CONTENT_LENGTH.check_value(&HeaderValue::from("12"));
        assert!(matches!(result, Err(HeaderError::InvalidValue { .. })));
        assert!(HttpHeaderName::CONTENT_LENGTH.check_value(&HeaderValue::from(12u64)).is_ok());
        assert!(HttpHeaderName::SERVER.check_value(&HeaderValue::from("a\r\nb")).is_err());
    }

    #[test]
    fn media_type_text() {
        let media_type = MediaType::TEXT_PLAIN.set_charset(CharsetName::UTF_8);
        assert_eq!(
            HttpHeaderName::CONTENT_TYPE.header_text(&media_type.into()),
            "text/plain; charset=UTF-8"
        );
    }

    #[test]
    fn media_type_parse() {
        let parsed = MediaType::parse("Application/X-WWW-Form-Urlencoded; charset=\"utf-8\"").unwrap();
        assert!(parsed.same_essence(&MediaType::APPLICATION_FORM_URLENCODED));
        assert_eq!(parsed.charset().map(|c| c.value()), Some("utf-8"));

        assert!(MediaType::parse("nonsense").is_err());
    }

    #[test]
    fn media_type_keeps_every_parameter() {
        let parsed = MediaType::parse("multipart/form-data; boundary=XyZ; charset=UTF-8").unwrap();
        assert!(parsed.same_essence(&MediaType::MULTIPART_FORM_DATA));
        assert_eq!(parsed.parameter("Boundary"), Some("XyZ"));
        assert_eq!(parsed.charset(), Some(&CharsetName::UTF_8));
        assert_eq!(parsed.to_string(), "multipart/form-data; boundary=XyZ; charset=UTF-8");
    }

    #[test]
    fn quoted_parameters_round_trip() {
        let parsed = MediaType::parse(r#"text/plain; title="a; b \"c\"""#).unwrap();
        assert_eq!(parsed.parameter("title"), Some(r#"a; b "c""#));
        assert_eq!(parsed.to_string(), r#"text/plain; title="a; b \"c\"""#);
        assert!(MediaType::parse("text/plain; broken").is_err());
    }

    #[test]
    fn set_charset_replaces_in_place() {
        let media_type = MediaType::TEXT_HTML
            .set_parameter("level", "1")
            .unwrap()
            .set_charset(CharsetName::ISO_8859_1)
            .set_charset(CharsetName::UTF_8);
        assert_eq!(media_type.to_string(), "text/html; level=1; charset=UTF-8");
        assert!(MediaType::TEXT_HTML.set_parameter("bad name", "x").is_err());
    }

    #[test]
    fn text_values_reject_every_control_byte() {
        for bad in ["a\u{1}b", "del\u{7f}", "nul\0", "cr\r"] {
            assert!(HttpHeaderName::SERVER.check_value(&HeaderValue::from(bad)).is_err(), "{:?}", bad);
        }
        assert!(HttpHeaderName::SERVER.check_value(&HeaderValue::from("tab\tcafé")).is_ok());
    }

    #[test]
    fn parse_value_uses_kind() {
        assert_eq!(
            HttpHeaderName::CONTENT_LENGTH.parse_value(" 42 ").unwrap(),
            HeaderValue::Number(42)
        );
        assert!(HttpHeaderName::CONTENT_LENGTH.parse_value("many").is_err());
        assert_eq!(
            HttpHeaderName::SERVER.parse_value("engine").unwrap(),
            HeaderValue::Text("engine".into())
        );
    }
}
