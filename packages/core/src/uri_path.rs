//! Request path type with validated RESTCONF segments.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::error::PathError;

/// Characters escaped when a key value is written back into a path.
const KEY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b',')
    .add(b'/')
    .add(b'=')
    .add(b'?');

/// Resource segments that may follow the RESTCONF root in a request URL.
const API_RESOURCES: [&str; 2] = ["data", "operations"];

/// One segment of a request path: `[module:]name[=key1,key2,...]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment {
    module: Option<String>,
    name: String,
    keys: Option<Vec<String>>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            module: None,
            name: name.into(),
            keys: None,
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded key values, or `None` when the segment has no `=`.
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    fn parse(raw: &str, position: usize) -> Result<Self, PathError> {
        let (identifier, keys) = match raw.split_once('=') {
            Some((identifier, keys)) => (identifier, Some(keys)),
            None => (raw, None),
        };
        let (module, name) = match identifier.split_once(':') {
            Some((module, name)) => (Some(module), name),
            None => (None, identifier),
        };

        if let Some(module) = module {
            validate_identifier(module, raw, position)?;
        }
        validate_identifier(name, raw, position)?;

        let keys = keys
            .map(|keys| {
                keys.split(',')
                    .map(|value| decode_key_value(value, raw, position))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            module: module.map(str::to_string),
            name: name.to_string(),
            keys,
        })
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{}:", module)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(keys) = &self.keys {
            write!(f, "=")?;
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", utf8_percent_encode(key, KEY_VALUE))?;
            }
        }
        Ok(())
    }
}

/// YANG identifier: a letter or underscore, then letters, digits, `_`, `-`, `.`.
fn validate_identifier(identifier: &str, segment: &str, position: usize) -> Result<(), PathError> {
    let invalid = |message: String| PathError::InvalidSegment {
        segment: segment.to_string(),
        position,
        message,
    };

    let mut chars = identifier.chars();
    let first = chars
        .next()
        .ok_or_else(|| invalid("empty identifier".to_string()))?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid(
            "identifier must start with a letter or underscore".to_string(),
        ));
    }
    for c in chars {
        if !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
            return Err(invalid(format!("invalid character '{}' in identifier", c)));
        }
    }
    Ok(())
}

fn decode_key_value(value: &str, segment: &str, position: usize) -> Result<String, PathError> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| PathError::InvalidSegment {
            segment: segment.to_string(),
            position,
            message: "key value is not valid UTF-8".to_string(),
        })
}

/// A parsed RESTCONF request path, relative to the datastore root.
///
/// # Path Syntax
///
/// - Segments are separated by `/`
/// - Empty segments are ignored (normalizes `//`, leading and trailing `/`)
/// - A segment is `[module:]name`, optionally followed by `=` and a
///   comma-separated, percent-encoded list of key values
///
/// # Examples
///
/// ```rust
/// use restconf_core::UriPath;
///
/// let path = UriPath::parse("/net:devices/device=edge%2C1").unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[1].keys(), Some(&["edge,1".to_string()][..]));
///
/// assert!(UriPath::parse("/").unwrap().is_root());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UriPath {
    segments: Vec<PathSegment>,
}

impl UriPath {
    /// The datastore root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(s: &str) -> Result<Self, PathError> {
        let segments = s
            .split('/')
            .filter(|raw| !raw.is_empty())
            .enumerate()
            .map(|(position, raw)| PathSegment::parse(raw, position))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Parse the path of a full request URL.
    ///
    /// `root` is the RESTCONF root (e.g. `/restconf`). A `data` or
    /// `operations` segment directly below the root is dropped.
    pub fn from_url(url: &Url, root: &str) -> Result<Self, PathError> {
        let root = root.trim_end_matches('/');
        let outside = || PathError::OutsideRoot {
            path: url.path().to_string(),
            root: root.to_string(),
        };

        let rest = url.path().strip_prefix(root).ok_or_else(outside)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return Err(outside());
        }

        let mut path = Self::parse(rest)?;
        let is_resource = path.segments.first().is_some_and(|first| {
            first.module.is_none()
                && first.keys.is_none()
                && API_RESOURCES.contains(&first.name.as_str())
        });
        if is_resource {
            path.segments.remove(0);
        }
        Ok(path)
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path with its last segment removed.
    ///
    /// Fails for the root, which has no parent.
    pub fn parent(&self) -> Result<UriPath, PathError> {
        let (_, rest) = self.segments.split_last().ok_or(PathError::NoParent)?;
        Ok(Self {
            segments: rest.to_vec(),
        })
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> UriPath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for UriPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
