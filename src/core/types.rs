//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeTypeName`] - Validated node type name (`namespace:local`)
//! - [`ChildName`] - Validated child node name (a single path segment)
//! - [`NodePath`] - Validated absolute node path
//! - [`WorkspaceName`] - Validated workspace name
//! - [`NodeIdentifier`] - Stable node identifier (UUID)
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use nodetend::core::types::{ChildName, NodePath, NodeTypeName};
//!
//! // Valid constructions
//! let ty = NodeTypeName::new("acme.site:page").unwrap();
//! let name = ChildName::new("main").unwrap();
//! let path = NodePath::new("/sites/home").unwrap();
//! assert_eq!(path.join(&name).as_str(), "/sites/home/main");
//!
//! // Invalid constructions fail at creation time
//! assert!(NodeTypeName::new("acme::page").is_err());
//! assert!(ChildName::new("has/slash").is_err());
//! assert!(NodePath::new("relative").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node type name: {0}")]
    InvalidTypeName(String),

    #[error("invalid child name: {0}")]
    InvalidChildName(String),

    #[error("invalid node path: {0}")]
    InvalidNodePath(String),

    #[error("invalid workspace name: {0}")]
    InvalidWorkspaceName(String),
}

/// A validated node type name.
///
/// Node type names identify schema entries and use an optional single
/// `namespace:local` separator:
/// - Cannot be empty
/// - May contain alphanumerics plus `.`, `-`, `_` and at most one `:`
/// - Neither side of `:` may be empty or start/end with `.`
///
/// # Example
///
/// ```
/// use nodetend::core::types::NodeTypeName;
///
/// let ty = NodeTypeName::new("acme.site:landing-page").unwrap();
/// assert_eq!(ty.as_str(), "acme.site:landing-page");
///
/// assert!(NodeTypeName::new("").is_err());
/// assert!(NodeTypeName::new(":page").is_err());
/// assert!(NodeTypeName::new("acme:site:page").is_err());
/// assert!(NodeTypeName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeTypeName(String);

impl NodeTypeName {
    /// Create a new validated node type name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTypeName` if the name violates the rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidTypeName(
                "type name cannot be empty".into(),
            ));
        }

        if name.matches(':').count() > 1 {
            return Err(TypeError::InvalidTypeName(
                "type name cannot contain more than one ':'".into(),
            ));
        }

        for c in name.chars() {
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')) {
                return Err(TypeError::InvalidTypeName(format!(
                    "type name cannot contain '{c}'"
                )));
            }
        }

        // Both sides of the namespace separator must be well-formed
        for part in name.split(':') {
            if part.is_empty() {
                return Err(TypeError::InvalidTypeName(
                    "namespace and local name cannot be empty".into(),
                ));
            }
            if part.starts_with('.') || part.ends_with('.') {
                return Err(TypeError::InvalidTypeName(
                    "name part cannot start or end with '.'".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the type name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeTypeName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NodeTypeName> for String {
    fn from(name: NodeTypeName) -> Self {
        name.0
    }
}

impl AsRef<str> for NodeTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated child node name.
///
/// Child names name a single child slot under a parent node and double as
/// path segments:
/// - Cannot be empty, `.` or `..`
/// - Cannot contain `/`, whitespace or control characters
///
/// # Example
///
/// ```
/// use nodetend::core::types::ChildName;
///
/// let name = ChildName::new("main").unwrap();
/// assert_eq!(name.as_str(), "main");
///
/// assert!(ChildName::new("").is_err());
/// assert!(ChildName::new("..").is_err());
/// assert!(ChildName::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChildName(String);

impl ChildName {
    /// Create a new validated child name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidChildName` if the name is not a valid
    /// path segment.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidChildName(
                "child name cannot be empty".into(),
            ));
        }
        if name == "." || name == ".." {
            return Err(TypeError::InvalidChildName(format!(
                "child name cannot be '{name}'"
            )));
        }
        for c in name.chars() {
            if c == '/' {
                return Err(TypeError::InvalidChildName(
                    "child name cannot contain '/'".into(),
                ));
            }
            if c.is_whitespace() || c.is_ascii_control() {
                return Err(TypeError::InvalidChildName(
                    "child name cannot contain whitespace or control characters".into(),
                ));
            }
        }
        Ok(())
    }

    /// Get the child name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChildName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ChildName> for String {
    fn from(name: ChildName) -> Self {
        name.0
    }
}

impl AsRef<str> for ChildName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChildName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated absolute node path.
///
/// Paths are `/`-rooted with child names as segments:
/// - Must start with `/`
/// - Cannot end with `/` (except the root path `/` itself)
/// - Cannot contain empty segments; each segment must be a valid [`ChildName`]
///
/// # Example
///
/// ```
/// use nodetend::core::types::{ChildName, NodePath};
///
/// let path = NodePath::new("/sites/home").unwrap();
/// assert_eq!(path.name().unwrap().as_str(), "home");
/// assert_eq!(path.parent().unwrap().as_str(), "/sites");
///
/// let child = path.join(&ChildName::new("main").unwrap());
/// assert_eq!(child.as_str(), "/sites/home/main");
///
/// assert!(NodePath::new("no-slash").is_err());
/// assert!(NodePath::new("/trailing/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath(String);

impl NodePath {
    /// Create a new validated node path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNodePath` if the path is not absolute or
    /// contains invalid segments.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    fn validate(path: &str) -> Result<(), TypeError> {
        if path == "/" {
            return Ok(());
        }
        if !path.starts_with('/') {
            return Err(TypeError::InvalidNodePath(
                "node path must start with '/'".into(),
            ));
        }
        if path.ends_with('/') {
            return Err(TypeError::InvalidNodePath(
                "node path cannot end with '/'".into(),
            ));
        }
        for segment in path[1..].split('/') {
            if segment.is_empty() {
                return Err(TypeError::InvalidNodePath(
                    "node path cannot contain empty segments".into(),
                ));
            }
            ChildName::validate(segment)
                .map_err(|_| TypeError::InvalidNodePath(format!("invalid segment '{segment}'")))?;
        }
        Ok(())
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Append a child name, producing the child's path.
    pub fn join(&self, name: &ChildName) -> Self {
        if self.is_root() {
            Self(format!("/{}", name.as_str()))
        } else {
            Self(format!("{}/{}", self.0, name.as_str()))
        }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// The final path segment as a child name, or `None` for the root.
    pub fn name(&self) -> Option<ChildName> {
        if self.is_root() {
            return None;
        }
        let idx = self.0.rfind('/')?;
        // Segments were validated at construction
        ChildName::new(&self.0[idx + 1..]).ok()
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodePath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.0
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated workspace name.
///
/// Workspace names identify isolated views of the content tree and are used
/// as directory names by the file-backed repository:
/// - Cannot be empty
/// - May contain alphanumerics plus `-`, `_`, `.`
/// - Cannot start with `.` or `-`
///
/// # Example
///
/// ```
/// use nodetend::core::types::WorkspaceName;
///
/// let ws = WorkspaceName::new("user-admin").unwrap();
/// assert_eq!(ws.as_str(), "user-admin");
///
/// assert!(WorkspaceName::new("").is_err());
/// assert!(WorkspaceName::new(".hidden").is_err());
/// assert!(WorkspaceName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceName(String);

impl WorkspaceName {
    /// Create a new validated workspace name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidWorkspaceName` if the name violates the
    /// rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidWorkspaceName(
                "workspace name cannot be empty".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidWorkspaceName(
                "workspace name cannot start with '.' or '-'".into(),
            ));
        }
        for c in name.chars() {
            if !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
                return Err(TypeError::InvalidWorkspaceName(format!(
                    "workspace name cannot contain '{c}'"
                )));
            }
        }
        Ok(())
    }

    /// Get the workspace name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkspaceName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<WorkspaceName> for String {
    fn from(name: WorkspaceName) -> Self {
        name.0
    }
}

impl AsRef<str> for WorkspaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable node identifier.
///
/// Identifiers survive moves and renames; the path is the node's address,
/// the identifier is its identity.
///
/// # Example
///
/// ```
/// use nodetend::core::types::NodeIdentifier;
///
/// let id = NodeIdentifier::generate();
/// let parsed: NodeIdentifier = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIdentifier(uuid::Uuid);

impl NodeIdentifier {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl std::str::FromStr for NodeIdentifier {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(uuid::Uuid::parse_str(s)?))
    }
}

impl std::fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use nodetend::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod node_type_name {
        use super::*;

        #[test]
        fn valid_type_names() {
            assert!(NodeTypeName::new("page").is_ok());
            assert!(NodeTypeName::new("acme:page").is_ok());
            assert!(NodeTypeName::new("acme.site:landing-page").is_ok());
            assert!(NodeTypeName::new("acme.site:page_v2").is_ok());
            assert!(NodeTypeName::new("Acme.Site:Page").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(NodeTypeName::new("").is_err());
        }

        #[test]
        fn double_colon_rejected() {
            assert!(NodeTypeName::new("acme::page").is_err());
            assert!(NodeTypeName::new("a:b:c").is_err());
        }

        #[test]
        fn empty_parts_rejected() {
            assert!(NodeTypeName::new(":page").is_err());
            assert!(NodeTypeName::new("acme:").is_err());
        }

        #[test]
        fn dot_at_part_boundary_rejected() {
            assert!(NodeTypeName::new(".acme:page").is_err());
            assert!(NodeTypeName::new("acme.:page").is_err());
            assert!(NodeTypeName::new("acme:page.").is_err());
        }

        #[test]
        fn special_chars_rejected() {
            assert!(NodeTypeName::new("has space").is_err());
            assert!(NodeTypeName::new("has/slash").is_err());
            assert!(NodeTypeName::new("has\ttab").is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let ty = NodeTypeName::new("acme.site:page").unwrap();
            let json = serde_json::to_string(&ty).unwrap();
            let parsed: NodeTypeName = serde_json::from_str(&json).unwrap();
            assert_eq!(ty, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<NodeTypeName, _> = serde_json::from_str("\"a::b\"");
            assert!(result.is_err());
        }
    }

    mod child_name {
        use super::*;

        #[test]
        fn valid_child_names() {
            assert!(ChildName::new("main").is_ok());
            assert!(ChildName::new("column0").is_ok());
            assert!(ChildName::new("hero-banner").is_ok());
            assert!(ChildName::new("footer_left").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(ChildName::new("").is_err());
        }

        #[test]
        fn dot_names_rejected() {
            assert!(ChildName::new(".").is_err());
            assert!(ChildName::new("..").is_err());
        }

        #[test]
        fn slash_rejected() {
            assert!(ChildName::new("a/b").is_err());
        }

        #[test]
        fn whitespace_rejected() {
            assert!(ChildName::new("has space").is_err());
            assert!(ChildName::new("has\nnewline").is_err());
        }
    }

    mod node_path {
        use super::*;

        #[test]
        fn valid_paths() {
            assert!(NodePath::new("/").is_ok());
            assert!(NodePath::new("/sites").is_ok());
            assert!(NodePath::new("/sites/home/main").is_ok());
        }

        #[test]
        fn relative_rejected() {
            assert!(NodePath::new("sites/home").is_err());
            assert!(NodePath::new("").is_err());
        }

        #[test]
        fn trailing_slash_rejected() {
            assert!(NodePath::new("/sites/").is_err());
        }

        #[test]
        fn empty_segment_rejected() {
            assert!(NodePath::new("/sites//home").is_err());
        }

        #[test]
        fn invalid_segment_rejected() {
            assert!(NodePath::new("/sites/has space").is_err());
            assert!(NodePath::new("/sites/..").is_err());
        }

        #[test]
        fn join() {
            let path = NodePath::new("/sites").unwrap();
            let name = ChildName::new("home").unwrap();
            assert_eq!(path.join(&name).as_str(), "/sites/home");

            let root = NodePath::root();
            assert_eq!(root.join(&name).as_str(), "/home");
        }

        #[test]
        fn parent_and_name() {
            let path = NodePath::new("/sites/home").unwrap();
            assert_eq!(path.parent().unwrap().as_str(), "/sites");
            assert_eq!(path.name().unwrap().as_str(), "home");

            let top = NodePath::new("/sites").unwrap();
            assert_eq!(top.parent().unwrap(), NodePath::root());

            assert_eq!(NodePath::root().parent(), None);
            assert_eq!(NodePath::root().name(), None);
        }

        #[test]
        fn serde_roundtrip() {
            let path = NodePath::new("/sites/home").unwrap();
            let json = serde_json::to_string(&path).unwrap();
            let parsed: NodePath = serde_json::from_str(&json).unwrap();
            assert_eq!(path, parsed);
        }
    }

    mod workspace_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(WorkspaceName::new("live").is_ok());
            assert!(WorkspaceName::new("user-admin").is_ok());
            assert!(WorkspaceName::new("review_2").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(WorkspaceName::new("").is_err());
        }

        #[test]
        fn leading_dot_or_dash_rejected() {
            assert!(WorkspaceName::new(".hidden").is_err());
            assert!(WorkspaceName::new("-flag").is_err());
        }

        #[test]
        fn special_chars_rejected() {
            assert!(WorkspaceName::new("has space").is_err());
            assert!(WorkspaceName::new("has/slash").is_err());
        }
    }

    mod node_identifier {
        use super::*;

        #[test]
        fn generate_is_unique() {
            assert_ne!(NodeIdentifier::generate(), NodeIdentifier::generate());
        }

        #[test]
        fn parse_roundtrip() {
            let id = NodeIdentifier::generate();
            let parsed: NodeIdentifier = id.to_string().parse().unwrap();
            assert_eq!(id, parsed);
        }

        #[test]
        fn serde_roundtrip() {
            let id = NodeIdentifier::generate();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: NodeIdentifier = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }
    }

    mod utc_timestamp {
        use super::*;

        #[test]
        fn now_works() {
            let ts = UtcTimestamp::now();
            assert!(ts.to_string().contains('T'));
        }

        #[test]
        fn serde_roundtrip() {
            let ts = UtcTimestamp::now();
            let json = serde_json::to_string(&ts).unwrap();
            let parsed: UtcTimestamp = serde_json::from_str(&json).unwrap();
            assert_eq!(ts, parsed);
        }
    }
}
