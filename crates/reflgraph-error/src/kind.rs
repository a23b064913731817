use strum_macros::{Display, IntoStaticStr};

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    Unexpected,
    /// `reflgraph.toml` could not be parsed or holds an unknown value.
    ConfigInvalid,

    /// Duplicate or empty names in a model file.
    ModelInvalid,
    /// A base, class or attached function names something never declared.
    UnknownReference,
    /// Bases admit no resolution order.
    InconsistentHierarchy,
    SymbolNotFound,
    NotClassLike,

    /// `dot` could not be started or exited with a failure.
    RenderFailed,
    UnsupportedFormat,

    FileNotFound,
    IoFailed,
    DeserializationFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ModelInvalid.to_string(), "ModelInvalid");
        assert_eq!(ErrorKind::RenderFailed.as_str(), "RenderFailed");
    }
}
