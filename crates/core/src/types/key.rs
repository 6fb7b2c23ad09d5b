//! Newtype document keys for type-safe store references.
//!
//! The document store assigns string keys; `define_key!` creates wrappers
//! that prevent accidentally passing an agent key where a branch key is
//! expected. The human-facing `agent_code` field is deliberately NOT a key
//! type - it is a display code, and the hierarchy resolver treats it as a
//! query value, not a store reference.

/// Macro to define a type-safe string key wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `into_inner()`
/// - `From<String>`/`From<&str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use loanmitra_core::define_key;
/// define_key!(AgentKey);
/// define_key!(BranchKey);
///
/// let agent = AgentKey::new("agent-7f3a");
/// let branch = BranchKey::new("branch-del-01");
///
/// // Different types, so this won't compile:
/// // let _: AgentKey = branch;
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new key from any string-like value.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the underlying key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the key and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_key!(AgentKey);
define_key!(AdminKey);
define_key!(LeadKey);
define_key!(BranchKey);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        let key = AgentKey::new("agent-42");
        assert_eq!(key.as_str(), "agent-42");
        assert_eq!(key.to_string(), "agent-42");
        assert_eq!(key.into_inner(), "agent-42");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_serde_transparent() {
        let key = LeadKey::new("0001728-abc");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"0001728-abc\"");
    }
}
