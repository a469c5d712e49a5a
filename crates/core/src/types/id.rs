//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe, opaque ID wrapper.
///
/// Creates a newtype wrapper around a random (v4) `Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Constructor `generate()`
/// - `Display` using the hyphenated form
///
/// # Example
///
/// ```rust
/// # use beverly_core::define_id;
/// define_id!(SessionId);
/// define_id!(ItemId);
///
/// let session_id = SessionId::generate();
/// let json = serde_json::to_string(&session_id).unwrap();
/// assert_eq!(json, format!("\"{session_id}\""));
///
/// // These are different types, so this won't compile:
/// // let _: ItemId = session_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(UserId);
define_id!(ChatExchangeId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn test_deserializes_from_hyphenated_string() {
        let id = UserId::generate();
        let parsed: UserId = serde_json::from_str(&format!("\"{id}\"")).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<UserId>("\"not-a-uuid\"").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ChatExchangeId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
