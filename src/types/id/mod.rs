use once_cell::sync::Lazy;
use serde::de::{Error as DeError, Unexpected};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    marker::PhantomData,
    str::FromStr,
};
use uuid::Uuid;

use self::marker::Marker;

pub mod marker;

/// Opaque identifier of a stored record. The marker keeps IDs of
/// different record kinds from being mixed up at compile time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
    value: Uuid,
    phantom: PhantomData<T>,
}

impl<T: Marker> Id<T> {
    /// Generates a new random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            phantom: PhantomData,
        }
    }
}

impl<T: Marker> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }
}

impl<T: Marker> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use heck::ToSnakeCase;
        static MARKER_MODULE: Lazy<String> = Lazy::new(|| {
            format!(
                "{}::types::id::marker::",
                env!("CARGO_PKG_NAME").to_snake_case()
            )
        });

        // This is to assume that all ID markers are defined in `marker` module
        let type_name = std::any::type_name::<T>();
        let type_name = if type_name.starts_with(&*MARKER_MODULE) {
            type_name.split("::").last().unwrap_or(type_name)
        } else {
            type_name
        };
        write!(f, "Id::<{type_name}>({})", self.value)
    }
}

impl<T: Marker> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl<T: Marker> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor<T: Marker>(PhantomData<T>);

        impl<'de, T: Marker> serde::de::Visitor<'de> for Visitor<T> {
            type Value = Id<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an innkeep record id")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                v.parse()
                    .map_err(|_| DeError::invalid_value(Unexpected::Str(v), &"uuid string"))
            }
        }

        deserializer.deserialize_str(Visitor(PhantomData))
    }
}

impl<T: Marker> serde::Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.value)
    }
}

impl<'q, T: Marker> sqlx::Encode<'q, sqlx::Postgres> for Id<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <Uuid as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.value, buf)
    }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Postgres> for Id<T> {
    fn decode(
        value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let value = <Uuid as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_uuid(value))
    }
}

impl<T: Marker> sqlx::Type<sqlx::Postgres> for Id<T> {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}
