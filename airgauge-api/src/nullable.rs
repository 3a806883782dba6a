//! Field deserializers that read JSON `null` the same as an absent field.

use serde::{Deserialize, Deserializer};

pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A sequence where both the sequence and each element may be `null`.
pub(crate) fn seq_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}
