//! Helpers for partial-update DTOs.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field of a partial update.
///
/// Use as `#[serde(default, deserialize_with = "...")]` on an
/// `Option<Option<T>>`: a missing key stays `None` (keep the stored value),
/// an explicit `null` becomes `Some(None)` (clear it).
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
