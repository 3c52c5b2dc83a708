use serde::{Deserialize, Deserializer};

/// Instead of making new struct model fields `Option`s, we can use this function when deserializing
/// to assign the default value. Reconcilers write `null` for empty status fields, so `conditions`
/// and `devfile` would otherwise fail to deserialize before the first reconciliation.
pub(crate) fn null_to_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::deserialize(d)?;
    let val = opt.unwrap_or_default();
    Ok(val)
}
