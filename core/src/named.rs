//! Deserialization of named-element collections
//!
//! Schema documents list classes, slots and types either as a mapping keyed
//! by element name or as a plain sequence of definitions. Both forms load
//! into an ordered `Vec`, preserving document order.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// An element addressed by name
pub trait Named {
    /// The element's name
    fn name(&self) -> &str;

    /// Replace the element's name
    fn set_name(&mut self, name: String);
}

/// Deserialize a mapping or sequence of named elements into a `Vec`.
///
/// For the mapping form the key supplies the name when the entry does not
/// declare one, and an empty entry (`Thing:`) becomes a default element.
///
/// # Errors
///
/// Returns the deserializer's error when an entry does not fit `T`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Named + Default,
{
    struct CollectionVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for CollectionVisitor<T>
    where
        T: Deserialize<'de> + Named + Default,
    {
        type Value = Vec<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of name to definition, or a sequence of definitions")
        }

        fn visit_unit<E>(self) -> Result<Vec<T>, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Vec<T>, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<T>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element::<T>()? {
                items.push(item);
            }
            Ok(items)
        }

        fn visit_map<M>(self, mut map: M) -> Result<Vec<T>, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, Option<T>>()? {
                let mut item = value.unwrap_or_default();
                if item.name().is_empty() {
                    item.set_name(key);
                }
                items.push(item);
            }
            Ok(items)
        }
    }

    deserializer.deserialize_any(CollectionVisitor(PhantomData))
}
