use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::{Dictionary, Hashable};

struct MapVisitor<K, V> {
    _marker: PhantomData<Dictionary<K, V>>,
}

impl<K, V> Serialize for Dictionary<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, K, V> Deserialize<'de> for Dictionary<K, V>
where
    K: Deserialize<'de> + Hashable + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

impl<K, V> MapVisitor<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Deserialize<'de> + Hashable + Eq,
    V: Deserialize<'de>,
{
    type Value = Dictionary<K, V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        // Keep the load below one half so the entries fit without growing.
        let mut values = match access.size_hint() {
            Some(size) => Dictionary::with_capacity(size.saturating_mul(2).saturating_add(1)),
            None => Dictionary::new(),
        };

        while let Some((key, value)) = access.next_entry()? {
            values.put(key, value);
        }

        Ok(values)
    }
}
