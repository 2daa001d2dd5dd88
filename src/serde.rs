//! Serialization and Deserialization implementation

use ::serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::{FibEntry, FibTrie, FrozenTrie};

impl Serialize for FibTrie {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.routes())
    }
}

impl Serialize for FrozenTrie {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.routes())
    }
}

impl<'de> Deserialize<'de> for FibTrie {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let routes: Vec<FibEntry> = Vec::deserialize(deserializer)?;
        let mut trie = FibTrie::new();
        trie.try_extend(routes).map_err(D::Error::custom)?;
        Ok(trie)
    }
}
