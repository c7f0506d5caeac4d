use std::collections::BTreeMap;

/// A set of key writes applied to a store as one unit.
///
/// Later writes to the same key replace earlier ones, so a batch holds at
/// most one value per key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), value.to_vec());
    }

    /// The value this batch will write under `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Fold `other` into this batch. On a shared key `other` wins.
    pub fn merge(&mut self, other: WriteBatch) {
        self.writes.extend(other.writes);
    }

    /// Writes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.writes.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl IntoIterator for WriteBatch {
    type Item = (Vec<u8>, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<Vec<u8>, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_put_wins() {
        let mut batch = WriteBatch::new();
        batch.put(b"k", b"1");
        batch.put(b"k", b"2");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get(b"k"), Some(b"2".as_slice()));
    }

    #[test]
    fn merge_prefers_the_incoming_batch() {
        let mut a = WriteBatch::new();
        a.put(b"shared", b"a");
        a.put(b"only-a", b"a");
        let mut b = WriteBatch::new();
        b.put(b"shared", b"b");

        a.merge(b);

        assert_eq!(a.len(), 2);
        assert_eq!(a.get(b"shared"), Some(b"b".as_slice()));
    }

    #[test]
    fn iterates_in_key_order() {
        let mut batch = WriteBatch::new();
        batch.put(b"b", b"");
        batch.put(b"a", b"");
        let keys: Vec<&[u8]> = batch.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"a".as_slice(), b"b".as_slice()]);
        assert!(!batch.is_empty());
    }
}
