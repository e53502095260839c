use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::config::Config;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::Stats;
use crate::hash_table::fail;

/// A hash map backed by the linear-probing [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Re-inserting an
/// existing key replaces the value but keeps the key that was stored first.
///
/// To keep keys and values owned elsewhere, instantiate the map with
/// reference types; the borrow checker then ties their lifetime to the map.
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use linear_probe::DefaultHashBuilder;
/// use linear_probe::HashMap;
///
/// let names = ["ada".to_string(), "grace".to_string()];
/// let years = [1815, 1906];
///
/// let mut born: HashMap<&String, &i32, DefaultHashBuilder> = HashMap::new();
/// for (name, year) in names.iter().zip(&years) {
///     born.insert(name, year).unwrap();
/// }
/// assert_eq!(born.get(&&names[1]), Some(&&1906));
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the lifetime number of probe steps taken past a home slot.
    pub fn collisions(&self) -> usize {
        self.table.collisions()
    }

    /// Returns the number of resize steps performed so far.
    pub fn rehashes(&self) -> usize {
        self.table.rehashes()
    }

    /// Returns a snapshot of the map's counters.
    pub fn stats(&self) -> Stats {
        self.table.stats()
    }

    /// Returns the configuration the map was created with.
    pub fn config(&self) -> &Config {
        self.table.config()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns an iterator over the key-value pairs of the map, in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map, in slot order.
    pub fn iter_keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map, in slot order.
    pub fn iter_values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Collects references to every key into a new `Vec` of length
    /// [`len`](HashMap::len).
    ///
    /// The order follows the current slot layout, not insertion order, and
    /// changes when the map resizes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use linear_probe::DefaultHashBuilder;
    /// use linear_probe::HashMap;
    ///
    /// let mut map: HashMap<_, _, DefaultHashBuilder> = HashMap::new();
    /// map.insert("a", 1).unwrap();
    /// map.insert("b", 2).unwrap();
    ///
    /// let mut keys = map.keys().unwrap();
    /// keys.sort();
    /// assert_eq!(keys, [&"a", &"b"]);
    /// # }
    /// ```
    pub fn keys(&self) -> Result<Vec<&K>, Error> {
        collect_exact(self.iter_keys())
    }

    /// Collects references to every value into a new `Vec` of length
    /// [`len`](HashMap::len), in the same order as [`keys`](HashMap::keys).
    pub fn values(&self) -> Result<Vec<&V>, Error> {
        collect_exact(self.iter_values())
    }

    /// Writes the map report into `out`: the collision, rehash, size and
    /// capacity counters, then, if `full` is set, one line per slot with
    /// `display` rendering occupied ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "one").unwrap();
    ///
    /// let mut report = String::new();
    /// map.write_dump(&mut report, false, |f, k, v| write!(f, "{k}={v}"))
    ///     .unwrap();
    /// assert!(report.starts_with("Collisions: 0\nRehashes: 0\nSize: 1\n"));
    /// ```
    pub fn write_dump<W, F>(&self, out: &mut W, full: bool, display: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&mut fmt::Formatter<'_>, &K, &V) -> fmt::Result,
    {
        self.table
            .write_dump(out, full, |f, (k, v)| display(f, k, v))
    }

    /// Renders the map report into a new `String`.
    pub fn dump_to_string<F>(&self, full: bool, display: F) -> Result<String, fmt::Error>
    where
        F: Fn(&mut fmt::Formatter<'_>, &K, &V) -> fmt::Result,
    {
        self.table
            .dump_to_string(full, |f, (k, v)| display(f, k, v))
    }

    /// Prints the map report to stdout, rendering occupied slots with
    /// `display`.
    #[cfg(feature = "std")]
    pub fn dump_with<F>(&self, full: bool, display: F)
    where
        F: Fn(&mut fmt::Formatter<'_>, &K, &V) -> fmt::Result,
    {
        self.table.dump_with(full, |f, (k, v)| display(f, k, v));
    }

    /// Prints the map report to stdout, rendering occupied slots as
    /// `key, value` with their `Debug` impls.
    #[cfg(feature = "std")]
    pub fn dump(&self, full: bool)
    where
        K: Debug,
        V: Debug,
    {
        self.dump_with(full, |f, k, v| write!(f, "{k:?}, {v:?}"));
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder and the default
    /// [`Config`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(Config::default(), hash_builder)
    }

    /// Creates a new hash map with the given configuration and hasher builder.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid, and aborts if the initial slot store
    /// cannot be allocated. See [`HashMap::try_with_config_and_hasher`].
    pub fn with_config_and_hasher(config: Config, hash_builder: S) -> Self {
        Self::try_with_config_and_hasher(config, hash_builder).unwrap_or_else(|err| fail(err))
    }

    /// Creates a new hash map with the given configuration and hasher builder,
    /// reporting invalid parameters and allocation failure as errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::Config;
    /// # use linear_probe::Error;
    /// # use linear_probe::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let config = Config::default().with_initial_capacity(64);
    /// let map = HashMap::<u32, u32, _>::try_with_config_and_hasher(config, SimpleHasher);
    /// assert_eq!(map.unwrap().capacity(), 64);
    ///
    /// let config = Config::default().with_initial_capacity(0);
    /// let map = HashMap::<u32, u32, _>::try_with_config_and_hasher(config, SimpleHasher);
    /// assert!(matches!(map, Err(Error::InvalidConfig(_))));
    /// ```
    pub fn try_with_config_and_hasher(config: Config, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::try_with_config(config)?,
            hash_builder,
        })
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `Ok(None)` is returned. If
    /// the map did have this key present, the value is updated and the old
    /// value is returned; the stored key is kept and `key` is dropped.
    ///
    /// An insertion that brings the map to its load factor resizes it before
    /// returning. If that resize cannot be allocated, the error is returned
    /// and the map is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), Ok(None));
    /// assert_eq!(map.insert(37, "b"), Ok(Some("a")));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key, or `None`
    /// if the key is absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a reference to the value corresponding to the key, or
    /// [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::Error;
    /// # use linear_probe::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.try_get(&1), Ok(&"a"));
    /// assert_eq!(map.try_get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn try_get(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.hash_builder.hash_one(key);
        self.table.contains(hash, |(k, _)| k == key)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder and
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use linear_probe::HashMap;
    /// #
    /// # #[derive(Default)]
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, SimpleHasher> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash map with the given configuration using the default
    /// hasher builder.
    ///
    /// # Panics
    ///
    /// Same as [`HashMap::with_config_and_hasher`].
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_hasher(config, S::default())
    }

    /// Creates a new hash map with the given configuration using the default
    /// hasher builder, reporting errors instead of panicking.
    pub fn try_with_config(config: Config) -> Result<Self, Error> {
        Self::try_with_config_and_hasher(config, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            if let Err(err) = self.insert(k, v) {
                fail(err);
            }
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

fn collect_exact<T>(iter: impl ExactSizeIterator<Item = T>) -> Result<Vec<T>, Error> {
    let len = iter.len();
    let layout = Layout::array::<T>(len).map_err(|_| Error::CapacityOverflow)?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| Error::AllocError { layout })?;
    out.extend(iter);
    Ok(out)
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    fn scenario_config() -> Config {
        Config::default()
            .with_initial_capacity(8)
            .with_growth_factor(2)
            .with_load_factor(0.75)
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), map.config().initial_capacity);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.collisions(), 0);
        assert_eq!(map2.rehashes(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), Ok(None));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));

        assert_eq!(
            map.insert(1, "world".to_string()),
            Ok(Some("hello".to_string()))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_try_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("k".to_string(), 5).unwrap();
        assert_eq!(map.try_get(&"k".to_string()), Ok(&5));
        assert_eq!(map.try_get(&"missing".to_string()), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, 10).unwrap();
        if let Some(v) = map.get_mut(&1) {
            *v += 5;
        }
        assert_eq!(map.get(&1), Some(&15));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn update_keeps_original_key() {
        let mut map: HashMap<Rc<str>, i32, SipHashBuilder> = HashMap::new();
        let first: Rc<str> = Rc::from("key");
        let second: Rc<str> = Rc::from("key");

        map.insert(first.clone(), 1).unwrap();
        assert_eq!(map.insert(second.clone(), 2), Ok(Some(1)));

        let stored = map.keys().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(Rc::ptr_eq(stored[0], &first));
        assert!(!Rc::ptr_eq(stored[0], &second));
        // The duplicate key was dropped by the update.
        assert_eq!(Rc::strong_count(&second), 1);
        assert_eq!(map.get(&first), Some(&2));
    }

    #[test]
    fn scenario_from_growth_parameters() {
        let mut map = HashMap::with_config_and_hasher(scenario_config(), SipHashBuilder::default());

        for i in 1..=6 {
            assert_eq!(map.insert(i, i * 100), Ok(None));
        }
        assert_eq!(map.len(), 6);
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.rehashes(), 1);

        map.insert(7, 700).unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.rehashes(), 1);

        for i in 1..=7 {
            assert!(map.contains_key(&i));
        }
        assert!(!map.contains_key(&8));

        assert_eq!(map.insert(3, 333), Ok(Some(300)));
        assert_eq!(map.len(), 7);
        assert_eq!(map.get(&3), Some(&333));
    }

    #[test]
    fn keys_and_values_export() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..50 {
            map.insert(i, format!("value_{}", i)).unwrap();
        }

        let mut keys = map.keys().unwrap().into_iter().copied().collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());

        let mut values = map.values().unwrap().into_iter().cloned().collect::<Vec<_>>();
        values.sort();
        let mut expected = (0..50).map(|i| format!("value_{}", i)).collect::<Vec<_>>();
        expected.sort();
        assert_eq!(values, expected);

        // Both exports walk the slots in the same order.
        for (k, v) in map.keys().unwrap().into_iter().zip(map.values().unwrap()) {
            assert_eq!(v, &format!("value_{}", k));
        }
    }

    #[test]
    fn export_empty_map() {
        let map: HashMap<u8, u8, SipHashBuilder> = HashMap::new();
        assert!(map.keys().unwrap().is_empty());
        assert!(map.values().unwrap().is_empty());
        assert_eq!(map.iter().len(), 0);
    }

    #[test]
    fn test_iterators() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "a").unwrap();
        map.insert(2, "b").unwrap();
        map.insert(3, "c").unwrap();

        let mut pairs = map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, "a"), (2, "b"), (3, "c")]);

        assert_eq!(map.iter_keys().len(), 3);
        assert_eq!(map.iter_values().len(), 3);
        assert_eq!((&map).into_iter().count(), 3);
    }

    #[test]
    fn test_collision_handling() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        let mut last_collisions = 0;

        for i in 0..1000 {
            map.insert(i, i * 2).unwrap();
            assert!(map.collisions() >= last_collisions);
            last_collisions = map.collisions();
        }

        assert_eq!(map.len(), 1000);
        for i in 0..1000 {
            assert_eq!(map.get(&i), Some(&(i * 2)));
            assert!(map.collisions() >= last_collisions);
            last_collisions = map.collisions();
        }
        for i in 1000..1100 {
            assert!(!map.contains_key(&i));
        }
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        map.insert("hello".to_string(), 1).unwrap();
        map.insert("world".to_string(), 2).unwrap();
        map.insert("rust".to_string(), 3).unwrap();

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_borrowed_entries() {
        let keys = (0..20).map(|i| format!("k{i}")).collect::<Vec<_>>();
        let values = (0..20).collect::<Vec<u32>>();

        let mut map: HashMap<&String, &u32, SipHashBuilder> = HashMap::new();
        for (k, v) in keys.iter().zip(&values) {
            map.insert(k, v).unwrap();
        }
        for (k, v) in keys.iter().zip(&values) {
            assert!(core::ptr::eq(*map.get(&k).unwrap(), v));
        }
    }

    #[test]
    fn test_default_trait() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = (0..10).map(|i| (i, i * i)).collect();
        assert_eq!(map.len(), 10);
        map.extend((5..15).map(|i| (i, -i)));
        assert_eq!(map.len(), 15);
        assert_eq!(map.get(&4), Some(&16));
        assert_eq!(map.get(&5), Some(&-5));
        assert_eq!(map.get(&14), Some(&-14));
    }

    #[test]
    fn test_invalid_config() {
        let config = Config::default().with_load_factor(0.0);
        let map = HashMap::<i32, i32, SipHashBuilder>::try_with_config(config);
        assert!(matches!(map, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_insert_failure_leaves_map_unchanged() {
        let config = Config::default()
            .with_initial_capacity(8)
            .with_growth_factor(usize::MAX)
            .with_load_factor(0.75);
        let mut map = HashMap::with_config_and_hasher(config, SipHashBuilder::default());
        for k in 0..5u64 {
            assert_eq!(map.insert(k, k * 10), Ok(None));
        }

        assert_eq!(map.insert(5, 50), Err(Error::CapacityOverflow));
        assert_eq!(map.len(), 5);
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.rehashes(), 0);
        assert_eq!(map.get(&5), None);
        for k in 0..5u64 {
            assert_eq!(map.get(&k), Some(&(k * 10)));
        }

        // Updates never grow the table.
        assert_eq!(map.insert(3, 33), Ok(Some(30)));
        assert_eq!(map.get(&3), Some(&33));
    }

    #[test]
    fn test_dump_report() {
        let mut map = HashMap::with_config_and_hasher(
            Config::default().with_initial_capacity(4),
            SipHashBuilder::default(),
        );
        map.insert(7u32, "seven").unwrap();

        let report = map
            .dump_to_string(true, |f, k, v| write!(f, "{k}: {v}"))
            .unwrap();
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(&lines[..4], ["Collisions: 0", "Rehashes: 0", "Size: 1", "Capacity: 4"]);
        assert_eq!(lines.len(), 4 + 4);
        assert_eq!(lines[4..].iter().filter(|l| l.ends_with(": null")).count(), 3);
        assert_eq!(lines[4..].iter().filter(|l| l.ends_with("(7: seven)")).count(), 1);

        let short = map.dump_to_string(false, |f, k, v| write!(f, "{k}: {v}")).unwrap();
        assert_eq!(short.lines().count(), 4);
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_dump_stdout() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("a", 1).unwrap();
        map.dump(true);
        map.dump(false);
        map.stats().print();
    }

    #[test]
    fn test_debug_format() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "x").unwrap();
        assert_eq!(format!("{map:?}"), "{1: \"x\"}");
    }

    #[test]
    fn test_complex_values() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        let vec1 = vec![1, 2, 3];
        let vec2 = vec![4, 5, 6];

        map.insert("first".to_string(), vec1.clone()).unwrap();
        map.insert("second".to_string(), vec2.clone()).unwrap();

        assert_eq!(map.get(&"first".to_string()), Some(&vec1));
        assert_eq!(map.get(&"second".to_string()), Some(&vec2));

        if let Some(v) = map.get_mut(&"first".to_string()) {
            v.push(4);
        }

        assert_eq!(map.get(&"first".to_string()), Some(&vec![1, 2, 3, 4]));
    }
}
