//! The raw open-addressing table.
//!
//! [`HashTable`] stores values of type `V` in a flat array of slots and
//! resolves collisions with linear probing. It knows nothing about keys: every
//! operation takes a precomputed `u64` hash and an equality predicate, so the
//! caller decides how values are hashed and compared.

use alloc::alloc::handle_alloc_error;
use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::fmt::Debug;

use crate::config::Config;
use crate::error::Error;

#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

#[inline(always)]
fn home_slot(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

fn try_alloc_slots<V>(capacity: usize) -> Result<Vec<Option<Slot<V>>>, Error> {
    let layout =
        Layout::array::<Option<Slot<V>>>(capacity).map_err(|_| Error::CapacityOverflow)?;
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::AllocError { layout })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

/// Turns an error from an infallible entry point into an abort or a panic,
/// the way the standard collections do.
#[cold]
#[inline(never)]
pub(crate) fn fail(err: Error) -> ! {
    match err {
        Error::AllocError { layout } => handle_alloc_error(layout),
        err => panic!("{err}"),
    }
}

/// Snapshot of a table's counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Probe steps taken past the home slot over the table's lifetime.
    pub collisions: usize,
    /// Completed resize steps.
    pub rehashes: usize,
    /// Number of occupied slots.
    pub size: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// `size / capacity`.
    pub load_factor: f64,
}

impl Stats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.size,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Collisions: {}", self.collisions);
        println!("Rehashes: {}", self.rehashes);
    }
}

/// A hash table using open addressing with linear probing.
///
/// Each value is stored together with the hash it was inserted with. A lookup
/// starts at slot `hash % capacity` and walks forward one slot at a time,
/// wrapping at the end, until it finds a value accepted by the equality
/// predicate or an empty slot. Every step past the starting slot is counted as
/// a collision.
///
/// When an insertion brings the fill ratio to the configured load factor, the
/// table multiplies its slot count by the growth factor and re-inserts every
/// value using the stored hashes. There is no removal.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use linear_probe::hash_table::Entry;
/// # use linear_probe::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry
///             .insert(Person {
///                 id: 123,
///                 name: "Alice".to_string(),
///             })
///             .unwrap();
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert!(table.contains(hash, |p| p.id == 123));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Option<Slot<V>>>,
    populated: usize,
    max_pop: usize,
    collisions: Cell<usize>,
    rehashes: usize,
    config: Config,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("collisions", &self.collisions.get())
            .field("rehashes", &self.rehashes)
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Some(slot) => format!("{:016x} => {:?}", slot.hash, slot.value),
                        None => "..".to_string(),
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default [`Config`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_probe::hash_table::HashTable;
    /// # use linear_probe::config::DEFAULT_INITIAL_CAPACITY;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert_eq!(table.capacity(), DEFAULT_INITIAL_CAPACITY);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty table with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`Config::validate`] or the slot count
    /// overflows, and aborts through [`handle_alloc_error`] if the slot store
    /// cannot be allocated. Use [`HashTable::try_with_config`] to handle these
    /// cases.
    pub fn with_config(config: Config) -> Self {
        Self::try_with_config(config).unwrap_or_else(|err| fail(err))
    }

    /// Creates an empty table with the given configuration, reporting invalid
    /// parameters and allocation failure as errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_probe::Config;
    /// # use linear_probe::Error;
    /// # use linear_probe::hash_table::HashTable;
    /// #
    /// let config = Config::default().with_initial_capacity(32);
    /// let table: HashTable<u64> = HashTable::try_with_config(config).unwrap();
    /// assert_eq!(table.capacity(), 32);
    ///
    /// let config = Config::default().with_initial_capacity(usize::MAX);
    /// assert_eq!(
    ///     HashTable::<u64>::try_with_config(config).unwrap_err(),
    ///     Error::CapacityOverflow
    /// );
    /// ```
    pub fn try_with_config(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let slots = try_alloc_slots(config.initial_capacity)?;

        Ok(Self {
            slots,
            populated: 0,
            max_pop: config.max_populated(config.initial_capacity),
            collisions: Cell::new(0),
            rehashes: 0,
            config,
        })
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of probe steps taken past a home slot since the table
    /// was created. The count includes steps taken while re-inserting values
    /// during a resize, and never decreases.
    pub fn collisions(&self) -> usize {
        self.collisions.get()
    }

    /// Returns the number of resize steps performed so far.
    pub fn rehashes(&self) -> usize {
        self.rehashes
    }

    /// Returns the configuration the table was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a snapshot of the table's counters.
    pub fn stats(&self) -> Stats {
        Stats {
            collisions: self.collisions(),
            rehashes: self.rehashes,
            size: self.populated,
            capacity: self.capacity(),
            load_factor: self.populated as f64 / self.capacity() as f64,
        }
    }

    /// Returns an iterator over all values in slot order.
    ///
    /// The order depends on the hashes and the current capacity, and changes
    /// when the table resizes.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    fn bump_collisions(&self, steps: usize) {
        self.collisions
            .set(self.collisions.get().saturating_add(steps));
    }

    /// Walks from the home slot of `hash` until `eq` accepts a value or an
    /// empty slot is reached.
    ///
    /// The resize policy keeps at least one slot empty, so the walk always
    /// terminates.
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        debug_assert!(self.populated < self.capacity());

        let capacity = self.capacity();
        let mut index = home_slot(hash, capacity);
        let mut steps = 0;
        let probe = loop {
            match &self.slots[index] {
                None => break Probe::Vacant(index),
                Some(slot) if slot.hash == hash && eq(&slot.value) => break Probe::Found(index),
                Some(_) => {}
            }
            steps += 1;
            index += 1;
            if index == capacity {
                index = 0;
            }
        };

        self.bump_collisions(steps);
        probe
    }

    /// Finds the first empty slot at or after the home slot of `hash`.
    fn probe_vacant(&self, hash: u64) -> usize {
        match self.probe(hash, |_| false) {
            Probe::Vacant(index) => index,
            Probe::Found(_) => unreachable!("probe with a rejecting predicate matched a slot"),
        }
    }

    /// Returns a reference to the value with hash `hash` accepted by `eq`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use linear_probe::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(7), |&n: &u64| n == 7).or_insert(7).unwrap();
    ///
    /// assert_eq!(table.find(hash_u64(7), |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(hash_u64(8), |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => self.slots[index].as_ref().map(|slot| &slot.value),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value with hash `hash` accepted by
    /// `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => self.slots[index].as_mut().map(|slot| &mut slot.value),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns `true` if a value with hash `hash` is accepted by `eq`.
    pub fn contains(&self, hash: u64, eq: impl Fn(&V) -> bool) -> bool {
        matches!(self.probe(hash, eq), Probe::Found(_))
    }

    /// Gets the entry for the value with hash `hash` accepted by `eq`, for
    /// in-place insertion or update.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use linear_probe::hash_table::Entry;
    /// # use linear_probe::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<(String, u32)> = HashTable::new();
    /// let hash = hash_str("apples");
    ///
    /// match table.entry(hash, |(k, _)| k == "apples") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert(("apples".to_string(), 3)).unwrap();
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// match table.entry(hash, |(k, _)| k == "apples") {
    ///     Entry::Occupied(mut entry) => entry.get_mut().1 += 1,
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert_eq!(table.find(hash, |(k, _)| k == "apples").map(|(_, n)| *n), Some(4));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    /// Allocates the slot store the table grows into once `required` slots
    /// are occupied, along with the number of growth steps it takes.
    ///
    /// One step multiplies the capacity by the growth factor; steps repeat
    /// until `required` stays below the load factor. Nothing in the table is
    /// touched, so on error the table is left as it was.
    #[cold]
    #[inline(never)]
    fn alloc_grown(&self, required: usize) -> Result<(Vec<Option<Slot<V>>>, usize), Error> {
        let mut capacity = self.capacity();
        let mut steps = 0;
        while required >= self.config.max_populated(capacity) {
            capacity = capacity
                .checked_mul(self.config.growth_factor)
                .ok_or(Error::CapacityOverflow)?;
            steps += 1;
        }

        Ok((try_alloc_slots(capacity)?, steps))
    }

    /// Swaps in `new_slots` and moves every value into it in old slot order,
    /// probing with the stored hashes.
    ///
    /// Returns the new index of the value that sat at `tracked`.
    #[cold]
    #[inline(never)]
    fn rehash_into(
        &mut self,
        new_slots: Vec<Option<Slot<V>>>,
        steps: usize,
        tracked: usize,
    ) -> usize {
        let old_slots = core::mem::replace(&mut self.slots, new_slots);
        self.populated = 0;
        self.max_pop = self.config.max_populated(self.slots.len());

        let mut tracked_index = tracked;
        for (old_index, slot) in old_slots.into_iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            let index = self.probe_vacant(slot.hash);
            if old_index == tracked {
                tracked_index = index;
            }
            self.slots[index] = Some(slot);
            self.populated += 1;
        }

        self.rehashes += steps;
        tracked_index
    }

    /// Writes the table report into `out`.
    ///
    /// The report always holds the collision, rehash, size and capacity
    /// counters. If `full` is set it continues with one line per slot: `i:
    /// null` for an empty slot, or `i: (...)` with the output of `display` for
    /// an occupied one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linear_probe::Config;
    /// # use linear_probe::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_config(Config::default().with_initial_capacity(4));
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1).unwrap();
    ///
    /// let mut report = String::new();
    /// table
    ///     .write_dump(&mut report, true, |f, n| write!(f, "{n}"))
    ///     .unwrap();
    /// assert_eq!(
    ///     report,
    ///     "Collisions: 0\nRehashes: 0\nSize: 1\nCapacity: 4\n\
    ///      0: null\n1: (1)\n2: null\n3: null\n"
    /// );
    /// ```
    pub fn write_dump<W, F>(&self, out: &mut W, full: bool, display: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
    {
        writeln!(out, "Collisions: {}", self.collisions())?;
        writeln!(out, "Rehashes: {}", self.rehashes)?;
        writeln!(out, "Size: {}", self.populated)?;
        writeln!(out, "Capacity: {}", self.capacity())?;
        if !full {
            return Ok(());
        }

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                None => writeln!(out, "{index}: null")?,
                Some(slot) => writeln!(
                    out,
                    "{index}: ({})",
                    DisplayWith {
                        value: &slot.value,
                        display: &display,
                    }
                )?,
            }
        }
        Ok(())
    }

    /// Prints the table report produced by [`HashTable::write_dump`] to
    /// stdout.
    ///
    /// If `display` returns an error, the lines written before it are still
    /// printed, followed by a `...` line marking the report as cut short.
    #[cfg(feature = "std")]
    pub fn dump_with<F>(&self, full: bool, display: F)
    where
        F: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
    {
        let mut report = String::new();
        let result = self.write_dump(&mut report, full, display);
        print!("{report}");
        if result.is_err() {
            println!("...");
        }
    }

    /// Renders the table report produced by [`HashTable::write_dump`] into a
    /// new `String`.
    pub fn dump_to_string<F>(&self, full: bool, display: F) -> Result<String, fmt::Error>
    where
        F: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
    {
        let mut report = String::new();
        self.write_dump(&mut report, full, display)?;
        Ok(report)
    }
}

struct DisplayWith<'a, V, F> {
    value: &'a V,
    display: &'a F,
}

impl<V, F> fmt::Display for DisplayWith<'_, V, F>
where
    F: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.display)(f, self.value)
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable reference
    /// to the value in the entry.
    ///
    /// Fails only if inserting requires a resize that cannot be allocated.
    pub fn or_insert(self, default: V) -> Result<&'a mut V, Error> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> Result<&'a mut V, Error> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> Result<&'a mut V, Error>
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
///
/// It remembers the empty slot the probe stopped at, so inserting does not
/// probe again.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// The value goes into the vacant slot found by the lookup. If that
    /// brings the table to its load factor, the table is then resized and the
    /// value moves with the others. The larger slot store is allocated before
    /// the value is placed, so on [`Error::CapacityOverflow`] or
    /// [`Error::AllocError`] nothing is inserted and `value` is dropped.
    pub fn insert(self, value: V) -> Result<&'a mut V, Error> {
        let VacantEntry {
            table,
            hash,
            mut index,
        } = self;

        let grown = if table.populated + 1 >= table.max_pop {
            Some(table.alloc_grown(table.populated + 1)?)
        } else {
            None
        };

        table.slots[index] = Some(Slot { hash, value });
        table.populated += 1;

        if let Some((new_slots, steps)) = grown {
            index = table.rehash_into(new_slots, steps, index);
        }

        match table.slots[index].as_mut() {
            Some(slot) => Ok(&mut slot.value),
            None => unreachable!("inserted value missing from slot {index}"),
        }
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    fn slot(&self) -> &Slot<V> {
        match &self.table.slots[self.index] {
            Some(slot) => slot,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    fn slot_mut(&mut self) -> &mut Slot<V> {
        match &mut self.table.slots[self.index] {
            Some(slot) => slot,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    /// Returns a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.slot().value
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.slot_mut().value
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, index } = self;
        match &mut table.slots[index] {
            Some(slot) => &mut slot.value,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    /// Replaces the value in the entry and returns the old one.
    ///
    /// The caller is responsible for keeping the new value equal, under the
    /// predicate and hash used to find it, to the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }
}

/// An iterator over the values in a [`HashTable`], in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let value = self.slots.by_ref().find_map(|slot| slot.as_ref())?;
        self.remaining -= 1;
        Some(&value.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}
