#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Sizing parameters and their compile-time defaults.
pub mod config;

/// The crate error type.
pub mod error;

/// A HashMap backed by the linear-probing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

pub use config::Config;
pub use error::Error;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use hash_table::Stats;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap::new`] when no other is named.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap::new`] when no other is named.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
