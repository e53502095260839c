use core::alloc::Layout;
use core::fmt;

/// The error type for fallible table operations.
///
/// Allocation failures are reported instead of aborting, and lookups of
/// missing keys through [`HashMap::try_get`](crate::HashMap::try_get) are
/// reported as [`Error::KeyNotFound`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested capacity overflowed `usize` or the maximum allocation
    /// size.
    CapacityOverflow,
    /// The allocator returned an error while allocating a slot store.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
    /// The key is not present in the table.
    KeyNotFound,
    /// A [`Config`](crate::Config) value was rejected. The payload names the
    /// offending parameter.
    InvalidConfig(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityOverflow => f.write_str("capacity overflow"),
            Error::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes failed",
                layout.size()
            ),
            Error::KeyNotFound => f.write_str("key not found"),
            Error::InvalidConfig(reason) => write!(f, "invalid table configuration: {reason}"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::CapacityOverflow.to_string(), "capacity overflow");
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");

        let layout = Layout::array::<u64>(4).unwrap();
        assert_eq!(
            Error::AllocError { layout }.to_string(),
            "memory allocation of 32 bytes failed"
        );
        assert_eq!(
            Error::InvalidConfig("growth_factor must be at least 2").to_string(),
            "invalid table configuration: growth_factor must be at least 2"
        );
    }
}
