//! Non-zero capacity and size types
//!
//! Every ring buffer, queue and sketch dimension in the pipeline must hold at
//! least one element. These wrappers enforce that at construction and at
//! deserialization, so the engine never has to handle a zero capacity.

use crate::constants;
use std::num::NonZeroUsize;

/// Generate a `NonZeroUsize` newtype with the standard implementations
///
/// Each type gets: new(), get(), as_nonzero(), DEFAULT, Display, From,
/// Serialize, Deserialize (rejecting 0 with a message naming the type).
macro_rules! nonzero_newtype {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident = $default:expr;
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(NonZeroUsize);

        impl $name {
            /// Default value used when the configuration omits this field
            pub const DEFAULT: Self = Self(NonZeroUsize::new($default).unwrap());

            /// Create a new instance, returning None if value is 0
            #[must_use]
            pub const fn new(value: usize) -> Option<Self> {
                match NonZeroUsize::new(value) {
                    Some(nz) => Some(Self(nz)),
                    None => None,
                }
            }

            /// Get the inner value
            #[must_use]
            #[inline]
            pub const fn get(&self) -> usize {
                self.0.get()
            }

            /// Get the inner value as a `NonZeroUsize`
            #[must_use]
            #[inline]
            pub const fn as_nonzero(&self) -> NonZeroUsize {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::DEFAULT
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.get())
            }
        }

        impl From<$name> for usize {
            fn from(val: $name) -> Self {
                val.get()
            }
        }

        impl From<$name> for NonZeroUsize {
            fn from(val: $name) -> Self {
                val.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: usize = s
                    .trim()
                    .parse()
                    .map_err(|e| format!("Invalid {}: {}", stringify!($name), e))?;
                Self::new(value).ok_or_else(|| concat!(stringify!($name), " cannot be 0").to_string())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_u64(self.get() as u64)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = usize::deserialize(deserializer)?;
                Self::new(value).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($name), " cannot be 0"))
                })
            }
        }
    };
}

nonzero_newtype! {
    /// Number of events the bounded queue holds before `put` suspends
    pub struct QueueCapacity = constants::queue::CAPACITY;
}

nonzero_newtype! {
    /// Number of buffered events that triggers a size flush
    pub struct BatchSize = constants::batch::SIZE;
}

nonzero_newtype! {
    /// Capacity of the rolling value and latency windows
    pub struct WindowSize = constants::stats::WINDOW_SIZE;
}

nonzero_newtype! {
    /// Number of recent batch p99 values the alerter keeps
    pub struct HistorySize = constants::alert::HISTORY_SIZE;
}

nonzero_newtype! {
    /// Number of recent batch lines the dashboard keeps for rendering
    pub struct LineHistorySize = constants::dashboard::HISTORY_LINES;
}

nonzero_newtype! {
    /// Number of counters per row of the frequency sketch
    pub struct SketchWidth = constants::stats::FREQUENCY_WIDTH;
}

nonzero_newtype! {
    /// Number of independently hashed rows of the frequency sketch
    pub struct SketchDepth = constants::stats::FREQUENCY_DEPTH;
}

nonzero_newtype! {
    /// A non-zero worker thread count for the tokio runtime
    pub struct ThreadCount = 1;
}
