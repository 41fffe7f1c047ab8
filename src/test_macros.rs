//! Test macros for NonZero newtype wrappers
//!
//! Reusable test generators for the capacity types in `types`, which all
//! share the same `new`/`get`/`DEFAULT` surface.

/// Generate standard tests for a NonZero newtype wrapper
///
/// # Arguments
/// * `$type_name` - The newtype struct name (e.g., `QueueCapacity`)
/// * `$default_value` - Expected value of the DEFAULT constant
/// * `$test_value` - A valid non-zero value different from the default
///
/// # Generated Tests
/// - `test_default` - Verifies DEFAULT constant and Default impl agree
/// - `test_new_valid` - Tests creating with valid non-zero value
/// - `test_new_zero_rejected` - Verifies zero returns None
/// - `test_clone_equality` - Tests Clone and PartialEq
///
/// # Example
/// ```ignore
/// test_nonzero_newtype!(WindowSize, 1000, 64);
/// ```
#[macro_export]
macro_rules! test_nonzero_newtype {
    ($type_name:ident, $default_value:expr, $test_value:expr) => {
        #[test]
        fn test_default() {
            assert_eq!($type_name::DEFAULT.get(), $default_value);
            assert_eq!($type_name::default(), $type_name::DEFAULT);
        }

        #[test]
        fn test_new_valid() {
            let value = $type_name::new($test_value).unwrap();
            assert_eq!(value.get(), $test_value);
            assert_eq!(value.as_nonzero().get(), $test_value);
        }

        #[test]
        fn test_new_zero_rejected() {
            assert!($type_name::new(0).is_none());
        }

        #[test]
        fn test_clone_equality() {
            let val1 = $type_name::new($test_value).unwrap();
            let val2 = val1.clone();
            let val3 = $type_name::new($default_value).unwrap();

            assert_eq!(val1, val2);
            assert_ne!(val1, val3);
        }
    };
}

/// Generate Ord/PartialOrd tests for a newtype with ordering
///
/// # Example
/// ```ignore
/// test_newtype_ordering!(QueueCapacity, 2, 64);
/// ```
#[macro_export]
macro_rules! test_newtype_ordering {
    ($type_name:ident, $small_value:expr, $large_value:expr) => {
        #[test]
        fn test_ordering() {
            let small = $type_name::new($small_value).unwrap();
            let large = $type_name::new($large_value).unwrap();
            let equal = $type_name::new($small_value).unwrap();

            assert!(small < large);
            assert!(large > small);
            assert!(small <= equal);
            assert_eq!(small.cmp(&large), std::cmp::Ordering::Less);
            assert_eq!(small.cmp(&equal), std::cmp::Ordering::Equal);
        }
    };
}

/// Generate FromStr tests for a newtype with FromStr implementation
///
/// # Example
/// ```ignore
/// test_newtype_from_str!(BatchSize, "500", 500, "not_a_number");
/// ```
#[macro_export]
macro_rules! test_newtype_from_str {
    ($type_name:ident, $valid_str:expr, $expected_value:expr, $invalid_str:expr) => {
        #[test]
        fn test_from_str_valid() {
            let value: $type_name = $valid_str.parse().unwrap();
            assert_eq!(value.get(), $expected_value);
        }

        #[test]
        fn test_from_str_invalid() {
            let result: Result<$type_name, _> = $invalid_str.parse();
            assert!(result.is_err());
        }
    };
}
