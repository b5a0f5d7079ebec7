//! Custom assertion macros
//!
//! Result assertions with better failure output than `unwrap`.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an operation error of the given kind and return it
#[macro_export]
macro_rules! assert_err_kind {
    ($result:expr, $kind:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err({:?}), got Ok: {:?}", $kind, value),
            Err(e) => {
                assert_eq!(e.kind(), $kind, "unexpected error: {}", e);
                e
            }
        }
    };
}
