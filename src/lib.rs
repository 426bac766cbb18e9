#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

// loom integration
#[doc(hidden)]
macro_rules! cfg_loom {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "loom")]
            $item
        )*
    };
}
#[doc(hidden)]
macro_rules! cfg_not_loom {
    ($($item:item)*) => {
        $(
            #[cfg(not(feature = "loom"))]
            $item
        )*
    };
}

#[doc(hidden)]
mod sync;
#[doc(hidden)]
mod thread;
//loom integration finished.

/// A module containing the error types used by the library.
pub mod error;

/// A bounded, blocking, multi-producer multi-consumer channel.
///
/// The queue uses it for its input, its internal buffer and its output, and
/// it is exported so callers can name the endpoint types.
///
/// # Example
///
/// ```
/// use uniqueue::channel;
/// use std::thread;
///
/// let (src, sink) = channel::channel::<&'static str>(2);
///
/// thread::spawn(move || {
///     for s in ["H", "E", "L", "L", "O"] {
///         src.send(s).unwrap();
///     }
///     src.close();
/// });
///
/// let str: String = sink.iter().collect();
/// assert_eq!(str, "HELLO");
/// ```
pub mod channel;

mod unique;
pub use error::AlreadyConstrained;
pub use unique::{Config, UniqueQueue};
