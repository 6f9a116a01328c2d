//! Document unlocking.
//!
//! The engine sits behind the [`Decryptor`] trait so the HTTP pipeline and
//! the batch runner share one contract and tests can substitute it.

pub mod gateway;

#[cfg(test)]
pub(crate) mod fixtures;

pub use gateway::{unlock, DecryptionError, Decryptor, LopdfDecryptor};
