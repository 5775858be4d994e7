//! Low-level decoding helpers shared by the spreadsheet readers.

pub(crate) mod bytes;
pub(crate) mod cfb;
pub(crate) mod xml;
pub(crate) mod zip;

#[cfg(feature = "xls")]
pub(crate) mod biff8;
