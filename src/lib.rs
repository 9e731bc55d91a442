//! # ath-eeprom
//!
//! A portable, no_std decoder for the RF calibration store ("EEPROM") of
//! Atheros-style 802.11a/b/g radios.
//!
//! The store is an image of 16-bit words. Its layout changed across format
//! versions 3.0 through 5.3 and across three "EEPROM map" encodings of the
//! raw power calibration:
//!
//! | Map | Decoder | Curve |
//! |-----|---------|-------|
//! | 0   | [`power::legacy`] | 11 PCDAC intercepts interpolated from a min/max pair |
//! | 1   | [`power::xpd`]    | up to two XPD gain stages of PCDAC/power points |
//! | 2   | [`power::vpd`]    | up to four pd gain stages of delta-compressed Vpd/power points |
//!
//! Decoding is a single synchronous pass over a [`WordSource`]:
//!
//! 1. [`version::select`] reads the format version and map type
//! 2. [`header::decode`] reads the per-band modal parameters
//! 3. [`piers`] and [`power`] rebuild the calibrated channels of each enabled band
//! 4. [`target`] reads the per-rate target powers
//! 5. [`ctl`] reads the conformance test limits
//!
//! The result is an owned, immutable [`CalibrationDataset`]. Any failure
//! aborts the whole decode; no partial dataset is ever returned.
//!
//! ## Crate features
//! | Feature            | Description |
//! |--------------------|-------------|
//! | `std`              | Implements `std::error::Error` for the error types |
//! | `critical-section` | Enables [`source::SharedWordSource`] |
//! | `defmt-0-3`        | Uses `defmt` logging and derives `defmt::Format` |
//! | `log`              | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use ath_eeprom::{decode, Band};
//!
//! // An image with an unknown version word is rejected up front.
//! let mut words = [0u16; 0x400];
//! assert!(decode(&mut words).is_err());
//!
//! words[0xc1] = 0x3003;
//! let dataset = decode(&mut words).unwrap();
//! assert!(dataset.band(Band::A).is_none());
//! ```
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub use heapless;

pub(crate) mod bits;
pub mod consts;
pub mod ctl;
pub mod dataset;
pub mod error;
pub mod freq;
pub mod header;
pub mod piers;
pub mod power;
pub mod source;
pub mod target;
pub mod version;

#[cfg(test)]
pub(crate) mod testutil;

pub use dataset::{BandCalibration, CalibrationDataset, decode};
pub use error::DecodeError;
pub use freq::Band;
pub use source::WordSource;
pub use version::{FormatVersion, MapType};
