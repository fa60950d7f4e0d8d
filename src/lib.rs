//! # shelfdate
//!
//! Extracts production and expiration dates from noisy OCR text read off retail and food
//! packaging.
//!
//! Packaging prints dates in many shapes: Gregorian and Minguo (Republic of China) years, English
//! month abbreviations, dots, dashes, slashes, spaces, or no separator at all. This library reads
//! them, checks that the day they name exists, and decides which date is the production date and
//! which is the expiration date.
//!
//! ## Examples
//!
//! Read one date, reported as the expiration date:
//!
//! ```
//! use shelfdate::prelude::*;
//!
//! let result = extract_single("115.05.02"); // Minguo year 115 is 2026
//! assert_eq!(DateTriple::new(2026, 5, 2).ok(), result.expiration());
//! ```
//!
//! Read a labelled pair:
//!
//! ```
//! use shelfdate::prelude::*;
//!
//! let result = extract_dual(".PD: 14/08/2025 .BB: 14/08/2026");
//! assert_eq!(2, result.count());
//! assert_eq!(DateTriple::new(2025, 8, 14).ok(), result.production());
//! assert_eq!(DateTriple::new(2026, 8, 14).ok(), result.expiration());
//! ```
//!
//! Or an unlabelled pair, where the earlier date is taken as the production date:
//!
//! ```
//! use shelfdate::prelude::*;
//!
//! let result = extract_dual("2026/08/14 2025/08/14");
//! assert_eq!(DateTriple::new(2025, 8, 14).ok(), result.production());
//! ```
//!
//! ## Important Terms
//!
//! - **Rule**: One date shape, such as `YYYY-MM-DD` or `DD MMM YY`. Modeled by [`FormatRule`].
//! - **Cascade**: The rules tried in a fixed priority order until one decides. Modeled by
//!   [`FormatCascade`], whose documentation lists every rule.
//! - **Anchor**: A label on the packaging that introduces a date: `PD`, `MFG`, or `製造` for the
//!   production date, `BB`, `EXP`, or `有效` for the expiration date.
//! - **Minguo year**: The Republic of China calendar year, Gregorian year minus 1911.
//!
//! ## Reference date
//!
//! A date written as only month and day (`05/02`) takes its year from the current date. Every
//! entry point has an `_at` variant that takes an explicit [`ReferenceDate`] instead of reading the
//! local clock.
//!
//! ## Prelude
//!
//! shelfdate provides a prelude module for convenience. It contains everything needed to interact
//! with the library.
//!
//! Use it with:
//!
//! ```
//! use shelfdate::prelude::*;
//! ```
#![warn(missing_docs)]

pub mod calendar;
mod cascade;
mod date;
mod error;
mod extract;
mod month;
mod rule;

pub use crate::cascade::FormatCascade;
pub use crate::date::{DateTriple, ExtractionResult, ReferenceDate};
pub use crate::error::DateError;
pub use crate::extract::{extract_dual, extract_dual_at, extract_single, extract_single_at};
pub use crate::month::month_from_abbreviation;
pub use crate::rule::{Candidate, FormatRule, RuleOutcome};

/// A convenience module appropriate for glob imports (`use shelfdate::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::extract_dual;
    #[doc(no_inline)]
    pub use crate::extract_dual_at;
    #[doc(no_inline)]
    pub use crate::extract_single;
    #[doc(no_inline)]
    pub use crate::extract_single_at;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::DateTriple;
    #[doc(no_inline)]
    pub use crate::ExtractionResult;
    #[doc(no_inline)]
    pub use crate::FormatCascade;
    #[doc(no_inline)]
    pub use crate::ReferenceDate;
}
