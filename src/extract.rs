//! Entry points for the OCR service: pull one date, or a production/expiration pair, out of
//! recognized text.
//!
//! Packaging usually labels its dates (`PD`/`BB`, `MFG`/`EXP`, `製造`/`有效`), and a labelled date
//! is read from the text that follows its label. When the text carries no label at all, every
//! date-shaped run is read instead and the roles are guessed from chronology: a lone date is the
//! expiration date, and of two dates the earlier one is the production date.

use crate::{
    cascade::FormatCascade,
    date::{DateTriple, ExtractionResult, ReferenceDate},
};
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// A label that introduces a date on packaging.
#[derive(Debug)]
struct Anchor {
    /// Matched against the ASCII-uppercased text.
    token: &'static str,

    /// Characters to step over from the start of the token before reading the date.
    skip_chars: usize,
}

/// Production labels, highest priority first: "production date", "manufactured", and the
/// Chinese for "manufacture".
static PRODUCTION_ANCHORS: [Anchor; 3] = [
    Anchor {
        token: "PD",
        skip_chars: 2,
    },
    Anchor {
        token: "MFG",
        skip_chars: 3,
    },
    Anchor {
        token: "製造",
        skip_chars: 2,
    },
];

/// Expiration labels, highest priority first: "best before", "expires", and the Chinese for
/// "valid (until)".
static EXPIRATION_ANCHORS: [Anchor; 3] = [
    Anchor {
        token: "BB",
        skip_chars: 2,
    },
    Anchor {
        token: "EXP",
        skip_chars: 3,
    },
    Anchor {
        token: "有效",
        skip_chars: 2,
    },
];

/// Date-shaped runs looked for in unlabelled text. Alternatives are tried left to right at each
/// position, so the four-digit-year shapes win over the two-digit ones.
static DATE_SHAPES: LazyLock<Regex> = LazyLock::new(|| {
    let shapes = [
        r"[0-9]{4}[/\-.][0-9]{1,2}[/\-.][0-9]{1,2}",
        r"[0-9]{1,2}[/\-.][0-9]{1,2}[/\-.][0-9]{4}",
        r"[0-9]{2}[/\-.][0-9]{1,2}[/\-.][0-9]{1,2}",
        r"[0-9]{8}",
        r"[0-9]{1,2}\s*/\s*[0-9]{1,2}\s*/\s*[0-9]{4}",
        r"[0-9]{1,2}\s*/\s*[0-9]{1,2}\s*/\s*[0-9]{2}",
    ];
    Regex::new(&shapes.join("|")).expect("date shape patterns are valid regexes")
});

/// Reads a single date out of `text` and reports it as the expiration date.
///
/// Uses today's local date for shapes that omit the year. See [`FormatCascade`] for the shapes
/// understood.
///
/// ```
/// use shelfdate::{extract_single, DateTriple};
///
/// let result = extract_single("2026-05-02");
/// assert_eq!(1, result.count());
/// assert_eq!(None, result.production());
/// assert_eq!(DateTriple::new(2026, 5, 2).ok(), result.expiration());
///
/// assert_eq!(0, extract_single("2026-13-01").count());
/// ```
pub fn extract_single(text: &str) -> ExtractionResult {
    extract_single_at(text, &ReferenceDate::local_now())
}

/// Like [`extract_single`], with an explicit reference date.
pub fn extract_single_at(text: &str, today: &ReferenceDate) -> ExtractionResult {
    FormatCascade::match_text_at(text, today)
        .map(ExtractionResult::expiring)
        .unwrap_or_default()
}

/// Reads a production date and an expiration date out of `text`.
///
/// Each role is resolved on its own from its labels. If no label of either kind is present,
/// all date-shaped runs are read and the roles are assigned by chronology.
///
/// Uses today's local date for shapes that omit the year.
///
/// ```
/// use shelfdate::{extract_dual, DateTriple};
///
/// let result = extract_dual("2026/08/14 2025/08/14");
/// assert_eq!(2, result.count());
/// assert_eq!(DateTriple::new(2025, 8, 14).ok(), result.production());
/// assert_eq!(DateTriple::new(2026, 8, 14).ok(), result.expiration());
/// ```
pub fn extract_dual(text: &str) -> ExtractionResult {
    extract_dual_at(text, &ReferenceDate::local_now())
}

/// Like [`extract_dual`], with an explicit reference date.
pub fn extract_dual_at(text: &str, today: &ReferenceDate) -> ExtractionResult {
    let folded = text.to_ascii_uppercase();

    let production_anchor = find_anchor(&folded, &PRODUCTION_ANCHORS);
    let expiration_anchor = find_anchor(&folded, &EXPIRATION_ANCHORS);

    if production_anchor.is_none() && expiration_anchor.is_none() {
        return by_chronology(text, today);
    }

    let production =
        production_anchor.and_then(|(anchor, at)| read_after(text, anchor, at, today));
    let expiration =
        expiration_anchor.and_then(|(anchor, at)| read_after(text, anchor, at, today));
    ExtractionResult::new(production, expiration)
}

/// Finds the highest-priority anchor present in `folded`, with its byte offset.
fn find_anchor<'a>(folded: &str, anchors: &'a [Anchor]) -> Option<(&'a Anchor, usize)> {
    anchors
        .iter()
        .find_map(|anchor| folded.find(anchor.token).map(|at| (anchor, at)))
}

/// Reads the date following `anchor`, which starts at byte `at` of `text`.
fn read_after(text: &str, anchor: &Anchor, at: usize, today: &ReferenceDate) -> Option<DateTriple> {
    // ASCII uppercasing keeps byte offsets, so `at` is valid in `text` too
    let from_anchor = text.get(at..)?;
    let rest = from_anchor
        .char_indices()
        .nth(anchor.skip_chars)
        .map_or("", |(offset, _)| &from_anchor[offset..]);

    let date = FormatCascade::match_text_at(rest, today);
    debug!(anchor = anchor.token, found = ?date, "read labelled date");
    date
}

/// Every distinct valid date in `text`, in order of first appearance.
fn all_dates(text: &str, today: &ReferenceDate) -> Vec<DateTriple> {
    DATE_SHAPES
        .find_iter(text)
        .filter_map(|found| FormatCascade::match_text_at(found.as_str(), today))
        .unique()
        .collect()
}

fn by_chronology(text: &str, today: &ReferenceDate) -> ExtractionResult {
    let dates = all_dates(text, today);
    debug!(candidates = dates.len(), "no labels, assigning roles by chronology");

    match dates.as_slice() {
        [] => ExtractionResult::empty(),
        [only] => ExtractionResult::expiring(*only),
        [first, second, ..] => {
            if first <= second {
                ExtractionResult::new(Some(*first), Some(*second))
            } else {
                ExtractionResult::new(Some(*second), Some(*first))
            }
        }
    }
}
