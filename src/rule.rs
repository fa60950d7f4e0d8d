use crate::{
    calendar::MINGUO_BASE_YEAR,
    date::{DateTriple, ReferenceDate},
    month::{month_from_abbreviation, MONTH_PATTERN},
};
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Field separator shared by every separated format: `.`, `-`, `/`, or whitespace, with optional
/// padding on either side (OCR often reads `14 / 08/2025`).
const SEP: &str = r"\s*[/\-.\s]\s*";

/// Two-digit years are read as `20YY`.
const CENTURY: i32 = 2000;

/// The highest Minguo year the three-digit rule accepts (Gregorian 2111).
const MAX_MINGUO_YEAR: i32 = 200;

/// The leading four digits of an eight-digit run above this cannot be `DDMM`, so the run is
/// `YYYYMMDD`.
const MAX_DAY_MONTH: u32 = 1231;

/// A `(year, month, day)` read off the text by a rule, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Gregorian year, after any two-digit or Minguo promotion.
    pub year: i32,
    /// Month as read; may be out of range.
    pub month: u32,
    /// Day as read; may be out of range.
    pub day: u32,
}

impl Candidate {
    fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Runs the calendar check, returning the validated date if it passes.
    pub fn validate(self) -> Option<DateTriple> {
        DateTriple::new(self.year, self.month, self.day).ok()
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// What a single [`FormatRule`] made of some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule's shape was not found in the text.
    NoMatch,
    /// The shape was found and the date it describes exists.
    Valid(DateTriple),
    /// The shape was found but the date it describes does not exist.
    Invalid(Candidate),
}

/// One date shape the [`FormatCascade`](crate::FormatCascade) knows how to read.
#[derive(Debug)]
pub struct FormatRule {
    /// Position in the cascade, starting at 1.
    pub(crate) priority: u8,

    /// Short name of the shape, e.g. `YYY-MM-DD (Minguo)`. Used in logs.
    pub(crate) name: &'static str,

    /// Whether the pattern must span the whole (trimmed) text rather than any part of it.
    pub(crate) anchored: bool,

    /// If the shape matches but the date is invalid, end the cascade with no date instead of
    /// letting lower-priority rules try.
    pub(crate) stop_on_invalid: bool,

    pub(crate) regex: LazyLock<Regex>,

    /// Turns the regex captures into a candidate. Returns `None` when the captures turn out not to
    /// be this shape after all (an unknown month name, a Minguo year out of range), which counts
    /// as no match.
    pub(crate) extract_fn: fn(&Captures, &ReferenceDate) -> Option<Candidate>,
}

impl FormatRule {
    /// Position in the cascade, starting at 1.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Short name of the shape this rule reads.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the rule only matches when its shape is the entire input.
    pub fn anchored(&self) -> bool {
        self.anchored
    }

    /// Whether an invalid date from this rule ends the cascade.
    pub fn stop_on_invalid(&self) -> bool {
        self.stop_on_invalid
    }

    /// Reads a candidate out of `text`, without validating it.
    pub fn candidate(&self, text: &str, today: &ReferenceDate) -> Option<Candidate> {
        let caps = self.regex.captures(text)?;
        (self.extract_fn)(&caps, today)
    }

    /// Reads and validates a date out of `text`.
    pub fn evaluate(&self, text: &str, today: &ReferenceDate) -> RuleOutcome {
        match self.candidate(text, today) {
            None => RuleOutcome::NoMatch,
            Some(candidate) => match candidate.validate() {
                Some(date) => RuleOutcome::Valid(date),
                None => RuleOutcome::Invalid(candidate),
            },
        }
    }
}

impl Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.priority, self.name)
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("format rule patterns are valid regexes")
}

fn field<T: FromStr>(caps: &Captures, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

fn year_of(value: u32) -> Option<i32> {
    i32::try_from(value).ok()
}

fn promote_short_year(year: i32) -> i32 {
    if year < 100 {
        year + CENTURY
    } else {
        year
    }
}

fn english_three_field(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let first: u32 = field(caps, 1)?;
    let month = month_from_abbreviation(caps.get(2)?.as_str())?;
    let third: u32 = field(caps, 3)?;
    if first > 31 {
        Some(Candidate::new(year_of(first)?, month, third))
    } else {
        let year = promote_short_year(year_of(third)?);
        Some(Candidate::new(year, month, first))
    }
}

fn english_month_year(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let month = month_from_abbreviation(caps.get(1)?.as_str())?;
    let year = promote_short_year(field(caps, 2)?);
    Some(Candidate::new(year, month, 1))
}

fn english_month_day_year(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let month = month_from_abbreviation(caps.get(1)?.as_str())?;
    let day = field(caps, 2)?;
    let year = promote_short_year(field(caps, 3)?);
    Some(Candidate::new(year, month, day))
}

fn year_month(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    Some(Candidate::new(field(caps, 1)?, field(caps, 2)?, 1))
}

fn month_year(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    Some(Candidate::new(field(caps, 2)?, field(caps, 1)?, 1))
}

fn month_day(caps: &Captures, today: &ReferenceDate) -> Option<Candidate> {
    use chrono::Datelike;

    Some(Candidate::new(today.year(), field(caps, 1)?, field(caps, 2)?))
}

fn minguo_separated(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let minguo_year: i32 = field(caps, 1)?;
    if !(1..=MAX_MINGUO_YEAR).contains(&minguo_year) {
        return None;
    }
    Some(Candidate::new(
        minguo_year + MINGUO_BASE_YEAR,
        field(caps, 2)?,
        field(caps, 3)?,
    ))
}

fn generic_separated(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let first = caps.name("first")?.as_str();
    let last = caps.name("last")?.as_str();
    let short_year = first.len() == 2 && last.len() == 2;
    let whole_input = caps.name("start").is_some() && caps.name("end").is_some();
    let first: u32 = first.parse().ok()?;
    let middle: u32 = caps.name("middle")?.as_str().parse().ok()?;
    let last: u32 = last.parse().ok()?;

    // a bare `YY MM DD` belongs to the two-digit-year rule further down
    if short_year && whole_input && first <= 31 && last <= 31 {
        return None;
    }

    let (year, day) = if first <= 31 && last > 31 {
        (last, first)
    } else {
        (first, last)
    };
    let year = year_of(year)?;
    let year = if short_year {
        promote_short_year(year)
    } else {
        year
    };
    Some(Candidate::new(year, middle, day))
}

fn digit_run(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let digits = caps.get(1)?.as_str();
    let slice = |start: usize, end: usize| digits.get(start..end)?.parse::<u32>().ok();

    if digits.len() == 8 {
        let first_four = slice(0, 4)?;
        if first_four > MAX_DAY_MONTH {
            Some(Candidate::new(year_of(first_four)?, slice(4, 6)?, slice(6, 8)?))
        } else {
            Some(Candidate::new(year_of(slice(4, 8)?)?, slice(2, 4)?, slice(0, 2)?))
        }
    } else {
        let year = year_of(slice(0, 3)?)? + MINGUO_BASE_YEAR;
        Some(Candidate::new(year, slice(3, 5)?, slice(5, 7)?))
    }
}

fn short_year_separated(caps: &Captures, _: &ReferenceDate) -> Option<Candidate> {
    let year = promote_short_year(field(caps, 1)?);
    Some(Candidate::new(year, field(caps, 2)?, field(caps, 3)?))
}

pub(crate) static ENGLISH_THREE_FIELD: FormatRule = FormatRule {
    priority: 1,
    name: "DD-MMM-YY / YYYY-MMM-DD",
    anchored: false,
    stop_on_invalid: false,
    regex: LazyLock::new(|| {
        compile(&format!(
            r"(?i)([0-9]{{1,4}}){SEP}({MONTH_PATTERN}){SEP}([0-9]{{2,4}})"
        ))
    }),
    extract_fn: english_three_field,
};

pub(crate) static ENGLISH_MONTH_YEAR: FormatRule = FormatRule {
    priority: 2,
    name: "MMM-YY",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| compile(&format!(r"(?i)^({MONTH_PATTERN}){SEP}([0-9]{{2,4}})$"))),
    extract_fn: english_month_year,
};

pub(crate) static ENGLISH_MONTH_DAY_YEAR: FormatRule = FormatRule {
    priority: 3,
    name: "MMM-DD-YY",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| {
        compile(&format!(
            r"(?i)^({MONTH_PATTERN}){SEP}([0-9]{{1,2}}){SEP}([0-9]{{2,4}})$"
        ))
    }),
    extract_fn: english_month_day_year,
};

pub(crate) static YEAR_MONTH: FormatRule = FormatRule {
    priority: 4,
    name: "YYYY-MM",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| compile(&format!(r"^([0-9]{{4}}){SEP}([0-9]{{1,2}})$"))),
    extract_fn: year_month,
};

pub(crate) static MONTH_YEAR: FormatRule = FormatRule {
    priority: 5,
    name: "MM-YYYY",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| compile(&format!(r"^([0-9]{{1,2}}){SEP}([0-9]{{4}})$"))),
    extract_fn: month_year,
};

pub(crate) static MONTH_DAY: FormatRule = FormatRule {
    priority: 6,
    name: "MM-DD",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| compile(&format!(r"^([0-9]{{1,2}}){SEP}([0-9]{{1,2}})$"))),
    extract_fn: month_day,
};

pub(crate) static MINGUO_SEPARATED: FormatRule = FormatRule {
    priority: 7,
    name: "YYY-MM-DD (Minguo)",
    anchored: true,
    stop_on_invalid: true,
    regex: LazyLock::new(|| {
        compile(&format!(
            r"^([0-9]{{3}}){SEP}([0-9]{{1,2}}){SEP}([0-9]{{1,2}})$"
        ))
    }),
    extract_fn: minguo_separated,
};

pub(crate) static GENERIC_SEPARATED: FormatRule = FormatRule {
    priority: 8,
    name: "YYYY-MM-DD / DD-MM-YYYY",
    anchored: false,
    stop_on_invalid: true,
    regex: LazyLock::new(|| {
        let fields = format!(
            r"(?P<first>[0-9]{{2,4}}){SEP}(?P<middle>[0-9]{{2}}){SEP}(?P<last>[0-9]{{2,4}})"
        );
        compile(&format!(r"(?P<start>^)?{fields}(?P<end>$)?"))
    }),
    extract_fn: generic_separated,
};

pub(crate) static DIGIT_RUN: FormatRule = FormatRule {
    priority: 9,
    name: "YYYYMMDD / DDMMYYYY / YYYMMDD",
    anchored: false,
    stop_on_invalid: true,
    regex: LazyLock::new(|| compile(r"([0-9]{7,8})")),
    extract_fn: digit_run,
};

pub(crate) static SHORT_YEAR_SEPARATED: FormatRule = FormatRule {
    priority: 10,
    name: "YY-MM-DD",
    anchored: true,
    stop_on_invalid: false,
    regex: LazyLock::new(|| {
        compile(&format!(
            r"^([0-9]{{2}}){SEP}([0-9]{{2}}){SEP}([0-9]{{2}})$"
        ))
    }),
    extract_fn: short_year_separated,
};

/// Every rule, highest priority first.
pub(crate) static RULES: [&FormatRule; 10] = [
    &ENGLISH_THREE_FIELD,
    &ENGLISH_MONTH_YEAR,
    &ENGLISH_MONTH_DAY_YEAR,
    &YEAR_MONTH,
    &MONTH_YEAR,
    &MONTH_DAY,
    &MINGUO_SEPARATED,
    &GENERIC_SEPARATED,
    &DIGIT_RUN,
    &SHORT_YEAR_SEPARATED,
];
