//! Lexical scanners for ISO-8601 text.
//!
//! These functions only recognise shapes and extract numbers; they know
//! nothing about calendars.  Date-time fields are read with chrono's format
//! parser.  Turning the extracted parts into timestamps (including filling
//! in abbreviated components) is done by the time crate.

use chrono::format::{parse, Parsed, StrftimeItems};

/// Unit counts scanned from a `PnYnMnWnDTnHnMnS` pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationFields {
    /// `nY`
    pub years: u32,
    /// `nM` before the `T` separator
    pub months: u32,
    /// `nW`
    pub weeks: u32,
    /// `nD`
    pub days: u32,
    /// `nH`
    pub hours: u32,
    /// `nM` after the `T` separator
    pub minutes: u32,
    /// `nS`
    pub seconds: u32,
}

/// Scan an ISO-8601 duration such as `"P1Y2M10DT2H30M"` or `"P20W"`.
///
/// Every component is optional but components must appear in designator
/// order and each designator must be preceded by at least one digit.
/// `"P"` on its own is accepted (all fields zero); whether a zero duration
/// is usable is for the caller to decide.
///
/// Returns `None` if the text does not follow the grammar.
pub fn parse_duration_string(s: &str) -> Option<DurationFields> {
    let rest = s.strip_prefix('P')?;
    let bytes = rest.as_bytes();
    let mut fields = DurationFields::default();
    let mut in_time = false;
    // Index of the next designator slot that may still appear.
    let mut rank = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'T' {
            if in_time {
                return None;
            }
            in_time = true;
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start || i == bytes.len() {
            return None;
        }
        let value: u32 = rest[start..i].parse().ok()?;
        let slot = match (in_time, bytes[i]) {
            (false, b'Y') => 0,
            (false, b'M') => 1,
            (false, b'W') => 2,
            (false, b'D') => 3,
            (true, b'H') => 4,
            (true, b'M') => 5,
            (true, b'S') => 6,
            _ => return None,
        };
        if slot < rank {
            return None;
        }
        rank = slot + 1;
        match slot {
            0 => fields.years = value,
            1 => fields.months = value,
            2 => fields.weeks = value,
            3 => fields.days = value,
            4 => fields.hours = value,
            5 => fields.minutes = value,
            _ => fields.seconds = value,
        }
        i += 1;
    }

    Some(fields)
}

/// Scan a repeat designator: `"R"` (unbounded) or `"Rn"`.
///
/// Returns `Some(None)` for a bare `R`, `Some(Some(n))` for `Rn`, and
/// `None` when the text is not a repeat designator at all.
pub fn parse_repeat_designator(s: &str) -> Option<Option<u32>> {
    let digits = s.strip_prefix('R').or_else(|| s.strip_prefix('r'))?;
    if digits.is_empty() {
        return Some(None);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(Some)
}

/// A UTC designator or fixed offset attached to a date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// `Z`
    Utc,
    /// `±hh[:mm]`, stored as seconds east of UTC.
    Offset(i32),
}

impl Zone {
    /// Offset from UTC in seconds (east positive).
    pub fn offset_seconds(&self) -> i32 {
        match self {
            Zone::Utc => 0,
            Zone::Offset(secs) => *secs,
        }
    }

    /// The designator as written in ISO-8601 extended format.
    pub fn designator(&self) -> String {
        match self {
            Zone::Utc => "Z".to_string(),
            Zone::Offset(secs) => {
                let sign = if *secs < 0 { '-' } else { '+' };
                let abs = secs.unsigned_abs();
                format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

/// The components present in a (possibly abbreviated) ISO-8601 date-time.
///
/// Absent components are `None`; the fractional second defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeParts {
    /// Calendar year.
    pub year: Option<i32>,
    /// Month of year (1–12).
    pub month: Option<u32>,
    /// Day of month (1–31).
    pub day: Option<u32>,
    /// Hour (0–23).
    pub hour: Option<u32>,
    /// Minute (0–59).
    pub minute: Option<u32>,
    /// Second (0–59).
    pub second: Option<u32>,
    /// Fraction of the second, in nanoseconds.
    pub nanosecond: u32,
    /// Zone designator, if one was written.
    pub zone: Option<Zone>,
}

impl DateTimeParts {
    /// `true` if any date component is present.
    pub fn has_date(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    /// `true` if any time-of-day component is present.
    pub fn has_time(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    /// `true` if year, month and day are all present.
    pub fn is_complete_date(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some()
    }
}

/// Scan an ISO-8601 date-time, full or abbreviated.
///
/// Accepted shapes include `2008-03-01T13:00:00Z`, `2008-03-01T13:00:00.250+02:00`,
/// `20080301T130000Z`, `2008-03-01`, `2008-03`, and the abbreviated forms
/// used for interval ends: `03-14`, `14T15:30`, `15:30`.
///
/// The shape picks a chrono format; chrono reads the fields, so absent
/// components simply stay unset in its [`Parsed`].
pub fn parse_datetime_parts(s: &str) -> Option<DateTimeParts> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (date_str, time_str) = match s.find(['T', 't']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None if s.contains(':') => ("", Some(s)),
        None => (s, None),
    };

    let mut parsed = Parsed::new();
    if !date_str.is_empty() {
        parse(&mut parsed, date_str, StrftimeItems::new(date_format(date_str)?)).ok()?;
    }
    if let Some(time) = time_str {
        parsed = parse_time(parsed, time)?;
    }

    let zone = parsed.offset().map(|secs| {
        if s.ends_with(['Z', 'z']) {
            Zone::Utc
        } else {
            Zone::Offset(secs)
        }
    });
    let parts = DateTimeParts {
        year: parsed.year(),
        month: parsed.month(),
        day: parsed.day(),
        hour: parsed
            .hour_div_12()
            .zip(parsed.hour_mod_12())
            .map(|(div, rem)| div * 12 + rem),
        minute: parsed.minute(),
        second: parsed.second(),
        nanosecond: parsed.nanosecond().unwrap_or(0),
        zone,
    };
    if !parts.has_date() && !parts.has_time() {
        return None;
    }
    Some(parts)
}

/// Extended and basic clock formats, most specific first.
const TIME_FORMATS: [&str; 5] = ["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M", "%H"];

fn date_format(s: &str) -> Option<&'static str> {
    let widths: Vec<usize> = s.split('-').map(str::len).collect();
    match widths.as_slice() {
        [4, 2, 2] => Some("%Y-%m-%d"),
        [4, 2] => Some("%Y-%m"),
        [2, 2] => Some("%m-%d"),
        [8] => Some("%Y%m%d"),
        [4] => Some("%Y"),
        [2] => Some("%d"),
        _ => None,
    }
}

fn parse_time(date: Parsed, s: &str) -> Option<Parsed> {
    TIME_FORMATS
        .iter()
        .flat_map(|clock| [clock.to_string(), format!("{clock}%#z")])
        .find_map(|fmt| {
            let mut parsed = date.clone();
            parse(&mut parsed, s, StrftimeItems::new(&fmt)).ok()?;
            Some(parsed)
        })
}
