use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// One row of a scraped table, keyed by column name in source column order.
pub type TabularRecord = IndexMap<String, Scalar>;

/// Cell text that counts as "no value".
const NA_TOKENS: &[&str] = &[
    "N/A", "NA", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Spellings of an infinite value in a numeric column.
const INFINITY_TOKENS: &[&str] = &["inf", "-inf", "Inf", "-Inf", "Infinity", "-Infinity"];

/// A single cell value.
///
/// `Empty` and non-finite floats serialize as `""`, so no record ever carries
/// `NaN` or an infinity on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl Scalar {
    /// Type a cell from its text.
    ///
    /// Only digits with an optional leading `-`, one decimal point and
    /// digit-grouping commas count as a number. Text with an explicit leading
    /// `+` (a displayed delta such as `+1.50`) stays text, and so does every
    /// word, `NAN` and `Infinity` included.
    pub fn infer(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Scalar::Empty;
        }

        let bare = strip_grouping(text);
        if !is_plain_number(&bare) {
            return Scalar::Text(text.to_string());
        }
        if let Ok(int) = bare.parse::<i64>() {
            return Scalar::Integer(int);
        }
        match bare.parse::<f64>() {
            Ok(float) if float.is_finite() => Scalar::Float(float),
            _ => Scalar::Text(text.to_string()),
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }

    /// A finite float, or `Empty` for anything else.
    pub fn from_f64(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Scalar::Float(v),
            _ => Scalar::Empty,
        }
    }

    pub fn is_non_finite(&self) -> bool {
        matches!(self, Scalar::Float(v) if !v.is_finite())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Text(text) => serializer.serialize_str(text),
            Scalar::Integer(int) => serializer.serialize_i64(*int),
            Scalar::Float(float) if float.is_finite() => serializer.serialize_f64(*float),
            Scalar::Float(_) | Scalar::Empty => serializer.serialize_str(""),
        }
    }
}

/// True when a cell should count as missing.
pub fn is_missing(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || NA_TOKENS.contains(&text)
}

/// Type a whole column at once.
///
/// The column is numeric when every present cell is a number or an infinity
/// marker, and at least one is a number; infinity markers then become
/// `Empty`. Otherwise every present cell stays text, so one field never mixes
/// strings and numbers across rows. Missing cells are `Empty` either way.
pub fn type_column(cells: Vec<Option<String>>) -> Vec<Scalar> {
    let typed: Vec<Option<Scalar>> = cells
        .iter()
        .map(|cell| cell.as_deref().map(Scalar::infer))
        .collect();

    let numeric = typed.iter().flatten().any(Scalar::is_number)
        && typed.iter().zip(&cells).all(|(value, cell)| match (value, cell) {
            (Some(value), Some(text)) => value.is_number() || is_infinity(text),
            _ => true,
        });

    if numeric {
        typed
            .into_iter()
            .map(|value| match value {
                Some(value) if value.is_number() => value,
                _ => Scalar::Empty,
            })
            .collect()
    } else {
        cells
            .into_iter()
            .map(|cell| match cell {
                Some(text) if !text.trim().is_empty() => Scalar::Text(text.trim().to_string()),
                _ => Scalar::Empty,
            })
            .collect()
    }
}

/// Replace every non-finite float with `Empty`.
pub fn sanitize(records: &mut [TabularRecord]) {
    for record in records.iter_mut() {
        for value in record.values_mut() {
            if value.is_non_finite() {
                *value = Scalar::Empty;
            }
        }
    }
}

fn is_infinity(text: &str) -> bool {
    INFINITY_TOKENS.contains(&text.trim())
}

// optional '-', then digits with at most one '.'
fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut points = 0;
    let mut digits = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

// "1,234,567.89" -> "1234567.89"; anything that is not a well-formed grouping is left alone
fn strip_grouping(text: &str) -> String {
    if !text.contains(',') {
        return text.to_string();
    }

    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let integer_part = unsigned.split('.').next().unwrap_or("");
    let mut groups = integer_part.split(',');
    let well_formed = match groups.next() {
        Some(head) if (1..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_digit()) => {
            groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => false,
    };

    if well_formed {
        text.replace(',', "")
    } else {
        text.to_string()
    }
}
