//! Cell text formatting.
//!
//! Format strings carry one brace placeholder with a Python-style spec:
//! `prefix{:[fill][align][sign][width][,][.precision][type]}suffix`.
//! `{{` and `}}` are literal braces.

use crate::error::RenderError;
use compact_str::{CompactString, ToCompactString};
use framestyle_core::{TableModel, Value};
use std::collections::BTreeMap;

/// Presentation type of a format spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// No type letter.
    Plain,
    Fixed,
    Exponent,
    Percent,
    Integer,
    General,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

/// A parsed cell format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFormat {
    prefix: String,
    suffix: String,
    fill: char,
    align: Option<Align>,
    sign: Sign,
    width: usize,
    grouping: bool,
    precision: Option<usize>,
    kind: Kind,
}

/// Largest accepted width or precision.
const MAX_FIELD: usize = u16::MAX as usize;

fn invalid(format: &str, reason: impl Into<String>) -> RenderError {
    RenderError::InvalidFormat {
        format: format.to_string(),
        reason: reason.into(),
    }
}

/// Split a template into prefix, spec and suffix, unescaping braces.
fn split_template(format: &str) -> Result<(String, String, String), RenderError> {
    let mut prefix = String::new();
    let mut suffix = String::new();
    let mut spec: Option<String> = None;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        let out = if spec.is_some() { &mut suffix } else { &mut prefix };
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                if spec.is_some() {
                    return Err(invalid(format, "more than one placeholder"));
                }
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => inner.push(ch),
                        None => return Err(invalid(format, "unclosed placeholder")),
                    }
                }
                spec = Some(inner);
            }
            '}' => return Err(invalid(format, "single '}' outside placeholder")),
            other => out.push(other),
        }
    }

    let spec = spec.ok_or_else(|| invalid(format, "missing {} placeholder"))?;
    Ok((prefix, spec, suffix))
}

impl CellFormat {
    /// Parse a format string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidFormat`] when the template or spec is
    /// malformed.
    pub fn parse(format: &str) -> Result<Self, RenderError> {
        let (prefix, inner, suffix) = split_template(format)?;

        // Positional field name before ':' must be empty or 0.
        let spec = match inner.split_once(':') {
            Some((field, spec)) if field.is_empty() || field == "0" => spec,
            Some(_) => return Err(invalid(format, "only positional field 0 is supported")),
            None if inner.is_empty() || inner == "0" => "",
            None => return Err(invalid(format, "only positional field 0 is supported")),
        };

        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        };

        let mut fill = ' ';
        let mut align = None;
        if chars.len() >= 2 && align_of(chars[1]).is_some() {
            fill = chars[0];
            align = align_of(chars[1]);
            i = 2;
        } else if let Some(a) = chars.first().copied().and_then(align_of) {
            align = Some(a);
            i = 1;
        }

        let mut sign = Sign::Minus;
        match chars.get(i) {
            Some('+') => {
                sign = Sign::Plus;
                i += 1;
            }
            Some('-') => i += 1,
            Some(' ') => {
                sign = Sign::Space;
                i += 1;
            }
            _ => {}
        }

        if chars.get(i) == Some(&'0') && align.is_none() {
            fill = '0';
            align = Some(Align::AfterSign);
            i += 1;
        }

        let start = i;
        while chars.get(i).is_some_and(char::is_ascii_digit) {
            i += 1;
        }
        let width = digits(&chars[start..i]);
        if width > MAX_FIELD {
            return Err(invalid(format, format!("width exceeds {MAX_FIELD}")));
        }

        let grouping = chars.get(i) == Some(&',');
        if grouping {
            i += 1;
        }

        let mut precision = None;
        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while chars.get(i).is_some_and(char::is_ascii_digit) {
                i += 1;
            }
            if start == i {
                return Err(invalid(format, "missing precision after '.'"));
            }
            let places = digits(&chars[start..i]);
            if places > MAX_FIELD {
                return Err(invalid(format, format!("precision exceeds {MAX_FIELD}")));
            }
            precision = Some(places);
        }

        let kind = match chars.get(i) {
            None => Kind::Plain,
            Some('f' | 'F') => Kind::Fixed,
            Some('e' | 'E') => Kind::Exponent,
            Some('%') => Kind::Percent,
            Some('d') => Kind::Integer,
            Some('g' | 'G') => Kind::General,
            Some('s') => Kind::Text,
            Some(c) => return Err(invalid(format, format!("unknown format type '{c}'"))),
        };
        if kind != Kind::Plain {
            i += 1;
        }
        if i != chars.len() {
            return Err(invalid(format, "unexpected trailing characters in spec"));
        }
        if kind == Kind::Integer && precision.is_some() {
            return Err(invalid(format, "precision not allowed with 'd'"));
        }

        Ok(Self {
            prefix,
            suffix,
            fill,
            align,
            sign,
            width,
            grouping,
            precision,
            kind,
        })
    }

    /// Format one non-missing value.
    ///
    /// Numeric specs applied to non-numeric values fall back to the value's
    /// plain display.
    #[must_use]
    pub fn apply(&self, value: &Value) -> CompactString {
        let numeric = match value {
            Value::Int(_) | Value::Float(_) => value.as_f64(),
            _ => None,
        };

        let body = match (self.kind, numeric) {
            (Kind::Text, _) => value.to_string(),
            (Kind::Plain, None) if self.precision.is_none() => value.to_string(),
            (Kind::Plain, None) => truncate_chars(&value.to_string(), self.precision),
            (_, None) => return value.to_compact_string(),
            (kind, Some(v)) => match self.number(kind, value, v) {
                Some(s) => s,
                None => return value.to_compact_string(),
            },
        };

        let default_align = if numeric.is_some() && self.kind != Kind::Text {
            Align::Right
        } else {
            Align::Left
        };
        let padded = self.pad(body, self.align.unwrap_or(default_align));

        let mut out = CompactString::with_capacity(self.prefix.len() + padded.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&padded);
        out.push_str(&self.suffix);
        out
    }

    /// Signed, grouped number text for `kind`; `None` when the value cannot be
    /// rendered that way.
    fn number(&self, kind: Kind, value: &Value, v: f64) -> Option<String> {
        if !v.is_finite() {
            let s = if v.is_nan() {
                "nan"
            } else if v > 0.0 {
                "inf"
            } else {
                "-inf"
            };
            return Some(self.signed(s.trim_start_matches('-'), v < 0.0));
        }

        let negative = v.is_sign_negative() && v != 0.0;
        let magnitude = v.abs();

        let digits = match kind {
            Kind::Integer => match value {
                Value::Int(i) => i.unsigned_abs().to_string(),
                Value::Float(f) if f.fract() == 0.0 => format!("{:.0}", f.abs()),
                _ => return None,
            },
            Kind::Fixed => format!("{magnitude:.*}", self.precision.unwrap_or(6)),
            Kind::Percent => format!("{:.*}%", self.precision.unwrap_or(6), magnitude * 100.0),
            Kind::Exponent => exponent(magnitude, self.precision.unwrap_or(6)),
            Kind::General => general(magnitude, self.precision.unwrap_or(6)),
            Kind::Plain => match (value, self.precision) {
                (Value::Int(i), _) => i.unsigned_abs().to_string(),
                (_, Some(p)) => general(magnitude, p),
                (_, None) => Value::Float(magnitude).to_string(),
            },
            Kind::Text => return None,
        };

        let digits = if self.grouping {
            group_thousands(&digits)
        } else {
            digits
        };
        Some(self.signed(&digits, negative))
    }

    fn signed(&self, digits: &str, negative: bool) -> String {
        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        };
        format!("{sign}{digits}")
    }

    fn pad(&self, body: String, align: Align) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let gap = self.width - len;
        let fill = |n: usize| std::iter::repeat(self.fill).take(n).collect::<String>();
        match align {
            Align::Left => body + &fill(gap),
            Align::Right => fill(gap) + &body,
            Align::Center => fill(gap / 2) + &body + &fill(gap - gap / 2),
            Align::AfterSign => {
                let split = body
                    .char_indices()
                    .find(|(_, c)| !matches!(c, '+' | '-' | ' '))
                    .map_or(body.len(), |(i, _)| i);
                let (sign, rest) = body.split_at(split);
                format!("{sign}{}{rest}", fill(gap))
            }
        }
    }
}

fn digits(chars: &[char]) -> usize {
    chars
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0usize, |acc, d| acc.saturating_mul(10).saturating_add(d as usize))
}

fn truncate_chars(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

/// `1.234560e+00` style scientific notation.
fn exponent(v: f64, precision: usize) -> String {
    let raw = format!("{v:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// Python's `g`: fixed or scientific by exponent, trailing zeros removed.
fn general(v: f64, precision: usize) -> String {
    let p = precision.max(1);
    if v == 0.0 {
        return "0".to_string();
    }
    let exp = v.log10().floor() as i32;
    let p_i = i32::try_from(p).unwrap_or(i32::MAX);
    if exp < -4 || exp >= p_i {
        let s = exponent(v, p - 1);
        match s.split_once('e') {
            Some((mantissa, rest)) => format!("{}e{rest}", trim_zeros(mantissa)),
            None => s,
        }
    } else {
        let decimals = usize::try_from(p_i - 1 - exp).unwrap_or(0);
        trim_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn group_thousands(digits: &str) -> String {
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let (int, rest) = digits.split_at(end);

    let mut grouped = String::with_capacity(int.len() + int.len() / 3 + rest.len());
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}

/// Formats every cell of a table: `na_rep` for missing values, then the
/// per-column format, the global format, or the value's display.
#[derive(Debug, Clone)]
pub struct Formatter {
    global: Option<CellFormat>,
    per_column: BTreeMap<usize, CellFormat>,
    na_rep: CompactString,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            global: None,
            per_column: BTreeMap::new(),
            na_rep: CompactString::const_new("NaN"),
        }
    }
}

impl Formatter {
    /// Formatter with no format strings.
    #[must_use]
    pub fn new(na_rep: &str) -> Self {
        Self {
            na_rep: na_rep.to_compact_string(),
            ..Self::default()
        }
    }

    /// Apply one format to every column.
    ///
    /// # Errors
    ///
    /// Fails when `format` does not parse.
    pub fn with_global(mut self, format: &str) -> Result<Self, RenderError> {
        self.global = Some(CellFormat::parse(format)?);
        Ok(self)
    }

    /// Apply formats to named columns of `model`.
    ///
    /// # Errors
    ///
    /// Fails on unknown columns or unparsable formats.
    pub fn with_columns<'a>(
        mut self,
        model: &TableModel,
        formats: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, RenderError> {
        for (column, format) in formats {
            let position = model
                .column_position(column)
                .ok_or_else(|| RenderError::UnknownColumn(column.clone()))?;
            self.per_column.insert(position, CellFormat::parse(format)?);
        }
        Ok(self)
    }

    /// Text of a data cell.
    #[must_use]
    pub fn format_cell(&self, column: usize, value: &Value) -> CompactString {
        if value.is_missing() {
            return self.na_rep.clone();
        }
        match self.per_column.get(&column).or(self.global.as_ref()) {
            Some(format) => format.apply(value),
            None => value.to_compact_string(),
        }
    }

    /// Text of an index or label component.
    #[must_use]
    pub fn format_label(&self, value: &Value) -> CompactString {
        if value.is_missing() {
            self.na_rep.clone()
        } else {
            value.to_compact_string()
        }
    }
}
