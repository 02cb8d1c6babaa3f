//! Inline timestamp templates.
//!
//! A template token is written between braces:
//!
//! ```text
//! { [~] [prefix!] [[YYYY/]MM/DD] [HH:MM[:SS]] }
//! ```
//!
//! Fields left out are taken from the current time in the configured offset
//! (with seconds zeroed). Each token is rendered as a Discord timestamp tag,
//! `<t:EPOCH:STYLE>`, where the style is chosen from the token's shape.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("`{{{token}}}` is not a valid date or time")]
    InvalidDate { token: String },
}

/// Discord's timestamp rendering styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Live-updating relative time, e.g. "in 2 hours".
    Relative,
    /// Short time of day.
    Time,
    /// Long date.
    Date,
    /// Long date with short time.
    Full,
}

impl Style {
    pub fn code(self) -> char {
        match self {
            Style::Relative => 'R',
            Style::Time => 't',
            Style::Date => 'D',
            Style::Full => 'f',
        }
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Token {
    pub relative: bool,
    pub prefix: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

impl Token {
    /// Parse the text found between a pair of braces.
    pub fn parse(inner: &str) -> Option<Token> {
        let (relative, rest) = match inner.strip_prefix('~') {
            Some(rest) => (true, rest),
            None => (false, inner),
        };

        // The body never contains `!`, so only the last one can end a prefix.
        let (prefix, body) = match rest.rfind('!') {
            Some(pos) if !rest[..pos].contains('\n') => (Some(&rest[..pos]), &rest[pos + 1..]),
            Some(_) => return None,
            None => (None, rest),
        };

        let mut token = parse_body(body)?;
        token.relative = relative;
        token.prefix = prefix.map(str::to_string);
        Some(token)
    }

    pub fn is_timed(&self) -> bool {
        self.hour.is_some()
    }

    pub fn is_dated(&self) -> bool {
        self.day.is_some()
    }

    /// Pick the display style. A leading `~` wins over everything, then an
    /// explicit `t!`/`d!` prefix, then the fields that were written out.
    pub fn style(&self) -> Option<Style> {
        if self.relative {
            return Some(Style::Relative);
        }

        match self.prefix.as_deref().and_then(|p| p.chars().next()) {
            Some('t') => return Some(Style::Time),
            Some('d') => return Some(Style::Date),
            _ => (),
        }

        match (self.is_timed(), self.is_dated()) {
            (true, true) => Some(Style::Full),
            (true, false) => Some(Style::Time),
            (false, true) => Some(Style::Date),
            (false, false) => None,
        }
    }

    /// Fill the missing fields from `now` and return the resulting instant.
    pub fn resolve(&self, now: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, TemplateError> {
        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or_else(|| now.year()),
            self.month.unwrap_or_else(|| now.month()),
            self.day.unwrap_or_else(|| now.day()),
        );
        let time = NaiveTime::from_hms_opt(
            self.hour.unwrap_or_else(|| now.hour()),
            self.minute.unwrap_or_else(|| now.minute()),
            self.second.unwrap_or(0),
        );

        date.zip(time)
            .and_then(|(date, time)| now.offset().from_local_datetime(&date.and_time(time)).single())
            .ok_or_else(|| TemplateError::InvalidDate { token: self.to_string() })
    }

    /// Render the Discord timestamp tag for this token.
    pub fn render(&self, now: DateTime<FixedOffset>) -> Result<String, TemplateError> {
        let epoch = self.resolve(now)?.timestamp();

        Ok(match self.style() {
            Some(style) => format!("<t:{}:{}>", epoch, style),
            None => format!("<t:{}>", epoch),
        })
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.relative {
            write!(f, "~")?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, "{}!", prefix)?;
        }
        if let (Some(month), Some(day)) = (self.month, self.day) {
            if let Some(year) = self.year {
                write!(f, "{}/", year)?;
            }
            write!(f, "{}/{}", month, day)?;
            if self.hour.is_some() {
                write!(f, " ")?;
            }
        }
        if let (Some(hour), Some(minute)) = (self.hour, self.minute) {
            write!(f, "{}:{:02}", hour, minute)?;
            if let Some(second) = self.second {
                write!(f, ":{:02}", second)?;
            }
        }
        Ok(())
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn number(&mut self, min: usize, max: usize) -> Option<u32> {
        let len = self.rest.bytes().take(max).take_while(u8::is_ascii_digit).count();
        if len < min {
            return None;
        }
        let (digits, rest) = self.rest.split_at(len);
        self.rest = rest;
        digits.parse().ok()
    }

    fn eat(&mut self, c: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }
}

#[derive(Clone, Copy)]
enum DateForm {
    WithYear,
    MonthDay,
    Absent,
}

fn parse_body(body: &str) -> Option<Token> {
    [DateForm::WithYear, DateForm::MonthDay, DateForm::Absent]
        .iter()
        .find_map(|&form| parse_body_as(body, form))
}

fn parse_body_as(body: &str, form: DateForm) -> Option<Token> {
    let mut cur = Cursor { rest: body };
    let mut token = Token::default();

    match form {
        DateForm::WithYear => {
            token.year = Some(cur.number(4, 4)? as i32);
            cur.eat('/')?;
        }
        DateForm::MonthDay | DateForm::Absent => (),
    }

    if let DateForm::WithYear | DateForm::MonthDay = form {
        token.month = Some(cur.number(1, 2)?);
        cur.eat('/')?;
        token.day = Some(cur.number(1, 2)?);
        cur.skip_whitespace();
    }

    if !cur.rest.is_empty() {
        token.hour = Some(cur.number(1, 2)?);
        cur.eat(':')?;
        token.minute = Some(cur.number(1, 2)?);
        if cur.eat(':').is_some() {
            token.second = Some(cur.number(1, 2)?);
        }
    }

    if cur.rest.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Replace every timestamp token in `template`.
///
/// Tokens are found in a single left-to-right pass over the original text and
/// end at the first closing brace. Braces that do not form a token are kept.
pub fn substitute(template: &str, offset: FixedOffset, now: DateTime<Utc>) -> Result<String, TemplateError> {
    let now = now.with_timezone(&offset);
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(open) = template[pos..].find('{').map(|i| pos + i) {
        let close = match template[open..].find('}') {
            Some(i) => open + i,
            None => break,
        };

        match Token::parse(&template[open + 1..close]) {
            Some(token) => {
                out.push_str(&template[pos..open]);
                out.push_str(&token.render(now)?);
                pos = close + 1;
            }
            None => {
                out.push_str(&template[pos..=open]);
                pos = open + 1;
            }
        }
    }

    out.push_str(&template[pos..]);
    Ok(out)
}
