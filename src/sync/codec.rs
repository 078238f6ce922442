// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Reading and writing the listing file.
//!
//! The listing is stored as a small JavaScript file so that it can also be
//! loaded directly by a web page:
//!
//! ```text
//! // Photo metadata
//! // Add your photos to the /photos/ folder and update this array
//! const photos = [
//!     { src: "photos/a.jpg", year: 2019, caption: "Beach" },
//!     { src: "photos/b_2021.png", year: 2021, caption: "Your caption here." }
//! ];
//! ```
//!
//! The file is hand-edited, so the reader is lenient: comments, quoted or
//! bare keys, either quote style, trailing commas and unknown keys are all
//! accepted. The writer always produces the canonical layout above, which
//! makes the output a pure function of the listing.

use std::{iter::Peekable, str::Chars};

use tracing::warn;

use crate::{
    error::ListingError,
    model::{Listing, PhotoRecord},
};

const HEADER: &str = "// Photo metadata\n// Add your photos to the /photos/ folder and update this array\n";

const ARRAY_NAME: &str = "photos";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Punct(char),
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> ListingError {
        ListingError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_trivia(&mut self) -> Result<(), ListingError> {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '/' {
                let mut ahead = self.chars.clone();
                ahead.next();
                match ahead.peek() {
                    Some('/') => {
                        while let Some(c) = self.bump() {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        self.bump();
                        self.bump();
                        let mut prev = '\0';
                        loop {
                            match self.bump() {
                                Some('/') if prev == '*' => break,
                                Some(c) => prev = c,
                                None => return Err(self.error("unterminated comment")),
                            }
                        }
                    }
                    _ => return Ok(()),
                }
            } else {
                return Ok(());
            }
        }

        Ok(())
    }

    /// Returns the next token and the line it started on.
    fn next_token(&mut self) -> Result<Option<(Token, usize)>, ListingError> {
        self.skip_trivia()?;

        let line = self.line;
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        let token = if c == '"' || c == '\'' || c == '`' {
            self.bump();
            Token::Str(self.string(c)?)
        } else if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = self.chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                self.bump();
            }
            let value = digits
                .parse()
                .map_err(|_| self.error(format!("number out of range: {digits}")))?;
            Token::Int(value)
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let mut ident = String::new();
            while let Some(&d) = self.chars.peek() {
                if !(d.is_alphanumeric() || d == '_' || d == '$') {
                    break;
                }
                ident.push(d);
                self.bump();
            }
            Token::Ident(ident)
        } else {
            self.bump();
            Token::Punct(c)
        };

        Ok(Some((token, line)))
    }

    fn string(&mut self, quote: char) -> Result<String, ListingError> {
        let mut value = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('0') => value.push('\0'),
                    Some('u') => value.push(self.unicode_escape()?),
                    // Line continuation.
                    Some('\n') => {}
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, ListingError> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.bump() {
                Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                _ => return Err(self.error("invalid \\u escape")),
            }
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid \\u{hex} escape")))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(Token, usize)>,
    line: usize,
}

enum Value {
    Str(String),
    Int(i64),
    Other,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            peeked: None,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> ListingError {
        ListingError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn next(&mut self) -> Result<Option<Token>, ListingError> {
        let next = match self.peeked.take() {
            Some(t) => Some(t),
            None => self.lexer.next_token()?,
        };

        Ok(next.map(|(token, line)| {
            self.line = line;
            token
        }))
    }

    fn peek(&mut self) -> Result<Option<&Token>, ListingError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(t, _)| t))
    }

    fn expect(&mut self, expected: char) -> Result<(), ListingError> {
        match self.next()? {
            Some(Token::Punct(c)) if c == expected => Ok(()),
            Some(other) => Err(self.error(format!("expected `{expected}`, found {other:?}"))),
            None => Err(self.error(format!("expected `{expected}`, found end of file"))),
        }
    }

    /// Skips forward to just after `photos = [`.
    fn find_array(&mut self) -> Result<(), ListingError> {
        let mut window: [Option<Token>; 3] = [None, None, None];

        while let Some(token) = self.next()? {
            window = [window[1].take(), window[2].take(), Some(token)];
            if let [Some(Token::Ident(name)), Some(Token::Punct('=')), Some(Token::Punct('['))] =
                &window
                && name == ARRAY_NAME
            {
                return Ok(());
            }
        }

        Err(ListingError::MissingArray)
    }

    fn records(&mut self) -> Result<Vec<PhotoRecord>, ListingError> {
        self.find_array()?;

        let mut records = vec![];
        loop {
            match self.peek()? {
                Some(Token::Punct(']')) => {
                    self.next()?;
                    return Ok(records);
                }
                Some(Token::Punct(',')) => {
                    self.next()?;
                }
                Some(Token::Punct('{')) => records.push(self.record()?),
                Some(_) => {
                    let token = self.next()?;
                    return Err(self.error(format!("expected a record, found {token:?}")));
                }
                None => return Err(self.error("unterminated photo array")),
            }
        }
    }

    fn record(&mut self) -> Result<PhotoRecord, ListingError> {
        self.expect('{')?;
        let start_line = self.line;

        let mut src = None;
        let mut year = None;
        let mut caption = None;

        loop {
            let key = match self.next()? {
                Some(Token::Punct('}')) => break,
                Some(Token::Punct(',')) => continue,
                Some(Token::Ident(key)) | Some(Token::Str(key)) => key,
                Some(other) => return Err(self.error(format!("expected a key, found {other:?}"))),
                None => return Err(self.error("unterminated record")),
            };
            self.expect(':')?;
            let value = self.value()?;

            match (key.as_str(), value) {
                ("src" | "path", Value::Str(s)) => src = Some(s),
                ("year", Value::Int(y)) => year = Some(y),
                ("caption", Value::Str(s)) => caption = Some(s),
                ("src" | "path" | "year" | "caption", _) => {
                    return Err(self.error(format!("unexpected value type for `{key}`")));
                }
                _ => {}
            }
        }

        let missing = |field: &str| ListingError::Parse {
            line: start_line,
            message: format!("record is missing `{field}`"),
        };
        let src = src.ok_or_else(|| missing("src"))?;
        let year = year.ok_or_else(|| missing("year"))?;
        let year = i32::try_from(year)
            .ok()
            .filter(|&y| y > 0)
            .ok_or_else(|| ListingError::Parse {
                line: start_line,
                message: format!("invalid year {year}"),
            })?;

        Ok(PhotoRecord::new(src, year, caption.unwrap_or_default()))
    }

    fn value(&mut self) -> Result<Value, ListingError> {
        match self.next()? {
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(Token::Int(i)) => Ok(Value::Int(i)),
            Some(Token::Punct('-')) => match self.next()? {
                Some(Token::Int(i)) => Ok(Value::Int(-i)),
                _ => Err(self.error("expected a number after `-`")),
            },
            Some(Token::Ident(_)) => Ok(Value::Other),
            Some(Token::Punct('[' | '{')) => {
                self.skip_nested()?;
                Ok(Value::Other)
            }
            Some(other) => Err(self.error(format!("unsupported value {other:?}"))),
            None => Err(self.error("expected a value, found end of file")),
        }
    }

    /// Skips an array or object value whose opening bracket has already been
    /// consumed.
    fn skip_nested(&mut self) -> Result<(), ListingError> {
        let mut depth = 1;
        while depth > 0 {
            match self.next()? {
                Some(Token::Punct('[' | '{')) => depth += 1,
                Some(Token::Punct(']' | '}')) => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unterminated value")),
            }
        }

        Ok(())
    }
}

/// Parses a listing file.
///
/// `src_prefix` is stripped from each `src` value to give the record path.
/// Values without the prefix are kept as written and marked unprefixed, so
/// [`emit_listing`] writes them back unchanged. If a path appears more than
/// once the first record wins.
///
/// # Errors
///
/// Returns a [`ListingError`] if the text has no photo array or the array is
/// malformed.
pub(crate) fn parse_listing(text: &str, src_prefix: &str) -> Result<Listing, ListingError> {
    let records = Parser::new(text).records()?;

    let mut listing = Listing::new();
    for mut record in records {
        match record.path.strip_prefix(src_prefix).map(str::to_string) {
            Some(path) => record.path = path,
            None => record = record.unprefixed(),
        }
        let path = record.path.clone();
        if !listing.push(record) {
            warn!("Ignoring duplicate listing entry for {}", path);
        }
    }

    Ok(listing)
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Writes a listing in the canonical file layout.
///
/// Records read without `src_prefix` are written without it.
pub(crate) fn emit_listing(listing: &Listing, src_prefix: &str) -> String {
    let mut out = String::from(HEADER);
    out.push_str("const photos = [\n");

    let records = listing.records();
    for (idx, record) in records.iter().enumerate() {
        out.push_str("    { src: ");
        if record.prefixed {
            push_quoted(&mut out, &format!("{src_prefix}{}", record.path));
        } else {
            push_quoted(&mut out, &record.path);
        }
        out.push_str(&format!(", year: {}, caption: ", record.year));
        push_quoted(&mut out, &record.caption);
        out.push_str(" }");
        if idx + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::reconcile::merge_new;

    const PREFIX: &str = "photos/";

    #[test]
    fn emits_the_canonical_layout() {
        let listing: Listing = [
            PhotoRecord::new("a.jpg", 2019, "Beach"),
            PhotoRecord::new("b_2021.png", 2021, "Your caption here."),
        ]
        .into_iter()
        .collect();

        let expected = "\
// Photo metadata
// Add your photos to the /photos/ folder and update this array
const photos = [
    { src: \"photos/a.jpg\", year: 2019, caption: \"Beach\" },
    { src: \"photos/b_2021.png\", year: 2021, caption: \"Your caption here.\" }
];
";
        assert_eq!(emit_listing(&listing, PREFIX), expected);
    }

    #[test]
    fn empty_listing_round_trips() {
        let text = emit_listing(&Listing::new(), PREFIX);

        assert!(parse_listing(&text, PREFIX).unwrap().is_empty());
    }

    #[test]
    fn awkward_captions_round_trip() {
        let listing: Listing = [
            PhotoRecord::new("q.jpg", 2004, r#"She said "cheese" \o/"#),
            PhotoRecord::new("n.jpg", 2005, "two\nlines\tand a\u{1}bell"),
            PhotoRecord::new("u.jpg", 2006, "Café — 東京"),
        ]
        .into_iter()
        .collect();

        let text = emit_listing(&listing, PREFIX);
        let parsed = parse_listing(&text, PREFIX).unwrap();

        assert_eq!(parsed, listing);
        assert_eq!(emit_listing(&parsed, PREFIX), text);
    }

    #[test]
    fn reads_hand_edited_files() {
        let text = r#"
            /* edited by hand */
            const photos = [
                // summer
                { "src": 'photos/a.jpg', "year": 2019, caption: "Beach", tags: ["x"] },
                {src:"elsewhere/b.png",year:2003},
                { path: "c.gif", caption: "Path alias", year: 2010, },
            ];
            const other = 1;
        "#;

        let listing = parse_listing(text, PREFIX).unwrap();

        assert_eq!(
            listing.records(),
            [
                PhotoRecord::new("a.jpg", 2019, "Beach"),
                PhotoRecord::new("elsewhere/b.png", 2003, "").unprefixed(),
                PhotoRecord::new("c.gif", 2010, "Path alias"),
            ]
        );
    }

    #[test]
    fn unprefixed_sources_survive_an_append() {
        let text = r#"const photos = [
            { src: "elsewhere/b.png", year: 2003, caption: "x" },
            { src: "photos/a.jpg", year: 2019, caption: "Beach" }
        ];"#;

        let listing = parse_listing(text, PREFIX).unwrap();
        let merged = merge_new(&["new.jpg"], &listing);
        let out = emit_listing(&merged.listing, PREFIX);

        assert_eq!(merged.added, ["new.jpg"]);
        assert!(out.contains("{ src: \"elsewhere/b.png\", year: 2003, caption: \"x\" },"));
        assert!(out.contains("{ src: \"photos/a.jpg\", year: 2019, caption: \"Beach\" },"));
        assert!(out.contains("{ src: \"photos/new.jpg\", year: 2020, caption: \"Your caption here.\" }"));
        assert!(!out.contains("photos/elsewhere"));
        assert_eq!(parse_listing(&out, PREFIX).unwrap(), merged.listing);
    }

    #[test]
    fn first_duplicate_wins() {
        let text = r#"const photos = [
            { src: "photos/a.jpg", year: 2019, caption: "First" },
            { src: "photos/a.jpg", year: 2001, caption: "Second" }
        ];"#;

        let listing = parse_listing(text, PREFIX).unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("a.jpg").unwrap().caption, "First");
    }

    #[test]
    fn reports_malformed_files() {
        assert_eq!(
            parse_listing("let x = 1;", PREFIX),
            Err(ListingError::MissingArray)
        );
        assert!(matches!(
            parse_listing("const photos = [\n  { src: \"a.jpg\" }\n];", PREFIX),
            Err(ListingError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_listing("const photos = [\n{ src: \"a.jpg\", year: -4 }];", PREFIX),
            Err(ListingError::Parse { .. })
        ));
        assert!(matches!(
            parse_listing("const photos = [\n{ src: \"a.jpg, year: 2001 }];", PREFIX),
            Err(ListingError::Parse { .. })
        ));
        assert!(matches!(
            parse_listing("const photos = [ { src: \"a.jpg\", year: 2001 }", PREFIX),
            Err(ListingError::Parse { .. })
        ));
    }
}
