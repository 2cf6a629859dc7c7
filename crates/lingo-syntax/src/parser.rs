//! Recursive-descent FTL parser with per-entry error recovery.

use crate::ast::{
    is_term_id, Attribute, Entry, Expression, Message, NamedArgument, Pattern, PatternElement,
    Variant, VariantKey,
};
use crate::errors::{ErrorKind, ParserError};
use crate::resource::Resource;
use tracing::debug;

/// Maximum number of placeables in a single pattern.
pub const MAX_PLACEABLES: usize = 100;

type ParseResult<T> = Result<T, ParserError>;

/// Parse FTL source into a [`Resource`].
///
/// Never fails: malformed entries are skipped and reported in
/// [`Resource::errors`].
#[must_use]
pub fn parse(source: &str) -> Resource {
    Parser::new(source).parse_resource()
}

struct Parser<'s> {
    source: &'s str,
    bytes: &'s [u8],
    index: usize,
}

impl<'s> Parser<'s> {
    const fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            index: 0,
        }
    }

    fn parse_resource(mut self) -> Resource {
        let mut resource = Resource::default();

        self.skip_ws();
        while self.index < self.bytes.len() {
            let entry_start = self.index;
            match self.get_entry() {
                Ok(Some((id, entry))) => resource.push(id, entry),
                Ok(None) => {}
                Err(err) => {
                    debug!(line = err.line, offset = err.offset, "skipping junk: {}", err.kind);
                    resource.push_error(err);
                    self.skip_to_next_entry_start(entry_start);
                }
            }
            self.skip_ws();
        }

        debug!(
            entries = resource.len(),
            errors = resource.errors().len(),
            "parsed resource"
        );
        resource
    }

    fn get_entry(&mut self) -> ParseResult<Option<(String, Entry)>> {
        if self.index != 0 && self.bytes[self.index - 1] != b'\n' {
            return Err(self.error(ErrorKind::ExpectedEntryStart));
        }

        if self.current() == Some(b'#')
            && matches!(self.peek(1), None | Some(b' ' | b'#' | b'\n' | b'\r'))
        {
            self.skip_comment();
            return Ok(None);
        }

        self.get_message().map(Some)
    }

    fn get_message(&mut self) -> ParseResult<(String, Entry)> {
        let id = self.get_entry_identifier()?;

        self.skip_inline_ws();
        self.expect_byte(b'=')?;
        self.skip_inline_ws();

        let value = self.get_pattern()?;

        if is_term_id(&id) && value.is_none() {
            return Err(self.error(ErrorKind::MissingTermValue(id)));
        }

        let mut attributes = Vec::new();
        if self.current() == Some(b' ') {
            let line_start = self.index;
            self.skip_inline_ws();
            if self.current() == Some(b'.') {
                self.index = line_start;
                attributes = self.get_attributes()?;
            }
        }

        let entry = match (value, attributes.is_empty()) {
            (None, true) => return Err(self.error(ErrorKind::MissingMessageValue(id))),
            (Some(Pattern::Text(text)), true) => Entry::Text(text),
            (value, _) => Entry::Message(Message { value, attributes }),
        };

        Ok((id, entry))
    }

    fn get_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes: Vec<Attribute> = Vec::new();

        while self.current() == Some(b' ') {
            let line_start = self.index;
            self.skip_inline_ws();
            if self.current() != Some(b'.') {
                self.index = line_start;
                break;
            }
            self.index += 1;

            let id = self.get_identifier()?;
            self.skip_inline_ws();
            self.expect_byte(b'=')?;
            self.skip_inline_ws();

            let Some(value) = self.get_pattern()? else {
                return Err(self.error(ErrorKind::MissingAttributeValue(id)));
            };

            match attributes.iter_mut().find(|attr| attr.id == id) {
                Some(existing) => existing.value = value,
                None => attributes.push(Attribute { id, value }),
            }
        }

        Ok(attributes)
    }

    /// Try the single-line fast path first and fall back to the structured
    /// parser when the value has placeables, escapes or continuation lines.
    fn get_pattern(&mut self) -> ParseResult<Option<Pattern>> {
        let start = self.index;
        let eol = self.find_byte(b'\n', start).unwrap_or(self.bytes.len());
        let first_line = trim_trailing_ws(&self.source[start..eol]);

        if first_line.contains('{') || first_line.contains('\\') {
            return self.get_complex_pattern();
        }

        self.index = (eol + 1).min(self.bytes.len());
        self.skip_blank_lines();

        if self.current() != Some(b' ') {
            return Ok(text_pattern(first_line));
        }

        let line_start = self.index;
        self.skip_inline_ws();
        if self.current() == Some(b'.') {
            self.index = line_start;
            return Ok(text_pattern(first_line));
        }

        if !first_line.is_empty() {
            self.index = start;
        }

        self.get_complex_pattern()
    }

    fn get_complex_pattern(&mut self) -> ParseResult<Option<Pattern>> {
        let mut buffer = String::new();
        let mut content: Vec<PatternElement> = Vec::new();
        let mut placeables = 0;

        while let Some(ch) = self.current_char() {
            match ch {
                '\n' | '\r' if self.at_newline() => {
                    self.skip_newline();
                    let blank_start = self.index;
                    self.skip_blank_lines();
                    let blank_end = self.index;

                    if self.current() != Some(b' ') {
                        break;
                    }
                    self.skip_inline_ws();

                    if matches!(self.current(), Some(b'}' | b'[' | b'*' | b'.')) {
                        self.index = blank_end;
                        break;
                    }

                    if !buffer.is_empty() || !content.is_empty() {
                        let blank_lines = self.bytes[blank_start..blank_end]
                            .iter()
                            .filter(|&&b| b == b'\n')
                            .count();
                        buffer.extend(std::iter::repeat('\n').take(blank_lines + 1));
                    }
                }
                '\\' => buffer.push(self.get_escape(&['{', '\\', '"'])?),
                '{' => {
                    if placeables >= MAX_PLACEABLES {
                        return Err(self.error(ErrorKind::TooManyPlaceables(MAX_PLACEABLES)));
                    }
                    if !buffer.is_empty() {
                        content.push(PatternElement::Text(std::mem::take(&mut buffer)));
                    }
                    content.push(PatternElement::Placeable(self.get_placeable()?));
                    placeables += 1;
                }
                _ => {
                    buffer.push(ch);
                    self.index += ch.len_utf8();
                }
            }
        }

        let tail = trim_trailing_ws(&buffer);
        if content.is_empty() {
            return Ok(text_pattern(tail));
        }

        if !tail.is_empty() {
            content.push(PatternElement::Text(tail.to_string()));
        }

        Ok(Some(Pattern::Elements(content)))
    }

    fn get_placeable(&mut self) -> ParseResult<Expression> {
        self.index += 1;
        let start = self.index;
        self.skip_ws();

        if self.current() == Some(b'*')
            || (self.current() == Some(b'[') && self.peek(1) != Some(b']'))
        {
            let (variants, default) = self.get_variants()?;
            self.expect_byte(b'}')?;
            return Ok(Expression::Select {
                selector: None,
                variants,
                default,
            });
        }

        self.index = start;
        self.skip_inline_ws();

        let selector = self.get_selector_expression()?;

        self.skip_ws();

        match self.current() {
            Some(b'}') => {
                if let Expression::AttributeReference { id, .. } = &selector {
                    if is_term_id(id) {
                        return Err(self.error(ErrorKind::TermAttributeAsPlaceable));
                    }
                }
                self.index += 1;
                return Ok(selector);
            }
            Some(b'-') if self.peek(1) == Some(b'>') => {}
            _ => return Err(self.error(ErrorKind::ExpectedPlaceableEnd)),
        }

        match &selector {
            Expression::Reference { .. } => {
                return Err(self.error(ErrorKind::ReferenceAsSelector));
            }
            Expression::VariantReference { .. } => {
                return Err(self.error(ErrorKind::VariantAsSelector));
            }
            Expression::AttributeReference { id, .. } if !is_term_id(id) => {
                return Err(self.error(ErrorKind::MessageAttributeAsSelector));
            }
            _ => {}
        }

        self.index += 2;
        self.skip_inline_ws();

        if !self.at_newline() {
            return Err(self.error(ErrorKind::VariantsNotOnNewLine));
        }
        self.skip_ws();

        let (variants, default) = self.get_variants()?;
        self.expect_byte(b'}')?;

        Ok(Expression::Select {
            selector: Some(Box::new(selector)),
            variants,
            default,
        })
    }

    fn get_selector_expression(&mut self) -> ParseResult<Expression> {
        if self.current() == Some(b'{') {
            return self.get_placeable();
        }

        let literal = self.get_literal()?;
        let id = match literal {
            Expression::Reference { id } => id,
            other => return Ok(other),
        };

        match self.current() {
            Some(b'.') => {
                self.index += 1;
                let name = self.get_identifier()?;
                Ok(Expression::AttributeReference { id, name })
            }
            Some(b'[') => {
                self.index += 1;
                let key = self.get_variant_key()?;
                Ok(Expression::VariantReference { id, key })
            }
            Some(b'(') => {
                self.index += 1;
                let (positional, named) = self.get_call_args()?;
                if !is_function_name(&id) {
                    return Err(self.error(ErrorKind::InvalidFunctionName(id)));
                }
                self.expect_byte(b')')?;
                Ok(Expression::Call {
                    callee: id,
                    positional,
                    named,
                })
            }
            _ => Ok(Expression::Reference { id }),
        }
    }

    fn get_call_args(&mut self) -> ParseResult<(Vec<Expression>, Vec<NamedArgument>)> {
        let mut positional = Vec::new();
        let mut named = Vec::new();

        while self.index < self.bytes.len() {
            self.skip_ws();

            if self.current() == Some(b')') {
                return Ok((positional, named));
            }

            let expression = self.get_selector_expression()?;
            let option_name = match &expression {
                Expression::Reference { id } if !is_term_id(id) => Some(id.clone()),
                _ => None,
            };

            self.skip_ws();

            match option_name {
                Some(name) if self.current() == Some(b':') => {
                    self.index += 1;
                    self.skip_ws();
                    let value = self.get_selector_expression()?;
                    match value {
                        Expression::StringLiteral { .. } | Expression::NumberLiteral { .. } => {
                            named.push(NamedArgument { name, value });
                        }
                        _ => return Err(self.error(ErrorKind::ExpectedOptionValue)),
                    }
                    self.skip_ws();
                }
                _ => positional.push(expression),
            }

            match self.current() {
                Some(b')') => return Ok((positional, named)),
                Some(b',') => self.index += 1,
                _ => return Err(self.error(ErrorKind::ExpectedArgumentSeparator)),
            }
        }

        Err(self.error(ErrorKind::ExpectedToken(')')))
    }

    fn get_variants(&mut self) -> ParseResult<(Vec<Variant>, usize)> {
        let mut variants = Vec::new();
        let mut default = None;

        while let Some(ch) = self.current() {
            if (ch != b'[' || self.peek(1) == Some(b'[')) && ch != b'*' {
                break;
            }

            if ch == b'*' {
                if default.is_some() {
                    return Err(self.error(ErrorKind::MultipleDefaultVariants));
                }
                self.index += 1;
                default = Some(variants.len());
            }

            self.expect_byte(b'[')?;
            let key = self.get_variant_key()?;

            self.skip_inline_ws();
            let Some(value) = self.get_pattern()? else {
                return Err(self.error(ErrorKind::MissingVariantValue));
            };

            variants.push(Variant { key, value });
            self.skip_ws();
        }

        if variants.is_empty() {
            return Err(self.error(ErrorKind::MissingVariants));
        }

        let default = default.ok_or_else(|| self.error(ErrorKind::MissingDefaultVariant))?;
        Ok((variants, default))
    }

    fn get_variant_key(&mut self) -> ParseResult<VariantKey> {
        self.skip_inline_ws();

        let key = match self.current() {
            Some(b'0'..=b'9' | b'-') => VariantKey::Number(self.get_number()?),
            _ => VariantKey::Keyword(self.get_variant_name()?),
        };

        self.skip_inline_ws();
        self.expect_byte(b']')?;
        Ok(key)
    }

    /// `[a-zA-Z_][a-zA-Z0-9_ -]*` with trailing spaces dropped.
    fn get_variant_name(&mut self) -> ParseResult<String> {
        let start = self.index;

        match self.current() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.index += 1,
            _ => return Err(self.error(ErrorKind::ExpectedVariantKey)),
        }

        let mut end = self.index;
        while let Some(b) = self.current() {
            match b {
                b' ' => self.index += 1,
                b if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' => {
                    self.index += 1;
                    end = self.index;
                }
                _ => break,
            }
        }

        self.index = end;
        Ok(self.source[start..end].to_string())
    }

    fn get_literal(&mut self) -> ParseResult<Expression> {
        match self.current() {
            Some(b'$') => {
                self.index += 1;
                Ok(Expression::Variable {
                    name: self.get_identifier()?,
                })
            }
            Some(b'-') if self.peek(1).is_some_and(|b| b.is_ascii_alphabetic()) => {
                Ok(Expression::Reference {
                    id: self.get_entry_identifier()?,
                })
            }
            Some(b'-' | b'0'..=b'9') => Ok(Expression::NumberLiteral {
                value: self.get_number()?,
            }),
            Some(b'"') => Ok(Expression::StringLiteral {
                value: self.get_string()?,
            }),
            Some(b) if b.is_ascii_alphabetic() => Ok(Expression::Reference {
                id: self.get_entry_identifier()?,
            }),
            _ => Err(self.error(ErrorKind::ExpectedLiteral)),
        }
    }

    fn get_string(&mut self) -> ParseResult<String> {
        self.index += 1;
        let mut value = String::new();

        loop {
            match self.current_char() {
                None | Some('\n') => return Err(self.error(ErrorKind::UnterminatedString)),
                Some('"') => {
                    self.index += 1;
                    return Ok(value);
                }
                Some('\\') => value.push(self.get_escape(&['{', '\\', '"'])?),
                Some(ch) => {
                    value.push(ch);
                    self.index += ch.len_utf8();
                }
            }
        }
    }

    /// Consume `\x` at the cursor and return the character it stands for.
    fn get_escape(&mut self, specials: &[char]) -> ParseResult<char> {
        self.index += 1;

        match self.current_char() {
            Some('u') => {
                self.index += 1;
                let digits = self
                    .source
                    .get(self.index..self.index + 4)
                    .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()));
                let Some(digits) = digits else {
                    let seen: String = self.source[self.index..].chars().take(4).collect();
                    return Err(self.error(ErrorKind::InvalidUnicodeEscape(seen)));
                };
                let ch = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        self.error(ErrorKind::InvalidUnicodeEscape(digits.to_string()))
                    })?;
                self.index += 4;
                Ok(ch)
            }
            Some(ch) if specials.contains(&ch) => {
                self.index += 1;
                Ok(ch)
            }
            Some(ch) => Err(self.error(ErrorKind::UnknownEscape(ch))),
            None => Err(self.error(ErrorKind::UnknownEscape(' '))),
        }
    }

    /// `-?[0-9]+(\.[0-9]+)?`
    fn get_number(&mut self) -> ParseResult<String> {
        let start = self.index;

        if self.current() == Some(b'-') {
            self.index += 1;
        }
        self.skip_digits()?;

        if self.current() == Some(b'.') {
            self.index += 1;
            self.skip_digits()?;
        }

        Ok(self.source[start..self.index].to_string())
    }

    fn skip_digits(&mut self) -> ParseResult<()> {
        let start = self.index;
        while self.current().is_some_and(|b| b.is_ascii_digit()) {
            self.index += 1;
        }
        if self.index == start {
            return Err(self.error(ErrorKind::ExpectedNumber));
        }
        Ok(())
    }

    /// `[a-zA-Z][a-zA-Z0-9_-]*`
    fn get_identifier(&mut self) -> ParseResult<String> {
        let start = self.index;
        self.consume_identifier()?;
        Ok(self.source[start..self.index].to_string())
    }

    /// `-?[a-zA-Z][a-zA-Z0-9_-]*`
    fn get_entry_identifier(&mut self) -> ParseResult<String> {
        let start = self.index;
        if self.current() == Some(b'-') {
            self.index += 1;
        }
        self.consume_identifier()?;
        Ok(self.source[start..self.index].to_string())
    }

    fn consume_identifier(&mut self) -> ParseResult<()> {
        if !self.current().is_some_and(|b| b.is_ascii_alphabetic()) {
            return Err(self.error(ErrorKind::ExpectedIdentifier));
        }
        self.index += 1;
        while self
            .current()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            self.index += 1;
        }
        Ok(())
    }

    fn skip_comment(&mut self) {
        let mut eol = self.find_byte(b'\n', self.index);
        while let Some(pos) = eol {
            let continues = self.bytes.get(pos + 1) == Some(&b'#')
                && matches!(self.bytes.get(pos + 2), Some(b' ' | b'#'));
            if !continues {
                break;
            }
            eol = self.find_byte(b'\n', pos + 2);
        }
        self.index = eol.map_or(self.bytes.len(), |pos| pos + 1);
    }

    /// Move to the next line that can start an entry. Always ends past
    /// `entry_start` so a broken entry is never parsed twice.
    fn skip_to_next_entry_start(&mut self, entry_start: usize) {
        let mut start = self.index.max(entry_start + 1).min(self.bytes.len());

        loop {
            if start >= self.bytes.len() {
                self.index = self.bytes.len();
                return;
            }
            if self.bytes[start - 1] == b'\n' {
                let b = self.bytes[start];
                if b.is_ascii_alphabetic() || b == b'-' {
                    self.index = start;
                    return;
                }
            }
            match self.find_byte(b'\n', start) {
                Some(pos) => start = pos + 1,
                None => {
                    self.index = self.bytes.len();
                    return;
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\n' | b'\t' | b'\r')) {
            self.index += 1;
        }
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\t')) {
            self.index += 1;
        }
    }

    fn skip_blank_lines(&mut self) {
        loop {
            let line_start = self.index;
            self.skip_inline_ws();
            if self.at_newline() {
                self.skip_newline();
            } else {
                self.index = line_start;
                return;
            }
        }
    }

    fn at_newline(&self) -> bool {
        match self.current() {
            Some(b'\n') => true,
            Some(b'\r') => self.peek(1) == Some(b'\n'),
            _ => false,
        }
    }

    fn skip_newline(&mut self) {
        if self.current() == Some(b'\r') {
            self.index += 1;
        }
        self.index += 1;
    }

    fn expect_byte(&mut self, expected: u8) -> ParseResult<()> {
        if self.current() == Some(expected) {
            self.index += 1;
            Ok(())
        } else {
            Err(self.error(ErrorKind::ExpectedToken(char::from(expected))))
        }
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.index + offset).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.index..)?.chars().next()
    }

    fn find_byte(&self, needle: u8, from: usize) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|pos| pos + from)
    }

    fn error(&self, kind: ErrorKind) -> ParserError {
        let offset = self.index.min(self.bytes.len());
        let line = self.bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
        ParserError { kind, offset, line }
    }
}

fn trim_trailing_ws(text: &str) -> &str {
    text.trim_end_matches([' ', '\t', '\n', '\r'])
}

fn text_pattern(text: &str) -> Option<Pattern> {
    if text.is_empty() {
        None
    } else {
        Some(Pattern::Text(text.to_string()))
    }
}

/// `[A-Z][A-Z_-]*`
fn is_function_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_uppercase())
        && bytes.all(|b| b.is_ascii_uppercase() || b == b'_' || b == b'-')
}
