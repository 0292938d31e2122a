use crate::domain::instruction::{Expression, Instruction};
use crate::error::{CheckoutError, Result};
use serde_json::Value;

/// Turns a response expression into the instructions to apply, in order.
pub fn instructions(expression: Expression) -> Result<Vec<Instruction>> {
    match expression {
        Expression::Script(source) => parse(&source),
        Expression::Single(instruction) => Ok(vec![instruction]),
        Expression::Sequence(list) => Ok(list),
    }
}

/// Parses a legacy script expression.
///
/// Only a fixed statement set is understood, separated by `;`:
///
/// * `window.location.href = "<url>"` (also `location.href`, `window.location`,
///   `document.location.href`)
/// * `window.location.reload()` or `location.reload()`
/// * `alert("<message>")` or `window.alert("<message>")`
/// * `window.<name> = <literal>` where the literal is a string, number,
///   `true`, `false` or `null`
///
/// String literals take the usual escapes (`\n`, `\xHH`, `\uXXXX`, `\u{...}`
/// and friends); any other escape is an error. An empty or blank script
/// yields no instructions.
pub fn parse(source: &str) -> Result<Vec<Instruction>> {
    let mut parser = Parser { source, pos: 0 };
    let mut statements = Vec::new();
    loop {
        parser.skip_separators();
        if parser.at_end() {
            break;
        }
        statements.push(parser.statement()?);
        parser.skip_whitespace();
        if !parser.at_end() && !parser.eat(';') {
            return Err(parser.error("expected `;` between statements"));
        }
    }
    Ok(statements)
}

const LOCATION_TARGETS: [&str; 4] = [
    "window.location.href",
    "window.location",
    "location.href",
    "document.location.href",
];

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{expected}`")))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace() || c == ';') {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> CheckoutError {
        CheckoutError::Expression {
            expression: self.source.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn statement(&mut self) -> Result<Instruction> {
        let target = self.path()?;
        self.skip_whitespace();
        match self.peek() {
            Some('(') => self.call(&target),
            Some('=') => {
                self.bump();
                if self.peek() == Some('=') {
                    return Err(self.error("comparisons are not statements"));
                }
                self.assignment(&target)
            }
            _ => Err(self.error(&format!("`{target}` is neither a call nor an assignment"))),
        }
    }

    fn path(&mut self) -> Result<String> {
        let mut segments = vec![self.identifier()?];
        while self.eat('.') {
            segments.push(self.identifier()?);
        }
        Ok(segments.join("."))
    }

    fn identifier(&mut self) -> Result<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn call(&mut self, target: &str) -> Result<Instruction> {
        self.expect('(')?;
        self.skip_whitespace();
        let instruction = match target {
            "alert" | "window.alert" => {
                let message = self.string_literal()?;
                Instruction::Notify { message }
            }
            "window.location.reload" | "location.reload" => Instruction::Reload,
            _ => return Err(self.error(&format!("call to `{target}` is not allowed"))),
        };
        self.skip_whitespace();
        self.expect(')')?;
        Ok(instruction)
    }

    fn assignment(&mut self, target: &str) -> Result<Instruction> {
        self.skip_whitespace();
        if LOCATION_TARGETS.contains(&target) {
            let url = self.string_literal()?;
            return Ok(Instruction::Redirect { url });
        }
        match target.split_once('.') {
            Some(("window", name)) if !name.contains('.') => {
                let value = self.literal()?;
                Ok(Instruction::Assign {
                    name: name.to_string(),
                    value,
                })
            }
            _ => Err(self.error(&format!("assignment to `{target}` is not allowed"))),
        }
    }

    fn literal(&mut self) -> Result<Value> {
        match self.peek() {
            Some('"') | Some('\'') => Ok(Value::String(self.string_literal()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number_literal(),
            Some(_) => match self.identifier()?.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                other => Err(self.error(&format!("`{other}` is not a literal"))),
            },
            None => Err(self.error("expected a value")),
        }
    }

    fn number_literal(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        serde_json::from_str(&self.source[start..self.pos])
            .map_err(|_| self.error("invalid number"))
    }

    fn string_literal(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a string")),
        };
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(text),
                Some('\\') => text.push(self.escape()?),
                Some(c) => text.push(c),
            }
        }
    }

    /// Decodes the escape sequence after a backslash.
    fn escape(&mut self) -> Result<char> {
        let c = match self.bump() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') if !self.peek().is_some_and(|c| c.is_ascii_digit()) => '\0',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some(c @ ('\\' | '\'' | '"' | '/')) => c,
            Some('x') => {
                let code = self.hex_digits(2)?;
                char::from_u32(code).ok_or_else(|| self.error("invalid escape"))?
            }
            Some('u') => self.unicode_escape()?,
            Some(other) => return Err(self.error(&format!("unsupported escape `\\{other}`"))),
            None => return Err(self.error("unterminated string")),
        };
        Ok(c)
    }

    fn unicode_escape(&mut self) -> Result<char> {
        if self.eat('{') {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let source = self.source;
            let digits = &source[start..self.pos];
            if digits.is_empty() || digits.len() > 6 || !self.eat('}') {
                return Err(self.error("invalid unicode escape"));
            }
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| self.error("invalid unicode escape"))?;
            return char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"));
        }

        let high = self.hex_digits(4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("lone surrogate in unicode escape"));
        }
        // High surrogate, the low half must follow as another `\uXXXX`
        if !(self.eat('\\') && self.eat('u')) {
            return Err(self.error("lone surrogate in unicode escape"));
        }
        let low = self.hex_digits(4)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error("lone surrogate in unicode escape"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32> {
        let start = self.pos;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => return Err(self.error("expected hex digits in escape")),
            }
        }
        u32::from_str_radix(&self.source[start..self.pos], 16)
            .map_err(|_| self.error("expected hex digits in escape"))
    }
}
