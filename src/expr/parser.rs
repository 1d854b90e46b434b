use ordered_float::NotNan;

use crate::expr::{Expr, Function, FunctionRegistry, Literal, ParseError, RowField};

/// Hand-written recursive descent parser for facet expressions.
///
/// ```text
/// expr    := literal | "value" | cells | row | call
/// cells   := "cells" ( "." name | "[" string "]" ) ( ".value" )?
/// row     := "row" "." ( "index" | "flagged" | "starred" )
/// call    := name "(" ( expr ( "," expr )* )? ")"
/// literal := string | number | "true" | "false" | "null"
/// ```
#[derive(Debug, Default)]
pub struct ExpressionParser {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
}

impl ExpressionParser {
    pub fn new(text: &str) -> Self {
        let text_v: Vec<char> = text.chars().collect();
        Self { position: 0, length: text_v.len(), text_v }
    }

    /// Parse a whole expression; anything left over is an error.
    pub fn parse(text: &str) -> Result<Expr, ParseError> {
        let mut parser = ExpressionParser::new(text);
        let expr = parser.parse_expr()?;
        parser.next_non_whitespace();
        if !parser.eof() {
            return ParseError::new("Unexpected trailing input", parser.position, &parser).err();
        }
        Ok(expr)
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        if self.position < self.length {
            return self.text_v[self.position];
        }

        '\0'
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    pub fn next_non_whitespace(&mut self) {
        while self.current().is_whitespace() {
            self.next();
        }
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        let start = start.min(end);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    fn expect(&mut self, ch: char, message: &str) -> Result<(), ParseError> {
        self.next_non_whitespace();
        if self.current() != ch {
            return ParseError::new(message, self.position, self).err();
        }
        self.next();
        Ok(())
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.next_non_whitespace();

        if self.eof() {
            return ParseError::new("Empty expression", self.position, self).err();
        }

        let current = self.current();
        if current == '"' || current == '\'' {
            return self.parse_string().map(|s| Expr::Literal(Literal::String(s)));
        }
        if current.is_ascii_digit() || current == '-' {
            return self.parse_number().map(Expr::Literal);
        }
        if Self::is_identifier_start(current) {
            return self.parse_identifier_expr();
        }

        ParseError::new("Invalid expression", self.position, self).err()
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier_part(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let pivot = self.position;
        if !Self::is_identifier_start(self.current()) {
            return ParseError::new("Invalid identifier", pivot, self).err();
        }
        while !self.eof() && Self::is_identifier_part(self.current()) {
            self.next();
        }
        Ok(self.text_from_pivot(pivot))
    }

    fn parse_identifier_expr(&mut self) -> Result<Expr, ParseError> {
        let pivot = self.position;
        let name = self.parse_identifier()?;

        // a call binds tighter than any keyword meaning of the name
        self.next_non_whitespace();
        if self.current() == '(' {
            return self.parse_call(name, pivot);
        }

        match name.as_str() {
            "value" => Ok(Expr::CellValue),
            "null" => Ok(Expr::Literal(Literal::Null)),
            "true" => Ok(Expr::Literal(Literal::Bool(true))),
            "false" => Ok(Expr::Literal(Literal::Bool(false))),
            "cells" => self.parse_cell_ref(),
            "row" => {
                self.expect('.', "Expected '.' after row")?;
                let field_pivot = self.position;
                let field = self.parse_identifier()?;
                RowField::from_name(&field)
                    .map(Expr::Row)
                    .ok_or_else(|| ParseError::new("Unknown row field", field_pivot, self))
            }
            _ => ParseError::new("Unknown identifier", pivot, self).err(),
        }
    }

    fn parse_cell_ref(&mut self) -> Result<Expr, ParseError> {
        self.next_non_whitespace();
        let column = match self.current() {
            '.' => {
                self.next();
                self.parse_identifier()?
            }
            '[' => {
                self.next();
                self.next_non_whitespace();
                let name = self.parse_string()?;
                self.expect(']', "Expected ']' after column name")?;
                name
            }
            _ => return ParseError::new("Expected column after cells", self.position, self).err(),
        };

        // optional `.value` suffix
        let before = self.position;
        self.next_non_whitespace();
        if self.current() == '.' {
            self.next();
            let suffix_pivot = self.position;
            let suffix = self.parse_identifier()?;
            if suffix != "value" {
                return ParseError::new("Only .value is supported on cells", suffix_pivot, self).err();
            }
        } else {
            self.position = before;
        }

        Ok(Expr::Cell(column))
    }

    fn parse_call(&mut self, name: String, pivot: usize) -> Result<Expr, ParseError> {
        let args = self.parse_args()?;

        let function = FunctionRegistry::global()
            .get(&name)
            .ok_or_else(|| ParseError::new("Unknown function", pivot, self))?;
        if !function.accepts_arity(args.len()) {
            return ParseError::new("Wrong number of arguments", pivot, self).err();
        }

        Ok(Expr::Call(Function { name: function.name().to_string(), args }))
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let pivot = self.position;
        let mut args: Vec<Expr> = vec![];
        let mut can_consume = true;

        if self.current() != '(' {
            return ParseError::new("Invalid args value", pivot, self).err();
        }
        self.next();

        while !self.eof() && self.current() != ')' {
            if self.current().is_whitespace() {
                self.next();
            } else if self.current() == ',' {
                if can_consume {
                    return ParseError::new("Invalid args value", pivot, self).err();
                }
                can_consume = true;
                self.next();
            } else {
                if !can_consume {
                    return ParseError::new("Invalid args value", pivot, self).err();
                }
                args.push(self.parse_expr()?);
                can_consume = false;
            }
        }

        if self.eof() || (can_consume && !args.is_empty()) {
            return ParseError::new("Invalid args value", pivot, self).err();
        }
        self.next();

        Ok(args)
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let pivot = self.position;
        let delimiter = self.current();
        if delimiter != '"' && delimiter != '\'' {
            return ParseError::new("Invalid string value", pivot, self).err();
        }
        self.next();

        let mut text = String::new();
        while !self.eof() && self.current() != delimiter {
            let ch = self.current();
            if ch == '\n' || ch == '\r' {
                return ParseError::new("Invalid string", pivot, self).err();
            }
            if ch == '\\' {
                self.next();
                match self.current() {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    '\0' => return ParseError::new("Invalid string", pivot, self).err(),
                    other => text.push(other),
                }
            } else {
                text.push(ch);
            }
            self.next();
        }
        if self.eof() {
            return ParseError::new("Invalid string", pivot, self).err();
        }
        self.next();

        Ok(text)
    }

    fn parse_number(&mut self) -> Result<Literal, ParseError> {
        let pivot = self.position;
        let mut is_float = false;

        if self.current() == '-' {
            self.next();
        }
        if !self.current().is_ascii_digit() {
            return ParseError::new("Invalid number value", pivot, self).err();
        }

        while !self.eof() && (self.current().is_ascii_digit() || self.current() == '.') {
            if self.current() == '.' {
                if is_float {
                    return ParseError::new("Invalid number value", pivot, self).err();
                }
                is_float = true;
            }
            self.next();
        }

        if Self::is_identifier_part(self.current()) {
            return ParseError::new("Invalid number value", pivot, self).err();
        }

        let number = self.text_from_pivot(pivot);
        if is_float {
            let f = number.parse::<f64>()
                .ok()
                .and_then(|f| NotNan::new(f).ok())
                .ok_or_else(|| ParseError::new("Invalid number", pivot, self))?;
            Ok(Literal::Float(f))
        } else {
            number.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| ParseError::new("Invalid number", pivot, self))
        }
    }
}
