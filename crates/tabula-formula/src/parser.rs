//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator
//! precedence. The input is the expression text without the leading `=`.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{ParseError, ParseResult};
use tabula_core::Position;

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 512;

/// Parse an expression string into an AST
///
/// # Example
/// ```rust
/// use tabula_formula::{parse_expression, FormulaExpr};
///
/// let ast = parse_expression("1+2").unwrap();
/// let ast = parse_expression("A1*(B2-3)").unwrap();
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(expression: &str) -> ParseResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    if matches!(parser.current_token(), Token::Eof) {
        return Err(ParseError::Empty);
    }

    let expr = parser.parse_additive()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(ParseError::TrailingInput(
            expression[parser.token_start..].to_string(),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(Position),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where the current token begins
    token_start: usize,
    current_token: Token,
    /// Nesting of the node being built
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> ParseResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> ParseResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Cell reference
        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(ParseError::UnexpectedCharacter {
            ch: c,
            offset: self.pos,
        })
    }

    fn scan_number(&mut self) -> ParseResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            _ => Err(ParseError::InvalidNumber(num_str.to_string())),
        }
    }

    fn scan_reference(&mut self) -> ParseResult<Token> {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        if !Self::is_cell_reference(text) {
            return Err(ParseError::UnknownIdentifier(text.to_string()));
        }

        // Well-formed but off the grid: keep it as a dangling reference
        Ok(Token::CellRef(Position::from_a1(text)))
    }

    /// Uppercase letters followed by digits, nothing else
    fn is_cell_reference(text: &str) -> bool {
        let letters = text.bytes().take_while(|b| b.is_ascii_uppercase()).count();
        let digits = &text[letters..];
        letters > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> ParseResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.current_token() {
            Token::Eof => ParseError::UnexpectedEnd,
            token => ParseError::UnexpectedToken(format!("{:?}", token)),
        }
    }

    fn descend(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(ParseError::TooDeep(MAX_DEPTH))
        } else {
            Ok(())
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: literals, references, parentheses

    fn parse_additive(&mut self) -> ParseResult<FormulaExpr> {
        let base = self.depth;
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            // Each operator in a chain adds a level to the left spine
            self.descend()?;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<FormulaExpr> {
        let base = self.depth;
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            // Each operator in a chain adds a level to the left spine
            self.descend()?;
            let right = self.parse_unary()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<FormulaExpr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        self.descend()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(FormulaExpr::Number(n))
            }

            Token::CellRef(pos) => {
                self.consume()?;
                Ok(FormulaExpr::CellRef(pos))
            }

            Token::LeftParen => {
                self.consume()?;
                self.descend()?;
                let expr = self.parse_additive()?;
                self.expect(&Token::RightParen)?;
                self.depth -= 1;
                Ok(expr)
            }

            _ => Err(self.unexpected()),
        }
    }
}
