//! Parameter expressions for macro bodies.
//!
//! A callee inside a macro body computes its gate parameters from the
//! caller's parameters. Each such computation is a [`ParameterExpression`]
//! over positional arguments `p0, p1, ...`; its arity is the number of
//! positional arguments it consumes.

use logos::Logos;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::Range;

use crate::error::{IrError, IrResult};

/// An arithmetic expression over positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// The positional argument with this index.
    Arg(usize),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a positional argument reference.
    pub fn arg(index: usize) -> Self {
        ParameterExpression::Arg(index)
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Number of positional arguments consumed: highest index + 1.
    pub fn arity(&self) -> usize {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => 0,
            ParameterExpression::Arg(i) => i + 1,
            ParameterExpression::Neg(e) => e.arity(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.arity().max(b.arity()),
        }
    }

    /// Evaluate against positional arguments.
    ///
    /// Returns `None` when an argument is missing or a division by zero
    /// occurs.
    pub fn evaluate(&self, args: &[f64]) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Arg(i) => args.get(*i).copied(),
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.evaluate(args).map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.evaluate(args)? + b.evaluate(args)?),
            ParameterExpression::Sub(a, b) => Some(a.evaluate(args)? - b.evaluate(args)?),
            ParameterExpression::Mul(a, b) => Some(a.evaluate(args)? * b.evaluate(args)?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.evaluate(args)?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.evaluate(args)? / divisor)
            }
        }
    }

    /// Parse an expression such as `p0 * 2 + pi / 4`.
    ///
    /// Grammar: `expr := term (('+'|'-') term)*`,
    /// `term := factor (('*'|'/') factor)*`,
    /// `factor := '-' factor | number | 'pi' | 'p'N | '(' expr ')'`.
    pub fn parse(source: &str) -> IrResult<Self> {
        let mut parser = Parser::new(source)?;
        let expr = parser.expr()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

/// Tokens of a parameter expression.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// `pi`, or a positional argument `p0, p1, ...`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> IrResult<Self> {
        let mut lexer = Token::lexer(source);
        let mut tokens = Vec::new();
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(IrError::InvalidExpression {
                        expr: source.to_string(),
                        reason: format!(
                            "invalid token '{}' at offset {}",
                            &source[span.clone()],
                            span.start
                        ),
                    });
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    fn error(&self, reason: &str) -> IrError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |(_, span)| span.start);
        IrError::InvalidExpression {
            expr: self.source.to_string(),
            reason: format!("{reason} at offset {offset}"),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> IrResult<ParameterExpression> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = lhs + self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = lhs - self.term()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> IrResult<ParameterExpression> {
        let mut lhs = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = lhs * self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = lhs / self.factor()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn factor(&mut self) -> IrResult<ParameterExpression> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of input"));
        };
        match token {
            Token::Minus => {
                self.advance();
                Ok(-self.factor()?)
            }
            Token::LParen => {
                self.advance();
                let inner = self.expr()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.error("expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            Token::Number(v) => {
                self.advance();
                Ok(ParameterExpression::Constant(v))
            }
            Token::Identifier(name) => {
                let expr = identifier(&name).ok_or_else(|| self.error("unknown identifier"))?;
                self.advance();
                Ok(expr)
            }
            _ => Err(self.error("unexpected token")),
        }
    }
}

fn identifier(name: &str) -> Option<ParameterExpression> {
    if name.eq_ignore_ascii_case("pi") {
        return Some(ParameterExpression::Pi);
    }
    name.strip_prefix('p')
        .and_then(|digits| digits.parse::<usize>().ok())
        .map(ParameterExpression::Arg)
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Arg(i) => write!(f, "p{i}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
