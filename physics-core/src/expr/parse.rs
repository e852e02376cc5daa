//! Recursive-descent parser for formula text.
//!
//! Grammar (lowest to highest binding):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | constant | symbol | func '(' expr ')' | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-x^2`
//! is `-(x^2)` and `2^-1` is accepted.
//!
//! Nesting deeper than [`MAX_DEPTH`], whether through parentheses, unary
//! signs, powers or long operator chains, is a parse error.

use super::{Constant, Expr, Func, Symbol};
use crate::errors::{ExprError, ExprResult};

/// Deepest expression tree `parse_expr` accepts.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(v) => format!("number {}", v),
            Token::Ident(s) => format!("'{}'", s),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::End => "end of input".into(),
        }
    }
}

/// Parses formula text into an expression.
///
/// ```
/// use physics_core::expr::parse_expr;
/// let e = parse_expr("2*pi*sqrt(l/g)").unwrap();
/// assert_eq!(e.free_symbols().len(), 2);
/// ```
pub fn parse_expr(text: &str) -> ExprResult<Expr> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    let (tok, col) = parser.peek();
    if *tok != Token::End {
        return Err(ExprError::parse(col, &format!("unexpected {}", tok.describe())));
    }
    if tree_depth(&expr) > MAX_DEPTH {
        return Err(too_deep(1));
    }
    Ok(expr)
}

fn too_deep(col: usize) -> ExprError {
    ExprError::parse(col, &format!("formula nested deeper than {} levels", MAX_DEPTH))
}

/// Depth of the tree, walked with an explicit stack.
fn tree_depth(expr: &Expr) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(expr, 1)];
    while let Some((e, d)) = stack.pop() {
        deepest = deepest.max(d);
        match e {
            Expr::Num(_) | Expr::Const(_) | Expr::Sym(_) => {}
            Expr::Neg(a) | Expr::Call(_, a) => stack.push((a, d + 1)),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
                stack.push((a, d + 1));
                stack.push((b, d + 1));
            }
        }
    }
    deepest
}

fn tokenize(text: &str) -> ExprResult<Vec<(Token, usize)>> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let col = i + 1;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) {
            let (value, next) = lex_number(&chars, i)?;
            tokens.push((Token::Num(value), col));
            i = next;
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            tokens.push((Token::Ident(ident), col));
            continue;
        }
        let tok = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Caret
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(ExprError::parse(col, &format!("unexpected character '{}'", other)));
            }
        };
        tokens.push((tok, col));
        i += 1;
    }
    tokens.push((Token::End, chars.len() + 1));
    Ok(tokens)
}

fn lex_number(chars: &[char], start: usize) -> ExprResult<(f64, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    let text: String = chars[start..i].iter().collect();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((v, i)),
        Ok(_) => Err(ExprError::parse(start + 1, &format!("number '{}' is out of range", text))),
        Err(e) => Err(ExprError::parse(start + 1, &format!("bad number '{}': {}", text, e))),
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn nested<T>(&mut self, col: usize, f: impl FnOnce(&mut Self) -> ExprResult<T>) -> ExprResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(too_deep(col));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> (&Token, usize) {
        let (tok, col) = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        (tok, *col)
    }

    fn advance(&mut self) -> (Token, usize) {
        let item = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        item
    }

    fn expect(&mut self, want: Token) -> ExprResult<()> {
        let (tok, col) = self.advance();
        if tok != want {
            return Err(ExprError::parse(
                col,
                &format!("expected {}, found {}", want.describe(), tok.describe()),
            ));
        }
        Ok(())
    }

    fn expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            match self.peek().0 {
                Token::Plus => {
                    self.advance();
                    lhs = lhs + self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    lhs = lhs - self.term()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek().0 {
                Token::Star => {
                    self.advance();
                    lhs = lhs * self.unary()?;
                }
                Token::Slash => {
                    self.advance();
                    lhs = lhs / self.unary()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> ExprResult<Expr> {
        match self.peek().0 {
            Token::Minus => {
                let (_, col) = self.advance();
                Ok(-self.nested(col, Self::unary)?)
            }
            Token::Plus => {
                let (_, col) = self.advance();
                self.nested(col, Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> ExprResult<Expr> {
        let base = self.primary()?;
        if *self.peek().0 == Token::Caret {
            let (_, col) = self.advance();
            let exponent = self.nested(col, Self::unary)?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> ExprResult<Expr> {
        let (tok, col) = self.advance();
        match tok {
            Token::Num(v) => Ok(Expr::Num(v)),
            Token::LParen => {
                let inner = self.nested(col, Self::expr)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => self.identifier(name, col),
            other => Err(ExprError::parse(col, &format!("unexpected {}", other.describe()))),
        }
    }

    fn identifier(&mut self, name: String, col: usize) -> ExprResult<Expr> {
        if *self.peek().0 == Token::LParen {
            let func = Func::from_name(&name).ok_or(ExprError::UnknownFunction(name))?;
            self.advance();
            let arg = self.nested(col, Self::expr)?;
            self.expect(Token::RParen)?;
            return Ok(Expr::Call(func, Box::new(arg)));
        }
        if let Some(c) = Constant::from_name(&name) {
            return Ok(Expr::Const(c));
        }
        if Func::from_name(&name).is_some() {
            return Err(ExprError::parse(col, &format!("function '{}' needs an argument", name)));
        }
        Ok(Expr::Sym(Symbol(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn eval(src: &str, vars: &[(&str, f64)]) -> f64 {
        let map: HashMap<Symbol, f64> = vars.iter().map(|(n, v)| (Symbol::new(*n), *v)).collect();
        parse_expr(src).unwrap().eval_scalar(&map).unwrap()
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("1 + 2*3", &[]), 7.0);
        assert_eq!(eval("(1 + 2)*3", &[]), 9.0);
        assert_eq!(eval("8/4/2", &[]), 1.0);
        assert_eq!(eval("2^3^2", &[]), 512.0);
        assert_eq!(eval("10 - 4 - 3", &[]), 3.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2^2", &[]), -4.0);
        assert_eq!(eval("(-2)^2", &[]), 4.0);
        assert_eq!(eval("2^-1", &[]), 0.5);
        assert_eq!(eval("--3", &[]), 3.0);
        assert_eq!(eval("+3", &[]), 3.0);
    }

    #[test]
    fn double_star_is_power() {
        assert_eq!(eval("x**2", &[("x", 3.0)]), 9.0);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(eval("1.5e3", &[]), 1500.0);
        assert_eq!(eval("2E-2", &[]), 0.02);
        assert_eq!(eval(".5", &[]), 0.5);
    }

    #[test]
    fn number_followed_by_e_constant_is_rejected() {
        let err = parse_expr("2e").unwrap_err();
        assert!(matches!(err, ExprError::Parse { position: 2, .. }));
    }

    #[test]
    fn functions_and_constants() {
        let v = eval("sin(pi/2) + ln(e) + sqrt(16)", &[]);
        assert!((v - 6.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_function_is_reported() {
        assert_eq!(
            parse_expr("sec(x)").unwrap_err(),
            ExprError::UnknownFunction("sec".into())
        );
    }

    #[test]
    fn function_without_argument_is_error() {
        assert!(matches!(parse_expr("sin + 1"), Err(ExprError::Parse { position: 1, .. })));
    }

    #[test]
    fn error_positions() {
        match parse_expr("a + * b") {
            Err(ExprError::Parse { position, .. }) => assert_eq!(position, 5),
            other => panic!("unexpected {:?}", other),
        }
        match parse_expr("(a + b") {
            Err(ExprError::Parse { position, message }) => {
                assert_eq!(position, 7);
                assert!(message.contains("')'"));
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse_expr("a $ b") {
            Err(ExprError::Parse { position, .. }) => assert_eq!(position, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn implicit_multiplication_is_rejected() {
        assert!(parse_expr("2 x").is_err());
        assert!(parse_expr("(a)(b)").is_err());
    }

    #[test]
    fn empty_input_is_error() {
        assert!(parse_expr("").is_err());
        assert!(parse_expr("   ").is_err());
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let parens = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse_expr(&parens), Err(ExprError::Parse { .. })));
        assert!(matches!(parse_expr(&"-".repeat(10_000)), Err(ExprError::Parse { .. })));
        let chain = vec!["x"; 1000].join(" + ");
        assert!(matches!(parse_expr(&chain), Err(ExprError::Parse { position: 1, .. })));
    }

    #[test]
    fn moderate_nesting_is_fine() {
        let parens = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_expr(&parens).unwrap(), Expr::sym("x"));
        let chain = vec!["x"; 100].join(" + ");
        assert_eq!(eval(&chain, &[("x", 1.0)]), 100.0);
    }

    #[test]
    fn out_of_range_literal_is_rejected() {
        match parse_expr("1e400*x") {
            Err(ExprError::Parse { position, message }) => {
                assert_eq!(position, 1);
                assert!(message.contains("out of range"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn physics_formula() {
        let src = "m*r^2*(g*t^2*sin(theta)/(2*L) - 1)";
        let v = eval(
            src,
            &[("m", 0.12), ("r", 0.03), ("g", 9.81), ("t", 2.0), ("theta", 0.2), ("L", 1.5)],
        );
        let expected = 0.12 * 0.03_f64.powi(2) * (9.81 * 4.0 * 0.2_f64.sin() / 3.0 - 1.0);
        assert!((v - expected).abs() < 1e-15);
    }
}
