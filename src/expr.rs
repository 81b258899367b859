//! Symbolic boundary/forcing expressions (Design Notes: "Expression
//! evaluation for BCs and forcing"): a small arithmetic evaluator over
//! the fixed symbol table `{x, y, z, t, step}`, re-parsed once at session
//! load and then evaluated in a tight per-node loop, rather than
//! embedding a general scripting language the way the original's
//! Femlib parser does.
use crate::error::{io_error, DnsError};
use std::fmt;

/// The five variables an essential-condition or forcing expression may
/// reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
    pub step: f64,
}

#[derive(Debug, Clone)]
enum Node {
    Num(f64),
    Var(char),
    Neg(Box<Node>),
    Add(Box<Node>, Box<Node>),
    Sub(Box<Node>, Box<Node>),
    Mul(Box<Node>, Box<Node>),
    Div(Box<Node>, Box<Node>),
    Pow(Box<Node>, Box<Node>),
    Call(&'static str, Box<Node>),
}

/// A parsed, ready-to-evaluate expression.
#[derive(Debug, Clone)]
pub struct Expr {
    root: Node,
    source: String,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Expr {
    /// Parse a textual expression, e.g. `"sin(2*x) * exp(-t) + step"`.
    pub fn parse(text: &str) -> Result<Self, DnsError> {
        const ROUTINE: &str = "Expr::parse";
        let tokens = tokenize(text).map_err(|e| io_error(ROUTINE, e))?;
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.expr().map_err(|e| io_error(ROUTINE, e))?;
        if parser.pos != parser.tokens.len() {
            return Err(io_error(ROUTINE, format!("unexpected trailing input in '{text}'")));
        }
        Ok(Expr { root, source: text.to_string() })
    }

    /// A constant expression, useful when a boundary condition is a
    /// plain number rather than a symbolic formula.
    pub fn constant(value: f64) -> Self {
        Expr { root: Node::Num(value), source: value.to_string() }
    }

    pub fn eval(&self, env: &Env) -> f64 {
        eval_node(&self.root, env)
    }

    /// Evaluate at every node of a plane, one call per collocation
    /// point, matching `BoundarySys::evaluate`'s vectorised inner loop.
    pub fn eval_plane(&self, x: &[f64], y: &[f64], z: &[f64], t: f64, step: usize) -> Vec<f64> {
        let n = x.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let env = Env {
                x: x[i],
                y: y[i],
                z: if z.is_empty() { 0.0 } else { z[i] },
                t,
                step: step as f64,
            };
            out.push(self.eval(&env));
        }
        out
    }
}

fn eval_node(node: &Node, env: &Env) -> f64 {
    match node {
        Node::Num(v) => *v,
        Node::Var('x') => env.x,
        Node::Var('y') => env.y,
        Node::Var('z') => env.z,
        Node::Var('t') => env.t,
        Node::Var('s') => env.step,
        Node::Var(c) => panic!("expr: unbound variable '{c}'"),
        Node::Neg(a) => -eval_node(a, env),
        Node::Add(a, b) => eval_node(a, env) + eval_node(b, env),
        Node::Sub(a, b) => eval_node(a, env) - eval_node(b, env),
        Node::Mul(a, b) => eval_node(a, env) * eval_node(b, env),
        Node::Div(a, b) => eval_node(a, env) / eval_node(b, env),
        Node::Pow(a, b) => eval_node(a, env).powf(eval_node(b, env)),
        Node::Call(name, a) => {
            let v = eval_node(a, env);
            match *name {
                "sin" => v.sin(),
                "cos" => v.cos(),
                "tan" => v.tan(),
                "sqrt" => v.sqrt(),
                "exp" => v.exp(),
                "ln" => v.ln(),
                "abs" => v.abs(),
                _ => unreachable!("tokenizer only admits known function names"),
            }
        }
    }
}

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
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                out.push(Token::Plus);
                i += 1;
            }
            '-' => {
                out.push(Token::Minus);
                i += 1;
            }
            '*' => {
                out.push(Token::Star);
                i += 1;
            }
            '/' => {
                out.push(Token::Slash);
                i += 1;
            }
            '^' => {
                out.push(Token::Caret);
                i += 1;
            }
            '(' => {
                out.push(Token::LParen);
                i += 1;
            }
            ')' => {
                out.push(Token::RParen);
                i += 1;
            }
            ',' => {
                out.push(Token::Comma);
                i += 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value: f64 = text.parse().map_err(|_| format!("bad number literal '{text}'"))?;
                out.push(Token::Num(value));
            }
            _ if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                out.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character '{other}' in expression")),
        }
    }
    Ok(out)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expr(&mut self) -> Result<Node, String> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    lhs = Node::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.bump();
                    lhs = Node::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Node, String> {
        let mut lhs = self.power()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    lhs = Node::Mul(Box::new(lhs), Box::new(self.power()?));
                }
                Some(Token::Slash) => {
                    self.bump();
                    lhs = Node::Div(Box::new(lhs), Box::new(self.power()?));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn power(&mut self) -> Result<Node, String> {
        let base = self.unary()?;
        if let Some(Token::Caret) = self.peek() {
            self.bump();
            let exp = self.power()?;
            return Ok(Node::Pow(Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Node, String> {
        if let Some(Token::Minus) = self.peek() {
            self.bump();
            return Ok(Node::Neg(Box::new(self.unary()?)));
        }
        if let Some(Token::Plus) = self.peek() {
            self.bump();
            return self.unary();
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Node, String> {
        match self.bump() {
            Some(Token::Num(v)) => Ok(Node::Num(v)),
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.bump();
                    let arg = self.expr()?;
                    match self.bump() {
                        Some(Token::RParen) => {}
                        _ => return Err(format!("expected ')' after arguments to '{name}'")),
                    }
                    let func = match name.as_str() {
                        "sin" => "sin",
                        "cos" => "cos",
                        "tan" => "tan",
                        "sqrt" => "sqrt",
                        "exp" => "exp",
                        "ln" => "ln",
                        "abs" => "abs",
                        other => return Err(format!("unknown function '{other}'")),
                    };
                    Ok(Node::Call(func, Box::new(arg)))
                } else {
                    let mut chars = name.chars();
                    let c = chars.next().ok_or("empty identifier")?;
                    if chars.next().is_some() || !matches!(c, 'x' | 'y' | 'z' | 't') {
                        if name == "step" {
                            return Ok(Node::Var('s'));
                        }
                        return Err(format!("unknown variable '{name}'"));
                    }
                    Ok(Node::Var(c))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("expected ')'".to_string()),
                }
            }
            other => Err(format!("unexpected token {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_arithmetic_and_variables() {
        let e = Expr::parse("2*x + 3").unwrap();
        assert_eq!(e.eval(&Env { x: 5.0, ..Default::default() }), 13.0);
    }

    #[test]
    fn evaluates_functions_and_step() {
        let e = Expr::parse("sin(0) + step").unwrap();
        assert_eq!(e.eval(&Env { step: 4.0, ..Default::default() }), 4.0);
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert!(Expr::parse("foo(x)").is_err());
    }

    #[test]
    fn eval_plane_matches_pointwise_eval() {
        let e = Expr::parse("x*x + y").unwrap();
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 2.0];
        let out = e.eval_plane(&xs, &ys, &[], 0.0, 0);
        assert_eq!(out, vec![1.0, 5.0, 11.0]);
    }
}
