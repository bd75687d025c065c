//! Expression syntax tree

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `null`, booleans and strings.
    Literal(Value),
    Number(f64),
    Variable(String),
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    /// A run of same-precedence binary operators, applied left to right: `a + b - c` is
    /// `Chain(a, [(Add, b), (Sub, c)])`. Kept flat so long concatenations stay shallow.
    Chain(Box<Expr>, Vec<(BinaryOp, Expr)>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `for (item[, index] in items) { body }`: the concatenated string forms of `body`.
    For {
        variable: String,
        index_variable: Option<String>,
        items: Box<Expr>,
        body: Box<Expr>,
    },
}
