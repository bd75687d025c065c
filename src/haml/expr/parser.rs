//! Expression parser using chumsky
//!
//! Precedence, loosest first:
//!
//! ```text
//! cond ? a : b          right associative
//! ||
//! &&
//! == != === !==
//! < <= > >=
//! + -
//! * / %
//! ! -                   prefix
//! .name [index]         postfix
//! literal, name, name(args), [..], {..}, (..), for (x[, i] in xs) { body }
//! ```

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::tokens::{tokenize, Token, TokenLocation};
use super::EvalError;
use chumsky::prelude::*;
use chumsky::BoxedParser;
use serde_json::Value;

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenLocation>;

/// Parse a complete expression.
pub fn parse(source: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(source)?;
    expression()
        .then_ignore(end())
        .parse(tokens)
        .map_err(|errors| EvalError::Syntax {
            expression: source.to_string(),
            message: describe(errors.first()),
        })
}

fn describe(error: Option<&ParserError>) -> String {
    match error.and_then(|e| e.found()) {
        Some((token, range)) => format!("unexpected {:?} at offset {}", token, range.start),
        None => "unexpected end of expression".to_string(),
    }
}

/// Helper: match a specific token, ignoring its location
fn token(t: Token) -> impl Parser<TokenLocation, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenLocation| tok == &t).ignored()
}

/// One left-associative binary precedence level, collected into a flat [`Expr::Chain`].
fn binary_level<'a, P, O>(operand: P, operator: O) -> BoxedParser<'a, TokenLocation, Expr, ParserError>
where
    P: Parser<TokenLocation, Expr, Error = ParserError> + Clone + 'a,
    O: Parser<TokenLocation, BinaryOp, Error = ParserError> + Clone + 'a,
{
    operand
        .clone()
        .then(operator.then(operand).repeated())
        .map(|(first, rest)| {
            if rest.is_empty() {
                first
            } else {
                Expr::Chain(Box::new(first), rest)
            }
        })
        .boxed()
}

enum Postfix {
    Member(String),
    Index(Expr),
}

fn expression() -> impl Parser<TokenLocation, Expr, Error = ParserError> + Clone {
    recursive(|expr| {
        let name = select! { (Token::Ident(name), _) => name };

        // Loop bindings and member names may also be spelled like keywords
        let binding = select! {
            (Token::Ident(name), _) => name,
            (Token::True, _) => "true".to_string(),
            (Token::False, _) => "false".to_string(),
            (Token::Null, _) => "null".to_string(),
            (Token::Undefined, _) => "undefined".to_string(),
            (Token::For, _) => "for".to_string(),
            (Token::In, _) => "in".to_string(),
        };

        let literal = select! {
            (Token::Number(n), _) => Expr::Number(n.parse().unwrap_or(f64::NAN)),
            (Token::Str(s), _) => Expr::Literal(Value::String(s)),
            (Token::True, _) => Expr::Literal(Value::Bool(true)),
            (Token::False, _) => Expr::Literal(Value::Bool(false)),
            (Token::Null, _) => Expr::Literal(Value::Null),
            (Token::Undefined, _) => Expr::Literal(Value::Null),
        };

        let arguments = expr
            .clone()
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .delimited_by(token(Token::LParen), token(Token::RParen));

        let array = expr
            .clone()
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .delimited_by(token(Token::LBracket), token(Token::RBracket))
            .map(Expr::Array);

        let key = binding.clone().or(select! {
            (Token::Str(s), _) => s,
            (Token::Number(n), _) => n,
        });
        let object = key
            .then_ignore(token(Token::Colon))
            .then(expr.clone())
            .separated_by(token(Token::Comma))
            .allow_trailing()
            .delimited_by(token(Token::LBrace), token(Token::RBrace))
            .map(Expr::Object);

        let call = name
            .clone()
            .then(arguments)
            .map(|(name, args)| Expr::Call(name, args));

        let for_block = token(Token::For)
            .ignore_then(
                binding
                    .clone()
                    .then(token(Token::Comma).ignore_then(binding.clone()).or_not())
                    .then_ignore(token(Token::In))
                    .then(expr.clone())
                    .delimited_by(token(Token::LParen), token(Token::RParen)),
            )
            .then(
                expr.clone()
                    .delimited_by(token(Token::LBrace), token(Token::RBrace)),
            )
            .map(|(((variable, index_variable), items), body)| Expr::For {
                variable,
                index_variable,
                items: Box::new(items),
                body: Box::new(body),
            });

        let atom = choice((
            literal,
            for_block,
            call,
            name.map(Expr::Variable),
            array,
            object,
            expr.clone()
                .delimited_by(token(Token::LParen), token(Token::RParen)),
        ))
        .boxed();

        let postfix = token(Token::Dot)
            .ignore_then(binding)
            .map(Postfix::Member)
            .or(expr
                .clone()
                .delimited_by(token(Token::LBracket), token(Token::RBracket))
                .map(Postfix::Index));

        let accessed = atom
            .then(postfix.repeated())
            .foldl(|target, postfix| match postfix {
                Postfix::Member(name) => Expr::Member(Box::new(target), name),
                Postfix::Index(index) => Expr::Index(Box::new(target), Box::new(index)),
            })
            .boxed();

        let unary = choice((
            token(Token::Bang).to(UnaryOp::Not),
            token(Token::Minus).to(UnaryOp::Neg),
        ))
        .repeated()
        .then(accessed)
        .foldr(|op, operand| Expr::Unary(op, Box::new(operand)))
        .boxed();

        let product = binary_level(
            unary,
            choice((
                token(Token::Star).to(BinaryOp::Mul),
                token(Token::Slash).to(BinaryOp::Div),
                token(Token::Percent).to(BinaryOp::Rem),
            )),
        );
        let sum = binary_level(
            product,
            choice((
                token(Token::Plus).to(BinaryOp::Add),
                token(Token::Minus).to(BinaryOp::Sub),
            )),
        );
        let comparison = binary_level(
            sum,
            choice((
                token(Token::Le).to(BinaryOp::Le),
                token(Token::Lt).to(BinaryOp::Lt),
                token(Token::Ge).to(BinaryOp::Ge),
                token(Token::Gt).to(BinaryOp::Gt),
            )),
        );
        let equality = binary_level(
            comparison,
            choice((
                token(Token::StrictEq).to(BinaryOp::StrictEq),
                token(Token::StrictNe).to(BinaryOp::StrictNe),
                token(Token::Eq).to(BinaryOp::Eq),
                token(Token::Ne).to(BinaryOp::Ne),
            )),
        );
        let and = binary_level(equality, token(Token::And).to(BinaryOp::And));
        let or = binary_level(and, token(Token::Or).to(BinaryOp::Or));

        or.then(
            token(Token::Question)
                .ignore_then(expr.clone())
                .then_ignore(token(Token::Colon))
                .then(expr)
                .or_not(),
        )
        .map(|(condition, branches)| match branches {
            Some((then, otherwise)) => {
                Expr::Conditional(Box::new(condition), Box::new(then), Box::new(otherwise))
            }
            None => condition,
        })
    })
}
