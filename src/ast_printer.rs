//! Debug printer for expressions plus the matching reader.
//!
//! [`AstPrinter::print`] renders a tree in fully parenthesised prefix form,
//! e.g. `1 + 2 * 3` becomes `(+ 1.0 (* 2.0 3.0))`.  [`read_expr`] parses
//! that form back, so `read_expr(&AstPrinter::print(e))` evaluates exactly
//! like `e`.

use log::debug;

use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};

/// Converts an expression to the Crafting‑Interpreters prefix form.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::True => "true".into(),

                LiteralValue::False => "false".into(),

                LiteralValue::Nil => "nil".into(),

                LiteralValue::Str(s) => format!("\"{}\"", s),

                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        // 3 → 3.0
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
            },

            // ── grouping ────────────────────────────────────────────────
            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            // ── operators ───────────────────────────────────────────────
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(?: {} {} {})",
                Self::print(condition),
                Self::print(then_branch),
                Self::print(else_branch)
            ),

            Expr::Comma(exprs) => Self::parenthesize(",", exprs.iter()),

            // ── names ──────────────────────────────────────────────────
            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, Self::print(value))
            }

            Expr::This { .. } => "this".into(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),

            // ── calls and properties ───────────────────────────────────
            Expr::Call {
                callee, arguments, ..
            } => Self::parenthesize(
                &format!("call {}", Self::print(callee)),
                arguments.iter(),
            ),

            Expr::Get { object, name } => format!("(. {} {})", Self::print(object), name.lexeme),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                Self::print(object),
                name.lexeme,
                Self::print(value)
            ),
        }
    }

    fn parenthesize<'e>(head: &str, exprs: impl Iterator<Item = &'e Expr>) -> String {
        let mut s = format!("({}", head);
        for expr in exprs {
            s.push(' ');
            s.push_str(&Self::print(expr));
        }
        s.push(')');
        s
    }
}

/// Read one expression written in the printer's prefix form.
///
/// Names read back as globals: the result carries fresh ids that no
/// resolver has seen.
pub fn read_expr(source: &str) -> Result<Expr> {
    read_with_first_id(source, 0).map(|(expr, _)| expr)
}

/// Like [`read_expr`], numbering nodes from `first_id`.  Also returns the
/// next unused id.
pub(crate) fn read_with_first_id(source: &str, first_id: usize) -> Result<(Expr, usize)> {
    let (tokens, mut errors) = Scanner::new(source).scan_tokens();

    if !errors.is_empty() {
        return Err(errors.remove(0));
    }

    let mut reader = Reader {
        tokens: &tokens,
        current: 0,
        next_id: first_id,
    };

    let expr: Expr = reader.form()?;

    let trailing: &Token = reader.peek();
    if trailing.token_type != TokenType::EOF {
        return Err(LoxError::parse(trailing, "Expected end of expression"));
    }

    debug!("Read prefix form, next node id {}", reader.next_id);

    Ok((expr, reader.next_id))
}

struct Reader<'t> {
    tokens: &'t [Token],
    current: usize,
    next_id: usize,
}

impl<'t> Reader<'t> {
    /// atom | "(" head form* ")"
    fn form(&mut self) -> Result<Expr> {
        let token: Token = self.advance()?.clone();

        match token.token_type {
            TokenType::NUMBER(n) => Ok(Expr::Literal(LiteralValue::Number(n))),
            TokenType::STRING(s) => Ok(Expr::Literal(LiteralValue::Str(s))),
            TokenType::TRUE => Ok(Expr::Literal(LiteralValue::True)),
            TokenType::FALSE => Ok(Expr::Literal(LiteralValue::False)),
            TokenType::NIL => Ok(Expr::Literal(LiteralValue::Nil)),
            TokenType::THIS => Ok(Expr::This {
                id: self.new_id(),
                keyword: token,
            }),
            TokenType::IDENTIFIER => Ok(Expr::Variable {
                id: self.new_id(),
                name: token,
            }),
            TokenType::LEFT_PAREN => self.list(),
            _ => Err(LoxError::parse(&token, "Expected expression")),
        }
    }

    /// Everything after an opening parenthesis, up to and including `)`.
    fn list(&mut self) -> Result<Expr> {
        let head: Token = self.advance()?.clone();

        let expr: Expr = match head.token_type {
            TokenType::IDENTIFIER if head.lexeme == "group" => {
                Expr::Grouping(Box::new(self.form()?))
            }

            TokenType::IDENTIFIER if head.lexeme == "call" => {
                let callee: Expr = self.form()?;
                let arguments: Vec<Expr> = self.rest()?;

                return Ok(Expr::Call {
                    callee: Box::new(callee),
                    paren: self.previous().clone(),
                    arguments,
                });
            }

            TokenType::SUPER => {
                let method: Token = self.identifier()?;

                Expr::Super {
                    id: self.new_id(),
                    keyword: head,
                    method,
                }
            }

            TokenType::DOT => {
                let object: Expr = self.form()?;
                let name: Token = self.identifier()?;

                Expr::Get {
                    object: Box::new(object),
                    name,
                }
            }

            TokenType::EQUAL => self.assignment(&head)?,

            TokenType::QUESTION => {
                self.expect(TokenType::COLON, "Expected ':' after '?'")?;

                Expr::Ternary {
                    condition: Box::new(self.form()?),
                    then_branch: Box::new(self.form()?),
                    else_branch: Box::new(self.form()?),
                }
            }

            TokenType::COMMA => return Ok(Expr::Comma(self.rest()?)),

            TokenType::AND | TokenType::OR => Expr::Logical {
                left: Box::new(self.form()?),
                operator: head,
                right: Box::new(self.form()?),
            },

            TokenType::MINUS | TokenType::BANG => {
                let first: Expr = self.form()?;

                // `(- a)` is negation, `(- a b)` subtraction
                if self.check(TokenType::RIGHT_PAREN) {
                    Expr::Unary {
                        operator: head,
                        right: Box::new(first),
                    }
                } else {
                    Expr::Binary {
                        left: Box::new(first),
                        operator: head,
                        right: Box::new(self.form()?),
                    }
                }
            }

            TokenType::PLUS
            | TokenType::STAR
            | TokenType::SLASH
            | TokenType::EQUAL_EQUAL
            | TokenType::BANG_EQUAL
            | TokenType::GREATER
            | TokenType::GREATER_EQUAL
            | TokenType::LESS
            | TokenType::LESS_EQUAL => Expr::Binary {
                left: Box::new(self.form()?),
                operator: head,
                right: Box::new(self.form()?),
            },

            _ => return Err(LoxError::parse(&head, "Unknown form")),
        };

        self.expect(TokenType::RIGHT_PAREN, "Expected ')' after form")?;

        Ok(expr)
    }

    /// `(= name v)` or `(= (. obj name) v)`
    fn assignment(&mut self, equals: &Token) -> Result<Expr> {
        match self.form()? {
            Expr::Variable { id, name } => Ok(Expr::Assign {
                id,
                name,
                value: Box::new(self.form()?),
            }),

            Expr::Get { object, name } => Ok(Expr::Set {
                object,
                name,
                value: Box::new(self.form()?),
            }),

            _ => Err(LoxError::parse(equals, "Invalid assignment target")),
        }
    }

    /// Remaining forms of a list, consuming the closing `)`.
    fn rest(&mut self) -> Result<Vec<Expr>> {
        let mut exprs: Vec<Expr> = Vec::new();

        while !self.check(TokenType::RIGHT_PAREN) {
            exprs.push(self.form()?);
        }

        self.advance()?;

        Ok(exprs)
    }

    fn identifier(&mut self) -> Result<Token> {
        self.expect(TokenType::IDENTIFIER, "Expected property name")
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> Result<Token> {
        if self.check(token_type) {
            return Ok(self.advance()?.clone());
        }

        Err(LoxError::parse(self.peek(), message))
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Result<&'t Token> {
        let token: &'t Token = self.peek();

        if token.token_type == TokenType::EOF {
            return Err(LoxError::parse(token, "Unexpected end of form"));
        }

        self.current += 1;

        Ok(token)
    }

    fn peek(&self) -> &'t Token {
        // the scanner always terminates the stream with EOF
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &'t Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn new_id(&mut self) -> ExprId {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        id
    }
}
