//! Session driver: runs source text through scanner → parser → resolver →
//! interpreter, stopping at the first phase that fails.
//!
//! A [`Lox`] keeps one interpreter alive across runs, so globals defined by
//! one prompt line are visible to the next.  The expression id counter is
//! carried over as well; resolutions recorded for earlier lines stay valid
//! because no later node can reuse their ids.

use std::io::Write;

use log::{debug, info};
use thiserror::Error;

use crate::ast_printer::read_with_first_id;
use crate::error::LoxError;
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use crate::value::Value;

/// Why a run stopped.  Each variant corresponds to one process exit code.
#[derive(Debug, Error)]
pub enum RunError {
    /// Lexical and syntactic errors, ordered by line.
    #[error("{}", render(.0))]
    Syntax(Vec<LoxError>),

    #[error("{}", render(.0))]
    Resolve(Vec<LoxError>),

    #[error("{0}")]
    Runtime(LoxError),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Syntax(_) => 65,
            RunError::Resolve(_) => 66,
            RunError::Runtime(_) => 70,
        }
    }

    /// Every underlying diagnostic.
    pub fn errors(&self) -> &[LoxError] {
        match self {
            RunError::Syntax(errors) | RunError::Resolve(errors) => errors,
            RunError::Runtime(error) => std::slice::from_ref(error),
        }
    }

    /// One rendered line (or two, for runtime errors) per diagnostic.
    pub fn diagnostics(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }
}

/// Decode raw source bytes.  Invalid UTF-8 is a host error, not a
/// lexical one.
pub fn decode_source(bytes: Vec<u8>) -> Result<String, LoxError> {
    let source: String = String::from_utf8(bytes)?;

    debug!("Decoded {} byte(s) of source", source.len());

    Ok(source)
}

fn render(errors: &[LoxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// An interpreter session.
pub struct Lox {
    interpreter: Interpreter,
    next_expr_id: usize,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    /// A session whose `print` goes to stdout.
    pub fn new() -> Self {
        Self::from_interpreter(Interpreter::new())
    }

    /// A session whose `print` goes to `output`.
    pub fn with_output<W: Write + 'static>(output: W) -> Self {
        Self::from_interpreter(Interpreter::with_output(output))
    }

    fn from_interpreter(interpreter: Interpreter) -> Self {
        info!("Lox session created");

        Self {
            interpreter,
            next_expr_id: 0,
        }
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Run a complete unit of source text (a file or one prompt line).
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        let statements: Vec<Stmt> = self.parse_program(source)?;

        debug!("Parsed {} statement(s)", statements.len());

        let locals = Resolver::new()
            .resolve(&statements)
            .map_err(RunError::Resolve)?;

        self.interpreter.resolve(locals);

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)?;

        info!("Run completed");

        Ok(())
    }

    /// Evaluate a single expression against the session's globals.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, RunError> {
        let expr: Expr = self.parse_expression(source)?;

        let locals = Resolver::new()
            .resolve_expression(&expr)
            .map_err(RunError::Resolve)?;

        self.interpreter.resolve(locals);

        self.interpreter.evaluate(&expr).map_err(RunError::Runtime)
    }

    /// Scan and parse a program.  Lexical and syntactic errors are
    /// reported together.
    pub fn parse_program(&mut self, source: &str) -> Result<Vec<Stmt>, RunError> {
        let (tokens, lex_errors) = Scanner::new(source).scan_tokens();

        let mut parser = Parser::with_first_id(&tokens, self.next_expr_id);
        let parsed = parser.parse();
        self.next_expr_id = parser.next_expr_id();

        match parsed {
            Ok(statements) if lex_errors.is_empty() => Ok(statements),
            Ok(_) => Err(syntax_error(lex_errors, Vec::new())),
            Err(parse_errors) => Err(syntax_error(lex_errors, parse_errors)),
        }
    }

    /// Read an expression written in the debug printer's prefix form.
    /// Node ids continue from the session's counter.
    pub fn read_expression(&mut self, prefix: &str) -> Result<Expr, RunError> {
        let (expr, next_id) = read_with_first_id(prefix, self.next_expr_id)
            .map_err(|e| RunError::Syntax(vec![e]))?;

        self.next_expr_id = next_id;

        Ok(expr)
    }

    /// Scan and parse a single expression followed by end of input.
    pub fn parse_expression(&mut self, source: &str) -> Result<Expr, RunError> {
        let (tokens, lex_errors) = Scanner::new(source).scan_tokens();

        let mut parser = Parser::with_first_id(&tokens, self.next_expr_id);
        let parsed = parser.parse_expression();
        self.next_expr_id = parser.next_expr_id();

        match parsed {
            Ok(expr) if lex_errors.is_empty() => Ok(expr),
            Ok(_) => Err(syntax_error(lex_errors, Vec::new())),
            Err(parse_errors) => Err(syntax_error(lex_errors, parse_errors)),
        }
    }
}

fn syntax_error(mut errors: Vec<LoxError>, parse_errors: Vec<LoxError>) -> RunError {
    errors.extend(parse_errors);

    // stable: scanner errors stay ahead of parser errors on the same line
    errors.sort_by_key(|error| error.line().unwrap_or(usize::MAX));

    RunError::Syntax(errors)
}
