//! Error types for the root-finding engines.
//!
//! This module provides a unified error type [`RootError`] that covers
//! expression parsing and evaluation, the numerical failures the engines
//! surface, configuration problems, and result persistence.

use thiserror::Error;

use crate::arith::Decimal;

/// Result type alias using [`RootError`].
pub type Result<T> = std::result::Result<T, RootError>;

/// Unified error type for all root-finding operations.
#[derive(Error, Debug)]
pub enum RootError {
    // ============ Expression Errors ============
    /// Error during lexical analysis of an expression
    #[error("Lexer error at column {column}: {message}")]
    LexerError { column: usize, message: String },

    /// Error while parsing an expression
    #[error("Parse error at column {column}: {message}")]
    ParseError { column: usize, message: String },

    /// The expression could not be evaluated at the given x
    #[error("Cannot evaluate '{expression}' at x = {x}: {reason}")]
    Evaluation {
        expression: String,
        x: Decimal,
        reason: String,
    },

    // ============ Numerical Errors ============
    /// Zero is not contained between f(xL) and f(xR)
    #[error("There is no 0 between f({x_l}) = {y_l} and f({x_r}) = {y_r}")]
    NoZeroInBracket {
        x_l: Decimal,
        x_r: Decimal,
        y_l: Decimal,
        y_r: Decimal,
    },

    /// A required denominator rounded to zero at the working scale
    #[error("Division by zero: {numerator} / {denominator} (denominator rounds to 0 at scale {scale})")]
    DivisionByZero {
        numerator: Decimal,
        denominator: Decimal,
        scale: u32,
    },

    /// The initial-guess search ran out of attempts
    #[error("No valid initial guess found for '{expression}' after {attempts} attempts (last tried x = {last_guess})")]
    NoValidInitialGuess {
        expression: String,
        attempts: usize,
        last_guess: Decimal,
    },

    /// The integer scan found no sign change
    #[error("No sign change found for '{expression}' within {steps} integer steps of 0")]
    IntervalNotFound { expression: String, steps: usize },

    // ============ Configuration Errors ============
    /// Invalid run configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Newton-Raphson requested without a derivative expression
    #[error("Newton-Raphson for '{expression}' needs a derivative expression")]
    MissingDerivative { expression: String },

    // ============ I/O Errors ============
    /// Error writing a result table
    #[error("Failed to write result file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reading a batch plan
    #[error("Failed to read batch plan '{path}': {source}")]
    PlanReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed batch plan
    #[error("Invalid batch plan '{path}': {message}")]
    PlanParseError { path: String, message: String },
}

impl RootError {
    /// Create a lexer error
    pub fn lexer(column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(column: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            column,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this failure is a numerical degeneracy of the method itself
    /// (violated bracket or vanishing denominator) rather than a problem with
    /// the inputs or the environment.
    pub fn is_numerical_degeneracy(&self) -> bool {
        matches!(
            self,
            Self::NoZeroInBracket { .. } | Self::DivisionByZero { .. }
        )
    }

    /// Whether the expression itself failed to evaluate.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(self, Self::Evaluation { .. })
    }
}
