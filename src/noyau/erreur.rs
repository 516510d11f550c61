//! Taxonomie fermée des échecs d’évaluation.
//!
//! Contrat :
//! - Toute erreur interne (syntaxe, domaine, arité…) est convertie ici
//!   avant de sortir de `evaluate`.
//! - Le message (`Display`) est celui affiché tel quel par l’UI.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Empty expression.")]
    EmptyExpression,

    #[error("Invalid syntax.")]
    InvalidSyntax,

    #[error("Only numeric constants are allowed.")]
    NonNumericConstant,

    #[error("Operator '{0}' is not allowed.")]
    OperatorNotAllowed(&'static str),

    #[error("Unary operator '{0}' is not allowed.")]
    UnaryOperatorNotAllowed(&'static str),

    #[error("Only simple function calls are allowed.")]
    OnlyLiteralCallsAllowed,

    #[error("Function '{0}' is not allowed.")]
    FunctionNotAllowed(String),

    #[error("Name '{0}' is not allowed.")]
    NameNotAllowed(String),

    #[error("Unsupported expression: {0}.")]
    UnsupportedExpression(String),

    #[error("Math error: {0}.")]
    MathDomainError(String),

    #[error("Result is not a number.")]
    NonNumericResult,
}

impl EvalError {
    /// Raccourci : erreur de domaine avec message.
    pub fn domaine(msg: impl Into<String>) -> Self {
        EvalError::MathDomainError(msg.into())
    }

    /// Raccourci : construction refusée (arité, mot-clé, collection…).
    pub fn non_supporte(msg: impl Into<String>) -> Self {
        EvalError::UnsupportedExpression(msg.into())
    }
}

/// Erreur interne de l’analyseur (jetons + grammaire).
///
/// Jamais exposée : `eval.rs` la journalise puis la remplace par
/// `EvalError::InvalidSyntax`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ErreurSyntaxe(pub String);

impl ErreurSyntaxe {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<ErreurSyntaxe> for EvalError {
    fn from(_: ErreurSyntaxe) -> Self {
        EvalError::InvalidSyntax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_nomment_la_construction() {
        assert_eq!(
            EvalError::FunctionNotAllowed("__import__".into()).to_string(),
            "Function '__import__' is not allowed."
        );
        assert_eq!(
            EvalError::NameNotAllowed("x".into()).to_string(),
            "Name 'x' is not allowed."
        );
        assert_eq!(
            EvalError::non_supporte("list display").to_string(),
            "Unsupported expression: list display."
        );
        assert_eq!(
            EvalError::domaine("math domain error").to_string(),
            "Math error: math domain error."
        );
    }

    #[test]
    fn syntaxe_ne_fuit_pas() {
        let e: EvalError = ErreurSyntaxe::new("jeton inattendu ')'").into();
        assert_eq!(e, EvalError::InvalidSyntax);
        assert_eq!(e.to_string(), "Invalid syntax.");
    }
}
