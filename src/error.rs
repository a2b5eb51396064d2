//! Error taxonomy for game operations.
//!
//! Every failure is recoverable and reported to the caller with a stable
//! machine-readable kind plus a human-readable detail. A failed operation
//! never partially applies and never broadcasts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Malformed user input (name, option list) — surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// A command issued with an unmet prerequisite (e.g. starting a vote
    /// with no players).
    #[error("{0}")]
    Precondition(String),

    /// A command issued in the wrong round status.
    #[error("{0}")]
    InvalidState(String),

    /// Unknown token, option, or session.
    #[error("{0}")]
    NotFound(String),

    /// Second vote attempt in the same round. The first vote is final.
    #[error("vote already recorded for this round")]
    DuplicateVote,
}

impl GameError {
    /// Stable machine-readable kind, part of the wire contract.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::Validation(_) => "validation_error",
            GameError::Precondition(_) => "precondition_error",
            GameError::InvalidState(_) => "invalid_state_error",
            GameError::NotFound(_) => "not_found_error",
            GameError::DuplicateVote => "duplicate_vote_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GameError::Validation(_) => StatusCode::BAD_REQUEST,
            GameError::Precondition(_) => StatusCode::CONFLICT,
            GameError::InvalidState(_) => StatusCode::CONFLICT,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::DuplicateVote => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "detail": self.to_string(),
            "kind": self.kind(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(GameError::Validation("x".into()).kind(), "validation_error");
        assert_eq!(
            GameError::Precondition("x".into()).kind(),
            "precondition_error"
        );
        assert_eq!(
            GameError::InvalidState("x".into()).kind(),
            "invalid_state_error"
        );
        assert_eq!(GameError::NotFound("x".into()).kind(), "not_found_error");
        assert_eq!(GameError::DuplicateVote.kind(), "duplicate_vote_error");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            GameError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GameError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(GameError::DuplicateVote.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn detail_is_the_message() {
        let err = GameError::Precondition("at least two options required".into());
        assert_eq!(err.to_string(), "at least two options required");
    }
}
