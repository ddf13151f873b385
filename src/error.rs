// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Rejected before any mutation; the record store is untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("invalid transaction type '{0}', expected income|expense")]
    BadKind(String),
    #[error("invalid budget scope '{0}', expected monthly|category")]
    BadScope(String),
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("budget limit must be greater than zero")]
    NonPositiveLimit,
    #[error("monthly budgets require a month (YYYY-MM)")]
    MissingMonth,
    #[error("category budgets require a category")]
    MissingCategory,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned HTTP status {0}")]
    Status(u16),
    #[error("malformed remote document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote document missing an id")]
    MissingId,
    #[error("remote write rejected")]
    WriteRejected,
}
