/**
 * NeighborReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use thiserror::Error;

/// Everything that can go wrong while loading interaction data or computing recommendations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("negative interaction count {value} for user {user} and item {item}")]
    NegativeInteraction { user: usize, item: usize, value: f64 },
    #[error("non-finite interaction count {value} for user {user} and item {item}")]
    NonFiniteInteraction { user: usize, item: usize, value: f64 },
    #[error("row {row} has {found} entries, expected {expected}")]
    ShapeMismatch { row: usize, expected: usize, found: usize },
    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    #[error("user {user} does not exist, the matrix holds {num_users} users")]
    UserOutOfRange { user: usize, num_users: usize },
    #[error("invalid value for `{0}`: must be a positive number")]
    InvalidParameter(&'static str),
    #[error("found {found} {what} labels for {expected} matrix entries")]
    LabelCountMismatch { what: &'static str, expected: usize, found: usize },
    #[error("cannot parse `{value}` as a count in line {line}, column {column}")]
    Parse { line: usize, column: usize, value: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no recommendations were computed for user {user}, a worker thread failed")]
    WorkerFailed { user: usize },
}

impl Error {

    /// True for failures caused by the caller handing us unusable input, as opposed to
    /// problems reading or writing data.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Error::NegativeInteraction { .. }
            | Error::NonFiniteInteraction { .. }
            | Error::ShapeMismatch { .. }
            | Error::LengthMismatch { .. }
            | Error::UserOutOfRange { .. }
            | Error::InvalidParameter(_)
            | Error::LabelCountMismatch { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
