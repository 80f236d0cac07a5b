//! Error types for board setup.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Piece placement does not describe exactly 8 ranks
    BadRankCount { found: usize },
    /// Invalid piece character in the placement string
    InvalidPiece { piece: char },
    /// Invalid castling character
    InvalidCastling { castling: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Too many files in a rank
    TooManyFiles { rank: u8 },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::BadRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { piece } => {
                write!(f, "Invalid piece character '{piece}' in FEN")
            }
            FenError::InvalidCastling { castling } => {
                write!(f, "Invalid castling character '{castling}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::TooManyFiles { rank } => {
                write!(f, "Too many files in rank {rank}")
            }
        }
    }
}

impl std::error::Error for FenError {}
