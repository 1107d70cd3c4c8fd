// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Authentication Module
//!
//! Wallet-signature authentication for the marketplace API.
//!
//! ## Auth Flow
//!
//! 1. Client requests a nonce for its wallet address
//!    (`GET /api/auth/nonce/{address}`). The server creates the user row on
//!    first contact and stores a fresh random nonce.
//! 2. The wallet signs the challenge message (EIP-191 personal-sign) and the
//!    client posts `{ address, signature }` to `/api/auth/verify`.
//! 3. The server recovers the signer address from the signature, compares it
//!    case-insensitively to the claimed address, rotates the nonce, and
//!    issues an HS256 bearer token valid for 7 days.
//! 4. Subsequent requests carry `Authorization: Bearer <token>`, validated by
//!    the [`Auth`] extractor.
//!
//! ## Security
//!
//! - A nonce verifies at most once: rotation on success invalidates any
//!   replayed signature.
//! - A failed attempt leaves the nonce in place; retrying is harmless since
//!   each attempt must produce a valid signature over the issued nonce.

pub mod error;
pub mod extractor;
pub mod signature;
pub mod token;

pub use error::AuthError;
pub use extractor::{Auth, AuthUser, MaybeAuth};
pub use token::{Claims, TokenKeys};
