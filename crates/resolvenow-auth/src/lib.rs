// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credentials for ResolveNow: Argon2id password hashes, HS256 bearer
//! tokens, and the [`AuthGate`] that turns a token into a [`Principal`].
//!
//! [`Principal`]: resolvenow_core::Principal

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{AuthGate, bearer_token};
pub use password::{UNMATCHED_PASSWORD_HASH, hash_password, verify_password};
pub use token::{Claims, TokenIssuer};
