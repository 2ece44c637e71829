//! Cryptographic utilities for Tenancy Core

pub mod aes;
pub mod password;

pub use aes::{decrypt, derive_cookie_key_material, encrypt, EncryptionError, EncryptionKey};
pub use password::{hash_password, verify_password};
