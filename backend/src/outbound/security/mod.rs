//! Credential adapters: bcrypt password hashing and HS256 token signing.

mod bcrypt_hasher;
mod jwt_signer;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt_signer::{JwtTokenSigner, MIN_SECRET_BYTES};
