pub mod claims;
pub mod codec;
pub mod errors;
pub mod keys;

pub use claims::IdentityClaims;
pub use codec::TokenCodec;
pub use errors::JwtError;
pub use errors::KeyError;
pub use keys::KeyMaterial;
pub use keys::KeySource;
