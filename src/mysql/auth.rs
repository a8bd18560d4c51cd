//! Plugin challenge-response math for the three supported authentication plugins.

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// `mysql_native_password`: `SHA1(pw) XOR SHA1(scramble ++ SHA1(SHA1(pw)))`.
///
/// An empty password yields an empty auth-response, not the
/// hash of the empty string.
pub fn native_password(password: &[u8], scramble: &[u8]) -> Vec<u8> {
    if password.is_empty() {
        return Vec::new();
    }

    let sha1_pw = Sha1::digest(password);
    let sha1_sha1_pw = Sha1::digest(&sha1_pw);

    let mut hasher = Sha1::new();
    hasher.update(scramble);
    hasher.update(sha1_sha1_pw);
    let inner = hasher.finalize();

    xor(&sha1_pw, &inner)
}

/// `caching_sha2_password` (and `sha256_password`'s equivalent fast path):
/// `SHA256(pw) XOR SHA256(SHA256(SHA256(pw)) ++ scramble)`.
pub fn caching_sha2_password(password: &[u8], scramble: &[u8]) -> Vec<u8> {
    if password.is_empty() {
        return Vec::new();
    }

    let sha256_pw = Sha256::digest(password);
    let sha256_sha256_pw = Sha256::digest(sha256_pw);

    let mut hasher = Sha256::new();
    hasher.update(sha256_sha256_pw);
    hasher.update(scramble);
    let inner = hasher.finalize();

    xor(&sha256_pw, &inner)
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}

/// The RSA padding scheme to use when encrypting the password buffer for the
/// public-key-exchange path of `sha256_password`/`caching_sha2_password`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaPadding {
    /// Servers <= 8.0.4.
    Oaep,
    /// Servers > 8.0.4.
    Pkcs1v15,
}

/// Encrypts `XOR(password ++ NUL, scramble repeated to length)` with the server's RSA public
/// key, as required when TLS is not active and the server demands full authentication.
pub fn encrypt_with_public_key(
    password: &str,
    scramble: &[u8],
    public_key_pem: &str,
    padding: RsaPadding,
) -> Result<Vec<u8>> {
    let public_key = parse_public_key(public_key_pem)?;

    let mut buf: Vec<u8> = password.as_bytes().to_vec();
    buf.push(0);

    for (i, byte) in buf.iter_mut().enumerate() {
        *byte ^= scramble[i % scramble.len()];
    }

    let mut rng = rand::rngs::OsRng;

    let encrypted = match padding {
        RsaPadding::Oaep => public_key
            .encrypt(&mut rng, Oaep::new::<Sha1>(), &buf)
            .map_err(|e| Error::AuthenticationFailed(e.to_string().into_boxed_str()))?,
        RsaPadding::Pkcs1v15 => public_key
            .encrypt(&mut rng, Pkcs1v15Encrypt, &buf)
            .map_err(|e| Error::AuthenticationFailed(e.to_string().into_boxed_str()))?,
    };

    Ok(encrypted)
}

fn parse_public_key(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::AuthenticationFailed(
            format!("failed to parse server RSA public key: {e}").into_boxed_str(),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_returns_empty_response_for_empty_password() {
        assert!(native_password(b"", b"01234567890123456789").is_empty());
        assert!(caching_sha2_password(b"", b"01234567890123456789").is_empty());
    }

    #[test]
    fn it_computes_native_password_scramble_deterministically() {
        let a = native_password(b"secret", b"01234567890123456789");
        let b = native_password(b"secret", b"01234567890123456789");
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn it_computes_caching_sha2_scramble_deterministically() {
        let a = caching_sha2_password(b"secret", b"01234567890123456789");
        let b = caching_sha2_password(b"secret", b"01234567890123456789");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }
}
