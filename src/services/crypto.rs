//! Request signing for the fund-administration API.
//!
//! The signature is the base64 encoding of an AES-256-CBC encryption of
//! `{timestamp_ms}{api_key}{passphrase}{api_secret}`, keyed with
//! PBKDF2-HMAC-SHA256(`api_secret`, salt = `passphrase`). The server recomputes
//! the same value, so every step here has to match it byte for byte.

use crate::models::common::Credentials;
use crate::models::requests::SignedHeader;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use openssl::hash::MessageDigest;
use openssl::pkcs5::pbkdf2_hmac;
use openssl::symm::{Cipher, Crypter, Mode};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Length of the derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

pub const PBKDF2_ITERATIONS: usize = 65536;

// WARNING: the all-zero IV is mandated by the server's signature verification.
// Replacing it with a random IV breaks authentication against the service.
// This construction is for interoperability only and must not be reused as a
// general-purpose encryption scheme.
const ZERO_IV: [u8; BLOCK_SIZE] = [0u8; BLOCK_SIZE];

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("OpenSSL error: {0}")]
    OpenSslError(#[from] openssl::error::ErrorStack),

    #[error("Signature is not valid base64: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Invalid PKCS#7 padding: {0}")]
    PaddingError(String),

    #[error("Decrypted message is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

/// Derives the 32-byte AES key from the API secret (password) and passphrase (salt).
pub fn derive_key(api_secret: &str, passphrase: &str) -> Result<[u8; KEY_LEN], CryptoError> {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac(
        api_secret.as_bytes(),
        passphrase.as_bytes(),
        PBKDF2_ITERATIONS,
        MessageDigest::sha256(),
        &mut key,
    )?;
    Ok(key)
}

/// Builds the plaintext that gets encrypted into the signature.
pub fn signing_message(
    api_key: &str,
    api_secret: &str,
    passphrase: &str,
    timestamp_ms: i64,
) -> String {
    format!("{}{}{}{}", timestamp_ms, api_key, passphrase, api_secret)
}

// The pad length must fit in a single byte.
fn check_block_size(block_size: usize) -> Result<u8, CryptoError> {
    match u8::try_from(block_size) {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(CryptoError::PaddingError(format!(
            "block size {} must be between 1 and 255",
            block_size
        ))),
    }
}

pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    let block = check_block_size(block_size)?;
    let pad_len = block - (data.len() % block_size) as u8;
    let mut padded = Vec::with_capacity(data.len() + usize::from(pad_len));
    padded.extend_from_slice(data);
    padded.resize(data.len() + usize::from(pad_len), pad_len);
    Ok(padded)
}

pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    check_block_size(block_size)?;
    if data.len() % block_size != 0 {
        return Err(CryptoError::PaddingError(format!(
            "length {} is not a multiple of {}",
            data.len(),
            block_size
        )));
    }

    let Some(&last) = data.last() else {
        return Err(CryptoError::PaddingError("input is empty".to_string()));
    };

    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > block_size {
        return Err(CryptoError::PaddingError(format!(
            "pad length {} out of range",
            pad_len
        )));
    }

    let (content, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| usize::from(b) != pad_len) {
        return Err(CryptoError::PaddingError(
            "inconsistent padding bytes".to_string(),
        ));
    }

    Ok(content.to_vec())
}

// Padding is applied by pkcs7_pad, so the cipher itself runs unpadded.
fn run_cipher(mode: Mode, key: &[u8; KEY_LEN], input: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Cipher::aes_256_cbc();
    let mut crypter = Crypter::new(cipher, mode, key, Some(ZERO_IV.as_slice()))?;
    crypter.pad(false);

    let mut output = vec![0u8; input.len() + cipher.block_size()];
    let mut count = crypter.update(input, &mut output)?;
    count += crypter.finalize(&mut output[count..])?;
    output.truncate(count);

    Ok(output)
}

fn seal(key: &[u8; KEY_LEN], message: &str) -> Result<String, CryptoError> {
    let padded = pkcs7_pad(message.as_bytes(), BLOCK_SIZE)?;
    let ciphertext = run_cipher(Mode::Encrypt, key, &padded)?;
    Ok(BASE64.encode(ciphertext))
}

/// Computes the request signature for the given credentials and timestamp.
///
/// Deterministic: identical inputs always produce the identical signature.
pub fn sign(
    api_key: &str,
    api_secret: &str,
    passphrase: &str,
    timestamp_ms: i64,
) -> Result<String, CryptoError> {
    let key = derive_key(api_secret, passphrase)?;
    seal(
        &key,
        &signing_message(api_key, api_secret, passphrase, timestamp_ms),
    )
}

/// Decrypts a signature back into the message it was computed over.
pub fn open_signature(
    signature: &str,
    api_secret: &str,
    passphrase: &str,
) -> Result<String, CryptoError> {
    let ciphertext = BASE64.decode(signature)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::PaddingError(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let key = derive_key(api_secret, passphrase)?;
    let padded = run_cipher(Mode::Decrypt, &key, &ciphertext)?;
    let message = pkcs7_unpad(&padded, BLOCK_SIZE)?;

    Ok(String::from_utf8(message)?)
}

/// Recomputes the expected signature and compares it in constant time.
pub fn verify_signature(
    signature: &str,
    api_key: &str,
    api_secret: &str,
    passphrase: &str,
    timestamp_ms: i64,
) -> Result<bool, CryptoError> {
    let expected = sign(api_key, api_secret, passphrase, timestamp_ms)?;
    Ok(expected.as_bytes().ct_eq(signature.as_bytes()).unwrap_u8() == 1)
}

/// Signs requests for one set of credentials.
///
/// The derived key only depends on the secret and passphrase, so it is computed
/// once here instead of running 65536 PBKDF2 rounds on every request.
pub struct Signer {
    credentials: Credentials,
    key: [u8; KEY_LEN],
}

impl Signer {
    pub fn new(credentials: Credentials) -> Result<Self, CryptoError> {
        let key = derive_key(credentials.api_secret(), credentials.passphrase())?;
        Ok(Signer { credentials, key })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn sign(&self, timestamp_ms: i64) -> Result<String, CryptoError> {
        let message = signing_message(
            self.credentials.api_key(),
            self.credentials.api_secret(),
            self.credentials.passphrase(),
            timestamp_ms,
        );
        seal(&self.key, &message)
    }

    /// Builds the header block for a single request made at `timestamp_ms`.
    pub fn signed_header(
        &self,
        time_zone: &str,
        timestamp_ms: i64,
    ) -> Result<SignedHeader, CryptoError> {
        Ok(SignedHeader::new(
            self.sign(timestamp_ms)?,
            self.credentials.api_key(),
            time_zone,
            timestamp_ms,
        ))
    }
}
