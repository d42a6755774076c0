//! Completion certificates for winning runs.
//!
//! A certificate carries a short identifier derived from the run it
//! describes. Share codes have the form `cert:v1:<payload>`, where the
//! payload is the bincode encoding in unpadded base64. Decoding recomputes
//! the identifier so edited payloads are rejected.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use cyberdoom_core::{RunOutcome, RunStats};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::format_time;

const CODE_DOMAIN: &str = "cert";
const CODE_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';
/// Digest bytes kept in a certificate identifier.
const ID_BYTES: usize = 10;
const GUEST_NAME: &str = "Guest";

/// Prefix of every share code.
pub const CERTIFICATE_HEADER: &str = "cert:v1";

/// Reasons a share code cannot be turned back into a certificate.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// The code was empty or whitespace.
    #[error("certificate code was empty")]
    Empty,
    /// The code does not start with the certificate domain.
    #[error("certificate prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment is missing.
    #[error("certificate code is missing the version")]
    MissingVersion,
    /// The version segment names an unknown format.
    #[error("certificate version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The payload segment is missing.
    #[error("certificate code is missing the payload")]
    MissingPayload,
    /// The payload is not valid base64.
    #[error("could not decode certificate payload")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload bytes are not a certificate.
    #[error("could not parse certificate payload")]
    InvalidPayload(#[source] bincode::Error),
    /// The certificate could not be serialized.
    #[error("could not encode certificate")]
    Encode(#[source] bincode::Error),
    /// The identifier does not match the certified run.
    #[error("certificate id {found} does not match its contents")]
    Tampered {
        /// Identifier stored in the payload.
        found: String,
    },
}

/// Proof of a won run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    id: String,
    name: String,
    score: u32,
    time_ms: u64,
    level: u32,
}

impl Certificate {
    /// Issues a certificate for a won run on the one-based `level`.
    ///
    /// Returns `None` unless the run was won. A blank name is replaced by a
    /// guest name.
    #[must_use]
    pub fn issue(name: &str, stats: &RunStats, level: u32) -> Option<Self> {
        if stats.outcome != Some(RunOutcome::Won) {
            return None;
        }
        let name = match name.trim() {
            "" => GUEST_NAME.to_owned(),
            trimmed => trimmed.to_owned(),
        };
        let time_ms = u64::try_from(stats.elapsed.as_millis()).unwrap_or(u64::MAX);
        Some(Self {
            id: certificate_id(&name, stats.score, time_ms, level),
            name,
            score: stats.score,
            time_ms,
            level,
        })
    }

    /// Hex identifier derived from the certified run.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the certified player.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Certified score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Certified run time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }

    /// Certified run time formatted as `m:ss`.
    #[must_use]
    pub fn time_label(&self) -> String {
        format_time(self.elapsed())
    }

    /// One-based level number.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Encodes the certificate into a single-line share code.
    pub fn share_code(&self) -> Result<String, CertificateError> {
        let bytes = bincode::serialize(self).map_err(CertificateError::Encode)?;
        Ok(format!(
            "{CERTIFICATE_HEADER}{FIELD_DELIMITER}{}",
            STANDARD_NO_PAD.encode(bytes)
        ))
    }

    /// Decodes and validates a share code.
    pub fn decode(code: &str) -> Result<Self, CertificateError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(CertificateError::Empty);
        }

        let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
        let domain = parts.next().unwrap_or_default();
        let version = parts.next().ok_or(CertificateError::MissingVersion)?;
        if domain != CODE_DOMAIN {
            return Err(CertificateError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(CertificateError::UnsupportedVersion(version.to_owned()));
        }
        let payload = parts
            .next()
            .filter(|payload| !payload.is_empty())
            .ok_or(CertificateError::MissingPayload)?;

        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let certificate: Self =
            bincode::deserialize(&bytes).map_err(CertificateError::InvalidPayload)?;

        let expected = certificate_id(
            &certificate.name,
            certificate.score,
            certificate.time_ms,
            certificate.level,
        );
        if certificate.id != expected {
            return Err(CertificateError::Tampered {
                found: certificate.id,
            });
        }
        Ok(certificate)
    }
}

fn certificate_id(name: &str, score: u32, time_ms: u64, level: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{name}|{score}|{time_ms}|{level}").as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .take(ID_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
