//! TLS trust policy for the Consul connection and CA bundle loading.

use std::path::{Path, PathBuf};

use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use rustls_pemfile::Item;
use thiserror::Error;

use crate::config::BackendConfig;

/// Errors raised while loading a CA bundle. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum TrustStoreError {
    /// The bundle could not be read from disk.
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes remained that do not form a PEM block.
    #[error("{}[{index}]: does not look like a PEM-encoded block/file", path.display())]
    NotPem { path: PathBuf, index: usize },

    /// A CERTIFICATE block did not hold a usable X.509 certificate.
    #[error("{}[{index}]: {reason}", path.display())]
    BadCertificate {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    /// The whole file was scanned without finding a certificate.
    #[error("{} contains no certificates", path.display())]
    NoCertificates { path: PathBuf },

    /// The TLS backend refused the trust anchors while building the client.
    #[error("unable to configure TLS for the backend client: {0}")]
    Client(String),
}

/// How the backend's certificate chain is verified.
#[derive(Debug, Clone)]
pub enum TrustPolicy {
    /// Platform trust store.
    SystemDefault,
    /// Only the certificates from a configured PEM bundle are trusted.
    ExplicitCaBundle(Vec<CertificateDer<'static>>),
    /// No verification at all.
    SkipVerification,
}

impl TrustPolicy {
    /// Build the policy described by the backend configuration.
    ///
    /// A configured bundle is always loaded, so a broken file is reported even
    /// when verification is switched off.
    pub fn from_config(config: &BackendConfig) -> Result<Self, TrustStoreError> {
        let bundle = match &config.ca_certificate {
            Some(path) => Some(load_ca_bundle(Path::new(path))?),
            None => None,
        };

        match (bundle, config.skip_verify) {
            (Some(_), true) => {
                tracing::warn!("Both a CA bundle and --no-verify were given; certificates will NOT be verified");
                Ok(TrustPolicy::SkipVerification)
            }
            (None, true) => Ok(TrustPolicy::SkipVerification),
            (Some(certs), false) => Ok(TrustPolicy::ExplicitCaBundle(certs)),
            (None, false) => Ok(TrustPolicy::SystemDefault),
        }
    }

    /// Short label for log lines.
    pub fn describe(&self) -> String {
        match self {
            TrustPolicy::SystemDefault => "system roots".to_string(),
            TrustPolicy::ExplicitCaBundle(certs) => format!("{} pinned CA certificate(s)", certs.len()),
            TrustPolicy::SkipVerification => "verification disabled".to_string(),
        }
    }
}

/// Load every certificate from a PEM bundle on disk.
pub fn load_ca_bundle(path: &Path) -> Result<Vec<CertificateDer<'static>>, TrustStoreError> {
    let raw = std::fs::read(path).map_err(|source| TrustStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ca_bundle(&raw, path)
}

/// Decode PEM blocks until the buffer is exhausted.
///
/// Non-certificate blocks (private keys, CRLs, ...) are skipped. Each
/// certificate must be acceptable as a trust anchor.
pub fn parse_ca_bundle(raw: &[u8], path: &Path) -> Result<Vec<CertificateDer<'static>>, TrustStoreError> {
    let mut rest = raw;
    let mut certs = Vec::new();
    let mut roots = RootCertStore::empty();

    loop {
        rest = trim_leading_whitespace(rest);
        if rest.is_empty() {
            break;
        }

        let not_pem = || TrustStoreError::NotPem {
            path: path.to_path_buf(),
            index: certs.len(),
        };

        // read_one passes over block types it does not know and reports
        // Ok(None) once nothing else is left.
        let before = rest;
        let item = match rustls_pemfile::read_one(&mut rest) {
            Ok(Some(item)) => item,
            Ok(None) if ends_with_pem_block(before) => break,
            Ok(None) | Err(_) => return Err(not_pem()),
        };

        match item {
            Item::X509Certificate(der) => {
                roots.add(der.clone()).map_err(|e| TrustStoreError::BadCertificate {
                    path: path.to_path_buf(),
                    index: certs.len(),
                    reason: e.to_string(),
                })?;
                certs.push(der);
            }
            other => {
                tracing::warn!(path = %path.display(), block = pem_label(&other), "Skipping non-certificate PEM block");
            }
        }
    }

    if certs.is_empty() {
        return Err(TrustStoreError::NoCertificates {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), certificates = certs.len(), "Loaded CA bundle");
    Ok(certs)
}

fn trim_leading_whitespace(buf: &[u8]) -> &[u8] {
    let start = buf
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(buf.len());
    &buf[start..]
}

/// Whether the last non-blank line is the END marker of a PEM block.
fn ends_with_pem_block(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let last = text.lines().map(str::trim).filter(|line| !line.is_empty()).last();
    matches!(last, Some(line) if line.starts_with("-----END ") && line.ends_with("-----"))
}

fn pem_label(item: &Item) -> &'static str {
    match item {
        Item::X509Certificate(_) => "CERTIFICATE",
        Item::Pkcs1Key(_) => "RSA PRIVATE KEY",
        Item::Pkcs8Key(_) => "PRIVATE KEY",
        Item::Sec1Key(_) => "EC PRIVATE KEY",
        Item::Crl(_) => "X509 CRL",
        _ => "unknown",
    }
}
