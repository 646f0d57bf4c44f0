//! TLS certificate discovery and loading
//!
//! A certificate bundle is a single file holding the certificate chain and
//! the private key: PEM by default, `.pfx` / `.p12` with the `pkcs12` feature.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::core::{Config, StartupError};

/// Bundle file name looked up in every candidate `certs/` directory
pub const CERT_FILE_NAME: &str = "print-bridge.pem";

/// Ordered list of places a certificate bundle may live
pub fn certificate_candidates(config: &Config) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(4);

    if let Some(path) = &config.cert_path {
        candidates.push(path.clone());
    }

    candidates.push(Path::new("certs").join(CERT_FILE_NAME));

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join("certs").join(CERT_FILE_NAME));
    }

    candidates.push(config.data_dir.join("certs").join(CERT_FILE_NAME));
    candidates
}

/// First existing candidate, or every path that was tried
pub fn discover_certificate(config: &Config) -> Result<PathBuf, StartupError> {
    let attempted = certificate_candidates(config);
    match attempted.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(StartupError::CertificateNotFound { attempted }),
    }
}

fn is_pkcs12(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pfx") || e.eq_ignore_ascii_case("p12"))
}

fn invalid(path: &Path, reason: impl ToString) -> StartupError {
    StartupError::CertificateInvalid {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Load a certificate bundle into an axum-server TLS config
pub fn load_rustls_config(path: &Path, password: Option<&str>) -> Result<RustlsConfig, StartupError> {
    let data = std::fs::read(path)?;

    let (certs, key) = if is_pkcs12(path) {
        read_pkcs12(path, &data, password)?
    } else {
        if password.is_some() {
            return Err(StartupError::Configuration(format!(
                "A certificate password was given but {} is not a PKCS#12 bundle",
                path.display()
            )));
        }
        read_pem(path, &data)?
    };

    let tls_config = build_server_config(certs, key).map_err(|e| invalid(path, e))?;
    Ok(RustlsConfig::from_config(Arc::new(tls_config)))
}

fn build_server_config(
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> Result<rustls::ServerConfig, rustls::Error> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut tls_config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    tls_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(tls_config)
}

type Bundle = (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>);

fn read_pem(path: &Path, pem: &[u8]) -> Result<Bundle, StartupError> {
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(path, e))?;
    if certs.is_empty() {
        return Err(invalid(path, "no certificate found"));
    }

    let key = rustls_pemfile::private_key(&mut &pem[..])
        .map_err(|e| invalid(path, e))?
        .ok_or_else(|| invalid(path, "no private key found"))?;

    Ok((certs, key))
}

#[cfg(feature = "pkcs12")]
fn read_pkcs12(path: &Path, der: &[u8], password: Option<&str>) -> Result<Bundle, StartupError> {
    use rustls_pki_types::PrivatePkcs8KeyDer;

    let pkcs12 = openssl::pkcs12::Pkcs12::from_der(der).map_err(|e| invalid(path, e))?;
    let parsed = pkcs12
        .parse2(password.unwrap_or_default())
        .map_err(|e| invalid(path, format!("wrong password or corrupt bundle: {e}")))?;

    let cert = parsed.cert.ok_or_else(|| invalid(path, "no certificate found"))?;
    let pkey = parsed.pkey.ok_or_else(|| invalid(path, "no private key found"))?;

    let mut certs = vec![CertificateDer::from(cert.to_der().map_err(|e| invalid(path, e))?)];
    if let Some(chain) = parsed.ca {
        for ca in chain.iter() {
            certs.push(CertificateDer::from(ca.to_der().map_err(|e| invalid(path, e))?));
        }
    }

    let key_der = pkey.private_key_to_pkcs8().map_err(|e| invalid(path, e))?;
    Ok((certs, PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_der))))
}

#[cfg(not(feature = "pkcs12"))]
fn read_pkcs12(path: &Path, _der: &[u8], _password: Option<&str>) -> Result<Bundle, StartupError> {
    Err(StartupError::Configuration(format!(
        "{} is a PKCS#12 bundle but this build lacks the `pkcs12` feature",
        path.display()
    )))
}
