use crate::error::{EntCertError, Result};

/// PEM label used for certificates.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new())
}

/// Extract the DER bytes of the first block labelled `label`.
///
/// Certificate files written by the entitlement client may carry a private
/// key block alongside the certificate, so other blocks are skipped.
pub fn pem_block_to_der(pem_str: &str, label: &str) -> Result<Vec<u8>> {
    pem::parse_many(pem_str)?
        .into_iter()
        .find(|block| block.tag() == label)
        .map(|block| block.into_contents())
        .ok_or_else(|| EntCertError::DecodingError(format!("no {label} block found")))
}
