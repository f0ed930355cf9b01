pub mod entities;
pub mod raw;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::debug;

use crate::error::Result;
use crate::pem_utils::{CERTIFICATE_LABEL, der_to_pem};
use crate::version::Version;
use entities::{Content, Order, Product};

/// A closed date range, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DateRange {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range, bounds included.
    pub fn has_date(&self, date: OffsetDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The three certificate types issued by the entitlement server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateType {
    Identity,
    Product,
    Entitlement,
}

/// Identity of a registered consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCertificate {
    /// Subject attributes keyed by short name (`CN`, `O`, `UID`, ...).
    pub subject: BTreeMap<String, String>,
    pub alt_name: Option<String>,
}

/// Products installed on or offered to a system.
///
/// The first product is the primary ("marketing") product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCertificate {
    pub products: Vec<Product>,
}

/// A grant of access to content, backed by an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementCertificate {
    pub products: Vec<Product>,
    pub order: Order,
    pub content: Vec<Content>,
}

/// Type-specific payload of a [`Certificate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateKind {
    Identity(IdentityCertificate),
    Product(ProductCertificate),
    Entitlement(EntitlementCertificate),
}

/// A certificate read from the entitlement server's extension format.
///
/// Holds the fields common to every certificate type plus a [`CertificateKind`]
/// payload. Dropping a certificate never touches the filesystem; use
/// [`write`](Self::write) and [`delete`](Self::delete) explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// DER encoding of the signed certificate.
    der: Vec<u8>,
    /// Where the certificate is stored, if it has been written or loaded from disk.
    pub path: Option<PathBuf>,
    pub version: Version,
    pub serial: u128,
    pub valid_range: DateRange,
    pub kind: CertificateKind,
}

impl Certificate {
    pub fn new(
        der: Vec<u8>,
        path: Option<PathBuf>,
        version: Version,
        serial: u128,
        valid_range: DateRange,
        kind: CertificateKind,
    ) -> Self {
        Self {
            der,
            path,
            version,
            serial,
            valid_range,
            kind,
        }
    }

    /// DER encoding of the underlying signed certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn start(&self) -> OffsetDateTime {
        self.valid_range.start
    }

    /// End of validity. Sort by this to order certificates by expiry.
    pub fn end(&self) -> OffsetDateTime {
        self.valid_range.end
    }

    pub fn kind(&self) -> &CertificateKind {
        &self.kind
    }

    pub fn certificate_type(&self) -> CertificateType {
        match self.kind {
            CertificateKind::Identity(_) => CertificateType::Identity,
            CertificateKind::Product(_) => CertificateType::Product,
            CertificateKind::Entitlement(_) => CertificateType::Entitlement,
        }
    }

    /// Products carried by product and entitlement certificates; empty for identity certificates.
    pub fn products(&self) -> &[Product] {
        match &self.kind {
            CertificateKind::Identity(_) => &[],
            CertificateKind::Product(cert) => &cert.products,
            CertificateKind::Entitlement(cert) => &cert.products,
        }
    }

    pub fn order(&self) -> Option<&Order> {
        match &self.kind {
            CertificateKind::Entitlement(cert) => Some(&cert.order),
            _ => None,
        }
    }

    pub fn content(&self) -> &[Content] {
        match &self.kind {
            CertificateKind::Entitlement(cert) => &cert.content,
            _ => &[],
        }
    }

    pub fn is_valid_at(&self, date: OffsetDateTime) -> bool {
        self.valid_range.has_date(date)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(OffsetDateTime::now_utc())
    }

    pub fn is_expired_at(&self, date: OffsetDateTime) -> bool {
        self.valid_range.end < date
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// Writes the certificate to `path` in PEM format and records the path.
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, der_to_pem(&self.der, CERTIFICATE_LABEL))?;
        debug!(path = %path.display(), serial = %self.serial, "wrote certificate");
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Deletes the file this certificate was loaded from or written to.
    ///
    /// Does nothing when the certificate has no path.
    pub fn delete(&self) -> Result<()> {
        if let Some(path) = &self.path {
            std::fs::remove_file(path)?;
            debug!(path = %path.display(), serial = %self.serial, "deleted certificate");
        }
        Ok(())
    }
}
