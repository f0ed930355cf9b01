use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bon::Builder;
use der::Decode;
use tracing::{debug, warn};

use crate::cert::entities::{Content, Order, Product, parse_tags};
use crate::cert::raw::RawCertificate;
use crate::cert::{
    Certificate, CertificateKind, CertificateType, DateRange, EntitlementCertificate,
    IdentityCertificate, ProductCertificate,
};
use crate::error::{EntCertError, Result};
use crate::extensions::ExtensionTree;
use crate::namespace as ns;
use crate::oid::{Oid, OidPattern};
use crate::pem_utils::{CERTIFICATE_LABEL, pem_block_to_der};
use crate::version::{MajorVersion, Version};

/// Decides what kind of certificate a vendor extension tree describes.
///
/// The server sends no explicit type field, so this is a heuristic and its
/// precedence is part of the wire format:
///
/// 1. no vendor extensions at all: identity certificate
/// 2. an order name is present: entitlement certificate
/// 3. anything else: product certificate
///
/// A product certificate without any vendor extension is therefore reported as
/// an identity certificate. The format offers nothing to tell the two apart.
///
/// `tree` is expected to be scoped to the vendor namespace already, as
/// [`CertFactory`] does by taking its branch. Extensions outside the namespace
/// never count, however many segments they have, so a certificate carrying
/// only foreign extensions is an identity certificate.
pub fn classify(tree: &ExtensionTree) -> CertificateType {
    if tree.is_empty() {
        CertificateType::Identity
    } else if tree.contains_str(ns::ORDER_NAME) {
        CertificateType::Entitlement
    } else {
        CertificateType::Product
    }
}

/// Builds typed certificates from raw certificates.
///
/// # Example
/// ```
/// use entcert::factory::CertFactory;
///
/// let factory = CertFactory::default();
/// assert_eq!(factory.namespace().to_string(), "1.3.6.1.4.1.2312.9");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct CertFactory {
    /// Root under which the vendor extensions live.
    #[builder(default = ns::vendor_root())]
    namespace: Oid,
}

impl Default for CertFactory {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CertFactory {
    pub fn namespace(&self) -> &Oid {
        &self.namespace
    }

    /// Reads a certificate from a PEM file, recording its path.
    pub fn create_from_file(&self, path: impl AsRef<Path>) -> Result<Certificate> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        self.create_from_pem(&contents, Some(path.to_path_buf()))
    }

    /// Reads the first `CERTIFICATE` block of a PEM document.
    pub fn create_from_pem(&self, pem: &str, path: Option<PathBuf>) -> Result<Certificate> {
        let der = pem_block_to_der(pem, CERTIFICATE_LABEL)?;
        let x509 = x509_cert::Certificate::from_der(&der)?;
        self.create_with_path(&x509, path)
    }

    pub fn create_from_der(&self, der: &[u8]) -> Result<Certificate> {
        let x509 = x509_cert::Certificate::from_der(der)?;
        self.create(&x509)
    }

    pub fn create<R: RawCertificate + ?Sized>(&self, raw: &R) -> Result<Certificate> {
        self.create_with_path(raw, None)
    }

    /// Builds the certificate described by `raw`.
    ///
    /// # Errors
    /// Any malformed extension identifier, unsupported format version or
    /// invalid field value fails the whole build.
    pub fn create_with_path<R: RawCertificate + ?Sized>(
        &self,
        raw: &R,
        path: Option<PathBuf>,
    ) -> Result<Certificate> {
        let tree = ExtensionTree::new(raw.extensions())?.branch(&self.namespace);

        let version = match tree.get(ns::CERT_VERSION) {
            Ok(text) => text.parse::<Version>()?,
            Err(EntCertError::NotFound(_)) => Version::default(),
            Err(err) => return Err(err),
        };
        debug!(%version, extensions = tree.len(), "read certificate version");

        let kind = match MajorVersion::from(&version) {
            MajorVersion::V1 => self.build_v1(&tree, raw)?,
            MajorVersion::Unsupported(_) => {
                return Err(EntCertError::UnsupportedVersion(version.to_string()));
            }
        };

        let valid_range = DateRange::new(raw.not_before(), raw.not_after());
        Ok(Certificate::new(
            raw.to_der()?,
            path,
            version,
            raw.serial()?,
            valid_range,
            kind,
        ))
    }

    fn build_v1<R: RawCertificate + ?Sized>(
        &self,
        tree: &ExtensionTree,
        raw: &R,
    ) -> Result<CertificateKind> {
        let cert_type = classify(tree);
        debug!(?cert_type, "classified certificate");
        Ok(match cert_type {
            CertificateType::Identity => CertificateKind::Identity(read_identity(raw)),
            CertificateType::Product => CertificateKind::Product(ProductCertificate {
                products: parse_products(tree)?,
            }),
            CertificateType::Entitlement => {
                let order = parse_order(tree)?;
                let content = parse_content(tree)?;
                let products = parse_products(tree)?;
                debug!(
                    products = products.len(),
                    content = content.len(),
                    "parsed entitlement"
                );
                CertificateKind::Entitlement(EntitlementCertificate {
                    products,
                    order,
                    content,
                })
            }
        })
    }
}

fn read_identity<R: RawCertificate + ?Sized>(raw: &R) -> IdentityCertificate {
    let mut subject = BTreeMap::new();
    for (key, value) in raw.subject() {
        // First occurrence of an attribute wins.
        subject.entry(key).or_insert(value);
    }
    IdentityCertificate {
        subject,
        alt_name: raw.alt_name(),
    }
}

/// Absent fields become `None`; every other lookup error propagates.
fn field(tree: &ExtensionTree, path: &str) -> Result<Option<String>> {
    match tree.get(path) {
        Ok(value) => Ok(Some(value.to_string())),
        Err(EntCertError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

fn strict_int(tree: &ExtensionTree, path: &str, name: &str) -> Result<Option<i64>> {
    match field(tree, path)? {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EntCertError::invalid_field(name, value)),
    }
}

/// Older servers sent junk in the order quantity; treat it as unspecified.
fn lenient_int(tree: &ExtensionTree, path: &str) -> Result<Option<i64>> {
    Ok(field(tree, path)?.and_then(|value| match value.trim().parse() {
        Ok(quantity) => Some(quantity),
        Err(_) => {
            warn!(value = %value, "ignoring non-numeric order quantity");
            None
        }
    }))
}

fn parse_products(tree: &ExtensionTree) -> Result<Vec<Product>> {
    let pattern: OidPattern = ns::PRODUCT_PATTERN.parse()?;
    tree.find(&pattern)
        .into_iter()
        .map(|(oid, _)| -> Result<Product> {
            let product = tree.branch(&oid.rtrim(1)?);
            let provided_tags = field(&product, ns::PRODUCT_PROVIDED_TAGS)?;
            Ok(Product::builder()
                .id(oid.at(1)?.to_string())
                .maybe_name(field(&product, ns::PRODUCT_NAME)?)
                .maybe_version(field(&product, ns::PRODUCT_VERSION)?)
                .maybe_arch(field(&product, ns::PRODUCT_ARCH)?)
                .provided_tags(parse_tags(provided_tags.as_deref()))
                .build())
        })
        .collect()
}

fn parse_order(tree: &ExtensionTree) -> Result<Order> {
    let order = tree.branch(&Oid::from_static(ns::ORDER_NAMESPACE));
    Ok(Order::builder()
        .maybe_name(field(&order, ns::ORDER_NAME_FIELD)?)
        .maybe_number(field(&order, ns::ORDER_NUMBER)?)
        .maybe_sku(field(&order, ns::ORDER_SKU)?)
        .maybe_subscription(field(&order, ns::ORDER_SUBSCRIPTION)?)
        .maybe_quantity(lenient_int(&order, ns::ORDER_QUANTITY)?)
        .maybe_virt_limit(field(&order, ns::ORDER_VIRT_LIMIT)?)
        .maybe_socket_limit(field(&order, ns::ORDER_SOCKET_LIMIT)?)
        .maybe_contract_number(field(&order, ns::ORDER_CONTRACT_NUMBER)?)
        .maybe_quantity_used(field(&order, ns::ORDER_QUANTITY_USED)?)
        .maybe_warning_period(field(&order, ns::ORDER_WARNING_PERIOD)?)
        .maybe_account_number(field(&order, ns::ORDER_ACCOUNT_NUMBER)?)
        .maybe_provides_management(field(&order, ns::ORDER_PROVIDES_MANAGEMENT)?)
        .maybe_support_level(field(&order, ns::ORDER_SUPPORT_LEVEL)?)
        .maybe_support_type(field(&order, ns::ORDER_SUPPORT_TYPE)?)
        .maybe_stacking_id(field(&order, ns::ORDER_STACKING_ID)?)
        .maybe_virt_only(field(&order, ns::ORDER_VIRT_ONLY)?)
        .build())
}

fn parse_content(tree: &ExtensionTree) -> Result<Vec<Content>> {
    let pattern: OidPattern = ns::CONTENT_PATTERN.parse()?;
    tree.find(&pattern)
        .into_iter()
        .map(|(oid, _)| -> Result<Content> {
            let content = tree.branch(&oid.rtrim(1)?);
            let enabled = field(&content, ns::CONTENT_ENABLED)?;
            let required_tags = field(&content, ns::CONTENT_REQUIRED_TAGS)?;
            Ok(Content::builder()
                .maybe_name(field(&content, ns::CONTENT_NAME)?)
                .maybe_label(field(&content, ns::CONTENT_LABEL)?)
                .maybe_quantity(strict_int(&content, ns::CONTENT_QUANTITY, "quantity")?)
                .maybe_flex_quantity(strict_int(
                    &content,
                    ns::CONTENT_FLEX_QUANTITY,
                    "flex_quantity",
                )?)
                .maybe_vendor(field(&content, ns::CONTENT_VENDOR)?)
                .maybe_url(field(&content, ns::CONTENT_URL)?)
                .maybe_gpg(field(&content, ns::CONTENT_GPG)?)
                .enabled(Content::decode_enabled(enabled.as_deref())?)
                .maybe_metadata_expire(field(&content, ns::CONTENT_METADATA_EXPIRE)?)
                .required_tags(parse_tags(required_tags.as_deref()))
                .build())
        })
        .collect()
}
