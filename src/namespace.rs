//! Layout of the vendor extension namespace.
//!
//! Every path below except [`VENDOR_ROOT`] is relative: to the vendor root for the
//! top-level entries, or to the enclosing product, order or content branch for
//! field paths. These values are part of the server's certificate format and must
//! not change.

use crate::oid::Oid;

/// `1.3.6.1.4.1.2312.9`
pub const VENDOR_ROOT: &[u128] = &[1, 3, 6, 1, 4, 1, 2312, 9];

/// Returns [`VENDOR_ROOT`] as an identifier.
pub fn vendor_root() -> Oid {
    Oid::from_static(VENDOR_ROOT)
}

// Top level

pub const CERT_VERSION: &str = "6";
pub const ORDER_NAMESPACE: &[u128] = &[4];
/// Presence of this path marks an entitlement certificate.
pub const ORDER_NAME: &str = "4.1";
/// One match per product; the wildcard is the product id.
pub const PRODUCT_PATTERN: &str = "1.*.1";
/// One match per content set; the wildcard is the content id.
pub const CONTENT_PATTERN: &str = "2.*.1.1";

// Product fields

pub const PRODUCT_NAME: &str = "1";
pub const PRODUCT_VERSION: &str = "2";
pub const PRODUCT_ARCH: &str = "3";
pub const PRODUCT_PROVIDED_TAGS: &str = "4";

// Order fields

pub const ORDER_NAME_FIELD: &str = "1";
pub const ORDER_NUMBER: &str = "2";
pub const ORDER_SKU: &str = "3";
pub const ORDER_SUBSCRIPTION: &str = "4";
pub const ORDER_QUANTITY: &str = "5";
pub const ORDER_VIRT_LIMIT: &str = "8";
pub const ORDER_SOCKET_LIMIT: &str = "9";
pub const ORDER_CONTRACT_NUMBER: &str = "10";
pub const ORDER_QUANTITY_USED: &str = "11";
pub const ORDER_WARNING_PERIOD: &str = "12";
pub const ORDER_ACCOUNT_NUMBER: &str = "13";
pub const ORDER_PROVIDES_MANAGEMENT: &str = "14";
pub const ORDER_SUPPORT_LEVEL: &str = "15";
pub const ORDER_SUPPORT_TYPE: &str = "16";
pub const ORDER_STACKING_ID: &str = "17";
pub const ORDER_VIRT_ONLY: &str = "18";

// Content fields

pub const CONTENT_NAME: &str = "1";
pub const CONTENT_LABEL: &str = "2";
pub const CONTENT_QUANTITY: &str = "3";
pub const CONTENT_FLEX_QUANTITY: &str = "4";
pub const CONTENT_VENDOR: &str = "5";
pub const CONTENT_URL: &str = "6";
pub const CONTENT_GPG: &str = "7";
pub const CONTENT_ENABLED: &str = "8";
pub const CONTENT_METADATA_EXPIRE: &str = "9";
pub const CONTENT_REQUIRED_TAGS: &str = "10";
