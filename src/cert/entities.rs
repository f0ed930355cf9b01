use std::collections::BTreeSet;
use std::fmt;

use bon::Builder;

use crate::error::{EntCertError, Result};

/// Splits a comma-delimited tag list into a set of trimmed, non-empty tags.
///
/// # Example
/// ```
/// use entcert::cert::entities::parse_tags;
///
/// let tags = parse_tags(Some("rhel-6, rhel-6-server,"));
/// assert_eq!(tags.len(), 2);
/// assert!(tags.contains("rhel-6-server"));
/// assert!(parse_tags(None).is_empty());
/// ```
pub fn parse_tags(value: Option<&str>) -> BTreeSet<String> {
    value
        .into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Product information carried by product and entitlement certificates.
///
/// Two products are equal when their ids are equal.
///
/// # Fields
/// * `id` - The product id, taken from the product's identifier segment.
/// * `name` - Display name.
/// * `version` - Product version string.
/// * `arch` - Architecture string, possibly a comma list.
/// * `provided_tags` - Tags this product provides to content sets.
#[derive(Debug, Clone, Builder)]
pub struct Product {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub arch: Option<String>,
    #[builder(default)]
    pub provided_tags: BTreeSet<String>,
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

/// Order information for the subscription an entitlement originated from.
///
/// Every field is optional; `None` means the server did not specify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct Order {
    pub name: Option<String>,
    /// Order number.
    pub number: Option<String>,
    pub sku: Option<String>,
    pub subscription: Option<String>,
    /// Total quantity on the order.
    pub quantity: Option<i64>,
    pub virt_limit: Option<String>,
    pub socket_limit: Option<String>,
    pub contract_number: Option<String>,
    /// Quantity consumed by this entitlement.
    pub quantity_used: Option<String>,
    pub warning_period: Option<String>,
    pub account_number: Option<String>,
    pub provides_management: Option<String>,
    pub support_level: Option<String>,
    pub support_type: Option<String>,
    pub stacking_id: Option<String>,
    pub virt_only: Option<String>,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Order: name={} number={} support_level={}>",
            display_opt(&self.name),
            display_opt(&self.number),
            display_opt(&self.support_level)
        )
    }
}

/// A content set (repository) an entitlement grants access to.
///
/// Two content entries are equal when their labels are equal.
#[derive(Debug, Clone, Builder)]
pub struct Content {
    pub name: Option<String>,
    pub label: Option<String>,
    pub quantity: Option<i64>,
    pub flex_quantity: Option<i64>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub gpg: Option<String>,
    #[builder(default = true)]
    pub enabled: bool,
    pub metadata_expire: Option<String>,
    #[builder(default)]
    pub required_tags: BTreeSet<String>,
}

impl Content {
    /// Decodes the raw enabled flag.
    ///
    /// An absent flag or `"1"` means enabled, `"0"` means disabled.
    ///
    /// # Errors
    /// `InvalidFieldValue` for anything else.
    pub fn decode_enabled(value: Option<&str>) -> Result<bool> {
        match value {
            None | Some("1") => Ok(true),
            Some("0") => Ok(false),
            Some(other) => Err(EntCertError::invalid_field("enabled", other)),
        }
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Content {}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Content: name={} label={} enabled={}>",
            display_opt(&self.name),
            display_opt(&self.label),
            self.enabled
        )
    }
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}
