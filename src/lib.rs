//! # entcert - Entitlement Certificate Reader
//!
//! entcert turns the X.509 certificates issued by a subscription/entitlement server into
//! typed Rust values. The server stores its data as custom extensions nested under the
//! vendor namespace `1.3.6.1.4.1.2312.9`; entcert treats those extensions as a tree of
//! dotted identifiers, works out which format version and certificate type it is looking
//! at, and projects the relevant subtrees into [`Product`](cert::entities::Product),
//! [`Order`](cert::entities::Order) and [`Content`](cert::entities::Content) values.
//!
//! ## Certificate Types
//!
//! - **Identity**: identifies a registered consumer; no vendor extensions.
//! - **Product**: lists installed products.
//! - **Entitlement**: grants access to content sets under an order, for a set of products.
//!
//! Signatures are not verified here. Callers are expected to have established trust before
//! handing a certificate over; validity checks only look at the date range.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use entcert::factory::CertFactory;
//!
//! # fn main() -> Result<(), entcert::error::EntCertError> {
//! let factory = CertFactory::default();
//! let cert = factory.create_from_file("/etc/pki/entitlement/1234.pem")?;
//!
//! if let Some(order) = cert.order() {
//!     println!("{order}");
//! }
//! for content in cert.content() {
//!     println!("{content}");
//! }
//! println!("expired: {}", cert.is_expired());
//! # Ok(())
//! # }
//! ```
//!
//! ### Working with the Extension Tree
//!
//! ```rust
//! use entcert::extensions::ExtensionTree;
//!
//! # fn main() -> Result<(), entcert::error::EntCertError> {
//! let tree = ExtensionTree::new([
//!     ("1.37060.1", "Awesome OS"),
//!     ("1.37065.1", "Awesome Addon"),
//! ])?;
//! let names: Vec<_> = tree
//!     .find(&"1.*.1".parse()?)
//!     .into_iter()
//!     .map(|(_, name)| name)
//!     .collect();
//! assert_eq!(names, ["Awesome OS", "Awesome Addon"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use entcert::{error::EntCertError, factory::CertFactory};
//!
//! match CertFactory::default().create_from_pem("not a certificate", None) {
//!     Ok(cert) => println!("Loaded {:?} certificate", cert.certificate_type()),
//!     Err(EntCertError::DecodingError(msg)) => println!("Failed to decode: {}", msg),
//!     Err(EntCertError::UnsupportedVersion(v)) => println!("Too new: {}", v),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`oid`]: Dotted identifiers and wildcard patterns
//! - [`extensions`]: The extension tree and its branch/search queries
//! - [`version`]: Certificate format versions
//! - [`cert`]: Certificate model and the raw certificate contract
//! - [`factory`]: Version and type dispatch, entity extraction
//! - [`namespace`]: Layout of the vendor namespace
//! - [`error`]: Error types

pub mod cert;
pub mod error;
pub mod extensions;
pub mod factory;
pub mod namespace;
pub mod oid;
pub mod pem_utils;
pub mod version;
