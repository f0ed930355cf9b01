use const_oid::db::{rfc3280, rfc4519};
use const_oid::{AssociatedOid, ObjectIdentifier};
use der::{Any, Decode, Encode};
use time::OffsetDateTime;
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::{EntCertError, Result};

/// The fields the certificate factory reads from a parsed certificate.
///
/// Signature and trust checks are expected to have happened before a value of
/// this type reaches the factory.
pub trait RawCertificate {
    /// Certificate serial number.
    fn serial(&self) -> Result<u128>;

    /// Start of the validity period, in UTC.
    fn not_before(&self) -> OffsetDateTime;

    /// End of the validity period, in UTC.
    fn not_after(&self) -> OffsetDateTime;

    /// Subject attributes as `(short name, value)` pairs, e.g. `("CN", "host")`.
    ///
    /// The subject's unique identifier attribute is keyed `UID`.
    fn subject(&self) -> Vec<(String, String)>;

    /// Rendered subject alternative name, if the certificate has one.
    fn alt_name(&self) -> Option<String>;

    /// Every extension as a `(dotted identifier, value)` pair.
    fn extensions(&self) -> Vec<(String, String)>;

    /// DER encoding of the whole signed certificate.
    fn to_der(&self) -> Result<Vec<u8>>;
}

/// Subject attribute short names, in the order they are reported.
const SUBJECT_ATTRIBUTES: &[(&str, ObjectIdentifier)] = &[
    ("CN", rfc4519::CN),
    ("SN", rfc4519::SN),
    ("serialNumber", rfc4519::SERIAL_NUMBER),
    ("C", rfc4519::C),
    ("L", rfc4519::L),
    ("ST", rfc4519::ST),
    ("O", rfc4519::O),
    ("OU", rfc4519::OU),
    ("GN", rfc4519::GIVEN_NAME),
    ("emailAddress", rfc3280::EMAIL_ADDRESS),
    // Unique identifier of the consumer the identity certificate was issued to.
    ("UID", rfc4519::UID),
];

fn attribute_key(oid: &ObjectIdentifier) -> String {
    SUBJECT_ATTRIBUTES
        .iter()
        .find(|(_, known)| known == oid)
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| oid.to_string())
}

fn to_offset_date_time(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

/// Reads an extension payload as text.
///
/// The entitlement server wraps each value in a DER string; when the payload
/// parses as a single TLV its content bytes are used, otherwise the raw octets.
fn extension_text(bytes: &[u8]) -> String {
    match Any::from_der(bytes) {
        Ok(any) => String::from_utf8_lossy(any.value()).into_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn render_general_name(name: &GeneralName) -> Option<String> {
    match name {
        GeneralName::DnsName(dns) => Some(format!("DNS:{dns}")),
        GeneralName::Rfc822Name(email) => Some(format!("email:{email}")),
        GeneralName::UniformResourceIdentifier(uri) => Some(format!("URI:{uri}")),
        GeneralName::DirectoryName(dn) => Some(format!("DirName:/{dn}")),
        GeneralName::IpAddress(ip) => {
            let bytes = ip.as_bytes();
            let rendered = match bytes.len() {
                4 => <[u8; 4]>::try_from(bytes)
                    .ok()
                    .map(|octets| std::net::Ipv4Addr::from(octets).to_string()),
                16 => <[u8; 16]>::try_from(bytes)
                    .ok()
                    .map(|octets| std::net::Ipv6Addr::from(octets).to_string()),
                _ => None,
            };
            rendered.map(|ip| format!("IP Address:{ip}"))
        }
        GeneralName::RegisteredId(oid) => Some(format!("Registered ID:{oid}")),
        _ => None,
    }
}

impl RawCertificate for x509_cert::Certificate {
    fn serial(&self) -> Result<u128> {
        let bytes = self.tbs_certificate.serial_number.as_bytes();
        let significant: &[u8] = match bytes.iter().position(|&b| b != 0) {
            Some(start) => &bytes[start..],
            None => &[],
        };
        if significant.len() > 16 {
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            return Err(EntCertError::invalid_field("serial", hex));
        }
        Ok(significant
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | u128::from(b)))
    }

    fn not_before(&self) -> OffsetDateTime {
        to_offset_date_time(&self.tbs_certificate.validity.not_before)
    }

    fn not_after(&self) -> OffsetDateTime {
        to_offset_date_time(&self.tbs_certificate.validity.not_after)
    }

    fn subject(&self) -> Vec<(String, String)> {
        self.tbs_certificate
            .subject
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .filter_map(|attr| {
                std::str::from_utf8(attr.value.value())
                    .ok()
                    .map(|value| (attribute_key(&attr.oid), value.to_string()))
            })
            .collect()
    }

    fn alt_name(&self) -> Option<String> {
        let ext = self
            .tbs_certificate
            .extensions
            .as_ref()?
            .iter()
            .find(|ext| ext.extn_id == x509_cert::ext::pkix::SubjectAltName::OID)?;
        let san =
            x509_cert::ext::pkix::SubjectAltName::from_der(ext.extn_value.as_bytes()).ok()?;
        let names: Vec<String> = san.0.iter().filter_map(render_general_name).collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    fn extensions(&self) -> Vec<(String, String)> {
        self.tbs_certificate
            .extensions
            .iter()
            .flatten()
            .map(|ext| {
                (
                    ext.extn_id.to_string(),
                    extension_text(ext.extn_value.as_bytes()),
                )
            })
            .collect()
    }

    fn to_der(&self) -> Result<Vec<u8>> {
        Encode::to_der(self).map_err(|e| EntCertError::EncodingError(e.to_string()))
    }
}
