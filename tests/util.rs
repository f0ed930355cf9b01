use std::str::FromStr;

use der::Encode;
use der::asn1::{BitString, OctetString};
use entcert::pem_utils::{CERTIFICATE_LABEL, der_to_pem};
use time::{Duration, OffsetDateTime};
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::{Time, Validity};

pub const VENDOR_ROOT: &str = "1.3.6.1.4.1.2312.9";

/// Describes a certificate as the entitlement server would issue it.
pub struct TestCert<'a> {
    pub subject: &'a str,
    pub serial: &'a [u8],
    /// Extensions relative to the vendor root.
    pub vendor_extensions: &'a [(&'a str, &'a str)],
    pub alt_name: Option<&'a str>,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Default for TestCert<'_> {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            subject: "CN=entitlement.test.local",
            serial: &[0x01, 0x7c],
            vendor_extensions: &[],
            alt_name: None,
            not_before: now - Duration::days(1),
            not_after: now + Duration::days(365),
        }
    }
}

fn ed25519() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc8410::ID_ED_25519,
        parameters: None,
    }
}

fn utc(time: OffsetDateTime) -> Time {
    Time::UtcTime(der::asn1::UtcTime::from_system_time(time.into()).unwrap())
}

fn string_extension(oid: &str, value: &str) -> Extension {
    Extension {
        extn_id: const_oid::ObjectIdentifier::new(oid).unwrap(),
        critical: false,
        extn_value: OctetString::new(value.to_string().to_der().unwrap()).unwrap(),
    }
}

/// Builds an unsigned (zero signature) certificate; nothing in entcert checks signatures.
pub fn build(spec: &TestCert<'_>) -> x509_cert::Certificate {
    let mut extensions: Vec<Extension> = spec
        .vendor_extensions
        .iter()
        .map(|(oid, value)| string_extension(&format!("{VENDOR_ROOT}.{oid}"), value))
        .collect();

    if let Some(alt_name) = spec.alt_name {
        let san = x509_cert::ext::pkix::SubjectAltName(vec![GeneralName::DirectoryName(
            Name::from_str(alt_name).unwrap(),
        )]);
        extensions.push(Extension {
            extn_id: <x509_cert::ext::pkix::SubjectAltName as const_oid::AssociatedOid>::OID,
            critical: false,
            extn_value: OctetString::new(san.to_der().unwrap()).unwrap(),
        });
    }

    let tbs_certificate = x509_cert::TbsCertificate {
        version: x509_cert::Version::V3,
        serial_number: SerialNumber::new(spec.serial).unwrap(),
        signature: ed25519(),
        issuer: Name::from_str("CN=Entitlement Test CA").unwrap(),
        validity: Validity {
            not_before: utc(spec.not_before),
            not_after: utc(spec.not_after),
        },
        subject: Name::from_str(spec.subject).unwrap(),
        subject_public_key_info: SubjectPublicKeyInfoOwned {
            algorithm: ed25519(),
            subject_public_key: BitString::from_bytes(&[0u8; 32]).unwrap(),
        },
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(extensions),
    };

    x509_cert::Certificate {
        tbs_certificate,
        signature_algorithm: ed25519(),
        signature: BitString::from_bytes(&[0u8; 64]).unwrap(),
    }
}

pub fn to_pem(cert: &x509_cert::Certificate) -> String {
    der_to_pem(&cert.to_der().unwrap(), CERTIFICATE_LABEL)
}
