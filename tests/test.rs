mod util;

use entcert::cert::{CertificateKind, CertificateType};
use entcert::error::EntCertError;
use entcert::factory::CertFactory;
use entcert::pem_utils::der_to_pem;
pub type Result<T> = std::result::Result<T, EntCertError>;
use der::Encode;
use time::{Duration, OffsetDateTime};
use util::TestCert;

const ENTITLEMENT_EXTENSIONS: &[(&str, &str)] = &[
    ("6", "1.0"),
    ("1.37060.1", "Awesome OS for x86_64"),
    ("1.37060.2", "6.1"),
    ("1.37060.3", "x86_64"),
    ("1.37060.4", "awesomeos-6, awesomeos-6-x86_64"),
    ("4.1", "Awesome OS Premium Subscription"),
    ("4.2", "8a8d01f"),
    ("4.3", "AWESOMEOS-PREMIUM"),
    ("4.4", "1001"),
    ("4.5", "100"),
    ("4.13", "12345678"),
    ("4.15", "Premium"),
    ("4.16", "Level 3"),
    ("2.1.1.1", "awesomeos"),
    ("2.1.1.2", "awesomeos-x86_64-rpms"),
    ("2.1.1.5", "Awesome Vendor"),
    ("2.1.1.6", "/content/dist/awesomeos/6/x86_64/os"),
    ("2.1.1.7", "file:///etc/pki/rpm-gpg/RPM-GPG-KEY-awesomeos"),
    ("2.1.1.8", "1"),
    ("2.1.1.10", "awesomeos-6"),
    ("2.2.1.1", "awesomeos-debug"),
    ("2.2.1.2", "awesomeos-x86_64-debug-rpms"),
    ("2.2.1.8", "0"),
];

/// Reads a product certificate from PEM text.
#[test]
fn read_product_cert_from_pem() -> Result<()> {
    let x509 = util::build(&TestCert {
        vendor_extensions: &[
            ("1.69.1", "Awesome OS"),
            ("1.69.2", "3.11"),
            ("1.69.3", "ppc64"),
            ("1.69.4", "awesomeos"),
        ],
        ..TestCert::default()
    });

    let cert = CertFactory::default().create_from_pem(&util::to_pem(&x509), None)?;
    assert_eq!(cert.certificate_type(), CertificateType::Product);
    assert_eq!(cert.serial, 380);
    assert!(cert.is_valid());
    assert!(!cert.is_expired());

    let product = &cert.products()[0];
    assert_eq!(product.id, "69");
    assert_eq!(product.name.as_deref(), Some("Awesome OS"));
    assert_eq!(product.version.as_deref(), Some("3.11"));
    assert_eq!(product.arch.as_deref(), Some("ppc64"));
    assert!(product.provided_tags.contains("awesomeos"));
    Ok(())
}

/// Reads a full entitlement certificate from DER bytes.
#[test]
fn read_entitlement_cert_from_der() -> Result<()> {
    let x509 = util::build(&TestCert {
        vendor_extensions: ENTITLEMENT_EXTENSIONS,
        ..TestCert::default()
    });

    let cert = CertFactory::default().create_from_der(&x509.to_der()?)?;
    assert_eq!(cert.certificate_type(), CertificateType::Entitlement);
    assert_eq!(cert.version.to_string(), "1.0");
    assert_eq!(cert.der(), x509.to_der()?.as_slice());

    let order = cert.order().expect("entitlement has an order");
    assert_eq!(order.name.as_deref(), Some("Awesome OS Premium Subscription"));
    assert_eq!(order.quantity, Some(100));
    assert_eq!(order.account_number.as_deref(), Some("12345678"));
    assert_eq!(order.support_type.as_deref(), Some("Level 3"));
    assert_eq!(order.virt_only, None);

    let labels: Vec<_> = cert
        .content()
        .iter()
        .map(|c| (c.label.as_deref().unwrap_or_default(), c.enabled))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("awesomeos-x86_64-rpms", true),
            ("awesomeos-x86_64-debug-rpms", false),
        ]
    );
    assert!(cert.content()[0].required_tags.contains("awesomeos-6"));

    assert_eq!(cert.products().len(), 1);
    assert_eq!(cert.products()[0].id, "37060");
    Ok(())
}

/// Identity certificates carry no vendor extensions; data comes from the subject.
#[test]
fn read_identity_cert() -> Result<()> {
    let x509 = util::build(&TestCert {
        subject: "CN=3ea2ac2b-consumer,O=admin,0.9.2342.19200300.100.1.1=7f1e-uid",
        alt_name: Some("CN=redhat.local.rm-rf.ca"),
        ..TestCert::default()
    });

    let cert = CertFactory::default().create_from_pem(&util::to_pem(&x509), None)?;
    let CertificateKind::Identity(identity) = &cert.kind else {
        panic!("expected identity certificate, got {:?}", cert.certificate_type());
    };
    assert_eq!(identity.subject["CN"], "3ea2ac2b-consumer");
    assert_eq!(identity.subject["O"], "admin");
    assert_eq!(identity.subject["UID"], "7f1e-uid");
    assert_eq!(
        identity.alt_name.as_deref(),
        Some("DirName:/CN=redhat.local.rm-rf.ca")
    );
    assert!(cert.order().is_none());
    Ok(())
}

/// Expired certificates still parse and report their state.
#[test]
fn read_expired_cert() -> Result<()> {
    let now = OffsetDateTime::now_utc();
    let x509 = util::build(&TestCert {
        vendor_extensions: &[("1.5.1", "Old OS")],
        not_before: now - Duration::days(30),
        not_after: now - Duration::days(1),
        ..TestCert::default()
    });

    let cert = CertFactory::default().create_from_der(&x509.to_der()?)?;
    assert!(cert.is_expired_at(now));
    assert!(!cert.is_valid_at(now));
    assert!(cert.end() < now);
    Ok(())
}

/// A certificate announcing an unknown major version is rejected.
#[test]
fn reject_unsupported_version() -> Result<()> {
    let x509 = util::build(&TestCert {
        vendor_extensions: &[("6", "2.0"), ("1.5.1", "Future OS")],
        ..TestCert::default()
    });

    let err = CertFactory::default()
        .create_from_der(&x509.to_der()?)
        .unwrap_err();
    assert_eq!(err, EntCertError::UnsupportedVersion("2.0".to_string()));
    Ok(())
}

/// Serial numbers wider than 128 bits cannot be represented.
#[test]
fn reject_oversized_serial() -> Result<()> {
    let serial = [0x7f; 20];
    let x509 = util::build(&TestCert {
        serial: &serial,
        ..TestCert::default()
    });

    let err = CertFactory::default()
        .create_from_der(&x509.to_der()?)
        .unwrap_err();
    assert!(
        matches!(err, EntCertError::InvalidFieldValue { ref field, .. } if field == "serial")
    );
    Ok(())
}

/// The certificate block is found even after a key block.
#[test]
fn read_cert_after_key_block() -> Result<()> {
    let x509 = util::build(&TestCert {
        vendor_extensions: &[("1.9.1", "Bundled OS")],
        ..TestCert::default()
    });
    let bundle = format!(
        "{}{}",
        der_to_pem(&[0x30, 0x00], "PRIVATE KEY"),
        util::to_pem(&x509)
    );

    let cert = CertFactory::default().create_from_pem(&bundle, None)?;
    assert_eq!(cert.products()[0].name.as_deref(), Some("Bundled OS"));
    Ok(())
}

/// Writes a certificate to disk, reloads it, then deletes it.
#[test]
fn write_reload_and_delete() -> Result<()> {
    let x509 = util::build(&TestCert {
        vendor_extensions: ENTITLEMENT_EXTENSIONS,
        ..TestCert::default()
    });
    let factory = CertFactory::default();
    let mut cert = factory.create_from_der(&x509.to_der()?)?;
    assert!(cert.path.is_none());

    let path = std::env::temp_dir().join(format!(
        "entcert-{}-{}.pem",
        std::process::id(),
        cert.serial
    ));
    cert.write(&path)?;
    assert_eq!(cert.path.as_deref(), Some(path.as_path()));

    let reloaded = factory.create_from_file(&path)?;
    assert_eq!(reloaded.path.as_deref(), Some(path.as_path()));
    assert_eq!(reloaded.der(), cert.der());
    assert_eq!(reloaded.order(), cert.order());
    assert_eq!(reloaded.content(), cert.content());

    reloaded.delete()?;
    assert!(!path.exists());
    assert!(matches!(
        factory.create_from_file(&path),
        Err(EntCertError::IoError(_))
    ));
    Ok(())
}
