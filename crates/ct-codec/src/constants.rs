//! Field widths, limits and object identifiers used by Certificate Transparency

use const_oid::ObjectIdentifier;

/// Width of the version field
pub const VERSION_LENGTH: usize = 1;

/// Width of a log id (SHA-256 of the log key)
pub const KEY_ID_LENGTH: usize = 32;

/// Width of a timestamp in milliseconds
pub const TIMESTAMP_LENGTH: usize = 8;

/// Width of the LogEntryType field
pub const LOG_ENTRY_TYPE_LENGTH: usize = 2;

/// Width of the DigitallySigned hash algorithm field
pub const HASH_ALGORITHM_LENGTH: usize = 1;

/// Width of the DigitallySigned signature algorithm field
pub const SIGNATURE_ALGORITHM_LENGTH: usize = 1;

/// Width of the issuer key hash in a PreCert
pub const ISSUER_KEY_HASH_LENGTH: usize = 32;

/// Upper bound of `CtExtensions`
pub const MAX_EXTENSIONS_LENGTH: usize = (1 << 16) - 1;

/// Upper bound of a DigitallySigned signature
pub const MAX_SIGNATURE_LENGTH: usize = (1 << 16) - 1;

/// Upper bound of an ASN.1Cert
pub const MAX_CERTIFICATE_LENGTH: usize = (1 << 24) - 1;

/// Upper bound of the TBSCertificate carried in a TimestampedEntry precert
pub const MAX_PRECERT_TBS_LENGTH: usize = (1 << 16) - 1;

/// Upper bound of a serialized SCT inside a SignedCertificateTimestampList
pub const MAX_SERIALIZED_SCT_LENGTH: usize = (1 << 16) - 1;

/// Upper bound of a SignedCertificateTimestampList
pub const MAX_SCT_LIST_LENGTH: usize = (1 << 16) - 1;

/// Precertificate poison extension: 1.3.6.1.4.1.11129.2.4.3
pub const POISON_EXTENSION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.4.3");

/// Embedded SCT list extension: 1.3.6.1.4.1.11129.2.4.2
pub const SCT_CERTIFICATE_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.4.2");

/// Extended key usage of a precertificate signing certificate: 1.3.6.1.4.1.11129.2.4.4
pub const PRECERTIFICATE_SIGNING_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11129.2.4.4");

/// Authority key identifier extension: 2.5.29.35
pub const AUTHORITY_KEY_IDENTIFIER_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.5.29.35");
