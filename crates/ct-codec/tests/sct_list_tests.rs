//! SCT list decoding against an SCT embedded in a production certificate
//!
//! The bytes are the contents of the 1.3.6.1.4.1.11129.2.4.2 extension of a
//! Fulcio-issued certificate logged to the sigstore CT log.

use ct_codec::{
    bytes_for_data_length, decode_sct_list, encode_sct_list, HashAlgorithm, SignatureAlgorithm,
    SignedCertificateTimestamp, Version,
};
use rstest::rstest;

const FULCIO_SCT_LIST: &str = "0078007600dd3d306ac6c7113263191e1c99673702a24a5eb8de3cadff878a72802f29ee8e00000194ac74617a0000040300473045022100907c97e005cc06fafa91bc0ccde5e50820033458fcb8aebcbd8fe4f847ae01e90220229fb7c2c8ba311f92e35ed0853f0bb33c2c77a333090befbeccfbc844ad819a";

#[rstest]
#[case((1 << 8) - 1, 1)]
#[case((1 << 16) - 1, 2)]
#[case((1 << 24) - 1, 3)]
fn test_bytes_for_data_length(#[case] max: usize, #[case] expected: usize) {
    assert_eq!(bytes_for_data_length(max), expected);
}

#[test]
fn test_decode_fulcio_sct_list() {
    let bytes = hex::decode(FULCIO_SCT_LIST).unwrap();
    let scts = decode_sct_list(&bytes).unwrap();
    assert_eq!(scts.len(), 1);

    let sct = &scts[0];
    assert_eq!(sct.version, Version::V1);
    assert_eq!(
        sct.log_id.to_base64(),
        "3T0wasbHETJjGR4cmWc3AqJKXrjePK3/h4pygC8p7o4="
    );
    assert_eq!(sct.timestamp, 1_738_060_095_866);
    assert!(sct.extensions.is_empty());
    assert_eq!(sct.signature.hash_algorithm, HashAlgorithm::Sha256);
    assert_eq!(sct.signature.signature_algorithm, SignatureAlgorithm::Ecdsa);
    assert_eq!(sct.signature.signature.len(), 71);
    assert_eq!(sct.signature.signature[0], 0x30);
}

#[test]
fn test_reencode_fulcio_sct_list() {
    let bytes = hex::decode(FULCIO_SCT_LIST).unwrap();
    let scts = decode_sct_list(&bytes).unwrap();
    assert_eq!(encode_sct_list(&scts).unwrap(), bytes);

    let single = SignedCertificateTimestamp::decode(&bytes[4..]).unwrap();
    assert_eq!(single, scts[0]);
}
