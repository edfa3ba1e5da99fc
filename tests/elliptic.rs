use relic_cp::{
    ec::{self, ecdh, ecdsa, ecies, ecmqv, ecss, vbnn, SecretKey},
    hash::{md_map, MessageMode},
    CpError,
};

/// RFC 5903 section 8.1, 256-bit random ECP group
const RFC5903_I: &str = "C88F01F510D9AC3F70A292DAA2316DE544E9AAB8AFE84049C62A9C57862D1433";
const RFC5903_GIX: &str = "DAD0B65394221CF9B051E1FECA5787D098DFE637FC90B9EF945D0C3772581180";
const RFC5903_GIY: &str = "5271A0461CDB8252D61F1C456FA3E59AB1F45B33ACCF5F58389E0577B8990BB3";
const RFC5903_R: &str = "C6EF9C5D78AE012A011164ACB397CE2088685D8F06BF9BE0B283AB46476BEE53";
const RFC5903_GRX: &str = "D12DFB5289C8D4F81208B70270398C342296970A0BCCB74C736FC7554494BF63";
const RFC5903_GRY: &str = "56FBF3CA366CC23E8157854C13C58D6AAC23F046ADA30F8353E74F33039872AB";
const RFC5903_GIRX: &str = "D6840F6B42F6EDAFD13116E0E12565202FEF8E9ECE7DCE03812464D04B9442DE";

fn uncompressed(x: &str, y: &str) -> Vec<u8> {
    let mut out = vec![0x04u8];
    out.extend_from_slice(&hex::decode(x).unwrap());
    out.extend_from_slice(&hex::decode(y).unwrap());
    out
}

#[test]
fn ecdh_rfc5903_vector() {
    let i = SecretKey::from_slice(&hex::decode(RFC5903_I).unwrap()).unwrap();
    let r = SecretKey::from_slice(&hex::decode(RFC5903_R).unwrap()).unwrap();
    let gi = ec::decode_point(&uncompressed(RFC5903_GIX, RFC5903_GIY)).unwrap();
    let gr = ec::decode_point(&uncompressed(RFC5903_GRX, RFC5903_GRY)).unwrap();
    assert_eq!(i.public_key(), gi);
    assert_eq!(r.public_key(), gr);

    // KDF2 of the shared x-coordinate: SHA-256(x || 00000001)
    let mut z = hex::decode(RFC5903_GIRX).unwrap();
    z.extend_from_slice(&[0, 0, 0, 1]);
    let expected = md_map(&z);

    let k1 = ecdh::derive_key(&i, &gr, 32).unwrap();
    let k2 = ecdh::derive_key(&r, &gi, 32).unwrap();
    assert_eq!(k1, expected);
    assert_eq!(k2, expected);
    assert_eq!(ecdh::derive_key(&i, &gr, 16).unwrap(), &expected[..16]);
}

#[test]
fn ecdh_is_symmetric() {
    let (sk_a, pk_a) = ecdh::generate();
    let (sk_b, pk_b) = ecdh::generate();
    for len in [1usize, 16, 32, 50] {
        let k1 = ecdh::derive_key(&sk_a, &pk_b, len).unwrap();
        let k2 = ecdh::derive_key(&sk_b, &pk_a, len).unwrap();
        assert_eq!(k1.len(), len);
        assert_eq!(k1, k2);
    }
    assert!(matches!(
        ecdh::derive_key(&sk_a, &pk_b, 0),
        Err(CpError::InvalidParameters(_))
    ));
}

#[test]
fn point_decoding_rejects_invalid_points() {
    let (_, pk) = ec::generate();
    let bytes = ec::encode_point(&pk);
    assert_eq!(bytes.len(), ec::POINT_BYTES);
    assert_eq!(ec::decode_point(&bytes).unwrap(), pk);

    // the identity
    assert!(ec::decode_point(&[0u8]).is_err());
    // x not reduced modulo the field prime
    let mut unreduced = [0xffu8; 33];
    unreduced[0] = 0x02;
    assert!(ec::decode_point(&unreduced).is_err());
    assert!(ec::decode_point(&bytes[..32]).is_err());
}

#[test]
fn ecmqv_is_symmetric() {
    let (static_a, static_pk_a) = ecmqv::generate();
    let (eph_a, eph_pk_a) = ecmqv::generate();
    let (static_b, static_pk_b) = ecmqv::generate();
    let (eph_b, eph_pk_b) = ecmqv::generate();

    let k1 = ecmqv::derive_key(&static_a, &eph_a, &static_pk_b, &eph_pk_b, 32).unwrap();
    let k2 = ecmqv::derive_key(&static_b, &eph_b, &static_pk_a, &eph_pk_a, 32).unwrap();
    assert_eq!(k1, k2);

    // a different ephemeral key on one side breaks agreement
    let (eph_c, _) = ecmqv::generate();
    let k3 = ecmqv::derive_key(&static_a, &eph_c, &static_pk_b, &eph_pk_b, 32).unwrap();
    assert_ne!(k1, k3);
}

#[test]
fn ecies_round_trip() {
    let (sk, pk) = ecies::generate();
    for msg in [&b""[..], &b"a"[..], &b"this is a test message"[..], &[7u8; 64][..]] {
        let c = ecies::encrypt(msg, &pk).unwrap();
        assert_eq!(ecies::decrypt(&c, &sk).unwrap(), msg);

        let bytes = c.to_bytes();
        let c1 = ecies::EciesCiphertext::from_bytes(&bytes).unwrap();
        assert_eq!(c1, c);
        assert_eq!(ecies::decrypt(&c1, &sk).unwrap(), msg);
    }
}

#[test]
fn ecies_fails_closed_on_tampering() {
    let (sk, pk) = ecies::generate();
    let msg = b"this is a test message";
    let c = ecies::encrypt(msg, &pk).unwrap();

    let mut body = c.clone();
    body.body[0] ^= 0x01;
    assert!(matches!(
        ecies::decrypt(&body, &sk),
        Err(CpError::Unauthenticated)
    ));

    let mut tag = c.clone();
    let last = tag.body.len() - 1;
    tag.body[last] ^= 0x80;
    assert!(matches!(
        ecies::decrypt(&tag, &sk),
        Err(CpError::Unauthenticated)
    ));

    let (_, other) = ecies::generate();
    let mut ephemeral = c.clone();
    ephemeral.ephemeral = other;
    assert!(matches!(
        ecies::decrypt(&ephemeral, &sk),
        Err(CpError::Unauthenticated)
    ));

    let (wrong_sk, _) = ecies::generate();
    assert!(ecies::decrypt(&c, &wrong_sk).is_err());

    let mut short = c.clone();
    short.body.truncate(20);
    assert!(matches!(
        ecies::decrypt(&short, &sk),
        Err(CpError::InvalidEncoding(_))
    ));
    assert!(ecies::EciesCiphertext::from_bytes(&c.to_bytes()[..40]).is_err());
}

#[test]
fn ecdsa_sign_and_verify() {
    let (sk, pk) = ecdsa::generate();
    let msg = b"this is a test message";
    let digest = md_map(msg);

    let sig = ecdsa::sign(msg, MessageMode::Raw, &sk).unwrap();
    assert!(ecdsa::verify(&sig, msg, MessageMode::Raw, &pk));
    assert!(ecdsa::verify(&sig, &digest, MessageMode::Prehashed, &pk));

    let sig = ecdsa::sign(&digest, MessageMode::Prehashed, &sk).unwrap();
    assert!(ecdsa::verify(&sig, msg, MessageMode::Raw, &pk));
    assert!(ecdsa::sign(msg, MessageMode::Prehashed, &sk).is_err());

    let sig1 = ecdsa::EcdsaSignature::from_bytes(&sig.to_bytes()).unwrap();
    assert_eq!(sig1, sig);

    let (_, other) = ecdsa::generate();
    assert!(!ecdsa::verify(&sig, msg, MessageMode::Raw, &other));
    assert!(!ecdsa::verify(&sig, b"another message", MessageMode::Raw, &pk));
}

#[test]
fn ecdsa_rejects_out_of_range_components() {
    let (sk, pk) = ecdsa::generate();
    let msg = b"this is a test message";
    let sig = ecdsa::sign(msg, MessageMode::Raw, &sk).unwrap();

    let mut zero_r = sig;
    zero_r.r = [0u8; 32];
    assert!(!ecdsa::verify(&zero_r, msg, MessageMode::Raw, &pk));

    let mut zero_s = sig;
    zero_s.s = [0u8; 32];
    assert!(!ecdsa::verify(&zero_s, msg, MessageMode::Raw, &pk));

    let mut big_s = sig;
    big_s.s = [0xffu8; 32];
    assert!(!ecdsa::verify(&big_s, msg, MessageMode::Raw, &pk));

    assert!(ecdsa::EcdsaSignature::from_bytes(&[0u8; 63]).is_err());
}

#[test]
fn ecss_sign_and_verify() {
    let (sk, pk) = ecss::generate();
    let msg = b"this is a test message";
    let digest = md_map(msg);

    let sig = ecss::sign(msg, MessageMode::Raw, &sk).unwrap();
    assert!(ecss::verify(&sig, msg, MessageMode::Raw, &pk));
    assert!(ecss::verify(&sig, &digest, MessageMode::Prehashed, &pk));

    let sig = ecss::sign(&digest, MessageMode::Prehashed, &sk).unwrap();
    assert!(ecss::verify(&sig, msg, MessageMode::Raw, &pk));

    let sig1 = ecss::EcssSignature::from_bytes(&sig.to_bytes()).unwrap();
    assert_eq!(sig1, sig);

    let (_, other) = ecss::generate();
    assert!(!ecss::verify(&sig, msg, MessageMode::Raw, &other));
    assert!(!ecss::verify(&sig, b"another message", MessageMode::Raw, &pk));

    let mut zero = sig;
    zero.e = [0u8; 32];
    assert!(!ecss::verify(&zero, msg, MessageMode::Raw, &pk));
    let mut big = sig;
    big.s = [0xffu8; 32];
    assert!(!ecss::verify(&big, msg, MessageMode::Raw, &pk));
}

#[test]
fn vbnn_sign_and_verify() {
    let kgc = vbnn::VbnnKgc::generate();
    let id = b"alice@example.com";
    let key = kgc.issue(id).unwrap();
    let msg = b"this is a test message";

    let sig = vbnn::sign(id, msg, &key).unwrap();
    assert!(vbnn::verify(&sig, id, msg, kgc.mpk()));
    assert!(!vbnn::verify(&sig, id, b"another message", kgc.mpk()));

    let bytes = sig.to_bytes();
    assert_eq!(bytes.len(), vbnn::SIGNATURE_BYTES);
    let sig1 = vbnn::VbnnSignature::from_bytes(&bytes).unwrap();
    assert_eq!(sig1, sig);
    assert!(vbnn::verify(&sig1, id, msg, kgc.mpk()));
    assert!(vbnn::VbnnSignature::from_bytes(&bytes[1..]).is_err());
}

#[test]
fn vbnn_issue_is_deterministic() {
    let kgc = vbnn::VbnnKgc::generate();
    let k1 = kgc.issue(b"alice").unwrap();
    let k2 = kgc.issue(b"alice").unwrap();
    let k3 = kgc.issue(b"bob").unwrap();
    assert_eq!(k1.r_point(), k2.r_point());
    assert_ne!(k1.r_point(), k3.r_point());

    let other = vbnn::VbnnKgc::generate();
    assert_ne!(other.issue(b"alice").unwrap().r_point(), k1.r_point());
}

#[test]
fn vbnn_binds_the_identity() {
    let kgc = vbnn::VbnnKgc::generate();
    let alice = b"alice";
    let bob = b"bob";
    let alice_key = kgc.issue(alice).unwrap();
    let bob_key = kgc.issue(bob).unwrap();
    let msg = b"this is a test message";

    // produced as alice, checked as bob
    let sig = vbnn::sign(alice, msg, &alice_key).unwrap();
    assert!(vbnn::verify(&sig, alice, msg, kgc.mpk()));
    assert!(!vbnn::verify(&sig, bob, msg, kgc.mpk()));

    // claimed for alice, produced with bob's key
    let forged = vbnn::sign(alice, msg, &bob_key).unwrap();
    assert!(!vbnn::verify(&forged, alice, msg, kgc.mpk()));
    assert!(!vbnn::verify(&forged, bob, msg, kgc.mpk()));

    // a different center's master key
    let other = vbnn::VbnnKgc::generate();
    assert!(!vbnn::verify(&sig, alice, msg, other.mpk()));
}
