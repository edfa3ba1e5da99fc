use rand::{rngs::OsRng, RngCore};
use relic_cp::{
    config::RSA_MIN_MODULUS_BITS,
    hash::{md_map, MessageMode},
    rabin::*,
    rsa::*,
    CpError,
};
use unknown_order::BigNumber;

const BITS: usize = 1024;

#[test]
fn rsa_basic_and_quick_agree() {
    let quick = RsaPrivateKey::generate_quick(BITS).unwrap();
    assert!(quick.is_quick());
    let basic = quick.to_basic();
    assert!(!basic.is_quick());
    let pk = RsaPublicKey::from(&quick);
    assert_eq!(pk.n().bit_length(), BITS);
    assert_eq!(pk.modulus_bytes(), BITS / 8);

    let msg = b"this is a test message";
    let c = pk.encrypt(msg).unwrap();
    assert_eq!(c.len(), pk.modulus_bytes());
    assert_eq!(quick.decrypt(&c).unwrap(), msg);
    assert_eq!(basic.decrypt(&c).unwrap(), msg);

    let mut payload = [0u8; 10];
    OsRng.fill_bytes(&mut payload);
    let c = pk.encrypt(&payload).unwrap();
    let from_quick = quick.decrypt(&c).unwrap();
    let from_basic = basic.decrypt(&c).unwrap();
    assert_eq!(from_quick, payload);
    assert_eq!(from_quick, from_basic);

    // PKCS#1 v1.5 signatures are deterministic
    let s1 = quick.sign(msg, MessageMode::Raw).unwrap();
    let s2 = basic.sign(msg, MessageMode::Raw).unwrap();
    assert_eq!(s1, s2);
    assert!(pk.verify(&s1, msg, MessageMode::Raw));
}

#[test]
fn rsa_quick_and_basic_agree_for_many_keys() {
    let msg = b"hello";
    for _ in 0..8 {
        let quick = RsaPrivateKey::generate_quick(512).unwrap();
        let basic = quick.to_basic();
        let pk = quick.public_key();

        let c = pk.encrypt(msg).unwrap();
        assert_eq!(quick.decrypt(&c).unwrap(), msg);
        assert_eq!(basic.decrypt(&c).unwrap(), msg);

        let s1 = quick.sign(msg, MessageMode::Raw).unwrap();
        let s2 = basic.sign(msg, MessageMode::Raw).unwrap();
        assert_eq!(s1, s2);
        assert!(pk.verify(&s1, msg, MessageMode::Raw));
    }
}

#[test]
fn rsa_generate_rejects_moduli_too_small_to_sign() {
    for bits in [256, 384, 480] {
        assert!(matches!(
            RsaPrivateKey::generate(bits),
            Err(CpError::InvalidParameters(_))
        ));
        assert!(RsaPrivateKey::generate_basic(bits).is_err());
    }

    let sk = RsaPrivateKey::generate(RSA_MIN_MODULUS_BITS).unwrap();
    let sig = sk.sign(b"smallest key", MessageMode::Raw).unwrap();
    assert!(sk.public_key().verify(&sig, b"smallest key", MessageMode::Raw));
}

#[test]
fn rsa_generate_basic() {
    let sk = RsaPrivateKey::generate_basic(BITS).unwrap();
    assert!(!sk.is_quick());
    let pk = sk.public_key().clone();

    let msg = [0x5au8; 32];
    let c = pk.encrypt(&msg).unwrap();
    assert_eq!(sk.decrypt(&c).unwrap(), msg);
}

#[test]
fn rsa_signature_modes() {
    let sk = RsaPrivateKey::generate(BITS).unwrap();
    let pk = RsaPublicKey::from(&sk);
    let msg = b"this is a test message";
    let digest = md_map(msg);

    let raw = sk.sign(msg, MessageMode::Raw).unwrap();
    let prehashed = sk.sign(&digest, MessageMode::Prehashed).unwrap();
    assert_eq!(raw, prehashed);
    assert!(pk.verify(&raw, msg, MessageMode::Raw));
    assert!(pk.verify(&raw, &digest, MessageMode::Prehashed));

    // a prehashed input must be a digest
    assert!(matches!(
        sk.sign(msg, MessageMode::Prehashed),
        Err(CpError::InvalidEncoding(_))
    ));
    assert!(!pk.verify(&raw, msg, MessageMode::Prehashed));
}

#[test]
fn rsa_verify_rejects_forgeries() {
    let sk = RsaPrivateKey::generate(BITS).unwrap();
    let other = RsaPrivateKey::generate(BITS).unwrap();
    let pk = RsaPublicKey::from(&sk);
    let msg = b"this is a test message";
    let sig = sk.sign(msg, MessageMode::Raw).unwrap();

    assert!(!pk.verify(&sig, b"this is a test massage", MessageMode::Raw));
    assert!(!other.public_key().verify(&sig, msg, MessageMode::Raw));

    let mut tampered = sig.clone();
    tampered[10] ^= 0x01;
    assert!(!pk.verify(&tampered, msg, MessageMode::Raw));

    // out of range and oversized signatures fail without an error
    assert!(!pk.verify(&[0xffu8; BITS / 8], msg, MessageMode::Raw));
    assert!(!pk.verify(&[0x01u8; BITS / 8 + 2], msg, MessageMode::Raw));
    assert!(!pk.verify(&[], msg, MessageMode::Raw));
}

#[test]
fn rsa_rejects_bad_inputs() {
    assert!(matches!(
        RsaPrivateKey::generate(128),
        Err(CpError::InvalidParameters(_))
    ));
    assert!(RsaPrivateKey::generate(1000).is_err());

    let sk = RsaPrivateKey::generate(BITS).unwrap();
    let pk = sk.public_key();
    let k = pk.modulus_bytes();
    assert!(pk.encrypt(&vec![1u8; k - 11]).is_ok());
    assert!(matches!(
        pk.encrypt(&vec![1u8; k - 10]),
        Err(CpError::InvalidEncoding(_))
    ));
    assert!(matches!(
        sk.decrypt(&[0xffu8; BITS / 8]),
        Err(CpError::InvalidEncoding(_))
    ));
    assert!(sk.decrypt(&[0x01u8; BITS / 8 + 2]).is_err());
}

#[test]
fn rsa_key_serialization() {
    let sk = RsaPrivateKey::generate(BITS).unwrap();
    let pk = RsaPublicKey::from(&sk);

    let pk1 = RsaPublicKey::from_bytes(pk.to_bytes().unwrap()).unwrap();
    assert_eq!(pk1, pk);

    let sk1 = RsaPrivateKey::from_bytes(sk.to_bytes().unwrap()).unwrap();
    assert!(sk1.is_quick());
    let c = pk.encrypt(b"serialized").unwrap();
    assert_eq!(sk1.decrypt(&c).unwrap(), b"serialized");

    let json = serde_json::to_string(&pk).unwrap();
    let pk2: RsaPublicKey = serde_json::from_str(&json).unwrap();
    assert_eq!(pk2, pk);
}

#[test]
fn rsa_public_key_deserialization_validates() {
    let sk = RsaPrivateKey::generate(BITS).unwrap();
    let good = serde_json::to_value(sk.public_key()).unwrap();
    let one = BigNumber::one();

    let mut tiny = good.clone();
    tiny["n"] = serde_json::to_value(BigNumber::from(3233u64)).unwrap();
    assert!(serde_json::from_value::<RsaPublicKey>(tiny).is_err());

    let mut even = good.clone();
    even["n"] = serde_json::to_value(sk.public_key().n() + &one).unwrap();
    assert!(serde_json::from_value::<RsaPublicKey>(even).is_err());

    let mut exponent = good.clone();
    exponent["e"] = serde_json::to_value(&one).unwrap();
    assert!(serde_json::from_value::<RsaPublicKey>(exponent).is_err());

    let pk: RsaPublicKey = serde_json::from_value(good).unwrap();
    assert_eq!(&pk, sk.public_key());
}

#[test]
fn rabin_round_trip() {
    let sk = RabinPrivateKey::generate(BITS).unwrap();
    let pk = RabinPublicKey::from(&sk);
    assert_eq!(pk.modulus_bytes(), BITS / 8);

    for msg in [&b"this is a test message"[..], &[0u8; 4][..], &[0xffu8; 100][..]] {
        let c = pk.encrypt(msg).unwrap();
        assert_eq!(c.len(), pk.modulus_bytes());
        assert_eq!(sk.decrypt(&c).unwrap(), msg);
    }
}

#[test]
fn rabin_rejects_bad_inputs() {
    let sk = RabinPrivateKey::generate(BITS).unwrap();
    let pk = sk.public_key();
    let k = pk.modulus_bytes();

    assert!(pk.encrypt(&vec![7u8; k - 11 - REDUNDANCY_LEN]).is_ok());
    assert!(matches!(
        pk.encrypt(&vec![7u8; k - 10 - REDUNDANCY_LEN]),
        Err(CpError::InvalidEncoding(_))
    ));
    assert!(matches!(
        sk.decrypt(&[0xffu8; BITS / 8]),
        Err(CpError::InvalidEncoding(_))
    ));

    // a square with no valid redundancy in any root
    let mut c = pk.encrypt(b"message").unwrap();
    c[k / 2] ^= 0x40;
    assert!(sk.decrypt(&c).is_err());

    assert!(RabinPrivateKey::generate(64).is_err());
}

#[test]
fn rabin_key_serialization() {
    let sk = RabinPrivateKey::generate(BITS).unwrap();
    let sk1 = RabinPrivateKey::from_bytes(sk.to_bytes().unwrap()).unwrap();
    let c = sk.public_key().encrypt(b"serialized").unwrap();
    assert_eq!(sk1.decrypt(&c).unwrap(), b"serialized");
}

#[test]
fn rabin_public_key_deserialization_validates() {
    let sk = RabinPrivateKey::generate(BITS).unwrap();
    let good = serde_json::to_value(sk.public_key()).unwrap();

    let mut tiny = good.clone();
    tiny["n"] = serde_json::to_value(BigNumber::from(21u64)).unwrap();
    assert!(serde_json::from_value::<RabinPublicKey>(tiny).is_err());

    // n + 2 is 3 mod 4, never a product of two primes that are 3 mod 4
    let mut shifted = good.clone();
    shifted["n"] = serde_json::to_value(sk.public_key().n() + &BigNumber::from(2u64)).unwrap();
    assert!(serde_json::from_value::<RabinPublicKey>(shifted).is_err());

    let pk: RabinPublicKey = serde_json::from_value(good).unwrap();
    assert_eq!(&pk, sk.public_key());
}
