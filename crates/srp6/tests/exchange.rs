// Full client/server exchange scenarios

use rand::SeedableRng;
use rand::rngs::StdRng;
use sha1::Sha1;
use sha2::Sha256;

use srp6::{
    ClientSession, DEFAULT_SALT_LENGTH, DEFAULT_SECRET_LENGTH, RFC5054_GROUP_1024,
    ServerSession, compute_verifier,
};

#[test]
fn full_exchange_authenticates_both_sides() {
    let mut rng = StdRng::seed_from_u64(42);
    let group = &*RFC5054_GROUP_1024;

    // enrollment, done once out-of-band
    let record = compute_verifier::<Sha1, _>(
        group,
        "alice",
        "password123",
        DEFAULT_SALT_LENGTH,
        &mut rng,
    );

    // client -> server: A
    let client = ClientSession::<Sha1>::new(group, "alice", "password123")
        .generate_key_pair(&mut rng, DEFAULT_SECRET_LENGTH);
    let client_public = client.public_value().clone();

    // server -> client: salt, B
    let server = ServerSession::<Sha1>::new(group)
        .generate_key_pair(&mut rng, &record.verifier, DEFAULT_SECRET_LENGTH)
        .unwrap();
    let server_public = server.public_value().clone();

    let client = client
        .compute_premaster_secret(&record.salt, &server_public)
        .unwrap();
    let client = client.compute_session_key(&record.salt, &server_public);

    let server = server
        .compute_premaster_secret(&record.verifier, &client_public)
        .unwrap();
    let server = server.compute_session_key(&record.username, &record.salt, &client_public);

    assert_eq!(client.session_key(), server.session_key());
    assert_eq!(client.session_key().len(), 20);

    // client -> server: evidence message
    let server = server.verify_session(client.evidence_message());
    assert!(server.authenticated());
    let server_proof = server.proof().expect("matching evidence releases the proof");

    // server -> client: proof
    let client = client.verify_session(server_proof);
    assert!(client.authenticated());
    assert_eq!(client.session_key(), server.session_key());
}

#[test]
fn full_exchange_with_os_randomness() {
    let mut rng = rand::thread_rng();
    let group = &*RFC5054_GROUP_1024;

    let record =
        compute_verifier::<Sha1, _>(group, "bob", "s3cret", DEFAULT_SALT_LENGTH, &mut rng);

    let client = ClientSession::<Sha1>::new(group, "bob", "s3cret")
        .generate_key_pair(&mut rng, DEFAULT_SECRET_LENGTH);
    let client_public = client.public_value().clone();
    let server = ServerSession::<Sha1>::new(group)
        .generate_key_pair(&mut rng, &record.verifier, DEFAULT_SECRET_LENGTH)
        .unwrap();
    let server_public = server.public_value().clone();

    let client = client
        .compute_premaster_secret(&record.salt, &server_public)
        .unwrap()
        .compute_session_key(&record.salt, &server_public);
    let server = server
        .compute_premaster_secret(&record.verifier, &client_public)
        .unwrap()
        .compute_session_key(&record.username, &record.salt, &client_public);

    let server = server.verify_session(client.evidence_message());
    let client = client.verify_session(server.proof().unwrap());
    assert!(server.authenticated());
    assert!(client.authenticated());
}

#[test]
fn wrong_password_fails_closed_on_both_sides() {
    let mut rng = StdRng::seed_from_u64(43);
    let group = &*RFC5054_GROUP_1024;

    let record = compute_verifier::<Sha1, _>(
        group,
        "alice",
        "password123",
        DEFAULT_SALT_LENGTH,
        &mut rng,
    );

    // one flipped character in the password
    let client = ClientSession::<Sha1>::new(group, "alice", "password124")
        .generate_key_pair(&mut rng, DEFAULT_SECRET_LENGTH);
    let client_public = client.public_value().clone();
    let server = ServerSession::<Sha1>::new(group)
        .generate_key_pair(&mut rng, &record.verifier, DEFAULT_SECRET_LENGTH)
        .unwrap();
    let server_public = server.public_value().clone();

    // both sides complete the computation without an error
    let client = client
        .compute_premaster_secret(&record.salt, &server_public)
        .unwrap()
        .compute_session_key(&record.salt, &server_public);
    let server = server
        .compute_premaster_secret(&record.verifier, &client_public)
        .unwrap()
        .compute_session_key(&record.username, &record.salt, &client_public);

    assert_ne!(client.session_key(), server.session_key());

    let server = server.verify_session(client.evidence_message());
    assert!(!server.authenticated());
    assert!(server.proof().is_none());

    // whatever the server sends in its failure path, it is not the proof
    let client = client.verify_session(&[0u8; 20]);
    assert!(!client.authenticated());
}

#[test]
fn tampered_evidence_withholds_server_proof() {
    let mut rng = StdRng::seed_from_u64(44);
    let group = &*RFC5054_GROUP_1024;

    let record = compute_verifier::<Sha1, _>(
        group,
        "alice",
        "password123",
        DEFAULT_SALT_LENGTH,
        &mut rng,
    );

    let client = ClientSession::<Sha1>::new(group, "alice", "password123")
        .generate_key_pair(&mut rng, DEFAULT_SECRET_LENGTH);
    let client_public = client.public_value().clone();
    let server = ServerSession::<Sha1>::new(group)
        .generate_key_pair(&mut rng, &record.verifier, DEFAULT_SECRET_LENGTH)
        .unwrap();
    let server_public = server.public_value().clone();

    let client = client
        .compute_premaster_secret(&record.salt, &server_public)
        .unwrap()
        .compute_session_key(&record.salt, &server_public);
    let server = server
        .compute_premaster_secret(&record.verifier, &client_public)
        .unwrap()
        .compute_session_key(&record.username, &record.salt, &client_public);

    // matching keys on both sides, but the evidence arrives corrupted
    let mut tampered = client.evidence_message().to_vec();
    tampered[0] ^= 0x01;

    let server = server.verify_session(&tampered);
    assert!(!server.authenticated());
    assert!(server.proof().is_none());
}

#[test]
fn exchange_is_generic_over_the_digest() {
    let mut rng = StdRng::seed_from_u64(45);
    let group = &*RFC5054_GROUP_1024;

    let record = compute_verifier::<Sha256, _>(
        group,
        "alice",
        "password123",
        DEFAULT_SALT_LENGTH,
        &mut rng,
    );

    let client = ClientSession::<Sha256>::new(group, "alice", "password123")
        .generate_key_pair(&mut rng, DEFAULT_SECRET_LENGTH);
    let client_public = client.public_value().clone();
    let server = ServerSession::<Sha256>::new(group)
        .generate_key_pair(&mut rng, &record.verifier, DEFAULT_SECRET_LENGTH)
        .unwrap();
    let server_public = server.public_value().clone();

    let client = client
        .compute_premaster_secret(&record.salt, &server_public)
        .unwrap()
        .compute_session_key(&record.salt, &server_public);
    let server = server
        .compute_premaster_secret(&record.verifier, &client_public)
        .unwrap()
        .compute_session_key(&record.username, &record.salt, &client_public);

    assert_eq!(client.session_key().len(), 32);
    assert_eq!(client.session_key(), server.session_key());

    let server = server.verify_session(client.evidence_message());
    let client = client.verify_session(server.proof().unwrap());
    assert!(server.authenticated());
    assert!(client.authenticated());
}
