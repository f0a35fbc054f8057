//! Resilience tests - corrupt artifacts and verify recovery.

use arf_codec::corruption::Corruptor;
use arf_codec::integrity::{self, RsCodec, Verification};
use arf_codec::redundancy::{reconstruct, replicate};
use arf_codec::{decode, encode, CodecConfig, DecodeStatus, Error, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Incompressible payload, so the protected block is as long as the input.
fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

#[test]
fn test_clean_10k_checksum_five_replicas() {
    let data = random_payload(10_000, 1);
    let config = CodecConfig::new(Strategy::Checksum, 5);

    let artifact = encode(&data, &config).expect("Failed to encode");
    let decoded = decode(&artifact, &config).expect("Failed to decode");

    assert_eq!(decoded.data, data);
    assert_eq!(decoded.report.status, DecodeStatus::Clean);
    assert_eq!(decoded.report.status.to_string(), "No errors detected");
}

#[test]
fn test_checksum_light_corruption_recovered_by_vote() {
    // At 3% per byte with five replicas, a position is lost only when four or
    // more replicas are hit, so most trials come back byte-exact.
    let data = random_payload(10_000, 2);
    let config = CodecConfig::new(Strategy::Checksum, 5);
    let artifact = encode(&data, &config).unwrap();

    let trials = 20;
    let mut exact = 0;
    for seed in 0..trials {
        let damaged = Corruptor::with_seed(seed).corrupt(&artifact, 0.03);
        if let Ok(decoded) = decode(&damaged, &config) {
            match decoded.report.status {
                DecodeStatus::Clean => {
                    assert_eq!(decoded.data, data, "clean status must mean exact data");
                    exact += 1;
                }
                DecodeStatus::DetectedUncorrectable => {}
                DecodeStatus::Corrected { .. } => panic!("checksum strategy cannot correct"),
            }
        }
    }

    println!("checksum @3%: {}/{} exact", exact, trials);
    assert!(exact >= 15, "only {} of {} trials recovered", exact, trials);
}

#[test]
fn test_checksum_heavy_corruption_never_claims_correction() {
    let data = random_payload(10_000, 3);
    let config = CodecConfig::new(Strategy::Checksum, 5);
    let artifact = encode(&data, &config).unwrap();

    for seed in 0..10 {
        let damaged = Corruptor::with_seed(seed).corrupt(&artifact, 0.10);
        match decode(&damaged, &config) {
            Ok(decoded) => match decoded.report.status {
                DecodeStatus::Clean => assert_eq!(decoded.data, data),
                DecodeStatus::DetectedUncorrectable => {}
                DecodeStatus::Corrected { .. } => panic!("checksum strategy cannot correct"),
            },
            Err(Error::MalformedStream(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}

#[test]
fn test_reed_solomon_recovers_10_percent_corruption() {
    let data = random_payload(10_000, 4);
    let config = CodecConfig::new(Strategy::reed_solomon(), 5);
    let artifact = encode(&data, &config).unwrap();

    for seed in 0..20 {
        let damaged = Corruptor::with_seed(seed).corrupt(&artifact, 0.10);
        let decoded = decode(&damaged, &config).expect("vote plus RS should recover");

        assert_eq!(decoded.data, data);
        assert!(decoded.report.disputed_positions > 0);
    }
}

#[test]
fn test_majority_vote_two_of_five_corrupted_per_position() {
    let block = random_payload(4096, 5);
    let mut artifact = replicate(&block, 5).unwrap();
    let mut rng = StdRng::seed_from_u64(6);

    for i in 0..block.len() {
        let picks = rand::seq::index::sample(&mut rng, 5, 2);
        for replica in picks.iter() {
            artifact[replica * block.len() + i] = rng.gen();
        }
    }

    assert_eq!(reconstruct(&artifact, 5).unwrap(), block);
}

#[test]
fn test_whole_replicas_destroyed() {
    let data = random_payload(2000, 7);
    let config = CodecConfig::new(Strategy::Checksum, 5);
    let mut artifact = encode(&data, &config).unwrap();
    let stride = artifact.len() / 5;

    // Two complete replicas wiped, with different garbage.
    artifact[..stride].fill(0x00);
    artifact[4 * stride..].fill(0xFF);

    let decoded = decode(&artifact, &config).unwrap();
    assert_eq!(decoded.data, data);
    assert_eq!(decoded.report.status, DecodeStatus::Clean);
    assert_eq!(decoded.report.disputed_positions, stride);
}

#[test]
fn test_reed_solomon_corrects_up_to_eight_anywhere() {
    let codec = RsCodec::new(16).unwrap();
    let block = random_payload(1000, 8);
    let protected = codec.protect(&block);
    let mut corruptor = Corruptor::with_seed(9);

    for errors in 0..=8 {
        for _ in 0..25 {
            let mut damaged = protected.clone();
            corruptor.corrupt_exact(&mut damaged, errors);

            let (payload, repaired) = codec.correct(&damaged).expect("within capacity");
            assert_eq!(payload, block);
            assert_eq!(repaired, errors);
        }
    }
}

#[test]
fn test_reed_solomon_beyond_capacity_mostly_detected() {
    let codec = RsCodec::new(16).unwrap();
    let block = random_payload(239, 10);
    let protected = codec.protect(&block);
    assert_eq!(protected.len(), 255);

    let mut corruptor = Corruptor::with_seed(11);
    let mut detected = 0;
    let mut silent = 0;
    let trials = 200;

    for trial in 0..trials {
        let errors = 9 + trial % 12;
        let mut damaged = protected.clone();
        corruptor.corrupt_exact(&mut damaged, errors);

        match codec.correct(&damaged) {
            Err(Error::Uncorrectable { .. }) => detected += 1,
            Ok((payload, _)) => {
                assert_ne!(payload, block, "cannot recover beyond capacity");
                silent += 1;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    if silent > 0 {
        eprintln!("WARNING: {} silent miscorrections in {} trials", silent, trials);
    }
    assert!(detected >= trials * 95 / 100, "detected only {}", detected);
}

#[test]
fn test_checksum_detects_any_corruption() {
    let block = random_payload(500, 12);
    let protected = integrity::protect(&block, Strategy::Checksum).unwrap();
    let mut corruptor = Corruptor::with_seed(13);

    for errors in 1..=20 {
        let mut damaged = protected.clone();
        corruptor.corrupt_exact(&mut damaged, errors);

        let verified = integrity::verify_or_correct(&damaged, Strategy::Checksum).unwrap();
        assert_eq!(verified.verification, Verification::Mismatch);
    }
}

#[test]
fn test_single_replica_clean_and_damaged() {
    let data = random_payload(800, 14);

    let config = CodecConfig::new(Strategy::Checksum, 1);
    let artifact = encode(&data, &config).unwrap();
    assert_eq!(decode(&artifact, &config).unwrap().data, data);

    let config = CodecConfig::new(Strategy::reed_solomon(), 1);
    let mut artifact = encode(&data, &config).unwrap();
    Corruptor::with_seed(15).corrupt_exact(&mut artifact, 3);
    let decoded = decode(&artifact, &config).unwrap();
    assert_eq!(decoded.data, data);
    assert_eq!(decoded.report.status, DecodeStatus::Corrected { symbols: 3 });
}

#[test]
fn test_reed_solomon_overwhelmed_aborts_before_decompression() {
    let data = random_payload(800, 16);
    let config = CodecConfig::new(Strategy::reed_solomon(), 1);
    let mut artifact = encode(&data, &config).unwrap();
    for byte in artifact.iter_mut().take(60) {
        *byte = !*byte;
    }

    assert!(matches!(
        decode(&artifact, &config),
        Err(Error::Uncorrectable { chunk: 0 })
    ));
}

#[test]
fn test_framed_artifact_survives_corruption() {
    let data = random_payload(5000, 17);
    let config = CodecConfig::new(Strategy::reed_solomon(), 5).framed();
    let artifact = encode(&data, &config).unwrap();

    let damaged = Corruptor::with_seed(18).corrupt(&artifact, 0.05);
    let decoded = arf_codec::decode_framed(&damaged).unwrap();
    assert_eq!(decoded.data, data);
}
