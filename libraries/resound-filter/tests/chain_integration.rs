//! Filter chain integration tests
//!
//! Chains are built from TOML configuration through the registry, the way
//! the output path builds them.

use proptest::prelude::*;
use resound_core::{AudioFormat, ConfigStore, ResoundError, SampleFormat};
use resound_filter::{Filter, FilterChain, FilterRegistry, FilterSession};

const CONFIG: &str = r#"
    [[filter]]
    name = "identity"
    plugin = "null"

    [[filter]]
    name = "half"
    plugin = "volume"
    volume = 50

    [[filter]]
    name = "full"
    plugin = "volume"

    [[filter]]
    name = "swap"
    plugin = "route"
    routes = "0>1, 1>0"

    [[filter]]
    name = "downmix"
    plugin = "convert"
    format = "*:*:1"

    [[filter]]
    name = "second-channel"
    plugin = "route"
    routes = "1>0"

    [[filter]]
    name = "to-float"
    plugin = "convert"
    format = "*:f:*"

    [[filter]]
    name = "to-s16"
    plugin = "convert"
    format = "*:16:*"
"#;

fn chain(names: &str) -> FilterChain {
    let store = ConfigStore::from_toml_str(CONFIG).unwrap();
    FilterRegistry::with_builtin_plugins()
        .parse_chain(&store, names)
        .unwrap()
}

fn s16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
}

fn s16_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_ne_bytes([b[0], b[1]]))
        .collect()
}

#[test]
fn volume_then_route() {
    let mut chain = chain("half, swap");
    let out = chain.open(AudioFormat::cd_quality()).unwrap();
    assert_eq!(out, AudioFormat::cd_quality());
    assert_eq!(chain.negotiated_formats().len(), 2);

    let input = s16_bytes(&[1000, -2000, 400, 0]);
    let result = chain.filter(&input).unwrap();
    assert_eq!(s16_samples(result), vec![-1000, 500, 0, 200]);
    chain.close();
}

#[test]
fn mismatched_chain_fails_at_open() {
    let mut chain = chain("downmix, second-channel");
    let err = chain.open(AudioFormat::cd_quality()).unwrap_err();
    assert!(matches!(err, ResoundError::FormatNegotiation(_)));
    assert!(!chain.is_open());

    // Never got far enough to transform anything
    assert!(chain.filter(&[0, 0, 0, 0]).is_err());
}

#[test]
fn negotiated_formats_follow_the_chain() {
    let mut chain = chain("to-float, downmix");
    let out = chain.open(AudioFormat::cd_quality()).unwrap();
    assert_eq!(out, AudioFormat::new(44_100, SampleFormat::Float, 1));

    let formats = chain.negotiated_formats();
    assert_eq!(formats[0].1, formats[1].0);
}

#[test]
fn float_round_trip_is_exact() {
    let mut chain = chain("to-float, to-s16");
    chain.open(AudioFormat::cd_quality()).unwrap();

    let samples = [i16::MIN, -1, 0, 1, 12_345, i16::MAX];
    let input = s16_bytes(&samples);
    let result = chain.filter(&input).unwrap();
    assert_eq!(s16_samples(result), samples);
}

#[test]
fn session_pumps_large_input_unchanged() {
    let store = ConfigStore::from_toml_str(CONFIG).unwrap();
    let filter = FilterRegistry::with_builtin_plugins()
        .load_named(&store, "full")
        .unwrap();
    let mut session = FilterSession::open(filter, AudioFormat::cd_quality()).unwrap();

    // Not a multiple of the pump chunk size or of the frame size
    let input: Vec<u8> = (0..10_001u32).map(|i| (i * 7 % 251) as u8).collect();
    let mut output = Vec::new();
    session.pump(&mut input.as_slice(), &mut output).unwrap();
    session.close();

    // The trailing odd byte is held back as a partial sample
    assert_eq!(output, input[..10_000]);
}

proptest! {
    #[test]
    fn identity_chain_preserves_blocks(
        blocks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 0..8)
    ) {
        let mut chain = chain("identity, identity");
        chain.open(AudioFormat::cd_quality()).unwrap();
        for block in &blocks {
            prop_assert_eq!(chain.filter(block).unwrap(), block.as_slice());
        }
        chain.close();
    }

    #[test]
    fn full_volume_chain_stays_within_one_lsb(samples in prop::collection::vec(any::<i16>(), 0..256)) {
        let mut chain = chain("full, identity");
        chain.open(AudioFormat::cd_quality()).unwrap();
        let input = s16_bytes(&samples);
        let out = s16_samples(chain.filter(&input).unwrap());
        prop_assert_eq!(out.len(), samples.len());
        for (a, b) in out.iter().zip(&samples) {
            prop_assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
        }
    }
}
