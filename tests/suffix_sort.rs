// Whole-sorter tests against a reference sort of all suffixes, across the
// tuning configurations that steer groups into the different sort paths.

use aazip::sort::{suffix_array, suffix_array_with_stats, Params};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn reference_sa(text: &[u8]) -> Vec<i32> {
    let mut sa: Vec<i32> = (0..text.len() as i32).collect();
    sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    sa
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = vec![0u8; len];
    rng.fill(&mut text[..]);
    text
}

// A random block repeated: aligned suffixes share prefixes far past the
// shallow limit, so the helped sorter has real work to do.
fn block_repeat(block_len: usize, reps: usize, seed: u64) -> Vec<u8> {
    let block = random_bytes(block_len, seed);
    let mut text = Vec::with_capacity(block_len * reps);
    for _ in 0..reps {
        text.extend_from_slice(&block);
    }
    text
}

#[test]
fn random_text_matches_reference_sort() {
    let text = random_bytes(200_000, 42);
    assert_eq!(suffix_array(&text, &Params::default()), reference_sa(&text));
}

#[test]
fn random_text_with_pseudo_anchors() {
    let text = random_bytes(200_000, 43);
    let mut params = Params::default();
    params.max_pseudo_anchor_offset = 20;
    assert_eq!(suffix_array(&text, &params), reference_sa(&text));
}

#[test]
fn small_alphabet_random_text() {
    let mut rng = StdRng::seed_from_u64(44);
    let text: Vec<u8> = (0..50_000).map(|_| rng.random_range(b'a'..=b'd')).collect();
    assert_eq!(suffix_array(&text, &Params::default()), reference_sa(&text));
}

#[test]
fn periodic_text_exercises_helped_sort() {
    let text = block_repeat(600, 20, 45);
    let (sa, stats) = suffix_array_with_stats(&text, &Params::default());
    assert_eq!(sa, reference_sa(&text));
    // repeats tie far beyond the shallow limit
    assert!(stats.helped_sorts > 0);
}

#[test]
fn periodic_text_with_pseudo_anchors() {
    let text = block_repeat(600, 20, 46);
    let mut params = Params::default();
    params.max_pseudo_anchor_offset = 20;
    assert_eq!(suffix_array(&text, &params), reference_sa(&text));
}

#[test]
fn periodic_text_with_anchor_rank_updates() {
    let text = block_repeat(600, 20, 47);
    let mut params = Params::default();
    params.max_pseudo_anchor_offset = 20;
    params.update_anchor_ranks = true;
    assert_eq!(suffix_array(&text, &params), reference_sa(&text));
}

#[test]
fn anchors_disabled_falls_back_to_deep_sort() {
    let text = block_repeat(300, 20, 48);
    let (sa, stats) = suffix_array_with_stats(&text, &Params::new(0, 2000));
    assert_eq!(sa, reference_sa(&text));
    assert!(stats.deep_sorts > 0);
}

#[test]
fn blind_trie_takes_large_groups() {
    let text = block_repeat(300, 20, 49);
    // a low ratio steers whole groups into the blind trie
    let mut params = Params::new(0, 10);
    params.max_pseudo_anchor_offset = 0;
    assert_eq!(suffix_array(&text, &params), reference_sa(&text));
}

#[test]
fn dense_anchor_regions() {
    let text = block_repeat(600, 20, 50);
    let params = Params::new(100, 2000);
    assert_eq!(suffix_array(&text, &params), reference_sa(&text));
}

#[test]
fn word_size_variants_agree() {
    let random = random_bytes(30_000, 51);
    let periodic = block_repeat(300, 10, 52);
    for text in [&random, &periodic] {
        let expected = reference_sa(text);
        for w in [1, 2, 4] {
            let mut params = Params::default();
            params.word_size = w;
            assert_eq!(suffix_array(text, &params), expected, "word size {}", w);
        }
    }
}

#[test]
fn repeated_single_byte() {
    let text = vec![b'a'; 100_000];
    let expected: Vec<i32> = (0..100_000).rev().collect();
    assert_eq!(suffix_array(&text, &Params::default()), expected);
}

#[test]
fn alternating_two_bytes() {
    // "abab...": every suffix of one parity prefixes the longer ones, so
    // each parity class sorts by descending position
    let n = 4000i32;
    let text: Vec<u8> = (0..n).map(|i| if i % 2 == 0 { b'a' } else { b'b' }).collect();
    let mut expected: Vec<i32> = (0..n).rev().filter(|p| p % 2 == 0).collect();
    expected.extend((0..n).rev().filter(|p| p % 2 == 1));
    assert_eq!(suffix_array(&text, &Params::default()), expected);
}

#[test]
fn short_texts_all_params() {
    let texts: [&[u8]; 6] = [
        b"banana",
        b"mississippi",
        b"abracadabra",
        b"aaaaab",
        b"ba",
        b"b",
    ];
    for text in texts {
        let expected = reference_sa(text);
        for params in [Params::default(), Params::new(0, 2000), Params::new(100, 10)] {
            assert_eq!(suffix_array(text, &params), expected);
        }
    }
}
