use std::thread;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pwsynth::{
    Category, GenerationError, PasswordRequest, Requirement, SharedSource, allocate, generate,
};

fn request(
    length: i64,
    lowercase: Requirement,
    uppercase: Requirement,
    digit: Requirement,
    symbol: Requirement,
) -> PasswordRequest {
    PasswordRequest {
        length,
        lowercase,
        uppercase,
        digit,
        symbol,
    }
}

fn counts(password: &str) -> [usize; 4] {
    let mut counts = [0; 4];
    for c in password.chars() {
        let category = Category::of(c).expect("character belongs to exactly one category");
        counts[category.index()] += 1;
    }
    counts
}

#[test]
fn booleans_require_one_of_each_enabled_category() {
    let req = request(
        8,
        Requirement::Include(true),
        Requirement::Include(false),
        Requirement::Include(true),
        Requirement::Include(false),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for _ in 0..200 {
        let password = generate(&req, &mut rng).expect("valid request");
        let counts = counts(&password);

        assert_eq!(password.chars().count(), 8);
        assert!(counts[Category::Lowercase.index()] >= 1);
        assert!(counts[Category::Digit.index()] >= 1);
    }
}

#[test]
fn zero_slack_emits_exactly_the_minimums() {
    let req = request(
        4,
        Requirement::Count(2),
        Requirement::Count(1),
        Requirement::Count(1),
        Requirement::Count(0),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    for _ in 0..100 {
        let password = generate(&req, &mut rng).expect("valid request");
        assert_eq!(counts(&password), [2, 1, 1, 0]);
    }
}

#[test]
fn zero_length_is_empty() {
    let req = request(
        0,
        Requirement::Include(false),
        Requirement::Include(false),
        Requirement::Include(false),
        Requirement::Include(false),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    assert_eq!(generate(&req, &mut rng), Ok(String::new()));
}

#[test]
fn requirement_exceeding_length_fails() {
    let req = request(
        3,
        Requirement::Count(5),
        Requirement::Include(false),
        Requirement::Include(false),
        Requirement::Include(false),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let err = generate(&req, &mut rng).expect_err("over-constrained");
    assert_eq!(
        err,
        GenerationError::Overconstrained {
            required: 5,
            length: 3,
            excess: 2,
        }
    );
}

#[test]
fn negative_length_fails() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    assert_eq!(
        generate(&PasswordRequest::new(-4), &mut rng),
        Err(GenerationError::InvalidLength { length: -4 })
    );
}

#[test]
fn negative_counts_are_treated_as_zero() {
    let req = request(
        2,
        Requirement::Count(-10),
        Requirement::Count(-1),
        Requirement::Count(2),
        Requirement::Include(false),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    assert_eq!(counts(&generate(&req, &mut rng).expect("valid request")), [0, 0, 2, 0]);
}

#[test]
fn failed_request_does_not_advance_the_source() {
    let mut used = ChaCha8Rng::seed_from_u64(7);
    let mut fresh = ChaCha8Rng::seed_from_u64(7);
    let bad = PasswordRequest::new(-1);
    let good = PasswordRequest::new(16);

    assert!(generate(&bad, &mut used).is_err());
    assert_eq!(generate(&good, &mut used), generate(&good, &mut fresh));
}

#[test]
fn same_seed_same_password() {
    let req = PasswordRequest::new(24);

    let first = generate(&req, &mut ChaCha8Rng::seed_from_u64(99)).expect("valid request");
    let second = generate(&req, &mut ChaCha8Rng::seed_from_u64(99)).expect("valid request");
    let other = generate(&req, &mut ChaCha8Rng::seed_from_u64(100)).expect("valid request");

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn categories_are_not_grouped() {
    // 4 digits among 8 characters sit together in 5 of the C(8,4) = 70
    // arrangements, so roughly 7% of shuffled passwords.
    let req = request(
        8,
        Requirement::Count(4),
        Requirement::Include(false),
        Requirement::Count(4),
        Requirement::Include(false),
    );
    let trials = 2000;
    let mut contiguous = 0;

    for seed in 0..trials {
        let password = generate(&req, &mut ChaCha8Rng::seed_from_u64(seed)).expect("valid request");
        let positions: Vec<usize> = password
            .chars()
            .enumerate()
            .filter(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .collect();

        if positions.last().zip(positions.first()).is_some_and(|(l, f)| l - f == 3) {
            contiguous += 1;
        }
    }

    let rate = contiguous as f64 / trials as f64;
    assert!(rate > 0.02 && rate < 0.15, "contiguous rate {rate}");
}

#[test]
fn shared_source_keeps_each_call_atomic() {
    let req = PasswordRequest::new(16);
    let shared = SharedSource::new(ChaCha8Rng::seed_from_u64(12));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|_| shared.generate(&req).expect("valid request"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut concurrent: Vec<String> = handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("worker finished"))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mut sequential: Vec<String> = (0..100)
        .map(|_| generate(&req, &mut rng).expect("valid request"))
        .collect();

    concurrent.sort();
    sequential.sort();
    assert_eq!(concurrent, sequential);
}

fn requirement() -> impl Strategy<Value = Requirement> {
    prop_oneof![
        any::<bool>().prop_map(Requirement::Include),
        (-3i64..6).prop_map(Requirement::Count),
    ]
}

proptest! {
    #[test]
    fn prop_length_minimums_and_alphabet(
        extra in 0i64..40,
        lowercase in requirement(),
        uppercase in requirement(),
        digit in requirement(),
        symbol in requirement(),
        seed in any::<u64>(),
    ) {
        let mut req = request(0, lowercase, uppercase, digit, symbol);
        let required: u64 = req.resolved().iter().sum();
        req.length = required as i64 + extra;

        let password = generate(&req, &mut ChaCha8Rng::seed_from_u64(seed)).expect("valid request");
        let counts = counts(&password);

        prop_assert_eq!(password.chars().count() as i64, req.length);
        for category in Category::ALL {
            prop_assert!(counts[category.index()] as u64 >= req.requirement(category).resolve());
        }
    }

    #[test]
    fn prop_slack_is_conserved(
        length in 0u64..64,
        required in proptest::array::uniform4(0u64..8),
        seed in any::<u64>(),
    ) {
        let plan = allocate(length, &required, &mut ChaCha8Rng::seed_from_u64(seed));
        let slack = length as i64 - required.iter().sum::<u64>() as i64;

        prop_assert_eq!(plan.extras().iter().sum::<i64>(), slack);
        if slack >= 0 {
            prop_assert_eq!(plan.total() as u64, length);
            prop_assert!(plan.extras().iter().all(|e| *e >= 0));
        }
    }
}
