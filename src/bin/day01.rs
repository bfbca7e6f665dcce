use tracing::{event, span, Level};

use aoc2021::error::Result;
use aoc2021::{input, logging};

fn count_increases<T: PartialOrd>(values: &[T]) -> usize {
    values.windows(2).filter(|w| w[1] > w[0]).count()
}

/// Window sums are widened so that no window of `u64` depths can overflow.
fn window_sums(values: &[u64], width: usize) -> Vec<u128> {
    values
        .windows(width)
        .map(|w| w.iter().map(|n| u128::from(*n)).sum())
        .collect()
}

#[cfg(test)]
const SAMPLE: [u64; 10] = [199, 200, 208, 210, 200, 207, 240, 269, 260, 263];

#[test]
fn test_count_increases() {
    assert_eq!(count_increases(&SAMPLE), 7);
    assert_eq!(
        count_increases(&[607, 618, 618, 617, 647, 716, 769, 792]),
        5
    );
    assert_eq!(count_increases(&[5]), 0);
    assert_eq!(count_increases::<u64>(&[]), 0);
}

#[test]
fn test_window_sums() {
    assert_eq!(
        window_sums(&SAMPLE, 3),
        vec![607, 618, 618, 617, 647, 716, 769, 792]
    );
    // Too short for even one window.
    assert!(window_sums(&[1, 2], 3).is_empty());
}

#[test]
fn test_window_sums_do_not_overflow() {
    let depths = [u64::MAX, 1, 1, u64::MAX];
    let sums = window_sums(&depths, 3);
    assert_eq!(
        sums,
        vec![u128::from(u64::MAX) + 2, u128::from(u64::MAX) + 2]
    );
    assert_eq!(count_increases(&sums), 0);
    assert_eq!(part2(&[u64::MAX, u64::MAX, u64::MAX, u64::MAX]), 0);
    assert_eq!(part2(&[0, u64::MAX, u64::MAX, 1]), 1);
}

fn part1(depths: &[u64]) -> usize {
    let span = span!(Level::INFO, "day01 part 1");
    let _enter = span.enter();
    count_increases(depths)
}

fn part2(depths: &[u64]) -> usize {
    let span = span!(Level::INFO, "day01 part 2");
    let _enter = span.enter();
    let sums = window_sums(depths, 3);
    event!(Level::DEBUG, "comparing {} window sums", sums.len());
    count_increases(&sums)
}

#[test]
fn test_parts() {
    assert_eq!(part1(&SAMPLE), 7);
    assert_eq!(part2(&SAMPLE), 5);
}

fn run() -> Result<()> {
    let depths: Vec<u64> = input::parse_records(input::open()?, |s| s.trim().parse::<u64>())?;
    println!("Answer: {}", part1(&depths));
    println!("Answer: {}", part2(&depths));
    Ok(())
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("fail: {}", e);
        std::process::exit(1);
    }
}
