use std::io::BufRead;

use tracing::{event, span, Level};

use aoc2021::error::{Error, Result};
use aoc2021::{input, logging};

/// Readings from the submarine's diagnostic report.  All readings have
/// the same number of bits; column 0 is the most significant.
#[derive(Debug, Clone)]
struct Diagnostic {
    bitwidth: u32,
    readings: Vec<u64>,
}

fn parse_reading(s: &str) -> std::result::Result<(u32, u64), String> {
    let s = s.trim();
    if let Some(ch) = s.chars().find(|ch| *ch != '0' && *ch != '1') {
        return Err(format!("unexpected character '{}' in reading {}", ch, s));
    }
    if s.len() > 64 {
        return Err(format!("reading {} is wider than 64 bits", s));
    }
    match u64::from_str_radix(s, 2) {
        Ok(n) => Ok((s.len() as u32, n)),
        Err(e) => Err(format!("bad reading {}: {}", s, e)),
    }
}

fn parse_diagnostic<R: BufRead>(reader: R) -> Result<Diagnostic> {
    let mut bitwidth: Option<u32> = None;
    let readings = input::parse_records(reader, |s| {
        let (width, n) = parse_reading(s)?;
        match bitwidth {
            None => {
                bitwidth = Some(width);
            }
            Some(expected) if expected != width => {
                return Err(format!(
                    "expected a {}-bit reading, got {} bits",
                    expected, width
                ));
            }
            Some(_) => (),
        }
        Ok(n)
    })?;
    match bitwidth {
        Some(bitwidth) => Ok(Diagnostic { bitwidth, readings }),
        None => Err(Error::EmptyInput),
    }
}

fn mask(bitwidth: u32, bitpos: u32) -> u64 {
    1 << (bitwidth - bitpos - 1)
}

fn bit_is_set(bitwidth: u32, bitpos: u32, reading: u64) -> bool {
    let mask = mask(bitwidth, bitpos);
    reading & mask == mask
}

/// Returns the number of readings having a 1 and a 0 in column `bitpos`.
fn tally(bitwidth: u32, bitpos: u32, readings: &[u64]) -> (usize, usize) {
    let ones = readings
        .iter()
        .filter(|n| bit_is_set(bitwidth, bitpos, **n))
        .count();
    (ones, readings.len() - ones)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitCriterion {
    /// Ties favour 1.
    MostCommon,
    /// Ties favour 0.
    LeastCommon,
}

impl BitCriterion {
    fn target(&self, ones: usize, zeros: usize) -> bool {
        match self {
            BitCriterion::MostCommon => ones >= zeros,
            BitCriterion::LeastCommon => ones < zeros,
        }
    }
}

/// The product of two 64-bit rates needs 128 bits.
fn power_consumption(diag: &Diagnostic) -> u128 {
    let mut gamma: u64 = 0;
    let mut epsilon: u64 = 0;
    for bitpos in 0..diag.bitwidth {
        let (ones, zeros) = tally(diag.bitwidth, bitpos, &diag.readings);
        // A tied column leaves the bit clear in both rates.
        if ones > zeros {
            gamma |= mask(diag.bitwidth, bitpos);
        }
        if ones < zeros {
            epsilon |= mask(diag.bitwidth, bitpos);
        }
    }
    event!(Level::DEBUG, "gamma={}, epsilon={}", gamma, epsilon);
    u128::from(gamma) * u128::from(epsilon)
}

/// Narrow the readings down column by column, keeping those whose bit
/// matches `criterion`, until a single reading is left.
fn reduce(diag: &Diagnostic, criterion: BitCriterion) -> Result<u64> {
    let bitwidth = diag.bitwidth;
    let mut remaining: Vec<u64> = diag.readings.clone();
    if remaining.is_empty() {
        return Err(Error::InvalidInput("there are no readings".to_string()));
    }

    for bitpos in 0..bitwidth {
        if remaining.len() == 1 {
            break;
        }
        let (ones, zeros) = tally(bitwidth, bitpos, &remaining);
        let expected = criterion.target(ones, zeros);
        event!(
            Level::DEBUG,
            "{:?}: bit pos {}: {} ones, {} zeros: retaining readings with value {}",
            criterion,
            bitpos,
            ones,
            zeros,
            if expected { 1 } else { 0 },
        );
        remaining.retain(|n| bit_is_set(bitwidth, bitpos, *n) == expected);
        event!(Level::TRACE, "{} readings remain", remaining.len());
        if remaining.is_empty() {
            return Err(Error::InvalidInput(format!(
                "no readings left after filtering bit position {} for the {:?} criterion",
                bitpos, criterion
            )));
        }
    }
    // Anything still left agrees with the first reading in every column.
    Ok(remaining[0])
}

fn life_support_rating(diag: &Diagnostic) -> Result<u128> {
    let oxygen_generator_rating = reduce(diag, BitCriterion::MostCommon)?;
    let co2_scrubber_rating = reduce(diag, BitCriterion::LeastCommon)?;
    event!(
        Level::DEBUG,
        "oxygen generator rating={}, CO2 scrubber rating={}",
        oxygen_generator_rating,
        co2_scrubber_rating,
    );
    Ok(u128::from(oxygen_generator_rating) * u128::from(co2_scrubber_rating))
}

#[cfg(test)]
const SAMPLE: &str = concat!(
    "00100\n", "11110\n", "10110\n", "10111\n", "10101\n", "01111\n", "00111\n", "11100\n",
    "10000\n", "11001\n", "00010\n", "01010\n",
);

#[cfg(test)]
fn sample() -> Diagnostic {
    parse_diagnostic(SAMPLE.as_bytes()).expect("sample is valid")
}

#[test]
fn test_parse_diagnostic() {
    let diag = sample();
    assert_eq!(diag.bitwidth, 5);
    assert_eq!(diag.readings.len(), 12);
    assert_eq!(diag.readings[0], 4);
    assert_eq!(diag.readings[11], 10);
}

#[test]
fn test_parse_diagnostic_errors() {
    assert!(matches!(
        parse_diagnostic("".as_bytes()),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        parse_diagnostic("0101\n0121\n".as_bytes()),
        Err(Error::MalformedLine { line: 2, .. })
    ));
    assert!(matches!(
        parse_diagnostic("0101\n\n011\n".as_bytes()),
        Err(Error::MalformedLine { line: 3, .. })
    ));
    assert!(matches!(
        parse_diagnostic("+101\n".as_bytes()),
        Err(Error::MalformedLine { line: 1, .. })
    ));
    assert!(matches!(
        parse_diagnostic("1".repeat(65).as_bytes()),
        Err(Error::MalformedLine { line: 1, .. })
    ));
}

#[test]
fn test_parse_diagnostic_widest() {
    let diag = parse_diagnostic("1".repeat(64).as_bytes()).expect("64 bits is allowed");
    assert_eq!(diag.bitwidth, 64);
    assert_eq!(diag.readings, vec![u64::MAX]);
}

#[test]
fn test_tally() {
    let diag = sample();
    assert_eq!(tally(diag.bitwidth, 0, &diag.readings), (7, 5));
    assert_eq!(tally(diag.bitwidth, 4, &diag.readings), (5, 7));
}

#[test]
fn test_power_consumption() {
    assert_eq!(power_consumption(&sample()), 198);
}

#[cfg(test)]
fn wide_sample() -> Diagnostic {
    let high = format!("{}{}", "1".repeat(32), "0".repeat(32));
    let low = format!("{}{}", "0".repeat(32), "1".repeat(32));
    let text = format!("{}\n{}\n{}\n", high, high, low);
    parse_diagnostic(text.as_bytes()).expect("64-bit readings are valid")
}

#[test]
fn test_wide_readings() {
    let diag = wide_sample();
    let high: u64 = 0xffff_ffff_0000_0000;
    let low: u64 = 0x0000_0000_ffff_ffff;
    assert_eq!(diag.bitwidth, 64);
    assert_eq!(diag.readings, vec![high, high, low]);
    let expected = u128::from(high) * u128::from(low);
    assert_eq!(power_consumption(&diag), expected);
    assert_eq!(reduce(&diag, BitCriterion::MostCommon).ok(), Some(high));
    assert_eq!(reduce(&diag, BitCriterion::LeastCommon).ok(), Some(low));
    assert_eq!(life_support_rating(&diag).ok(), Some(expected));
}

#[test]
fn test_reduce_sample() {
    let diag = sample();
    assert_eq!(reduce(&diag, BitCriterion::MostCommon).ok(), Some(23));
    assert_eq!(reduce(&diag, BitCriterion::LeastCommon).ok(), Some(10));
    assert_eq!(life_support_rating(&diag).ok(), Some(230));
}

#[test]
fn test_reduce_single_reading() {
    let diag = Diagnostic {
        bitwidth: 5,
        readings: vec![0b10110],
    };
    for criterion in [BitCriterion::MostCommon, BitCriterion::LeastCommon] {
        let got = reduce(&diag, criterion).expect("one reading is always a result");
        assert_eq!(got, 0b10110);
        let again = Diagnostic {
            bitwidth: 5,
            readings: vec![got],
        };
        assert_eq!(reduce(&again, criterion).ok(), Some(got));
    }
}

#[test]
fn test_reduce_duplicates() {
    let diag = parse_diagnostic("101\n101\n".as_bytes()).expect("valid input");
    assert_eq!(reduce(&diag, BitCriterion::MostCommon).ok(), Some(5));
}

#[test]
fn test_reduce_empty() {
    let diag = Diagnostic {
        bitwidth: 3,
        readings: Vec::new(),
    };
    assert!(matches!(
        reduce(&diag, BitCriterion::MostCommon),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_reduce_runs_out_of_candidates() {
    // Every reading has a 0 in column 0, so the least common value is 1
    // and nothing survives.
    let diag = parse_diagnostic("00\n01\n".as_bytes()).expect("valid input");
    assert!(matches!(
        reduce(&diag, BitCriterion::LeastCommon),
        Err(Error::InvalidInput(_))
    ));
    assert!(life_support_rating(&diag).is_err());
}

#[test]
fn test_reduce_result_is_a_reading() {
    // Try every non-empty set of distinct 3-bit readings.
    for subset in 1u32..(1 << 8) {
        let readings: Vec<u64> = (0..8u64).filter(|n| subset & (1 << n) != 0).collect();
        let diag = Diagnostic {
            bitwidth: 3,
            readings: readings.clone(),
        };
        match reduce(&diag, BitCriterion::MostCommon) {
            Ok(n) => assert!(readings.contains(&n), "{} not in {:?}", n, readings),
            Err(e) => panic!("most common criterion failed on {:?}: {}", readings, e),
        }
        match reduce(&diag, BitCriterion::LeastCommon) {
            Ok(n) => assert!(readings.contains(&n), "{} not in {:?}", n, readings),
            Err(Error::InvalidInput(_)) => (),
            Err(e) => panic!("unexpected error on {:?}: {}", readings, e),
        }
    }
}

fn part1(diag: &Diagnostic) -> u128 {
    let span = span!(Level::INFO, "day03 part 1");
    let _enter = span.enter();
    power_consumption(diag)
}

fn part2(diag: &Diagnostic) -> Result<u128> {
    let span = span!(Level::INFO, "day03 part 2");
    let _enter = span.enter();
    life_support_rating(diag)
}

fn run() -> Result<()> {
    let diag = parse_diagnostic(input::open()?)?;
    event!(
        Level::INFO,
        "read {} readings of {} bits",
        diag.readings.len(),
        diag.bitwidth
    );
    println!("Answer: {}", part1(&diag));
    println!("Answer: {}", part2(&diag)?);
    Ok(())
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("fail: {}", e);
        std::process::exit(1);
    }
}
