use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space1},
    combinator::{all_consuming, map, map_res},
    sequence::separated_pair,
    IResult,
};
use tracing::{event, span, Level};

use aoc2021::error::{Error, Result};
use aoc2021::{input, logging};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
enum Move {
    Down(i64),
    Up(i64),
    Forward(i64),
}

fn i64_parser(input: &str) -> IResult<&str, i64> {
    map_res(digit1, FromStr::from_str)(input)
}

fn move_parser(input: &str) -> IResult<&str, Move> {
    alt((
        map(separated_pair(tag("forward"), space1, i64_parser), |(_, n)| {
            Move::Forward(n)
        }),
        map(separated_pair(tag("down"), space1, i64_parser), |(_, n)| {
            Move::Down(n)
        }),
        map(separated_pair(tag("up"), space1, i64_parser), |(_, n)| {
            Move::Up(n)
        }),
    ))(input)
}

impl TryFrom<&str> for Move {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Move, String> {
        match all_consuming(move_parser)(s.trim()) {
            Ok((_, m)) => Ok(m),
            Err(e) => Err(format!(
                "expected up/down/forward and a number, got '{}': {}",
                s, e
            )),
        }
    }
}

#[test]
fn test_parse_move() {
    assert_eq!(Move::try_from("forward 5"), Ok(Move::Forward(5)));
    assert_eq!(Move::try_from("down  12"), Ok(Move::Down(12)));
    assert_eq!(Move::try_from("up 3\r"), Ok(Move::Up(3)));
    assert!(Move::try_from("sideways 3").is_err());
    assert!(Move::try_from("up").is_err());
    assert!(Move::try_from("up x").is_err());
    assert!(Move::try_from("up -3").is_err());
    assert!(Move::try_from("forward 5 6").is_err());
}

fn overflow() -> Error {
    Error::InvalidInput("submarine position does not fit in 64 bits".to_string())
}

fn part1(moves: &[Move]) -> Result<i64> {
    fn move_sub(pos: (i64, i64), m: &Move) -> Option<(i64, i64)> {
        let (h, v) = pos;
        match m {
            Move::Down(x) => Some((h, v.checked_add(*x)?)),
            Move::Up(x) => Some((h, v.checked_sub(*x)?)),
            Move::Forward(x) => Some((h.checked_add(*x)?, v)),
        }
    }

    let span = span!(Level::INFO, "day02 part 1");
    let _enter = span.enter();
    let (h, v) = moves
        .iter()
        .try_fold((0, 0), move_sub)
        .ok_or_else(overflow)?;
    event!(Level::DEBUG, "final position: horizontal={}, depth={}", h, v);
    h.checked_mul(v).ok_or_else(overflow)
}

fn part2(moves: &[Move]) -> Result<i64> {
    #[derive(Debug)]
    struct Pos {
        aim: i64,
        h: i64,
        v: i64,
    }
    fn move_sub(pos: Pos, m: &Move) -> Option<Pos> {
        match m {
            Move::Down(x) => Some(Pos {
                aim: pos.aim.checked_add(*x)?,
                ..pos
            }),
            Move::Up(x) => Some(Pos {
                aim: pos.aim.checked_sub(*x)?,
                ..pos
            }),
            Move::Forward(x) => Some(Pos {
                h: pos.h.checked_add(*x)?,
                v: pos.v.checked_add(pos.aim.checked_mul(*x)?)?,
                ..pos
            }),
        }
    }

    let span = span!(Level::INFO, "day02 part 2");
    let _enter = span.enter();
    let end = moves
        .iter()
        .try_fold(Pos { aim: 0, h: 0, v: 0 }, move_sub)
        .ok_or_else(overflow)?;
    event!(Level::DEBUG, "final position: {:?}", end);
    end.h.checked_mul(end.v).ok_or_else(overflow)
}

#[cfg(test)]
fn sample() -> Vec<Move> {
    vec![
        Move::Forward(5),
        Move::Down(5),
        Move::Forward(8),
        Move::Up(3),
        Move::Down(8),
        Move::Forward(2),
    ]
}

#[test]
fn test_part1() {
    assert_eq!(part1(&sample()).ok(), Some(150));
}

#[test]
fn test_part2() {
    assert_eq!(part2(&sample()).ok(), Some(900));
}

#[test]
fn test_overflow() {
    let huge = Move::try_from("forward 9223372036854775807").expect("i64::MAX is a valid amount");
    assert_eq!(huge, Move::Forward(i64::MAX));
    // Horizontal position alone overflows.
    assert!(matches!(
        part1(&[huge, huge]),
        Err(Error::InvalidInput(_))
    ));
    // Each sum fits, but the product does not.
    let moves = [Move::Forward(1 << 32), Move::Down(1 << 32)];
    assert!(matches!(part1(&moves), Err(Error::InvalidInput(_))));
    // aim * x overflows even though aim and x both fit.
    let moves = [Move::Down(1 << 40), Move::Forward(1 << 40)];
    assert!(matches!(part2(&moves), Err(Error::InvalidInput(_))));
    // Large but representable values still work.
    let moves = [Move::Forward(1 << 31), Move::Down(1 << 31)];
    assert_eq!(part1(&moves).ok(), Some(1 << 62));
}

#[test]
fn test_parse_sample() {
    let text: &[u8] = b"forward 5\ndown 5\nforward 8\nup 3\ndown 8\nforward 2\n";
    let moves = input::parse_records(text, |s| Move::try_from(s)).expect("sample is valid");
    assert_eq!(moves, sample());
}

fn run() -> Result<()> {
    let moves: Vec<Move> = input::parse_records(input::open()?, |s| Move::try_from(s))?;
    println!("Answer: {}", part1(&moves)?);
    println!("Answer: {}", part2(&moves)?);
    Ok(())
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("fail: {}", e);
        std::process::exit(1);
    }
}
