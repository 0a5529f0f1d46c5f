//! Numeric magnitudes embedded in free-text ability descriptions
//!
//! Catalog text such as "Cure Wounds (4th level): Restore 5 HP" carries its
//! magnitude as the last integer literal. Structured `magnitude` fields are
//! preferred; this parser exists so older data files keep working.

use nom::{
    branch::alt,
    character::complete::{anychar, digit1},
    combinator::map,
    multi::many0,
    IResult,
};

/// Every token of `input`, with integer literals that fit in `i32` as `Some`
fn integer_tokens(input: &str) -> IResult<&str, Vec<Option<i32>>> {
    many0(alt((
        // A run too large for i32 is consumed whole and yields nothing
        map(digit1, |s: &str| s.parse::<i32>().ok()),
        map(anychar, |_| None),
    )))(input)
}

/// All integer literals in `text`, in order of appearance
pub fn integers_in(text: &str) -> Vec<i32> {
    match integer_tokens(text) {
        Ok((_, tokens)) => tokens.into_iter().flatten().collect(),
        Err(_) => Vec::new(),
    }
}

/// Last integer literal in `text`, or 0 when there is none
pub fn last_integer(text: &str) -> i32 {
    integers_in(text).last().copied().unwrap_or(0)
}

/// First integer literal in `text`
pub fn first_integer(text: &str) -> Option<i32> {
    integers_in(text).first().copied()
}
