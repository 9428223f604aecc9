// Standard Library Imports
use std::{ops::Range, sync::LazyLock};

// External Crate Imports
use nom::{
    IResult,
    branch::alt,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::{many0, many1},
    sequence::{delimited, pair, tuple},
};
use regex::Regex;

// Local Crate Imports
use crate::Mass;

// Constants ===========================================================================================================

static PEPTIDE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[\[\]\w.+\-]*\.").unwrap());

// Public API ==========================================================================================================

/// Finds the dot-delimited peptide in a search-engine string like `K.N[+203.079]GTR.S`, returning the byte-range of
/// the residues between the dots (`N[+203.079]GTR` above)
///
/// The match is greedy, so modification masses containing a `.` stay inside the token.
#[must_use]
pub fn peptide_token(peptide: &str) -> Option<Range<usize>> {
    PEPTIDE_TOKEN_RE
        .find(peptide)
        .map(|m| m.start() + 1..m.end() - 1)
}

/// Residues = Residue , { Residue } ;
pub fn residues(i: &str) -> IResult<&str, Vec<(char, Vec<Mass>)>> {
    all_consuming(many1(residue))(i)
}

/// Residue = uppercase , { Modification } ;
pub fn residue(i: &str) -> IResult<&str, (char, Vec<Mass>)> {
    let uppercase = satisfy(|c| c.is_ascii_uppercase());
    pair(uppercase, many0(modification))(i)
}

/// Modification = "[" , Mass Delta , "]" | Mass Delta ;
pub fn modification(i: &str) -> IResult<&str, Mass> {
    alt((delimited(char('['), mass_delta, char(']')), mass_delta))(i)
}

/// Mass Delta = ( "+" | "-" ) , digit , { digit } , [ "." , digit , { digit } ] ;
pub fn mass_delta(i: &str) -> IResult<&str, Mass> {
    let magnitude = map_res(
        recognize(tuple((digit1, opt(pair(char('.'), digit1))))),
        Mass::from_str_exact,
    );
    map(pair(one_of("+-"), magnitude), |(sign, mass)| match sign {
        '-' => -mass,
        _ => mass,
    })(i)
}

// Module Tests ========================================================================================================
