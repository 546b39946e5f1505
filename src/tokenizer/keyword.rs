//! Reserved words of the expression language.
//!
//! Keywords are recognized by the identifier parser: a word is first read
//! as an identifier and then promoted to a [`Keyword`] when it matches one
//! exactly, so `thisValue` stays an identifier while `this` does not.

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    True,
    False,
    Null,
    Undefined,
    This,
}
