//! Generators of placeholder text, secrets, identifiers and random numbers.
//!
//! Every generator has a variant taking an injected `rand::Rng` so that
//! results can be reproduced with a seeded generator.

pub mod lorem;
pub mod password;
pub mod random;
pub mod uuid;
