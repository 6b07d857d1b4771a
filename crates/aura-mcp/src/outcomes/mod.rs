//! Built-in outcomes for Aura instance management

pub mod instances;
pub mod templates;

use crate::outcome::Outcome;

/// Every outcome the server registers at startup
pub fn all() -> Vec<Outcome> {
    let mut outcomes = instances::outcomes();
    outcomes.extend(templates::outcomes());
    outcomes
}
