//! Identifier generation for resource collections.
//!
//! Ids are decimal strings. A new id is one more than the largest numeric id
//! in the collection. Ids that do not parse as an integer in
//! `0..=MAX_ID` are skipped rather than treated as an error.

use thiserror::Error;

/// Largest id ever issued. `u64::MAX` has no successor and is never handed
/// out, so a stored `u64::MAX` cannot collide with a new id.
pub const MAX_ID: u64 = u64::MAX - 1;

/// A collection has issued its last id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no ids left after {last}")]
pub struct IdsExhausted {
    /// The id the sequence could not step past.
    pub last: u64,
}

/// Compute the next id for a collection holding `ids`.
///
/// Returns `"1"` for an empty collection, and [`IdsExhausted`] when the
/// largest id is already [`MAX_ID`].
pub fn next_id<'a, I>(ids: I) -> Result<String, IdsExhausted>
where
    I: IntoIterator<Item = &'a str>,
{
    successor(max_numeric(ids)).map(|id| id.to_string())
}

/// Largest usable numeric id in `ids`, or 0 when there is none.
pub fn max_numeric<'a, I>(ids: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(|id| id.trim().parse::<u64>().ok())
        .filter(|id| *id <= MAX_ID)
        .max()
        .unwrap_or(0)
}

fn successor(last: u64) -> Result<u64, IdsExhausted> {
    last.checked_add(1)
        .filter(|next| *next <= MAX_ID)
        .ok_or(IdsExhausted { last })
}

/// Id source that never hands out the same id twice.
///
/// [`next_id`] alone would reissue the highest id after it is deleted, so the
/// sequence also remembers the last id it produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// Start a sequence whose next id is greater than `last`.
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// The last id issued (0 if none).
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Issue an id for a collection currently holding `ids`.
    ///
    /// On [`IdsExhausted`] the sequence is left unchanged.
    pub fn next<'a, I>(&mut self, ids: I) -> Result<String, IdsExhausted>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let next = successor(max_numeric(ids).max(self.last))?;
        self.last = next;
        Ok(next.to_string())
    }
}
