//! One-hot encoding between alphabet symbols and numeric buffers.
//!
//! Pure mappings with no hidden state: the generator's observable input
//! and target vectors are rebuilt from these every step, and a
//! predictor's output vector decodes back to a symbol via arg-max.

use crate::{
    error::{Error, Result},
    types::Symbol,
};

/// Write a one-hot encoding of `symbol` into `buf`.
///
/// Zeroes the whole buffer, then sets 1.0 at the symbol's index. The
/// buffer length is the alphabet size.
///
/// # Errors
///
/// Returns [`Error::SymbolOutOfRange`] if the symbol does not fit the
/// buffer. Output tables are validated at construction, so hitting this
/// indicates a programming error rather than bad runtime data.
pub fn encode_one_hot(symbol: Symbol, buf: &mut [f64]) -> Result<()> {
    let code = symbol.code();
    if code >= buf.len() {
        return Err(Error::SymbolOutOfRange {
            symbol: code,
            alphabet_size: buf.len(),
        });
    }
    buf.fill(0.0);
    buf[code] = 1.0;
    Ok(())
}

/// Index of the maximal value in `values`, or `None` for an empty slice.
///
/// Ties resolve to the first maximal index, so decoding a well-formed
/// one-hot vector always returns the encoded symbol.
pub fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
