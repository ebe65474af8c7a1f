use crate::error::{Error, Result};

/// Output of resolving a raw key path such as `foo[0].bar[1].baz`: the
/// ordered constraint tokens enforcing each array slot, plus the residual
/// dotted key usable for value comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub constraints: Vec<String>,
    pub residual: String,
}

/// Rewrites `key` left to right, peeling off one `[N]` at a time into a
/// constraint token `prefix.$index=N`, until no brackets remain.
pub fn resolve(key: &str) -> Result<ResolvedKey> {
    let mut current = key.to_string();
    let mut constraints = Vec::new();

    loop {
        let bracket_pos = match current.find('[') {
            Some(pos) => pos,
            None => break,
        };

        let left_prefix = &current[..bracket_pos];
        let rest = &current[bracket_pos + 1..];

        let close_pos = rest.find(']').ok_or_else(|| Error::MalformedKey {
            key: key.to_string(),
            reason: "unmatched '[' with no closing ']'",
        })?;

        let index_str = &rest[..close_pos];
        if index_str.is_empty() {
            return Err(Error::MalformedKey {
                key: key.to_string(),
                reason: "empty array index '[]'",
            });
        }
        if !index_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedKey {
                key: key.to_string(),
                reason: "array index must be a non-negative decimal integer",
            });
        }
        let index: u32 = index_str.parse().map_err(|_| Error::MalformedKey {
            key: key.to_string(),
            reason: "array index out of range",
        })?;

        constraints.push(format!("{left_prefix}.$index={index}"));

        let right_suffix = &rest[close_pos + 1..];
        current = format!("{left_prefix}{right_suffix}");
    }

    log::debug!("resolved key {key:?} -> {} constraint(s), residual {current:?}", constraints.len());
    Ok(ResolvedKey { constraints, residual: current })
}
