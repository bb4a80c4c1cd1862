//! Shared validation helpers for request drafts.

/// `garde` rule rejecting empty and whitespace-only strings.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}
