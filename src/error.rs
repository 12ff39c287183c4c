use thiserror::Error;

/// Failures surfaced by the ledger store.
#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    #[error("No expense #{} (the ledger holds {len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode expenses: {0}")]
    Encode(#[from] serde_json::Error),
}
