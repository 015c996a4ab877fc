use thiserror::Error;

/// Storage-level failures. All variants are terminal rejections of the
/// request at hand; none is retryable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("time slot overlaps an existing appointment")]
    SlotBooked,

    #[error("time slot overlaps an existing blocked slot")]
    SlotBlocked,

    #[error("blocked slot belongs to another dentist")]
    Forbidden,
}
