use super::CodecError;
use std::future::Future;
use tokio::sync::watch;

/// Connection-wide "closed" flag that aborts in-flight stream operations.
///
/// Every read and write a codec performs is raced against this flag, so a
/// `close` from any task makes blocked I/O fail promptly instead of waiting
/// on the peer.
pub(crate) struct CloseSignal {
    tx: watch::Sender<bool>,
}

impl CloseSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Flips the flag. Returns `false` if it was already set.
    pub fn close(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Runs `op` unless, or until, the codec is closed.
    pub async fn guard<F, T>(&self, op: F) -> Result<T, CodecError>
    where
        F: Future<Output = Result<T, CodecError>>,
    {
        let mut closed = self.tx.subscribe();
        if *closed.borrow_and_update() {
            return Err(CodecError::closed());
        }

        tokio::select! {
            result = op => result,
            _ = closed.wait_for(|is_closed| *is_closed) => Err(CodecError::closed()),
        }
    }
}
