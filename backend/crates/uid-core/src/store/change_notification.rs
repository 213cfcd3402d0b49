/// Emitted by a store after every committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification {
    /// Store-local revision, incremented per committed write
    pub revision: u64,
}

/// Buffered notifications per subscriber before it starts lagging.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;
