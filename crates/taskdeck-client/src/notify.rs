/// Seam toward the toast display. The client never renders; it hands
/// finished messages to whatever sink the embedder wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);

    fn success(&mut self, message: impl Into<String>) {
        self.notify(Notice {
            level: Level::Success,
            message: message.into(),
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        self.notify(Notice {
            level: Level::Error,
            message: message.into(),
        });
    }
}

/// Notifier that only logs; useful for headless embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            Level::Success => tracing::info!(message = %notice.message, "notice"),
            Level::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}
