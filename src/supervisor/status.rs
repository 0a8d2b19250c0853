//! One-way status reporting from the worker to the presentation side.
//!
//! The worker pushes short status strings; whoever owns the other end
//! (the foreground thread in the real binary) displays them. Nothing ever
//! calls back into the worker, and a vanished receiver is not an error.

use std::sync::mpsc::Sender;

pub trait StatusSink: Send {
    fn update(&self, message: &str);
}

/// Pushes status text over an mpsc channel to the foreground thread.
pub struct ChannelStatusSink {
    sender: Sender<String>,
}

impl ChannelStatusSink {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl StatusSink for ChannelStatusSink {
    fn update(&self, message: &str) {
        // A dropped receiver means the presentation side is gone; the
        // worker keeps supervising regardless.
        let _ = self.sender.send(message.to_string());
    }
}

/// Discards all status updates.
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn update(&self, _message: &str) {}
}
