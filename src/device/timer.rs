/// Pause between idle iterations of the receive loop.
pub trait Timer: Sized {
    /// Delay for millis milliseconds
    async fn delay_ms(&mut self, millis: u64);
}
