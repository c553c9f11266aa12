/// Restores the terminal when dropped.
///
/// Holding one of these in `main` means the terminal leaves raw mode and the
/// alternate screen on every exit path, including an unwinding panic.
///
/// # Examples
///
/// ```
/// use rusty_console::utils::guard::RestoreGuard;
///
/// let _guard = RestoreGuard::new(|| println!("restored"));
/// // "restored" is printed when _guard goes out of scope
/// ```
pub struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    /// Runs the restore callback now instead of on drop.
    pub fn restore_now(mut self) {
        if let Some(f) = self.restore.take() {
            f();
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.restore.take() {
            f();
        }
    }
}
