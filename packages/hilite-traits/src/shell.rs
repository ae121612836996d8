/// Callbacks into whatever is hosting the document (window, webview, test harness)
pub trait ShellProvider {
    fn request_redraw(&self) {}
    /// Show a short-lived, non-blocking message to the user
    fn show_toast(&self, message: &str) {
        let _ = message;
    }
}

pub struct DummyShellProvider;
impl ShellProvider for DummyShellProvider {}
