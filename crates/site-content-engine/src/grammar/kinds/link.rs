/// Markdown-style link `[label](url)` with owned delimiters.
pub struct Link;

impl Link {
    pub const LABEL_OPEN: u8 = b'[';
    pub const LABEL_CLOSE: u8 = b']';
    pub const URL_OPEN: u8 = b'(';
    pub const URL_CLOSE: u8 = b')';

    pub fn encode(label: &str, url: &str) -> String {
        format!("[{label}]({url})")
    }
}
