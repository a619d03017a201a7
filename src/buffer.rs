//! Rolling buffer holding the tail of not-yet-matched child output.
//!
//! The buffer accumulates each incoming chunk, is scanned once, and is then
//! truncated so that only the trailing partial line survives. A completed,
//! already-scanned line can therefore never match twice.

/// Cap on the trailing partial line. A child that streams an enormous line
/// with no newline would otherwise grow the buffer without bound.
const MAX_PARTIAL_LINE: usize = 64 * 1024;

/// Accumulates decoded child output between scans.
///
/// Invariant: after [`retain_partial_line`](RollingBuffer::retain_partial_line),
/// the buffer holds only the content after the last newline seen so far.
#[derive(Debug, Default)]
pub(crate) struct RollingBuffer {
    tail: String,
    /// Set when the front of the buffer was clipped mid-line. While set, the
    /// leading fragment is not a true line start and must not be matched
    /// against line-anchored patterns.
    clipped: bool,
}

impl RollingBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk, decoding it as UTF-8 (invalid sequences are
    /// replaced, never dropped, so the scan window stays aligned with what
    /// was forwarded).
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.tail.push_str(&String::from_utf8_lossy(chunk));

        if self.tail.len() > MAX_PARTIAL_LINE && !self.tail.contains('\n') {
            let cut = floor_char_boundary(&self.tail, self.tail.len() - MAX_PARTIAL_LINE);
            self.tail.drain(..cut);
            self.clipped = true;
        }
    }

    /// The scan window for line-anchored matching.
    ///
    /// Guaranteed to begin at a true line start: if the front was clipped
    /// mid-line, the leading fragment is excluded until its newline arrives.
    pub(crate) fn matchable(&self) -> &str {
        if !self.clipped {
            return &self.tail;
        }
        match self.tail.find('\n') {
            Some(idx) => &self.tail[idx + 1..],
            None => "",
        }
    }

    /// Drop everything up to and including the last newline; only the
    /// trailing partial line is kept. Called once per chunk, match or not.
    pub(crate) fn retain_partial_line(&mut self) {
        if let Some(idx) = self.tail.rfind('\n') {
            self.tail.drain(..=idx);
            self.clipped = false;
        }
    }
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_accumulates() {
        let mut buf = RollingBuffer::new();
        buf.push(b"? Ove");
        buf.push(b"rwrite foo\n");
        assert_eq!(buf.matchable(), "? Overwrite foo\n");
    }

    #[test]
    fn test_retain_partial_line() {
        let mut buf = RollingBuffer::new();
        buf.push(b"line one\nline two\npartial");
        buf.retain_partial_line();
        assert_eq!(buf.matchable(), "partial");
    }

    #[test]
    fn test_retain_without_newline_keeps_everything() {
        let mut buf = RollingBuffer::new();
        buf.push(b"? Ove");
        buf.retain_partial_line();
        assert_eq!(buf.matchable(), "? Ove");
    }

    #[test]
    fn test_scanned_line_never_reappears() {
        let mut buf = RollingBuffer::new();
        buf.push(b"? Overwrite foo\n");
        buf.retain_partial_line();
        assert_eq!(buf.matchable(), "");
        buf.push(b"unrelated\n");
        assert_eq!(buf.matchable(), "unrelated\n");
    }

    #[test]
    fn test_lossy_decoding() {
        let mut buf = RollingBuffer::new();
        buf.push(b"ok \xff\xfe here\n");
        assert!(buf.matchable().starts_with("ok "));
        assert!(buf.matchable().ends_with(" here\n"));
    }

    #[test]
    fn test_clip_suppresses_line_anchor() {
        let mut buf = RollingBuffer::new();
        let long = vec![b'x'; MAX_PARTIAL_LINE + 100];
        buf.push(&long);
        // Clipped mid-line: nothing in the window is a true line start.
        assert_eq!(buf.matchable(), "");
        buf.push(b"tail\n? Overwrite\n");
        // Content after the first newline is anchored again.
        assert_eq!(buf.matchable(), "? Overwrite\n");
        buf.retain_partial_line();
        assert_eq!(buf.matchable(), "");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let mut buf = RollingBuffer::new();
        let long = "é".repeat(MAX_PARTIAL_LINE);
        buf.push(long.as_bytes());
        // Must not panic on a multi-byte boundary.
        buf.push(b"more");
    }
}
