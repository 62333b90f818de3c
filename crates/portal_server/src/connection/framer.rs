//! Inbound line framing.

/// Turns raw socket chunks into complete lines.
///
/// CRLF and lone CR are normalized to LF as bytes arrive, including a CRLF
/// pair split across two chunks. Complete lines are handed out oldest first
/// with the terminator stripped; an unterminated tail stays buffered until a
/// later chunk completes it.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
    after_cr: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.reserve(chunk.len());
        for &byte in chunk {
            let after_cr = std::mem::take(&mut self.after_cr);
            match byte {
                b'\n' if after_cr => {}
                b'\r' => {
                    self.buffer.push(b'\n');
                    self.after_cr = true;
                }
                byte => self.buffer.push(byte),
            }
        }
    }

    /// Removes and returns the oldest complete line, if any.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buffer.iter().position(|&byte| byte == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
        line.pop();
        Some(line)
    }

    /// Iterates over the complete lines currently buffered.
    ///
    /// Stopping early leaves the remaining lines for a later call.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines { framer: self }
    }

    /// Size of the unterminated tail.
    pub fn pending_len(&self) -> usize {
        match self.buffer.iter().rposition(|&byte| byte == b'\n') {
            Some(last) => self.buffer.len() - last - 1,
            None => self.buffer.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Lazy iterator returned by [`LineFramer::lines`].
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.framer.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(framer: &mut LineFramer) -> Vec<String> {
        framer
            .lines()
            .map(|line| String::from_utf8(line).unwrap())
            .collect()
    }

    #[test]
    fn test_lines_and_tail() {
        let mut framer = LineFramer::new();
        framer.feed(b"north\nsouth\r\nea");

        assert_eq!(collect(&mut framer), vec!["north", "south"]);
        assert_eq!(framer.pending_len(), 2);

        framer.feed(b"st\r");
        assert_eq!(collect(&mut framer), vec!["east"]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut framer = LineFramer::new();
        framer.feed(b"look\r");
        framer.feed(b"\nup\r");
        framer.feed(b"\n");

        assert_eq!(collect(&mut framer), vec!["look", "up"]);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut framer = LineFramer::new();
        framer.feed(b"\n\r\n\r\r");
        assert_eq!(collect(&mut framer), vec!["", "", "", ""]);
    }

    #[test]
    fn test_chunking_does_not_change_the_result() {
        let input = b"say hello\r\n\r\nwho\rquit\nhalf";

        let mut whole = LineFramer::new();
        whole.feed(input);

        let mut bytewise = LineFramer::new();
        for byte in input {
            bytewise.feed(std::slice::from_ref(byte));
        }

        assert_eq!(collect(&mut whole), collect(&mut bytewise));
        assert_eq!(whole.pending_len(), 4);
        assert_eq!(bytewise.pending_len(), 4);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut framer = LineFramer::new();
        framer.feed(b"a\nb\nc\n");

        assert_eq!(framer.lines().next(), Some(b"a".to_vec()));
        assert_eq!(collect(&mut framer), vec!["b", "c"]);
    }
}
