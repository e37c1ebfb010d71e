//! Size limits
//!
//! Bounded reading of incoming note bodies. Reading stops as soon as the limit
//! is exceeded, so an oversized payload never ends up fully buffered.

use log::warn;
use std::io::{ErrorKind, Read};

use crate::error::ContentError;

/// Largest note accepted, in bytes.
pub const MAX_NOTE_SIZE: u64 = 1 << 20;

const BUFFER_SIZE: usize = 8192; // 8KB chunks

/// Reads `source` to the end, failing with `TooLarge` once more than `limit`
/// bytes have been seen.
pub fn read_bounded<R: Read>(mut source: R, limit: u64) -> Result<Vec<u8>, ContentError> {
    let mut buffer = [0; BUFFER_SIZE];
    let mut content = Vec::new();
    let mut total_bytes_received = 0u64;

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ContentError::ReadFailed(e)),
        };

        // Check size limit BEFORE buffering (fail fast)
        total_bytes_received += n as u64;
        if total_bytes_received > limit {
            warn!("Content size limit exceeded: more than {limit} bytes");
            return Err(ContentError::TooLarge { limit });
        }

        content.extend_from_slice(&buffer[..n]);
    }

    Ok(content)
}

/// Rejects a length above `limit`.
pub fn check_size(len: u64, limit: u64) -> Result<(), ContentError> {
    if len > limit {
        return Err(ContentError::TooLarge { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Reader that never ends and counts what it handed out.
    struct Endless {
        served: u64,
    }

    impl Read for Endless {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            buf.fill(b'a');
            self.served += buf.len() as u64;
            Ok(buf.len())
        }
    }

    #[test]
    fn test_reads_within_limit() {
        assert_eq!(read_bounded(&b"buy milk"[..], 8).unwrap(), b"buy milk");
        assert_eq!(read_bounded(&b""[..], 0).unwrap(), b"");
    }

    #[test]
    fn test_rejects_one_byte_over() {
        let data = vec![b'x'; 101];
        assert!(matches!(
            read_bounded(&data[..], 100),
            Err(ContentError::TooLarge { limit: 100 })
        ));
    }

    #[test]
    fn test_exact_limit_accepted() {
        let data = vec![b'x'; MAX_NOTE_SIZE as usize];
        assert_eq!(read_bounded(&data[..], MAX_NOTE_SIZE).unwrap().len(), data.len());
    }

    #[test]
    fn test_stops_reading_endless_source() {
        let mut source = Endless { served: 0 };
        let result = read_bounded(&mut source, MAX_NOTE_SIZE);
        assert!(matches!(result, Err(ContentError::TooLarge { .. })));
        assert!(source.served <= MAX_NOTE_SIZE + BUFFER_SIZE as u64);
    }

    #[test]
    fn test_read_error_propagates() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        assert!(matches!(
            read_bounded(Broken, 10),
            Err(ContentError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(MAX_NOTE_SIZE, MAX_NOTE_SIZE).is_ok());
        assert!(check_size(MAX_NOTE_SIZE + 1, MAX_NOTE_SIZE).is_err());
    }
}
