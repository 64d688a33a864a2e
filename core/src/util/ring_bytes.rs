use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Bounded byte buffer that keeps only the newest `cap` bytes pushed into it.
///
/// Shared between a stream pump task and the caller that reads the captured
/// output after the worker exits.
#[derive(Clone)]
pub struct RingBytes {
    inner: Arc<Mutex<VecDeque<u8>>>,
    cap: usize,
}

impl RingBytes {
    pub fn new(cap: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(cap.min(16 * 1024)))),
            cap,
        })
    }

    pub fn push(&self, data: &[u8]) {
        let mut g = self.inner.lock().unwrap();
        let data = if data.len() > self.cap {
            &data[data.len() - self.cap..]
        } else {
            data
        };
        let overflow = g.len().saturating_add(data.len()).saturating_sub(self.cap);
        if overflow > 0 {
            g.drain(..overflow);
        }
        g.extend(data);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let g = self.inner.lock().unwrap();
        let mut vec = Vec::with_capacity(g.len());
        vec.extend(g.iter().copied());
        vec
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_everything_under_capacity() {
        let ring = RingBytes::new(16);
        ring.push(b"hello ");
        ring.push(b"world");
        assert_eq!(ring.to_bytes(), b"hello world");
        assert_eq!(ring.len(), 11);
    }

    #[test]
    fn overflow_drops_oldest_bytes() {
        let ring = RingBytes::new(8);
        ring.push(b"0123");
        ring.push(b"456789");
        assert_eq!(ring.to_bytes(), b"23456789");
    }

    #[test]
    fn oversized_push_keeps_newest_tail() {
        let ring = RingBytes::new(4);
        ring.push(b"abcdefgh");
        assert_eq!(ring.to_bytes(), b"efgh");
    }

    #[test]
    fn lossy_string_replaces_invalid_utf8() {
        let ring = RingBytes::new(16);
        ring.push(&[b'o', b'k', 0xff]);
        assert!(ring.to_string_lossy().starts_with("ok"));
    }

    #[test]
    fn empty_ring_is_empty() {
        let ring = RingBytes::new(4);
        assert!(ring.is_empty());
        assert_eq!(ring.to_string_lossy(), "");
    }
}
