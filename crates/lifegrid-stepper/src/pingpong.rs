//! Double-buffered generation storage.
//!
//! [`PingPong`] holds two equally sized buffers that alternate between
//! "published" (the current generation, readable) and "staging" (the
//! next generation, writable). [`PingPong::publish`] swaps the roles
//! without moving or reallocating either buffer.
//!
//! ```text
//! buffer_a  ←── published (even swaps) / staging (odd swaps)
//! buffer_b  ←── staging   (even swaps) / published (odd swaps)
//! ```

/// Two reusable generation buffers with a role flag.
#[derive(Debug, Clone)]
pub struct PingPong {
    buffer_a: Vec<u8>,
    buffer_b: Vec<u8>,
    /// Which buffer is currently staging (false = B staging, true = A staging).
    a_is_staging: bool,
}

impl PingPong {
    /// Allocate both buffers, zero-filled, with `len` cells each.
    pub fn new(len: usize) -> Self {
        Self {
            buffer_a: vec![0; len],
            buffer_b: vec![0; len],
            a_is_staging: false,
        }
    }

    /// Number of cells per buffer.
    pub fn len(&self) -> usize {
        self.buffer_a.len()
    }

    /// Whether the buffers hold no cells.
    pub fn is_empty(&self) -> bool {
        self.buffer_a.is_empty()
    }

    /// The published (current generation) buffer.
    pub fn published(&self) -> &[u8] {
        if self.a_is_staging {
            &self.buffer_b
        } else {
            &self.buffer_a
        }
    }

    /// Mutable access to the published buffer, for direct edits.
    pub fn published_mut(&mut self) -> &mut [u8] {
        if self.a_is_staging {
            &mut self.buffer_b
        } else {
            &mut self.buffer_a
        }
    }

    /// Borrow the published buffer for reading and the staging buffer
    /// for writing at the same time.
    pub fn split(&mut self) -> (&[u8], &mut [u8]) {
        if self.a_is_staging {
            (&self.buffer_b, &mut self.buffer_a)
        } else {
            (&self.buffer_a, &mut self.buffer_b)
        }
    }

    /// Swap roles: staging becomes published and vice versa.
    pub fn publish(&mut self) {
        self.a_is_staging = !self.a_is_staging;
    }

    /// Replace both buffers with `published` and a zeroed staging buffer
    /// of the same length, reusing existing capacity where possible.
    pub fn replace(&mut self, published: Vec<u8>) {
        let len = published.len();
        self.buffer_a = published;
        self.buffer_b.clear();
        self.buffer_b.resize(len, 0);
        self.a_is_staging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let pp = PingPong::new(4);
        assert_eq!(pp.len(), 4);
        assert_eq!(pp.published(), &[0, 0, 0, 0]);
    }

    #[test]
    fn publish_swaps_roles_without_copying() {
        let mut pp = PingPong::new(3);
        {
            let (cur, next) = pp.split();
            assert_eq!(cur, &[0, 0, 0]);
            next.copy_from_slice(&[1, 2, 3]);
        }
        pp.publish();
        assert_eq!(pp.published(), &[1, 2, 3]);

        {
            let (cur, next) = pp.split();
            assert_eq!(cur, &[1, 2, 3]);
            // Staging now holds the stale generation from before the swap.
            assert_eq!(next, &[0, 0, 0]);
            next.copy_from_slice(&[4, 5, 6]);
        }
        pp.publish();
        assert_eq!(pp.published(), &[4, 5, 6]);
    }

    #[test]
    fn published_mut_edits_current() {
        let mut pp = PingPong::new(2);
        pp.publish();
        pp.published_mut()[1] = 9;
        assert_eq!(pp.published(), &[0, 9]);
    }

    #[test]
    fn replace_resets_roles() {
        let mut pp = PingPong::new(2);
        pp.publish();
        pp.replace(vec![1, 0, 1]);
        assert_eq!(pp.len(), 3);
        assert_eq!(pp.published(), &[1, 0, 1]);
        let (_, staging) = pp.split();
        assert_eq!(staging, &[0, 0, 0]);
    }

    #[test]
    fn empty_buffers() {
        let pp = PingPong::new(0);
        assert!(pp.is_empty());
        assert!(pp.published().is_empty());
    }
}
