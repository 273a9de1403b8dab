/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Non destructive peeking over any reader
//!
//! Sniffing must classify a stream without moving it, but plain readers have
//! no mark/reset contract. [`PeekReader`] reads the leading bytes it is asked
//! for into an owned buffer and replays them on the next read, so after any
//! number of peeks the stream is still readable from its original offset,
//! byte for byte.

use std::io::{ErrorKind, Read};

/// A reader that can look at its leading bytes without consuming them.
pub struct PeekReader<R> {
    inner:  R,
    buffer: Vec<u8>,
    pos:    usize
}

impl<R: Read> PeekReader<R> {
    pub fn new(inner: R) -> PeekReader<R> {
        PeekReader {
            inner,
            buffer: vec![],
            pos: 0
        }
    }

    /// Return up to `count` bytes ahead of the current position without
    /// consuming them.
    ///
    /// A source that ends early yields a shorter slice, that is not an
    /// error; only a failing read is.
    pub fn peek(&mut self, count: usize) -> std::io::Result<&[u8]> {
        while self.buffer.len() - self.pos < count {
            let mut chunk = [0_u8; 64];

            match self.inner.read(&mut chunk) {
                Ok(0) => break,
                Ok(bytes) => self.buffer.extend_from_slice(&chunk[..bytes]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e)
            }
        }
        let end = (self.pos + count).min(self.buffer.len());

        Ok(&self.buffer[self.pos..end])
    }

    /// Destroy this reader returning the underlying source.
    ///
    /// Peeked but unconsumed bytes are lost, consume them through [`Read`]
    /// first if they matter.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos < self.buffer.len() {
            let bytes = (self.buffer.len() - self.pos).min(buf.len());
            buf[..bytes].copy_from_slice(&self.buffer[self.pos..self.pos + bytes]);
            self.pos += bytes;

            if self.pos == self.buffer.len() {
                self.buffer.clear();
                self.pos = 0;
            }
            return Ok(bytes);
        }
        self.inner.read(buf)
    }
}
