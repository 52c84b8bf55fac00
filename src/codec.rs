// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The byte-buffer primitive: an append-only little-endian writer and a
//! bounds-checked cursor reader, shared by the Encoder and Decoder.

use crate::error::Error;
use crate::varint;

/// An append-only little-endian byte writer backed by a `Vec<u8>`.
pub(crate) struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Construct an empty writer with exactly `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Consume the writer and return the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_bytes(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u16_le(&mut self, n: u16) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_i16_le(&mut self, n: i16) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, n: i32) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_i64_le(&mut self, n: i64) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_f32_le(&mut self, n: f32) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_f64_le(&mut self, n: f64) {
        self.write_bytes(&n.to_le_bytes());
    }

    pub fn write_varint_u64(&mut self, n: u64) {
        varint::encode_varint_u64(n, &mut self.bytes);
    }
}

/// A bounds-checked cursor over a borrowed byte slice.
///
/// Every sized read verifies `position + N <= buf.len()` before touching the
/// slice; on failure it returns `Error::Truncation` rather than panicking.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], Error> {
        if self.pos + n > self.buf.len() {
            return Err(Error::truncation(context));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8, Error> {
        Ok(self.take(1, context)?[0])
    }

    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], Error> {
        self.take(n, context)
    }

    pub fn read_u16_le(&mut self, context: &'static str) -> Result<u16, Error> {
        let b = self.take(2, context)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16_le(&mut self, context: &'static str) -> Result<i16, Error> {
        let b = self.take(2, context)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i32_le(&mut self, context: &'static str) -> Result<i32, Error> {
        let b = self.take(4, context)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i64_le(&mut self, context: &'static str) -> Result<i64, Error> {
        let b = self.take(8, context)?;
        Ok(i64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_f32_le(&mut self, context: &'static str) -> Result<f32, Error> {
        let b = self.take(4, context)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f64_le(&mut self, context: &'static str) -> Result<f64, Error> {
        let b = self.take(8, context)?;
        Ok(f64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_varint_u64(&mut self) -> Result<u64, Error> {
        varint::decode_varint_u64(self.buf, &mut self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_reader_round_trip_fixed_width() {
        let mut w = ByteWriter::with_capacity(0);
        w.write_u8(7);
        w.write_i16_le(-300);
        w.write_i32_le(-70_000);
        w.write_f32_le(1.5);
        w.write_f64_le(2.5);
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8("u8").unwrap(), 7);
        assert_eq!(r.read_i16_le("i16").unwrap(), -300);
        assert_eq!(r.read_i32_le("i32").unwrap(), -70_000);
        assert_eq!(r.read_f32_le("f32").unwrap(), 1.5);
        assert_eq!(r.read_f64_le("f64").unwrap(), 2.5);
        assert!(r.is_exhausted());
    }

    #[test]
    fn reader_rejects_reads_past_the_end() {
        let bytes = [1u8, 2, 3];
        let mut r = ByteReader::new(&bytes);
        assert!(r.read_i32_le("i32").is_err());
    }

    #[test]
    fn writer_varint_matches_encoded_len() {
        let mut w = ByteWriter::with_capacity(0);
        w.write_varint_u64(300);
        assert_eq!(w.into_bytes().len(), varint::encoded_len(300));
    }
}
