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

//! A self-describing binary serializer for a dynamically-typed value graph.
//!
//! Encoding runs in two passes over the same [`Value`] tree: a Probe that
//! classifies every value and computes the exact output size, and an Encoder
//! that replays those classifications into a single pre-sized buffer. A
//! [`Serializer`] owns the scratch state shared by both passes (and reuses
//! its allocations across calls); the free functions [`compress`] and
//! [`decompress`] are a convenience for one-off use.
//!
//! ```
//! use valuepack::{compress, decompress, Value};
//!
//! let original = Value::array([Value::int(1), Value::str("hi"), Value::Null]);
//! let bytes = compress(&original).unwrap();
//! let restored = decompress(&bytes).unwrap();
//! assert_eq!(original, restored);
//! ```

mod codec;
mod decision;
mod decoder;
mod encoder;
mod error;
mod intern;
mod probe;
mod tag;
mod value;
mod varint;

use decision::DecisionStack;

pub use error::{Error, ErrorKind};
pub use value::{
    CFrame, Color3, ColorSequenceKeypoint, EnumItem, NumberRange, NumberSequenceKeypoint, Rect,
    UDim, UDim2, Value, Vector2, Vector3,
};

/// Wire format version this crate emits and accepts.
pub const VERSION: u8 = tag::VERSION;

/// Owns the scratch state (the decision stack) shared by the Probe and the
/// Encoder. Reusing a `Serializer` across calls avoids reallocating that
/// scratch space every time; a fresh one has no observable effect on the
/// wire format of any single `compress` call.
#[derive(Default)]
pub struct Serializer {
    stack: DecisionStack,
}

impl Serializer {
    /// Create a serializer with an empty decision stack.
    pub fn new() -> Self {
        Self {
            stack: DecisionStack::new(),
        }
    }

    /// Probe `value`, then encode it into a single contiguous buffer.
    pub fn compress(&mut self, value: &Value) -> Result<Vec<u8>, Error> {
        let total_size = probe::probe(value, &mut self.stack)?;
        encoder::encode(&self.stack, total_size)
    }

    /// Reconstruct a [`Value`] from a buffer produced by [`Serializer::compress`].
    pub fn decompress(&self, bytes: &[u8]) -> Result<Value, Error> {
        decoder::decode(bytes)
    }
}

/// Encode `value` with a throwaway [`Serializer`].
///
/// Prefer reusing a [`Serializer`] when compressing more than once.
pub fn compress(value: &Value) -> Result<Vec<u8>, Error> {
    Serializer::new().compress(value)
}

/// Decode a buffer produced by [`compress`] with a throwaway [`Serializer`].
pub fn decompress(bytes: &[u8]) -> Result<Value, Error> {
    Serializer::new().decompress(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_mixed_value_graph() {
        let original = Value::Table(vec![
            (Value::str("a"), Value::int(1)),
            (Value::str("b"), Value::array([Value::Null, Value::Bool(true), Value::str("a")])),
        ]);
        let bytes = compress(&original).unwrap();
        assert_eq!(decompress(&bytes).unwrap(), original);
    }

    #[test]
    fn reusing_a_serializer_matches_fresh_compression() {
        let mut s = Serializer::new();
        let a = s.compress(&Value::int(5)).unwrap();
        let b = s.compress(&Value::str("hello")).unwrap();
        assert_eq!(decompress(&a).unwrap(), Value::int(5));
        assert_eq!(decompress(&b).unwrap(), Value::str("hello"));
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(decompress(&[]).is_err());
    }
}
