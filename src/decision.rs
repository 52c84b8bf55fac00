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

//! The decision stack: an append-only log of classification records produced
//! by the Probe and replayed in order by the Encoder.
//!
//! Composite decisions (`TableArray`, `TableSparse`, `TableMap`, `EnumItem`)
//! carry only their own fixed bytes; their children are simply the decisions
//! that follow them on the stack, in traversal order. The Encoder knows how
//! many children to consume from the count each composite decision carries
//! (or, for `EnumItem`, a fixed count of two).

use crate::value::{
    Color3, ColorSequenceKeypoint, NumberRange, NumberSequenceKeypoint, Rect, UDim, UDim2,
    Vector2, Vector3, CFrame,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Decision {
    Null,
    BoolTrue,
    BoolFalse,
    NumberZero,
    /// ZigZag slot in `0..=63`.
    IntImmediate(u8),
    U8(u8),
    I16(i16),
    I32(i32),
    F64(f64),
    /// Length-in-tag immediate string, not interned.
    StrImmediate(Box<[u8]>),
    /// First occurrence of a recurring string; assigned the next intern id.
    StrNew(Box<[u8]>),
    /// Reference to a previously-interned string.
    StrRef(u32),
    /// A singleton string too long to inline, length-prefixed, not interned.
    StrVar(Box<[u8]>),
    RawBuffer(Box<[u8]>),
    /// Array-shaped table; `n` child value-decisions follow.
    TableArray(u64),
    /// Sparse integer-keyed table; `count` (key, value) decision pairs follow.
    TableSparse(u64),
    /// General map; `count` (key, value) decision pairs follow.
    TableMap(u64),
    Vector2(Vector2),
    Vector3(Vector3),
    CFrame(CFrame),
    Color3(Color3),
    BrickColor(u16),
    UDim(UDim),
    UDim2(UDim2),
    Rect(Rect),
    NumberRange(NumberRange),
    NumberSequence(Vec<NumberSequenceKeypoint>),
    ColorSequence(Vec<ColorSequenceKeypoint>),
    DateTime(i64),
    /// Marker; exactly two string decisions (class name, item name) follow.
    EnumItem,
}

/// A reusable, append-only log of [`Decision`]s.
///
/// Owned per [`crate::Serializer`] instance (not a process-wide global — see
/// DESIGN.md's note on Rust's lack of comfortable global mutable state) so
/// that repeated `compress` calls on the same serializer reuse the backing
/// allocation instead of paying for it every time.
#[derive(Default)]
pub(crate) struct DecisionStack {
    decisions: Vec<Decision>,
}

impl DecisionStack {
    pub fn new() -> Self {
        Self {
            decisions: Vec::new(),
        }
    }

    /// Logically empty the stack for a new Probe pass, retaining capacity.
    pub fn reset(&mut self) {
        self.decisions.clear();
    }

    pub fn push(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    pub fn as_slice(&self) -> &[Decision] {
        &self.decisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_but_keeps_capacity() {
        let mut stack = DecisionStack::new();
        stack.push(Decision::Null);
        stack.push(Decision::BoolTrue);
        let cap_before = stack.decisions.capacity();
        stack.reset();
        assert_eq!(stack.as_slice().len(), 0);
        assert_eq!(stack.decisions.capacity(), cap_before);
    }
}
