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

//! The dynamically-typed value graph this crate serializes.

/// A dynamically-typed value: the input to `compress` and the output of `decompress`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Double-precision number. Integers in range are encoded narrower; see `probe`.
    Number(f64),
    /// A byte sequence, not necessarily UTF-8.
    Str(Vec<u8>),
    /// An opaque byte buffer, distinct from `Str` on the wire (tag `0xF0`).
    Bytes(Vec<u8>),
    /// An ordered list of key/value pairs. Insertion order is preserved and is
    /// significant: it is exactly the order the Probe classified and the
    /// Encoder replayed.
    Table(Vec<(Value, Value)>),
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
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    EnumItem(EnumItem),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A rigid transform: position plus a rotation encoded as a quaternion.
///
/// Round-tripping reconstructs the rotation matrix from the quaternion, so it
/// may differ from an arbitrary input 3x3 matrix by floating point noise;
/// callers needing bit-exact rotations are out of scope (see spec §4.3, §9).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CFrame {
    pub position: Vector3,
    pub quat_x: f32,
    pub quat_y: f32,
    pub quat_z: f32,
    pub quat_w: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UDim {
    pub scale: f32,
    pub offset: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UDim2 {
    pub x: UDim,
    pub y: UDim,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberSequenceKeypoint {
    pub time: f32,
    pub value: f32,
    pub envelope: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorSequenceKeypoint {
    pub time: f32,
    pub color: Color3,
    pub interpolation: u8,
}

/// Both fields are interned like any other string in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumItem {
    pub class_name: Vec<u8>,
    pub item_name: Vec<u8>,
}

impl Value {
    /// Convenience constructor for a UTF-8 string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into().into_bytes())
    }

    /// Convenience constructor for an integer-valued number.
    pub fn int(n: i64) -> Self {
        Value::Number(n as f64)
    }

    /// Build an array-shaped table from a sequence of values (keys `1..=n`).
    pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Table(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Value::int(i as i64 + 1), v))
                .collect(),
        )
    }
}
