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

//! Binary wire-format constants: the tag catalog, size thresholds and limits.

/// Wire format version this crate emits and accepts.
pub const VERSION: u8 = 2;

pub const TAG_NULL: u8 = 0x00;
pub const TAG_FALSE: u8 = 0x01;
pub const TAG_TRUE: u8 = 0x02;
pub const TAG_NUMBER_ZERO: u8 = 0x03;

/// Immediate integers occupy `0x10..=0x4F`, 64 ZigZag slots covering [-32, 31].
pub const TAG_INT_IMMEDIATE_BASE: u8 = 0x10;
pub const INT_IMMEDIATE_SLOTS: u8 = 64;

pub const TAG_U8: u8 = 0x50;
pub const TAG_I16: u8 = 0x51;
pub const TAG_I32: u8 = 0x52;
pub const TAG_F64: u8 = 0x53;

/// Immediate strings occupy `0x60..=0x8F`, lengths 0..=47.
pub const TAG_STR_IMMEDIATE_BASE: u8 = 0x60;
pub const STR_IMMEDIATE_MAX_LEN: usize = 47;

pub const TAG_STR_VAR: u8 = 0x90;
pub const TAG_STR_NEW: u8 = 0x91;
pub const TAG_STR_REF: u8 = 0x92;

pub const TAG_ARRAY: u8 = 0xA0;
pub const TAG_MAP: u8 = 0xA1;
pub const TAG_SPARSE: u8 = 0xA2;

pub const TAG_VECTOR2: u8 = 0xB0;
pub const TAG_VECTOR3: u8 = 0xB1;
pub const TAG_CFRAME: u8 = 0xB2;
pub const TAG_COLOR3: u8 = 0xB3;
pub const TAG_BRICK_COLOR: u8 = 0xB4;
pub const TAG_UDIM: u8 = 0xB5;
pub const TAG_UDIM2: u8 = 0xB6;
pub const TAG_ENUM_ITEM: u8 = 0xB7;
pub const TAG_RECT: u8 = 0xB8;
pub const TAG_NUMBER_RANGE: u8 = 0xB9;
pub const TAG_NUMBER_SEQUENCE: u8 = 0xBA;
pub const TAG_COLOR_SEQUENCE: u8 = 0xBB;
pub const TAG_DATE_TIME: u8 = 0xBC;
pub const TAG_SHARED_TABLE: u8 = 0xBD;

pub const TAG_RAW_BUFFER: u8 = 0xF0;

/// Maximum recursion depth the Probe and Decoder will tolerate.
pub const MAX_DEPTH: u32 = 64;

/// Maximum number of atomic items a single value graph may contain.
pub const MAX_ITEMS: u64 = 1_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_integer_range_covers_minus_32_to_31() {
        assert_eq!(TAG_INT_IMMEDIATE_BASE as u16 + INT_IMMEDIATE_SLOTS as u16 - 1, 0x4F);
    }

    #[test]
    fn immediate_string_range_covers_48_lengths() {
        assert_eq!(
            TAG_STR_IMMEDIATE_BASE as usize + STR_IMMEDIATE_MAX_LEN,
            0x8F
        );
    }

    #[test]
    fn version_matches_spec() {
        assert_eq!(VERSION, 2);
    }
}
