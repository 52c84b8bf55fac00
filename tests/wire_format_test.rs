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

use valuepack::{compress, Value, VERSION};

#[test]
fn null_is_exactly_two_bytes() {
    assert_eq!(compress(&Value::Null).unwrap(), vec![VERSION, 0x00]);
}

#[test]
fn zero_is_exactly_two_bytes() {
    assert_eq!(compress(&Value::Number(0.0)).unwrap(), vec![VERSION, 0x03]);
}

#[test]
fn negative_one_is_zigzag_immediate_slot_one() {
    assert_eq!(compress(&Value::Number(-1.0)).unwrap(), vec![VERSION, 0x11]);
}

#[test]
fn three_hundred_is_little_endian_i16() {
    assert_eq!(
        compress(&Value::Number(300.0)).unwrap(),
        vec![VERSION, 0x51, 0x2C, 0x01]
    );
}

#[test]
fn short_string_is_immediate_with_length_in_tag() {
    assert_eq!(
        compress(&Value::str("hi")).unwrap(),
        vec![VERSION, 0x62, b'h', b'i']
    );
}

#[test]
fn three_identical_strings_intern_after_the_first() {
    let v = Value::array([Value::str("a"), Value::str("a"), Value::str("a")]);
    assert_eq!(
        compress(&v).unwrap(),
        vec![VERSION, 0xA0, 0x03, 0x91, 0x01, b'a', 0x92, 0x00, 0x92, 0x00]
    );
}

#[test]
fn sparse_table_rejects_array_layout_when_keys_are_not_contiguous() {
    let v = Value::Table(vec![(Value::int(1), Value::int(1)), (Value::int(1000), Value::int(1000))]);
    let bytes = compress(&v).unwrap();
    assert_eq!(bytes[1], 0xA2, "density 2/1000 should choose the sparse tag");
    assert_eq!(bytes[2], 0x02, "two entries");
}
