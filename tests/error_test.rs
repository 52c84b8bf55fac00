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

use valuepack::{compress, decompress, Error, ErrorKind, Value};

fn kind_of(result: Result<Value, Error>) -> ErrorKind {
    result.unwrap_err().kind()
}

#[test]
fn wrong_version_byte_is_rejected() {
    assert_eq!(kind_of(decompress(&[0xFF, 0x00])), ErrorKind::VersionMismatch);
}

#[test]
fn unassigned_tag_byte_is_rejected() {
    assert_eq!(kind_of(decompress(&[valuepack::VERSION, 0xFF])), ErrorKind::InvalidTag);
}

#[test]
fn truncated_input_never_panics_at_any_prefix_length() {
    let full = compress(&Value::array([Value::str("hello"), Value::int(12345)])).unwrap();
    for k in 0..full.len() {
        assert!(decompress(&full[..k]).is_err(), "prefix of length {k} should fail, not panic");
    }
    assert!(decompress(&full).is_ok());
}

#[test]
fn trailing_bytes_after_the_top_level_value_are_rejected() {
    let mut bytes = compress(&Value::Null).unwrap();
    bytes.push(0x00);
    assert_eq!(kind_of(decompress(&bytes)), ErrorKind::TrailingData);
}

#[test]
fn dangling_string_reference_is_rejected() {
    let bytes = vec![valuepack::VERSION, 0x92, 0x00];
    assert_eq!(kind_of(decompress(&bytes)), ErrorKind::InvalidReference);
}

#[test]
fn non_scalar_table_keys_are_rejected_during_compress() {
    let v = Value::Table(vec![(Value::Bool(true), Value::Null)]);
    assert_eq!(compress(&v).unwrap_err().kind(), ErrorKind::UnsupportedType);
}

#[test]
fn excessive_recursion_depth_is_rejected_during_compress() {
    let mut v = Value::Null;
    for _ in 0..200 {
        v = Value::array([v]);
    }
    assert_eq!(compress(&v).unwrap_err().kind(), ErrorKind::LimitsExceeded);
}
