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

//! The Decoder: tag-dispatch recursive descent over a bounds-checked reader.
//! Every read is checked; malformed input produces an `Error`, never a panic.

use crate::codec::ByteReader;
use crate::error::Error;
use crate::intern::InternList;
use crate::tag::*;
use crate::value::{
    CFrame, Color3, ColorSequenceKeypoint, EnumItem, NumberRange, NumberSequenceKeypoint, Rect,
    UDim, UDim2, Value, Vector2, Vector3,
};

/// Parse a complete buffer (version byte included) into a [`Value`].
///
/// Rejects a version byte other than [`VERSION`] and any bytes left over
/// after the single top-level value has been fully read.
pub(crate) fn decode(bytes: &[u8]) -> Result<Value, Error> {
    let mut reader = ByteReader::new(bytes);
    let version = reader.read_u8("version byte")?;
    if version != VERSION {
        return Err(Error::version_mismatch(VERSION, version));
    }

    let mut interns = InternList::new();
    let value = read_value(&mut reader, &mut interns, 0)?;

    if !reader.is_exhausted() {
        return Err(Error::trailing_data(reader.remaining()));
    }
    Ok(value)
}

fn check_depth(depth: u32) -> Result<(), Error> {
    if depth > MAX_DEPTH {
        return Err(Error::limits_exceeded(format!(
            "recursion depth {depth} exceeds the limit of {MAX_DEPTH}"
        )));
    }
    Ok(())
}

fn read_udim(r: &mut ByteReader) -> Result<UDim, Error> {
    Ok(UDim {
        scale: r.read_f32_le("udim scale")?,
        offset: r.read_i32_le("udim offset")?,
    })
}

/// Read a string body (immediate, new, ref, or var) given its already-consumed
/// tag byte. Shared between top-level string values and `EnumItem` fields.
fn decode_string_body(tag: u8, r: &mut ByteReader, interns: &mut InternList) -> Result<Vec<u8>, Error> {
    if (TAG_STR_IMMEDIATE_BASE..TAG_STR_IMMEDIATE_BASE + STR_IMMEDIATE_MAX_LEN as u8 + 1).contains(&tag)
    {
        let len = (tag - TAG_STR_IMMEDIATE_BASE) as usize;
        return Ok(r.read_bytes(len, "immediate string body")?.to_vec());
    }
    match tag {
        TAG_STR_NEW => {
            let len = r.read_varint_u64()? as usize;
            let bytes = r.read_bytes(len, "new string body")?.to_vec();
            interns.define(bytes.clone().into_boxed_slice());
            Ok(bytes)
        }
        TAG_STR_REF => {
            let id = r.read_varint_u64()? as u32;
            interns
                .get(id)
                .map(|b| b.to_vec())
                .ok_or_else(|| Error::invalid_reference(id, interns.len()))
        }
        TAG_STR_VAR => {
            let len = r.read_varint_u64()? as usize;
            Ok(r.read_bytes(len, "var string body")?.to_vec())
        }
        _ => Err(Error::invalid_tag(tag)),
    }
}

fn read_string(r: &mut ByteReader, interns: &mut InternList) -> Result<Vec<u8>, Error> {
    let tag = r.read_u8("string tag")?;
    decode_string_body(tag, r, interns)
}

fn read_value(r: &mut ByteReader, interns: &mut InternList, depth: u32) -> Result<Value, Error> {
    check_depth(depth)?;
    let tag = r.read_u8("value tag")?;

    if (TAG_INT_IMMEDIATE_BASE..TAG_INT_IMMEDIATE_BASE + INT_IMMEDIATE_SLOTS).contains(&tag) {
        let slot = (tag - TAG_INT_IMMEDIATE_BASE) as u64;
        return Ok(Value::Number(crate::varint::zigzag_decode(slot) as f64));
    }
    if (TAG_STR_IMMEDIATE_BASE..TAG_STR_IMMEDIATE_BASE + STR_IMMEDIATE_MAX_LEN as u8 + 1).contains(&tag)
    {
        let bytes = decode_string_body(tag, r, interns)?;
        return Ok(Value::Str(bytes));
    }

    match tag {
        TAG_NULL => Ok(Value::Null),
        TAG_FALSE => Ok(Value::Bool(false)),
        TAG_TRUE => Ok(Value::Bool(true)),
        TAG_NUMBER_ZERO => Ok(Value::Number(0.0)),
        TAG_U8 => Ok(Value::Number(r.read_u8("u8 number")? as f64)),
        TAG_I16 => Ok(Value::Number(r.read_i16_le("i16 number")? as f64)),
        TAG_I32 => Ok(Value::Number(r.read_i32_le("i32 number")? as f64)),
        TAG_F64 => Ok(Value::Number(r.read_f64_le("f64 number")?)),
        TAG_STR_NEW | TAG_STR_REF | TAG_STR_VAR => {
            Ok(Value::Str(decode_string_body(tag, r, interns)?))
        }
        TAG_RAW_BUFFER => {
            let len = r.read_varint_u64()? as usize;
            Ok(Value::Bytes(r.read_bytes(len, "raw buffer body")?.to_vec()))
        }
        TAG_ARRAY => {
            let n = r.read_varint_u64()?;
            let mut pairs = Vec::with_capacity(n as usize);
            for i in 0..n {
                let v = read_value(r, interns, depth + 1)?;
                pairs.push((Value::Number((i + 1) as f64), v));
            }
            Ok(Value::Table(pairs))
        }
        TAG_SPARSE | TAG_MAP | TAG_SHARED_TABLE => {
            let n = r.read_varint_u64()?;
            let mut pairs = Vec::with_capacity(n as usize);
            for _ in 0..n {
                let k = read_value(r, interns, depth + 1)?;
                let v = read_value(r, interns, depth + 1)?;
                pairs.push((k, v));
            }
            Ok(Value::Table(pairs))
        }
        TAG_VECTOR2 => Ok(Value::Vector2(Vector2 {
            x: r.read_f32_le("vector2.x")?,
            y: r.read_f32_le("vector2.y")?,
        })),
        TAG_VECTOR3 => Ok(Value::Vector3(Vector3 {
            x: r.read_f32_le("vector3.x")?,
            y: r.read_f32_le("vector3.y")?,
            z: r.read_f32_le("vector3.z")?,
        })),
        TAG_CFRAME => Ok(Value::CFrame(CFrame {
            position: Vector3 {
                x: r.read_f32_le("cframe.position.x")?,
                y: r.read_f32_le("cframe.position.y")?,
                z: r.read_f32_le("cframe.position.z")?,
            },
            quat_x: r.read_f32_le("cframe.quat_x")?,
            quat_y: r.read_f32_le("cframe.quat_y")?,
            quat_z: r.read_f32_le("cframe.quat_z")?,
            quat_w: r.read_f32_le("cframe.quat_w")?,
        })),
        TAG_COLOR3 => Ok(Value::Color3(Color3 {
            r: r.read_f32_le("color3.r")?,
            g: r.read_f32_le("color3.g")?,
            b: r.read_f32_le("color3.b")?,
        })),
        TAG_BRICK_COLOR => Ok(Value::BrickColor(r.read_u16_le("brick color id")?)),
        TAG_UDIM => Ok(Value::UDim(read_udim(r)?)),
        TAG_UDIM2 => Ok(Value::UDim2(UDim2 {
            x: read_udim(r)?,
            y: read_udim(r)?,
        })),
        TAG_RECT => Ok(Value::Rect(Rect {
            min_x: r.read_f32_le("rect.min_x")?,
            min_y: r.read_f32_le("rect.min_y")?,
            max_x: r.read_f32_le("rect.max_x")?,
            max_y: r.read_f32_le("rect.max_y")?,
        })),
        TAG_NUMBER_RANGE => Ok(Value::NumberRange(NumberRange {
            min: r.read_f32_le("number_range.min")?,
            max: r.read_f32_le("number_range.max")?,
        })),
        TAG_NUMBER_SEQUENCE => {
            let n = r.read_u16_le("number_sequence length")?;
            let mut keypoints = Vec::with_capacity(n as usize);
            for _ in 0..n {
                keypoints.push(NumberSequenceKeypoint {
                    time: r.read_f32_le("number_sequence.time")?,
                    value: r.read_f32_le("number_sequence.value")?,
                    envelope: r.read_f32_le("number_sequence.envelope")?,
                });
            }
            Ok(Value::NumberSequence(keypoints))
        }
        TAG_COLOR_SEQUENCE => {
            let n = r.read_u16_le("color_sequence length")?;
            let mut keypoints = Vec::with_capacity(n as usize);
            for _ in 0..n {
                keypoints.push(ColorSequenceKeypoint {
                    time: r.read_f32_le("color_sequence.time")?,
                    color: Color3 {
                        r: r.read_f32_le("color_sequence.color.r")?,
                        g: r.read_f32_le("color_sequence.color.g")?,
                        b: r.read_f32_le("color_sequence.color.b")?,
                    },
                    interpolation: r.read_u8("color_sequence.interpolation")?,
                });
            }
            Ok(Value::ColorSequence(keypoints))
        }
        TAG_DATE_TIME => Ok(Value::DateTime(r.read_i64_le("date_time millis")?)),
        TAG_ENUM_ITEM => {
            let class_name = read_string(r, interns)?;
            let item_name = read_string(r, interns)?;
            Ok(Value::EnumItem(EnumItem {
                class_name,
                item_name,
            }))
        }
        _ => Err(Error::invalid_tag(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_version() {
        let bytes = [VERSION.wrapping_add(1), TAG_NULL];
        assert_eq!(decode(&bytes).unwrap_err().kind(), crate::error::ErrorKind::VersionMismatch);
    }

    #[test]
    fn rejects_unknown_tag() {
        let bytes = [VERSION, 0xFF];
        assert_eq!(decode(&bytes).unwrap_err().kind(), crate::error::ErrorKind::InvalidTag);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let bytes = [VERSION, TAG_NULL, 0x00];
        assert_eq!(decode(&bytes).unwrap_err().kind(), crate::error::ErrorKind::TrailingData);
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = [VERSION, TAG_U8];
        assert_eq!(decode(&bytes).unwrap_err().kind(), crate::error::ErrorKind::Truncation);
    }

    #[test]
    fn rejects_dangling_string_reference() {
        let mut bytes = vec![VERSION, TAG_STR_REF];
        bytes.push(0); // varint id 0, never defined
        assert_eq!(
            decode(&bytes).unwrap_err().kind(),
            crate::error::ErrorKind::InvalidReference
        );
    }
}
