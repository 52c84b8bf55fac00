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

//! The Encoder: a linear replay of the decision stack into a single
//! pre-sized buffer. No classification happens here — every byte written is
//! dictated by the decision it is replaying.

use crate::codec::ByteWriter;
use crate::decision::{Decision, DecisionStack};
use crate::error::Error;
use crate::tag::*;
use crate::value::UDim;

/// Allocate a buffer of exactly `total_size` bytes, write the version byte,
/// then replay every decision on `stack` in order.
pub(crate) fn encode(stack: &DecisionStack, total_size: usize) -> Result<Vec<u8>, Error> {
    let mut writer = ByteWriter::with_capacity(total_size);
    writer.write_u8(VERSION);

    let decisions = stack.as_slice();
    let mut idx = 0;
    write_value(decisions, &mut idx, &mut writer)?;

    if idx != decisions.len() {
        return Err(Error::internal_invariant(format!(
            "decision stack not fully consumed: {idx} of {} decisions replayed",
            decisions.len()
        )));
    }

    let bytes = writer.into_bytes();
    if bytes.len() != total_size {
        return Err(Error::internal_invariant(format!(
            "probe reported {total_size} bytes but encoder wrote {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn next<'a>(decisions: &'a [Decision], idx: &mut usize) -> Result<&'a Decision, Error> {
    let d = decisions
        .get(*idx)
        .ok_or_else(|| Error::internal_invariant("decision stack exhausted before encoder finished"))?;
    *idx += 1;
    Ok(d)
}

fn write_udim(w: &mut ByteWriter, u: &UDim) {
    w.write_f32_le(u.scale);
    w.write_i32_le(u.offset);
}

fn write_value(decisions: &[Decision], idx: &mut usize, w: &mut ByteWriter) -> Result<(), Error> {
    match next(decisions, idx)? {
        Decision::Null => w.write_u8(TAG_NULL),
        Decision::BoolTrue => w.write_u8(TAG_TRUE),
        Decision::BoolFalse => w.write_u8(TAG_FALSE),
        Decision::NumberZero => w.write_u8(TAG_NUMBER_ZERO),
        Decision::IntImmediate(slot) => w.write_u8(TAG_INT_IMMEDIATE_BASE + slot),
        Decision::U8(v) => {
            w.write_u8(TAG_U8);
            w.write_u8(*v);
        }
        Decision::I16(v) => {
            w.write_u8(TAG_I16);
            w.write_i16_le(*v);
        }
        Decision::I32(v) => {
            w.write_u8(TAG_I32);
            w.write_i32_le(*v);
        }
        Decision::F64(v) => {
            w.write_u8(TAG_F64);
            w.write_f64_le(*v);
        }
        Decision::StrImmediate(bytes) => {
            w.write_u8(TAG_STR_IMMEDIATE_BASE + bytes.len() as u8);
            w.write_bytes(bytes);
        }
        Decision::StrNew(bytes) => {
            w.write_u8(TAG_STR_NEW);
            w.write_varint_u64(bytes.len() as u64);
            w.write_bytes(bytes);
        }
        Decision::StrRef(id) => {
            w.write_u8(TAG_STR_REF);
            w.write_varint_u64(*id as u64);
        }
        Decision::StrVar(bytes) => {
            w.write_u8(TAG_STR_VAR);
            w.write_varint_u64(bytes.len() as u64);
            w.write_bytes(bytes);
        }
        Decision::RawBuffer(bytes) => {
            w.write_u8(TAG_RAW_BUFFER);
            w.write_varint_u64(bytes.len() as u64);
            w.write_bytes(bytes);
        }
        Decision::TableArray(n) => {
            let n = *n;
            w.write_u8(TAG_ARRAY);
            w.write_varint_u64(n);
            for _ in 0..n {
                write_value(decisions, idx, w)?;
            }
        }
        Decision::TableSparse(n) => {
            let n = *n;
            w.write_u8(TAG_SPARSE);
            w.write_varint_u64(n);
            for _ in 0..n {
                write_value(decisions, idx, w)?;
                write_value(decisions, idx, w)?;
            }
        }
        Decision::TableMap(n) => {
            let n = *n;
            w.write_u8(TAG_MAP);
            w.write_varint_u64(n);
            for _ in 0..n {
                write_value(decisions, idx, w)?;
                write_value(decisions, idx, w)?;
            }
        }
        Decision::Vector2(v) => {
            w.write_u8(TAG_VECTOR2);
            w.write_f32_le(v.x);
            w.write_f32_le(v.y);
        }
        Decision::Vector3(v) => {
            w.write_u8(TAG_VECTOR3);
            w.write_f32_le(v.x);
            w.write_f32_le(v.y);
            w.write_f32_le(v.z);
        }
        Decision::CFrame(c) => {
            w.write_u8(TAG_CFRAME);
            w.write_f32_le(c.position.x);
            w.write_f32_le(c.position.y);
            w.write_f32_le(c.position.z);
            w.write_f32_le(c.quat_x);
            w.write_f32_le(c.quat_y);
            w.write_f32_le(c.quat_z);
            w.write_f32_le(c.quat_w);
        }
        Decision::Color3(c) => {
            w.write_u8(TAG_COLOR3);
            w.write_f32_le(c.r);
            w.write_f32_le(c.g);
            w.write_f32_le(c.b);
        }
        Decision::BrickColor(id) => {
            w.write_u8(TAG_BRICK_COLOR);
            w.write_u16_le(*id);
        }
        Decision::UDim(u) => {
            w.write_u8(TAG_UDIM);
            write_udim(w, u);
        }
        Decision::UDim2(u) => {
            w.write_u8(TAG_UDIM2);
            write_udim(w, &u.x);
            write_udim(w, &u.y);
        }
        Decision::Rect(r) => {
            w.write_u8(TAG_RECT);
            w.write_f32_le(r.min_x);
            w.write_f32_le(r.min_y);
            w.write_f32_le(r.max_x);
            w.write_f32_le(r.max_y);
        }
        Decision::NumberRange(r) => {
            w.write_u8(TAG_NUMBER_RANGE);
            w.write_f32_le(r.min);
            w.write_f32_le(r.max);
        }
        Decision::NumberSequence(keypoints) => {
            w.write_u8(TAG_NUMBER_SEQUENCE);
            w.write_u16_le(keypoints.len() as u16);
            for kp in keypoints {
                w.write_f32_le(kp.time);
                w.write_f32_le(kp.value);
                w.write_f32_le(kp.envelope);
            }
        }
        Decision::ColorSequence(keypoints) => {
            w.write_u8(TAG_COLOR_SEQUENCE);
            w.write_u16_le(keypoints.len() as u16);
            for kp in keypoints {
                w.write_f32_le(kp.time);
                w.write_f32_le(kp.color.r);
                w.write_f32_le(kp.color.g);
                w.write_f32_le(kp.color.b);
                w.write_u8(kp.interpolation);
            }
        }
        Decision::DateTime(ms) => {
            w.write_u8(TAG_DATE_TIME);
            w.write_i64_le(*ms);
        }
        Decision::EnumItem => {
            w.write_u8(TAG_ENUM_ITEM);
            write_value(decisions, idx, w)?;
            write_value(decisions, idx, w)?;
        }
    }
    Ok(())
}
