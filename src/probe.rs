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

//! The Probe: a single depth-first traversal that classifies every value,
//! computes the exact output byte count, and records every classification on
//! the decision stack. Nothing downstream re-classifies anything it decides.

use crate::decision::{Decision, DecisionStack};
use crate::error::Error;
use crate::intern::{FrequencyTable, InternMap, Lookup};
use crate::tag::{MAX_DEPTH, MAX_ITEMS, STR_IMMEDIATE_MAX_LEN};
use crate::value::Value;
use crate::varint;

/// Largest magnitude a `f64` can hold while still representing every integer
/// exactly; values with no fractional part and within this bound get the
/// narrowest-fitting fixed-width integer encoding instead of `F64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

struct ProbeState<'a> {
    items: u64,
    freq: FrequencyTable,
    interns: InternMap,
    stack: &'a mut DecisionStack,
}

impl ProbeState<'_> {
    fn enter(&mut self, depth: u32) -> Result<(), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::limits_exceeded(format!(
                "recursion depth {depth} exceeds the limit of {MAX_DEPTH}"
            )));
        }
        self.items += 1;
        if self.items > MAX_ITEMS {
            return Err(Error::limits_exceeded(format!(
                "item count exceeds the limit of {MAX_ITEMS}"
            )));
        }
        Ok(())
    }
}

/// Run the Probe over `root`, returning the total encoded size (including the
/// 1-byte version prefix) and leaving `stack` populated with every decision
/// the Encoder will need to replay.
pub(crate) fn probe(root: &Value, stack: &mut DecisionStack) -> Result<usize, Error> {
    stack.reset();
    let freq = FrequencyTable::build(root);
    let mut state = ProbeState {
        items: 0,
        freq,
        interns: InternMap::new(),
        stack,
    };
    Ok(1 + probe_value(root, 0, &mut state)?)
}

fn probe_value(value: &Value, depth: u32, state: &mut ProbeState) -> Result<usize, Error> {
    state.enter(depth)?;

    match value {
        Value::Null => {
            state.stack.push(Decision::Null);
            Ok(1)
        }
        Value::Bool(true) => {
            state.stack.push(Decision::BoolTrue);
            Ok(1)
        }
        Value::Bool(false) => {
            state.stack.push(Decision::BoolFalse);
            Ok(1)
        }
        Value::Number(n) => Ok(probe_number(*n, state)),
        Value::Str(bytes) => Ok(probe_string(bytes, state)),
        Value::Bytes(bytes) => {
            state.stack.push(Decision::RawBuffer(bytes.clone().into_boxed_slice()));
            Ok(1 + varint::encoded_len(bytes.len() as u64) + bytes.len())
        }
        Value::Table(pairs) => probe_table(pairs, depth, state),
        Value::Vector2(v) => {
            state.stack.push(Decision::Vector2(*v));
            Ok(1 + 2 * 4)
        }
        Value::Vector3(v) => {
            state.stack.push(Decision::Vector3(*v));
            Ok(1 + 3 * 4)
        }
        Value::CFrame(c) => {
            state.stack.push(Decision::CFrame(*c));
            Ok(1 + 3 * 4 + 4 * 4)
        }
        Value::Color3(c) => {
            state.stack.push(Decision::Color3(*c));
            Ok(1 + 3 * 4)
        }
        Value::BrickColor(id) => {
            state.stack.push(Decision::BrickColor(*id));
            Ok(1 + 2)
        }
        Value::UDim(u) => {
            state.stack.push(Decision::UDim(*u));
            Ok(1 + 4 + 4)
        }
        Value::UDim2(u) => {
            state.stack.push(Decision::UDim2(*u));
            Ok(1 + 2 * (4 + 4))
        }
        Value::Rect(r) => {
            state.stack.push(Decision::Rect(*r));
            Ok(1 + 4 * 4)
        }
        Value::NumberRange(r) => {
            state.stack.push(Decision::NumberRange(*r));
            Ok(1 + 2 * 4)
        }
        Value::NumberSequence(keypoints) => {
            let n = keypoints.len();
            if n > u16::MAX as usize {
                return Err(Error::limits_exceeded(format!(
                    "number sequence has {n} keypoints, exceeding the u16 wire count"
                )));
            }
            state.stack.push(Decision::NumberSequence(keypoints.clone()));
            Ok(1 + 2 + n * (3 * 4))
        }
        Value::ColorSequence(keypoints) => {
            let n = keypoints.len();
            if n > u16::MAX as usize {
                return Err(Error::limits_exceeded(format!(
                    "color sequence has {n} keypoints, exceeding the u16 wire count"
                )));
            }
            state.stack.push(Decision::ColorSequence(keypoints.clone()));
            Ok(1 + 2 + n * (4 * 4 + 1))
        }
        Value::DateTime(ms) => {
            state.stack.push(Decision::DateTime(*ms));
            Ok(1 + 8)
        }
        Value::EnumItem(item) => {
            state.stack.push(Decision::EnumItem);
            state.enter(depth + 1)?;
            let class_size = probe_string(&item.class_name, state);
            state.enter(depth + 1)?;
            let name_size = probe_string(&item.item_name, state);
            Ok(1 + class_size + name_size)
        }
    }
}

fn probe_number(n: f64, state: &mut ProbeState) -> usize {
    if n == 0.0 && n.is_sign_positive() {
        state.stack.push(Decision::NumberZero);
        return 1;
    }
    if n.is_finite() && n != 0.0 && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        let i = n as i64;
        if (-32..=31).contains(&i) {
            let slot = (varint::zigzag_encode(i)) as u8;
            state.stack.push(Decision::IntImmediate(slot));
            return 1;
        }
        if (0..=255).contains(&i) {
            state.stack.push(Decision::U8(i as u8));
            return 2;
        }
        if (-32_768..=32_767).contains(&i) {
            state.stack.push(Decision::I16(i as i16));
            return 3;
        }
        if (i32::MIN as i64..=i32::MAX as i64).contains(&i) {
            state.stack.push(Decision::I32(i as i32));
            return 5;
        }
    }
    state.stack.push(Decision::F64(n));
    9
}

fn probe_string(bytes: &[u8], state: &mut ProbeState) -> usize {
    if state.freq.occurs_once(bytes) {
        if bytes.len() <= STR_IMMEDIATE_MAX_LEN {
            state.stack.push(Decision::StrImmediate(bytes.to_vec().into_boxed_slice()));
            return 1 + bytes.len();
        }
        state.stack.push(Decision::StrVar(bytes.to_vec().into_boxed_slice()));
        return 1 + varint::encoded_len(bytes.len() as u64) + bytes.len();
    }
    match state.interns.lookup_or_insert(bytes) {
        Lookup::Hit(id) => {
            state.stack.push(Decision::StrRef(id));
            1 + varint::encoded_len(id as u64)
        }
        Lookup::Miss(id) => {
            let _ = id;
            state.stack.push(Decision::StrNew(bytes.to_vec().into_boxed_slice()));
            1 + varint::encoded_len(bytes.len() as u64) + bytes.len()
        }
    }
}

fn probe_table(pairs: &[(Value, Value)], depth: u32, state: &mut ProbeState) -> Result<usize, Error> {
    let t = pairs.len() as u64;
    if t == 0 {
        state.stack.push(Decision::TableMap(0));
        return Ok(1 + varint::encoded_len(0));
    }

    let mut int_keys: Vec<i64> = Vec::new();
    for (k, _) in pairs {
        match k {
            Value::Number(n) if is_table_key_integer(*n) => int_keys.push(*n as i64),
            Value::Number(_) | Value::Str(_) => {}
            _ => return Err(Error::unsupported_type("table keys must be numbers or strings")),
        }
    }

    if int_keys.len() as u64 == t {
        let mut sorted = int_keys.clone();
        sorted.sort_unstable();
        let is_array = sorted
            .iter()
            .enumerate()
            .all(|(idx, &k)| k == idx as i64 + 1);

        if is_array {
            let mut slots: Vec<Option<&Value>> = vec![None; t as usize];
            for (k, v) in pairs {
                if let Value::Number(n) = k {
                    slots[(*n as i64 - 1) as usize] = Some(v);
                }
            }
            state.stack.push(Decision::TableArray(t));
            let mut size = 1 + varint::encoded_len(t);
            for slot in slots {
                size += probe_value(slot.expect("array slots fully populated"), depth + 1, state)?;
            }
            return Ok(size);
        }

        let max_key = *sorted.last().expect("non-empty");
        if max_key >= 1 && (t as f64) / (max_key as f64) < 0.5 {
            state.stack.push(Decision::TableSparse(t));
            let mut size = 1 + varint::encoded_len(t);
            for (k, v) in pairs {
                size += probe_value(k, depth + 1, state)?;
                size += probe_value(v, depth + 1, state)?;
            }
            return Ok(size);
        }
    }

    state.stack.push(Decision::TableMap(t));
    let mut size = 1 + varint::encoded_len(t);
    for (k, v) in pairs {
        size += probe_value(k, depth + 1, state)?;
        size += probe_value(v, depth + 1, state)?;
    }
    Ok(size)
}

fn is_table_key_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn probe_size(v: &Value) -> usize {
        let mut stack = DecisionStack::new();
        probe(v, &mut stack).unwrap()
    }

    #[test]
    fn null_is_two_bytes_with_version() {
        assert_eq!(probe_size(&Value::Null), 2);
    }

    #[test]
    fn zero_is_two_bytes() {
        assert_eq!(probe_size(&Value::Number(0.0)), 2);
    }

    #[test]
    fn negative_zero_is_f64() {
        assert_eq!(probe_size(&Value::Number(-0.0)), 1 + 9);
    }

    #[test]
    fn negative_one_is_immediate() {
        assert_eq!(probe_size(&Value::Number(-1.0)), 2);
    }

    #[test]
    fn three_hundred_is_i16() {
        assert_eq!(probe_size(&Value::Number(300.0)), 1 + 3);
    }

    #[test]
    fn short_singleton_string_is_immediate() {
        assert_eq!(probe_size(&Value::str("hi")), 1 + 1 + 2);
    }

    #[test]
    fn repeated_short_strings_intern() {
        let v = Value::array([Value::str("a"), Value::str("a"), Value::str("a")]);
        // tag(array)+varint(3) + [StrNew: tag+varint(1)+'a'] + 2*[StrRef: tag+varint(0)]
        let expected = 1 + (1 + 1) + (1 + 1 + 1) + (1 + 1) + (1 + 1);
        assert_eq!(probe_size(&v), expected);
    }

    #[test]
    fn deep_recursion_is_rejected() {
        let mut v = Value::Null;
        for _ in 0..200 {
            v = Value::array([v]);
        }
        let mut stack = DecisionStack::new();
        assert!(probe(&v, &mut stack).is_err());
    }

    #[test]
    fn non_number_non_string_key_is_rejected() {
        let v = Value::Table(vec![(Value::Bool(true), Value::Null)]);
        let mut stack = DecisionStack::new();
        assert!(probe(&v, &mut stack).is_err());
    }

    #[test]
    fn number_sequence_wider_than_u16_is_rejected() {
        use crate::value::NumberSequenceKeypoint;
        let kp = NumberSequenceKeypoint { time: 0.0, value: 0.0, envelope: 0.0 };
        let v = Value::NumberSequence(vec![kp; u16::MAX as usize + 1]);
        let mut stack = DecisionStack::new();
        assert_eq!(probe(&v, &mut stack).unwrap_err().kind(), crate::error::ErrorKind::LimitsExceeded);
    }

    #[test]
    fn color_sequence_wider_than_u16_is_rejected() {
        use crate::value::{Color3, ColorSequenceKeypoint};
        let kp = ColorSequenceKeypoint {
            time: 0.0,
            color: Color3 { r: 0.0, g: 0.0, b: 0.0 },
            interpolation: 0,
        };
        let v = Value::ColorSequence(vec![kp; u16::MAX as usize + 1]);
        let mut stack = DecisionStack::new();
        assert_eq!(probe(&v, &mut stack).unwrap_err().kind(), crate::error::ErrorKind::LimitsExceeded);
    }

    #[test]
    fn enum_item_strings_count_toward_the_item_total() {
        use crate::tag::MAX_ITEMS;
        let item = Value::EnumItem(crate::value::EnumItem {
            class_name: b"Material".to_vec(),
            item_name: b"Plastic".to_vec(),
        });
        // An EnumItem costs 3 items (the marker plus its two strings); make an
        // array of enough of them to cross MAX_ITEMS only if all three count.
        let per_item = 3u64;
        let n = (MAX_ITEMS / per_item) + 1;
        let v = Value::array((0..n).map(|_| item.clone()));
        let mut stack = DecisionStack::new();
        assert_eq!(probe(&v, &mut stack).unwrap_err().kind(), crate::error::ErrorKind::LimitsExceeded);
    }
}
