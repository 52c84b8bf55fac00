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

//! String interning state, both sides of the wire.
//!
//! The encode side also runs the optional singleton-detection pre-pass
//! described in spec §3.3: a single cheap traversal that counts how many
//! times each distinct string occurs, so the Probe can tell a true singleton
//! (emit `StrImmediate`/`StrVar`) from a string that will recur (emit
//! `StrNew`/`StrRef`) without guessing.

use std::collections::HashMap;

use crate::tag::MAX_DEPTH;
use crate::value::Value;

/// Per-call scratch: counts how many times each string occurs in the graph.
///
/// Discarded once the Probe pass that consults it returns.
pub(crate) struct FrequencyTable {
    counts: HashMap<Vec<u8>, u32>,
}

impl FrequencyTable {
    pub fn build(root: &Value) -> Self {
        let mut counts = HashMap::new();
        Self::walk(root, &mut counts, 0);
        Self { counts }
    }

    /// Depth-capped so a pathologically deep graph can't blow the native
    /// stack here; the Probe's own depth check (which runs next) is the
    /// source of truth for rejecting it with `LimitsExceeded`.
    fn walk(value: &Value, counts: &mut HashMap<Vec<u8>, u32>, depth: u32) {
        if depth > MAX_DEPTH {
            return;
        }
        match value {
            Value::Str(bytes) => {
                *counts.entry(bytes.clone()).or_insert(0) += 1;
            }
            Value::Table(pairs) => {
                for (k, v) in pairs {
                    Self::walk(k, counts, depth + 1);
                    Self::walk(v, counts, depth + 1);
                }
            }
            Value::EnumItem(e) => {
                *counts.entry(e.class_name.clone()).or_insert(0) += 1;
                *counts.entry(e.item_name.clone()).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    /// True if `bytes` occurs at most once in the whole graph.
    pub fn occurs_once(&self, bytes: &[u8]) -> bool {
        self.counts.get(bytes).copied().unwrap_or(0) <= 1
    }
}

/// Outcome of looking a string up in the encode-side intern map.
pub(crate) enum Lookup {
    /// Already interned under this id; emit `StrRef`.
    Hit(u32),
    /// First sight; now interned under this id; emit `StrNew`.
    Miss(u32),
}

/// Encode-side `string -> id` map. Fresh per `compress` call.
pub(crate) struct InternMap {
    ids: HashMap<Vec<u8>, u32>,
}

impl InternMap {
    pub fn new() -> Self {
        Self { ids: HashMap::new() }
    }

    pub fn lookup_or_insert(&mut self, bytes: &[u8]) -> Lookup {
        if let Some(&id) = self.ids.get(bytes) {
            return Lookup::Hit(id);
        }
        let id = self.ids.len() as u32;
        self.ids.insert(bytes.to_vec(), id);
        Lookup::Miss(id)
    }
}

/// Decode-side `id -> string` list. Fresh per `decompress` call.
pub(crate) struct InternList {
    strings: Vec<Box<[u8]>>,
}

impl InternList {
    pub fn new() -> Self {
        Self { strings: Vec::new() }
    }

    /// Append a newly-defined string (`STR_NEW`), returning its id.
    pub fn define(&mut self, bytes: Box<[u8]>) -> u32 {
        let id = self.strings.len() as u32;
        self.strings.push(bytes);
        id
    }

    pub fn get(&self, id: u32) -> Option<&[u8]> {
        self.strings.get(id as usize).map(|b| &**b)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_table_counts_repeated_strings() {
        let root = Value::array([Value::str("a"), Value::str("a"), Value::str("b")]);
        let table = FrequencyTable::build(&root);
        assert!(!table.occurs_once(b"a"));
        assert!(table.occurs_once(b"b"));
        assert!(table.occurs_once(b"never-seen"));
    }

    #[test]
    fn intern_map_assigns_sequential_ids() {
        let mut map = InternMap::new();
        match map.lookup_or_insert(b"x") {
            Lookup::Miss(id) => assert_eq!(id, 0),
            Lookup::Hit(_) => panic!("expected miss"),
        }
        match map.lookup_or_insert(b"y") {
            Lookup::Miss(id) => assert_eq!(id, 1),
            Lookup::Hit(_) => panic!("expected miss"),
        }
        match map.lookup_or_insert(b"x") {
            Lookup::Hit(id) => assert_eq!(id, 0),
            Lookup::Miss(_) => panic!("expected hit"),
        }
    }

    #[test]
    fn intern_list_resolves_defined_ids() {
        let mut list = InternList::new();
        let id = list.define(b"hello".to_vec().into_boxed_slice());
        assert_eq!(id, 0);
        assert_eq!(list.get(0), Some(&b"hello"[..]));
        assert_eq!(list.len(), 1);
        assert!(list.get(1).is_none());
    }
}
