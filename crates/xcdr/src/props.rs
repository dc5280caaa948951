// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity property trees: the static description of a constructed type's
//! members that drives the streaming switchboxes.
//!
//! Generated `build_props` functions append one record per member in
//! declaration order and then call [`EntityProperties::finish`], which
//! derives the by-member-id ordering and the key projections. Finished
//! trees are memoized per thread through [`get_type_props`]; entry points
//! receive a fresh clone so the runtime bookkeeping fields (`e_off`,
//! `e_sz`, `is_present`, ...) never touch the memoized master.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Minimal bit width able to represent an entity (set for enums, bitmasks
/// and the arithmetic primitives; unset for everything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitBound {
    #[default]
    Unset,
    B8,
    B16,
    B32,
    B64,
}

impl BitBound {
    /// Wire size in bytes, 0 when unset.
    pub const fn bytes(self) -> usize {
        match self {
            BitBound::Unset => 0,
            BitBound::B8 => 1,
            BitBound::B16 => 2,
            BitBound::B32 => 4,
            BitBound::B64 => 8,
        }
    }
}

/// Evolution contract of a constructed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extensibility {
    #[default]
    Final,
    Appendable,
    Mutable,
}

/// Which member list a stream iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberListType {
    MembersBySeq,
    MembersById,
    Keys,
}

/// One node of a property tree.
///
/// Doubles as the parsed form of member headers taken from a stream while
/// reading, which is why the record carries both declaration facts
/// (`m_id`, extensibility, bit bound, flags) and per-pass bookkeeping
/// (`e_off`/`d_off`/`e_sz`/`d_sz`/`is_present`).
#[derive(Debug, Clone, Default)]
pub struct EntityProperties {
    /// Declaration-order index within the parent.
    pub s_id: u32,
    /// Member id, explicit from the idl or defaulted to the sequence id.
    pub m_id: u32,
    /// Extensibility of this entity.
    pub e_ext: Extensibility,
    /// Extensibility of the parent entity.
    pub p_ext: Extensibility,
    /// Bit bound for enums/bitmasks and arithmetic primitives.
    pub e_bb: BitBound,
    pub is_optional: bool,
    pub is_key: bool,
    /// Wire-level must-understand: unknown members carrying it abort reads.
    pub must_understand: bool,
    /// Local must-understand: the sample is incomplete without this member.
    pub must_understand_local: bool,
    /// Skip this member without streaming it.
    pub ignore: bool,
    /// Terminating entry of a member list.
    pub is_last: bool,
    pub is_present: bool,
    pub keylist_is_pragma: bool,
    /// Stream offset at which the member payload starts (headers excluded).
    pub e_off: usize,
    /// Stream offset at which the struct body starts (headers excluded).
    pub d_off: usize,
    /// Size of the member payload, taken from headers while reading.
    pub e_sz: u32,
    /// Size of the struct body, taken from the delimiter while reading.
    pub d_sz: u32,

    pub members_by_seq: Vec<EntityProperties>,
    pub members_by_id: Vec<EntityProperties>,
    pub keys_by_seq: Vec<EntityProperties>,
    pub keys_by_id: Vec<EntityProperties>,
}

impl EntityProperties {
    /// Fresh root node for a constructed type under construction.
    pub fn root() -> Self {
        Self::default()
    }

    /// Member record for a primitive/enum/string/sequence/array member.
    pub fn member(m_id: u32, is_optional: bool) -> Self {
        Self {
            m_id,
            is_optional,
            ..Self::default()
        }
    }

    /// Terminating entry closing a member list.
    pub fn final_entry() -> Self {
        Self {
            is_last: true,
            ..Self::default()
        }
    }

    pub fn is_final(&self) -> bool {
        self.is_last
    }

    /// Member id and optionality, applied to sub-trees copied in through
    /// [`get_type_props`].
    pub fn set_member_props(&mut self, m_id: u32, is_optional: bool) {
        self.m_id = m_id;
        self.is_optional = is_optional;
    }

    /// Append a member in declaration order; assigns the sequence id and
    /// hands the entry back for flag assignments.
    pub fn push_member(&mut self, mut entry: EntityProperties) -> &mut EntityProperties {
        entry.s_id = self.members_by_seq.len() as u32;
        entry.is_last = false;
        self.members_by_seq.push(entry);
        // the freshly pushed entry, never empty here
        let idx = self.members_by_seq.len() - 1;
        &mut self.members_by_seq[idx]
    }

    pub fn list(&self, list: MemberListType) -> &[EntityProperties] {
        match list {
            MemberListType::MembersBySeq => &self.members_by_seq,
            MemberListType::MembersById => &self.members_by_id,
            MemberListType::Keys => &self.keys_by_seq,
        }
    }

    pub fn entity_mut(&mut self, list: MemberListType, index: usize) -> &mut EntityProperties {
        match list {
            MemberListType::MembersBySeq => &mut self.members_by_seq[index],
            MemberListType::MembersById => &mut self.members_by_id[index],
            MemberListType::Keys => &mut self.keys_by_seq[index],
        }
    }

    /// Legacy `#pragma keylist` support: mark the terminal member of each
    /// dotted path (given as member-id chains resolved by the generator)
    /// as key, together with the intermediate members leading to it.
    pub fn process_keylist(&mut self, paths: &[Vec<u32>]) {
        self.keylist_is_pragma = true;
        for path in paths {
            let mut node = &mut *self;
            for &id in path {
                let found = node
                    .members_by_seq
                    .iter_mut()
                    .find(|m| !m.is_last && m.m_id == id);
                match found {
                    Some(next) => {
                        next.is_key = true;
                        node = next;
                    }
                    None => {
                        debug_assert!(false, "keylist path names unknown member id {}", id);
                        return;
                    }
                }
            }
        }
    }

    /// Derive the by-id orderings and the key projections. Called once by
    /// the generated `build_props`, after the last member was appended.
    pub fn finish(&mut self) {
        self.apply_key_rules();
        self.rederive();
    }

    /// Must-understand propagation for declared keys (invariant: if any
    /// member of a struct is declared key, only those are keys; if none
    /// is, all of them are). The key-all half of the rule is applied
    /// during key derivation, never by flagging a type's own members:
    /// those flags would leak into every tree the type is copied into and
    /// defeat keylist pruning.
    fn apply_key_rules(&mut self) {
        for member in self.members_by_seq.iter_mut().filter(|m| !m.is_last) {
            if member.is_key {
                Self::mark_key_subtree(member);
            }
        }
    }

    fn mark_key_subtree(node: &mut EntityProperties) {
        node.must_understand = true;
        node.must_understand_local = true;
        let any_key = node.members_by_seq.iter().any(|m| !m.is_last && m.is_key);
        for child in node.members_by_seq.iter_mut().filter(|m| !m.is_last) {
            if !any_key {
                child.is_key = true;
            }
            if child.is_key {
                Self::mark_key_subtree(child);
            }
        }
    }

    /// Rebuild `members_by_id`, `keys_by_seq` and `keys_by_id` from the
    /// (possibly re-flagged) declaration-order list, recursively, and seal
    /// every list with a final entry.
    fn rederive(&mut self) {
        self.members_by_seq.retain(|m| !m.is_last);
        for member in &mut self.members_by_seq {
            member.rederive();
        }

        self.members_by_id = merge_by_id(&self.members_by_seq);

        self.keys_by_seq = Self::derive_keys(&self.members_by_seq);
        self.keys_by_id = merge_by_id(&self.keys_by_seq);

        self.members_by_seq.push(Self::final_entry());
        self.members_by_id.push(Self::final_entry());
        self.keys_by_seq.push(Self::final_entry());
        self.keys_by_id.push(Self::final_entry());
    }

    /// Key projections of a member list: the declared keys, or every
    /// member when none is declared (key-all-when-none-specified).
    fn derive_keys(members: &[EntityProperties]) -> Vec<EntityProperties> {
        let any_key = members.iter().any(|m| !m.is_last && m.is_key);
        members
            .iter()
            .filter(|m| !m.is_last && (m.is_key || !any_key))
            .map(Self::key_clone)
            .collect()
    }

    /// Key-projection copy of a member: must-understand, final/final
    /// extensibility (keys stream headerless in every dialect), children
    /// pruned to the key members.
    fn key_clone(member: &EntityProperties) -> EntityProperties {
        let mut key = member.scalar_clone();
        key.is_key = true;
        key.must_understand = true;
        key.must_understand_local = true;
        key.e_ext = Extensibility::Final;
        key.p_ext = Extensibility::Final;

        key.keys_by_seq = Self::derive_keys(&member.members_by_seq);
        key.keys_by_id = merge_by_id(&key.keys_by_seq);

        key.members_by_seq.push(Self::final_entry());
        key.members_by_id.push(Self::final_entry());
        key.keys_by_seq.push(Self::final_entry());
        key.keys_by_id.push(Self::final_entry());
        key
    }

    /// Copy of the scalar fields with empty member lists.
    fn scalar_clone(&self) -> EntityProperties {
        EntityProperties {
            s_id: self.s_id,
            m_id: self.m_id,
            e_ext: self.e_ext,
            p_ext: self.p_ext,
            e_bb: self.e_bb,
            is_optional: self.is_optional,
            is_key: self.is_key,
            must_understand: self.must_understand,
            must_understand_local: self.must_understand_local,
            ignore: self.ignore,
            is_last: self.is_last,
            is_present: self.is_present,
            keylist_is_pragma: self.keylist_is_pragma,
            e_off: self.e_off,
            d_off: self.d_off,
            e_sz: self.e_sz,
            d_sz: self.d_sz,
            members_by_seq: Vec::new(),
            members_by_id: Vec::new(),
            keys_by_seq: Vec::new(),
            keys_by_id: Vec::new(),
        }
    }
}

/// Ascending member-id ordering of a declaration-order list. Entries with
/// equal member ids are merged by concatenating their sub-member lists.
fn merge_by_id(members: &[EntityProperties]) -> Vec<EntityProperties> {
    let mut sorted: Vec<EntityProperties> = members.iter().filter(|m| !m.is_last).cloned().collect();
    sorted.sort_by_key(|m| m.m_id);

    let mut merged: Vec<EntityProperties> = Vec::with_capacity(sorted.len());
    for entry in sorted {
        match merged.last_mut() {
            Some(last) if last.m_id == entry.m_id && last.is_last == entry.is_last => {
                concat_members(&mut last.members_by_seq, &entry.members_by_seq);
                concat_members(&mut last.members_by_id, &entry.members_by_id);
                concat_members(&mut last.keys_by_seq, &entry.keys_by_seq);
                concat_members(&mut last.keys_by_id, &entry.keys_by_id);
            }
            _ => merged.push(entry),
        }
    }
    merged
}

/// Append the real entries of `extra` to `list`, keeping a single final
/// entry at the end.
fn concat_members(list: &mut Vec<EntityProperties>, extra: &[EntityProperties]) {
    list.retain(|m| !m.is_last);
    list.extend(extra.iter().filter(|m| !m.is_last).cloned());
    list.push(EntityProperties::final_entry());
}

/// Implemented by generated code: builds the (unfinished clone of the)
/// property tree of a constructed type.
pub trait PropertyTree: 'static {
    fn build_props() -> EntityProperties;
}

thread_local! {
    static PROPS_MEMO: RefCell<HashMap<TypeId, Rc<EntityProperties>>> =
        RefCell::new(HashMap::new());
}

/// Property tree of `T`, built and finished once per thread and cloned per
/// request. The memoized master is never mutated; all runtime bookkeeping
/// lands in the clone handed out here.
pub fn get_type_props<T: PropertyTree>() -> EntityProperties {
    let id = TypeId::of::<T>();
    let memoized = PROPS_MEMO.with(|memo| memo.borrow().get(&id).cloned());
    if let Some(master) = memoized {
        return (*master).clone();
    }
    // Built outside the borrow: nested types recurse into get_type_props.
    let master = Rc::new(T::build_props());
    PROPS_MEMO.with(|memo| {
        memo.borrow_mut().entry(id).or_insert_with(|| master.clone());
    });
    (*master).clone()
}
