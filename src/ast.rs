//! Hash-Consed Term Representation.
//!
//! A small term manager providing what the repair engine needs from an AST:
//! stable integer identities, child access, sorts, per-term depth, and a
//! family tag routing each term to its owning theory plugin.
//!
//! Terms are immutable once created. `mk_*` constructors hash-cons, so
//! structurally equal terms share one [`TermId`].

use lasso::{Rodeo, Spur};
use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use std::fmt::Write as _;

/// Identity of a term inside a [`TermManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub u32);

impl TermId {
    /// Create a term id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index of this term id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a sort inside a [`TermManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortId(pub u32);

/// Theory family owning a term or sort.
///
/// The namespace is small and dense so a plugin table can be a fixed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Boolean connectives and constants.
    Basic,
    /// Linear integer arithmetic.
    Arith,
    /// Fixed-width bit-vectors.
    Bv,
    /// Arrays with select/store.
    Array,
    /// Algebraic datatypes.
    Datatype,
    /// Uninterpreted function applications.
    Uf,
    /// Constants of uninterpreted sorts.
    UserSort,
    /// Fresh value terms used during model construction.
    ModelValue,
}

impl Family {
    /// Number of families; size of a dense plugin table.
    pub const COUNT: usize = 8;

    /// Dense index of this family.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Family::Basic => 0,
            Family::Arith => 1,
            Family::Bv => 2,
            Family::Array => 3,
            Family::Datatype => 4,
            Family::Uf => 5,
            Family::UserSort => 6,
            Family::ModelValue => 7,
        }
    }
}

/// Structure of a sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// The Boolean sort.
    Bool,
    /// The integer sort.
    Int,
    /// Bit-vectors of the given width (at most 64 bits).
    BitVec(u32),
    /// Arrays from index sort to element sort.
    Array(SortId, SortId),
    /// A named algebraic datatype.
    Datatype(Spur),
    /// A named uninterpreted sort.
    Uninterpreted(Spur),
}

impl SortKind {
    /// Family owning values of this sort.
    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            SortKind::Bool => Family::Basic,
            SortKind::Int => Family::Arith,
            SortKind::BitVec(_) => Family::Bv,
            SortKind::Array(..) => Family::Array,
            SortKind::Datatype(_) => Family::Datatype,
            SortKind::Uninterpreted(_) => Family::UserSort,
        }
    }
}

/// Structure of a term.
///
/// Argument lists use inline small vectors; most applications have few
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean constant true.
    True,
    /// Boolean constant false.
    False,
    /// An uninterpreted constant; its sort lives on the term.
    Var {
        /// Interned name.
        name: Spur,
    },
    /// An integer numeral.
    IntConst(BigInt),
    /// A bit-vector numeral.
    BvConst {
        /// Width in bits.
        width: u32,
        /// Value, zero-extended into 64 bits.
        bits: u64,
    },
    /// A fresh model value of an uninterpreted or datatype sort.
    ModelValue {
        /// Index distinguishing model values of the same sort.
        index: u32,
    },
    /// Negation.
    Not(TermId),
    /// N-ary conjunction.
    And(SmallVec<[TermId; 4]>),
    /// N-ary disjunction.
    Or(SmallVec<[TermId; 4]>),
    /// Boolean equivalence.
    Iff(TermId, TermId),
    /// Boolean exclusive or.
    Xor(TermId, TermId),
    /// If-then-else over Boolean branches.
    Ite(TermId, TermId, TermId),
    /// Equality; dispatched on the sort family of its arguments.
    Eq(TermId, TermId),
    /// Integer less-or-equal.
    Le(TermId, TermId),
    /// Integer strict less-than.
    Lt(TermId, TermId),
    /// N-ary integer sum.
    Add(SmallVec<[TermId; 4]>),
    /// N-ary integer product.
    Mul(SmallVec<[TermId; 4]>),
    /// Wrapping bit-vector addition.
    BvAdd(TermId, TermId),
    /// Bitwise and.
    BvAnd(TermId, TermId),
    /// Bitwise or.
    BvOr(TermId, TermId),
    /// Bitwise xor.
    BvXor(TermId, TermId),
    /// Bitwise complement.
    BvNot(TermId),
    /// Unsigned bit-vector less-or-equal.
    BvUle(TermId, TermId),
    /// Array read.
    Select(TermId, TermId),
    /// Array write.
    Store(TermId, TermId, TermId),
    /// Uninterpreted function application.
    Apply {
        /// Interned function name.
        func: Spur,
        /// Arguments.
        args: SmallVec<[TermId; 4]>,
    },
    /// Datatype constructor application.
    DtConstructor {
        /// Interned constructor name.
        ctor: Spur,
        /// Constructor arguments.
        args: SmallVec<[TermId; 4]>,
    },
    /// Datatype field selector.
    DtSelector {
        /// Constructor the selector belongs to.
        ctor: Spur,
        /// Field position within the constructor.
        field: u32,
        /// Argument term.
        arg: TermId,
    },
    /// Datatype constructor recognizer.
    DtTester {
        /// Constructor being tested for.
        ctor: Spur,
        /// Argument term.
        arg: TermId,
    },
}

impl TermKind {
    /// Direct children of this term, in argument order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[TermId; 4]> {
        match self {
            TermKind::True
            | TermKind::False
            | TermKind::Var { .. }
            | TermKind::IntConst(_)
            | TermKind::BvConst { .. }
            | TermKind::ModelValue { .. } => smallvec![],
            TermKind::Not(a) | TermKind::BvNot(a) => smallvec![*a],
            TermKind::DtSelector { arg, .. } | TermKind::DtTester { arg, .. } => smallvec![*arg],
            TermKind::Iff(a, b)
            | TermKind::Xor(a, b)
            | TermKind::Eq(a, b)
            | TermKind::Le(a, b)
            | TermKind::Lt(a, b)
            | TermKind::BvAdd(a, b)
            | TermKind::BvAnd(a, b)
            | TermKind::BvOr(a, b)
            | TermKind::BvXor(a, b)
            | TermKind::BvUle(a, b)
            | TermKind::Select(a, b) => smallvec![*a, *b],
            TermKind::Ite(a, b, c) | TermKind::Store(a, b, c) => smallvec![*a, *b, *c],
            TermKind::And(args)
            | TermKind::Or(args)
            | TermKind::Add(args)
            | TermKind::Mul(args)
            | TermKind::Apply { args, .. }
            | TermKind::DtConstructor { args, .. } => args.clone(),
        }
    }

    /// True iff this term has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

/// A term: structure, sort and cached depth.
#[derive(Debug, Clone)]
pub struct Term {
    /// Structure of the term.
    pub kind: TermKind,
    /// Sort of the term.
    pub sort: SortId,
    /// 1 + maximum depth of any child; leaves have depth 1.
    pub depth: u32,
}

/// Well-known sorts, allocated once per manager.
#[derive(Debug, Clone, Copy)]
pub struct Sorts {
    /// The Boolean sort.
    pub bool_sort: SortId,
    /// The integer sort.
    pub int_sort: SortId,
}

/// Owner of all terms and sorts.
#[derive(Debug)]
pub struct TermManager {
    interner: Rodeo,
    sort_table: Vec<SortKind>,
    sort_cache: FxHashMap<SortKind, SortId>,
    terms: Vec<Term>,
    cache: FxHashMap<(TermKind, SortId), TermId>,
    /// Well-known sorts.
    pub sorts: Sorts,
}

impl TermManager {
    /// Create an empty term manager.
    #[must_use]
    pub fn new() -> Self {
        let mut tm = Self {
            interner: Rodeo::default(),
            sort_table: Vec::new(),
            sort_cache: FxHashMap::default(),
            terms: Vec::new(),
            cache: FxHashMap::default(),
            sorts: Sorts {
                bool_sort: SortId(0),
                int_sort: SortId(0),
            },
        };
        tm.sorts.bool_sort = tm.mk_sort(SortKind::Bool);
        tm.sorts.int_sort = tm.mk_sort(SortKind::Int);
        tm
    }

    /// Intern a symbol name.
    pub fn intern(&mut self, name: &str) -> Spur {
        self.interner.get_or_intern(name)
    }

    /// Resolve an interned symbol.
    #[must_use]
    pub fn resolve(&self, name: Spur) -> &str {
        self.interner.resolve(&name)
    }

    /// Get or create a sort.
    pub fn mk_sort(&mut self, kind: SortKind) -> SortId {
        if let Some(&id) = self.sort_cache.get(&kind) {
            return id;
        }
        let id = SortId(self.sort_table.len() as u32);
        self.sort_table.push(kind.clone());
        self.sort_cache.insert(kind, id);
        id
    }

    /// Bit-vector sort of the given width. Widths above 64 are unsupported.
    pub fn mk_bv_sort(&mut self, width: u32) -> SortId {
        assert!(width >= 1 && width <= 64, "bit-vector width out of range");
        self.mk_sort(SortKind::BitVec(width))
    }

    /// Array sort from `index` to `elem`.
    pub fn mk_array_sort(&mut self, index: SortId, elem: SortId) -> SortId {
        self.mk_sort(SortKind::Array(index, elem))
    }

    /// Named uninterpreted sort.
    pub fn mk_uninterpreted_sort(&mut self, name: &str) -> SortId {
        let name = self.intern(name);
        self.mk_sort(SortKind::Uninterpreted(name))
    }

    /// Named datatype sort.
    pub fn mk_datatype_sort(&mut self, name: &str) -> SortId {
        let name = self.intern(name);
        self.mk_sort(SortKind::Datatype(name))
    }

    /// Structure of a sort.
    #[must_use]
    pub fn sort_kind(&self, sort: SortId) -> &SortKind {
        &self.sort_table[sort.0 as usize]
    }

    fn intern_term(&mut self, kind: TermKind, sort: SortId) -> TermId {
        if let Some(&id) = self.cache.get(&(kind.clone(), sort)) {
            return id;
        }
        let depth = 1 + kind
            .children()
            .iter()
            .map(|&c| self.terms[c.index()].depth)
            .max()
            .unwrap_or(0);
        let id = TermId(self.terms.len() as u32);
        self.terms.push(Term {
            kind: kind.clone(),
            sort,
            depth,
        });
        self.cache.insert((kind, sort), id);
        id
    }

    /// The term `true`.
    pub fn mk_true(&mut self) -> TermId {
        self.intern_term(TermKind::True, self.sorts.bool_sort)
    }

    /// The term `false`.
    pub fn mk_false(&mut self) -> TermId {
        self.intern_term(TermKind::False, self.sorts.bool_sort)
    }

    /// An uninterpreted constant of the given sort.
    pub fn mk_var(&mut self, name: &str, sort: SortId) -> TermId {
        let name = self.intern(name);
        self.intern_term(TermKind::Var { name }, sort)
    }

    /// An integer numeral.
    pub fn mk_int(&mut self, value: BigInt) -> TermId {
        self.intern_term(TermKind::IntConst(value), self.sorts.int_sort)
    }

    /// A bit-vector numeral; `bits` is truncated to `width`.
    pub fn mk_bv_const(&mut self, width: u32, bits: u64) -> TermId {
        let sort = self.mk_bv_sort(width);
        let bits = bits & crate::value::bv_mask(width);
        self.intern_term(TermKind::BvConst { width, bits }, sort)
    }

    /// A fresh model value of the given sort.
    pub fn mk_model_value(&mut self, sort: SortId, index: u32) -> TermId {
        self.intern_term(TermKind::ModelValue { index }, sort)
    }

    /// Negation. Double negations are kept; the Boolean bridge strips them.
    pub fn mk_not(&mut self, arg: TermId) -> TermId {
        debug_assert!(self.is_bool(arg));
        self.intern_term(TermKind::Not(arg), self.sorts.bool_sort)
    }

    /// N-ary conjunction; `args` must be non-empty.
    pub fn mk_and(&mut self, args: Vec<TermId>) -> TermId {
        assert!(!args.is_empty());
        self.intern_term(TermKind::And(args.into()), self.sorts.bool_sort)
    }

    /// N-ary disjunction; `args` must be non-empty.
    pub fn mk_or(&mut self, args: Vec<TermId>) -> TermId {
        assert!(!args.is_empty());
        self.intern_term(TermKind::Or(args.into()), self.sorts.bool_sort)
    }

    /// Boolean equivalence.
    pub fn mk_iff(&mut self, a: TermId, b: TermId) -> TermId {
        self.intern_term(TermKind::Iff(a, b), self.sorts.bool_sort)
    }

    /// Boolean exclusive or.
    pub fn mk_xor(&mut self, a: TermId, b: TermId) -> TermId {
        self.intern_term(TermKind::Xor(a, b), self.sorts.bool_sort)
    }

    /// If-then-else over Boolean branches.
    pub fn mk_ite(&mut self, cond: TermId, then: TermId, els: TermId) -> TermId {
        debug_assert!(self.is_bool(then) && self.is_bool(els));
        self.intern_term(TermKind::Ite(cond, then, els), self.sorts.bool_sort)
    }

    /// Equality; both sides must share a sort.
    pub fn mk_eq(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.get(a).sort, self.get(b).sort);
        self.intern_term(TermKind::Eq(a, b), self.sorts.bool_sort)
    }

    /// Integer less-or-equal.
    pub fn mk_le(&mut self, a: TermId, b: TermId) -> TermId {
        self.intern_term(TermKind::Le(a, b), self.sorts.bool_sort)
    }

    /// Integer strict less-than.
    pub fn mk_lt(&mut self, a: TermId, b: TermId) -> TermId {
        self.intern_term(TermKind::Lt(a, b), self.sorts.bool_sort)
    }

    /// Integer greater-or-equal, expressed as a flipped `Le`.
    pub fn mk_ge(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_le(b, a)
    }

    /// N-ary integer sum; `args` must be non-empty.
    pub fn mk_add(&mut self, args: Vec<TermId>) -> TermId {
        assert!(!args.is_empty());
        self.intern_term(TermKind::Add(args.into()), self.sorts.int_sort)
    }

    /// N-ary integer product; `args` must be non-empty.
    pub fn mk_mul(&mut self, args: Vec<TermId>) -> TermId {
        assert!(!args.is_empty());
        self.intern_term(TermKind::Mul(args.into()), self.sorts.int_sort)
    }

    /// Wrapping bit-vector addition.
    pub fn mk_bv_add(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.get(a).sort;
        self.intern_term(TermKind::BvAdd(a, b), sort)
    }

    /// Bitwise and.
    pub fn mk_bv_and(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.get(a).sort;
        self.intern_term(TermKind::BvAnd(a, b), sort)
    }

    /// Bitwise or.
    pub fn mk_bv_or(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.get(a).sort;
        self.intern_term(TermKind::BvOr(a, b), sort)
    }

    /// Bitwise xor.
    pub fn mk_bv_xor(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.get(a).sort;
        self.intern_term(TermKind::BvXor(a, b), sort)
    }

    /// Bitwise complement.
    pub fn mk_bv_not(&mut self, a: TermId) -> TermId {
        let sort = self.get(a).sort;
        self.intern_term(TermKind::BvNot(a), sort)
    }

    /// Unsigned bit-vector less-or-equal.
    pub fn mk_bv_ule(&mut self, a: TermId, b: TermId) -> TermId {
        self.intern_term(TermKind::BvUle(a, b), self.sorts.bool_sort)
    }

    /// Array read.
    pub fn mk_select(&mut self, array: TermId, index: TermId) -> TermId {
        let SortKind::Array(_, elem) = *self.sort_kind(self.get(array).sort) else {
            panic!("select on non-array term");
        };
        self.intern_term(TermKind::Select(array, index), elem)
    }

    /// Array write.
    pub fn mk_store(&mut self, array: TermId, index: TermId, value: TermId) -> TermId {
        let sort = self.get(array).sort;
        self.intern_term(TermKind::Store(array, index, value), sort)
    }

    /// Uninterpreted function application with explicit result sort.
    pub fn mk_apply(&mut self, func: &str, args: Vec<TermId>, sort: SortId) -> TermId {
        let func = self.intern(func);
        self.intern_term(
            TermKind::Apply {
                func,
                args: args.into(),
            },
            sort,
        )
    }

    /// Datatype constructor application.
    pub fn mk_constructor(&mut self, ctor: &str, args: Vec<TermId>, sort: SortId) -> TermId {
        let ctor = self.intern(ctor);
        self.intern_term(
            TermKind::DtConstructor {
                ctor,
                args: args.into(),
            },
            sort,
        )
    }

    /// Datatype field selector with explicit result sort.
    pub fn mk_selector(&mut self, ctor: &str, field: u32, arg: TermId, sort: SortId) -> TermId {
        let ctor = self.intern(ctor);
        self.intern_term(TermKind::DtSelector { ctor, field, arg }, sort)
    }

    /// Datatype constructor recognizer.
    pub fn mk_tester(&mut self, ctor: &str, arg: TermId) -> TermId {
        let ctor = self.intern(ctor);
        self.intern_term(TermKind::DtTester { ctor, arg }, self.sorts.bool_sort)
    }

    /// Access a term by id.
    #[must_use]
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id.index()]
    }

    /// Sort of a term.
    #[must_use]
    pub fn sort(&self, id: TermId) -> SortId {
        self.terms[id.index()].sort
    }

    /// Depth of a term; leaves have depth 1.
    #[must_use]
    pub fn depth(&self, id: TermId) -> u32 {
        self.terms[id.index()].depth
    }

    /// True iff the term has Boolean sort.
    #[must_use]
    pub fn is_bool(&self, id: TermId) -> bool {
        self.terms[id.index()].sort == self.sorts.bool_sort
    }

    /// Number of terms created so far.
    #[must_use]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Theory family of a term, if any.
    ///
    /// Equalities dispatch on the sort family of their first argument,
    /// mirroring how the engine routes `x = y` over integers to the
    /// arithmetic plugin. Uninterpreted constants have no family.
    #[must_use]
    pub fn family(&self, id: TermId) -> Option<Family> {
        match &self.get(id).kind {
            TermKind::Var { .. } => None,
            TermKind::Eq(a, _) => Some(self.sort_kind(self.sort(*a)).family()),
            TermKind::True
            | TermKind::False
            | TermKind::Not(_)
            | TermKind::And(_)
            | TermKind::Or(_)
            | TermKind::Iff(..)
            | TermKind::Xor(..)
            | TermKind::Ite(..) => Some(Family::Basic),
            TermKind::IntConst(_)
            | TermKind::Le(..)
            | TermKind::Lt(..)
            | TermKind::Add(_)
            | TermKind::Mul(_) => Some(Family::Arith),
            TermKind::BvConst { .. }
            | TermKind::BvAdd(..)
            | TermKind::BvAnd(..)
            | TermKind::BvOr(..)
            | TermKind::BvXor(..)
            | TermKind::BvNot(_)
            | TermKind::BvUle(..) => Some(Family::Bv),
            TermKind::Select(..) | TermKind::Store(..) => Some(Family::Array),
            TermKind::DtConstructor { .. }
            | TermKind::DtSelector { .. }
            | TermKind::DtTester { .. } => Some(Family::Datatype),
            TermKind::Apply { .. } => Some(Family::Uf),
            TermKind::ModelValue { .. } => Some(Family::ModelValue),
        }
    }

    /// Render a term as an s-expression, for diagnostics.
    #[must_use]
    pub fn display(&self, id: TermId) -> String {
        let mut out = String::new();
        self.display_into(id, &mut out);
        out
    }

    fn display_into(&self, id: TermId, out: &mut String) {
        let term = self.get(id);
        let head: &str = match &term.kind {
            TermKind::True => "true",
            TermKind::False => "false",
            TermKind::Var { name } => {
                out.push_str(self.resolve(*name));
                return;
            }
            TermKind::IntConst(v) => {
                let _ = write!(out, "{v}");
                return;
            }
            TermKind::BvConst { width, bits } => {
                let _ = write!(out, "#b{bits:0w$b}", w = *width as usize);
                return;
            }
            TermKind::ModelValue { index } => {
                let _ = write!(out, "@val!{index}");
                return;
            }
            TermKind::Not(_) => "not",
            TermKind::And(_) => "and",
            TermKind::Or(_) => "or",
            TermKind::Iff(..) => "=",
            TermKind::Xor(..) => "xor",
            TermKind::Ite(..) => "ite",
            TermKind::Eq(..) => "=",
            TermKind::Le(..) => "<=",
            TermKind::Lt(..) => "<",
            TermKind::Add(_) => "+",
            TermKind::Mul(_) => "*",
            TermKind::BvAdd(..) => "bvadd",
            TermKind::BvAnd(..) => "bvand",
            TermKind::BvOr(..) => "bvor",
            TermKind::BvXor(..) => "bvxor",
            TermKind::BvNot(_) => "bvnot",
            TermKind::BvUle(..) => "bvule",
            TermKind::Select(..) => "select",
            TermKind::Store(..) => "store",
            TermKind::Apply { func, .. } => self.resolve(*func),
            TermKind::DtConstructor { ctor, .. } => self.resolve(*ctor),
            TermKind::DtSelector { ctor, field, .. } => {
                let _ = write!(out, "({}.{field} ", self.resolve(*ctor));
                self.display_into(term.kind.children()[0], out);
                out.push(')');
                return;
            }
            TermKind::DtTester { ctor, .. } => {
                let _ = write!(out, "(is-{} ", self.resolve(*ctor));
                self.display_into(term.kind.children()[0], out);
                out.push(')');
                return;
            }
        };
        let children = term.kind.children();
        if children.is_empty() {
            out.push_str(head);
            return;
        }
        out.push('(');
        out.push_str(head);
        for child in children {
            out.push(' ');
            self.display_into(child, out);
        }
        out.push(')');
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consing() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let ab1 = tm.mk_and(vec![a, b]);
        let ab2 = tm.mk_and(vec![a, b]);
        assert_eq!(ab1, ab2);
        let ba = tm.mk_and(vec![b, a]);
        assert_ne!(ab1, ba);
    }

    #[test]
    fn test_depth() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        assert_eq!(tm.depth(a), 1);
        let not_a = tm.mk_not(a);
        assert_eq!(tm.depth(not_a), 2);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let or = tm.mk_or(vec![not_a, b]);
        assert_eq!(tm.depth(or), 3);
    }

    #[test]
    fn test_family_routing() {
        let mut tm = TermManager::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        assert_eq!(tm.family(x), None);
        let eq = tm.mk_eq(x, y);
        // integer equality goes to the arithmetic plugin
        assert_eq!(tm.family(eq), Some(Family::Arith));
        let le = tm.mk_le(x, y);
        assert_eq!(tm.family(le), Some(Family::Arith));

        let u = tm.mk_uninterpreted_sort("U");
        let p = tm.mk_var("p", u);
        let q = tm.mk_var("q", u);
        let eq_u = tm.mk_eq(p, q);
        assert_eq!(tm.family(eq_u), Some(Family::UserSort));
    }

    #[test]
    fn test_bv_const_truncation() {
        let mut tm = TermManager::new();
        let c = tm.mk_bv_const(4, 0x1f);
        let TermKind::BvConst { width, bits } = tm.get(c).kind else {
            panic!("expected bv const");
        };
        assert_eq!(width, 4);
        assert_eq!(bits, 0xf);
    }

    #[test]
    fn test_display() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let f = tm.mk_or(vec![a, b]);
        assert_eq!(tm.display(f), "(or a b)");
    }
}
