//! End-to-end checks driving the engine through its public surface.

use num_bigint::BigInt;
use slick::sat::MemorySat;
use slick::{CheckResult, Context, SlsConfig, TermManager, Value};

/// Flip literals until `lit` is true under the oracle's assignment.
fn make_true(ctx: &mut Context<'_>, lit: slick::Lit) {
    if !ctx.is_true(lit) {
        assert!(ctx.try_flip(lit.var()));
    }
}

#[test]
fn test_or_and_unit_scenario() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.bool_sort);
    let b = tm.mk_var("b", tm.sorts.bool_sort);
    let not_a = tm.mk_not(a);
    let or = tm.mk_or(vec![a, b]);
    let formula = tm.mk_and(vec![or, not_a]);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(formula);
    // the conjunction decomposes: one clause for the disjunction, one unit
    assert_eq!(ctx.clauses().len(), 2);

    let lb = ctx.mk_literal(b);
    make_true(&mut ctx, lb);
    assert_eq!(ctx.check(), CheckResult::Sat);

    assert!(ctx.is_relevant(b));

    drop(ctx);
    let model = sat.model().expect("model delivered");
    assert_eq!(sat.model_calls(), 1);
    assert_eq!(model.get(b), Some(&Value::Bool(true)));
    assert_eq!(model.get(a), Some(&Value::Bool(false)));
}

#[test]
fn test_on_model_called_once_per_success() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.bool_sort);
    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(a);
    let la = ctx.mk_literal(a);
    make_true(&mut ctx, la);
    assert_eq!(ctx.check(), CheckResult::Sat);
    drop(ctx);
    assert_eq!(sat.model_calls(), 1);
}

#[test]
fn test_arith_repair_finds_model() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let x = tm.mk_var("x", int);
    let two = tm.mk_int(BigInt::from(2));
    let seven = tm.mk_int(BigInt::from(7));
    let sum = tm.mk_add(vec![x, two]);
    let eq = tm.mk_eq(sum, seven);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(eq);
    let leq = ctx.mk_literal(eq);
    make_true(&mut ctx, leq);

    assert_eq!(ctx.check(), CheckResult::Sat);
    assert_eq!(ctx.get_value(x), Ok(Value::Int(BigInt::from(5))));
    drop(ctx);
    let model = sat.model().expect("model delivered");
    assert_eq!(model.get(x), Some(&Value::Int(BigInt::from(5))));
}

#[test]
fn test_arith_inequality_chain() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let x = tm.mk_var("x", int);
    let y = tm.mk_var("y", int);
    let ten = tm.mk_int(BigInt::from(10));
    let le1 = tm.mk_le(ten, x);
    let lt = tm.mk_lt(x, y);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(le1);
    ctx.assert_term(lt);
    let l1 = ctx.mk_literal(le1);
    let l2 = ctx.mk_literal(lt);
    make_true(&mut ctx, l1);
    make_true(&mut ctx, l2);

    assert_eq!(ctx.check(), CheckResult::Sat);
    let Ok(Value::Int(vx)) = ctx.get_value(x) else {
        panic!("expected an integer for x");
    };
    let Ok(Value::Int(vy)) = ctx.get_value(y) else {
        panic!("expected an integer for y");
    };
    assert!(vx >= BigInt::from(10));
    assert!(vx < vy);
}

#[test]
fn test_bv_repair_finds_model() {
    let mut tm = TermManager::new();
    let s = tm.mk_bv_sort(8);
    let x = tm.mk_var("x", s);
    let c = tm.mk_bv_const(8, 0x2a);
    let mask = tm.mk_bv_const(8, 0xf0);
    let and = tm.mk_bv_and(x, mask);
    let eq = tm.mk_eq(and, c);
    // 0x2a has bits outside 0xf0, so x & 0xf0 = 0x2a is unsatisfiable
    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default().with_max_steps(10_000));
    ctx.assert_term(eq);
    let leq = ctx.mk_literal(eq);
    make_true(&mut ctx, leq);
    assert_eq!(ctx.check(), CheckResult::Unknown);
    drop(ctx);
    assert_eq!(sat.model_calls(), 0);
}

#[test]
fn test_bv_xor_equation() {
    let mut tm = TermManager::new();
    let s = tm.mk_bv_sort(8);
    let x = tm.mk_var("x", s);
    let key = tm.mk_bv_const(8, 0b1010_1010);
    let target = tm.mk_bv_const(8, 0b0101_0101);
    let xor = tm.mk_bv_xor(x, key);
    let eq = tm.mk_eq(xor, target);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(eq);
    let leq = ctx.mk_literal(eq);
    make_true(&mut ctx, leq);

    assert_eq!(ctx.check(), CheckResult::Sat);
    assert_eq!(
        ctx.get_value(x),
        Ok(Value::bitvec(8, 0b1111_1111))
    );
}

#[test]
fn test_congruence_conflict_stays_unknown() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let x = tm.mk_var("x", int);
    let y = tm.mk_var("y", int);
    let fx = tm.mk_apply("f", vec![x], int);
    let fy = tm.mk_apply("f", vec![y], int);
    let one = tm.mk_int(BigInt::from(1));
    let two = tm.mk_int(BigInt::from(2));
    let e1 = tm.mk_eq(fx, one);
    let e2 = tm.mk_eq(fy, two);
    let e3 = tm.mk_eq(x, y);

    let mut sat = MemorySat::new();
    let config = SlsConfig::default().with_max_steps(5_000);
    let mut ctx = Context::new(&mut tm, &mut sat, config);
    for t in [e1, e2, e3] {
        ctx.assert_term(t);
        let lit = ctx.mk_literal(t);
        make_true(&mut ctx, lit);
    }
    // f(x) = 1, f(y) = 2, x = y has no model; repeated checks may learn
    // congruence lemmas but must never report success
    for _ in 0..4 {
        assert_eq!(ctx.check(), CheckResult::Unknown);
    }
    drop(ctx);
    assert_eq!(sat.model_calls(), 0);
}

#[test]
fn test_congruence_agreement_is_sat() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let x = tm.mk_var("x", int);
    let y = tm.mk_var("y", int);
    let fx = tm.mk_apply("f", vec![x], int);
    let fy = tm.mk_apply("f", vec![y], int);
    let e1 = tm.mk_eq(x, y);
    let e2 = tm.mk_eq(fx, fy);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    for t in [e1, e2] {
        ctx.assert_term(t);
        let lit = ctx.mk_literal(t);
        make_true(&mut ctx, lit);
    }
    assert_eq!(ctx.check(), CheckResult::Sat);
}

#[test]
fn test_user_sort_equalities() {
    let mut tm = TermManager::new();
    let u = tm.mk_uninterpreted_sort("U");
    let p = tm.mk_var("p", u);
    let q = tm.mk_var("q", u);
    let r = tm.mk_var("r", u);
    let pq = tm.mk_eq(p, q);
    let qr_distinct = {
        let qr = tm.mk_eq(q, r);
        tm.mk_not(qr)
    };

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(pq);
    ctx.assert_term(qr_distinct);
    let l1 = ctx.mk_literal(pq);
    make_true(&mut ctx, l1);

    assert_eq!(ctx.check(), CheckResult::Sat);
    assert_eq!(ctx.get_value(p), ctx.get_value(q));
    assert_ne!(ctx.get_value(q), ctx.get_value(r));
}

#[test]
fn test_clauses_only_grow() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.bool_sort);
    let b = tm.mk_var("b", tm.sorts.bool_sort);
    let or = tm.mk_or(vec![a, b]);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(or);
    let before = ctx.clauses().len();
    let lb = ctx.mk_literal(b);
    make_true(&mut ctx, lb);
    let _ = ctx.check();
    assert!(ctx.clauses().len() >= before);
}

#[test]
fn test_same_seed_same_outcome() {
    let run = |seed: u64| -> String {
        let mut tm = TermManager::new();
        let int = tm.sorts.int_sort;
        let x = tm.mk_var("x", int);
        let y = tm.mk_var("y", int);
        let five = tm.mk_int(BigInt::from(5));
        let sum = tm.mk_add(vec![x, y]);
        let eq = tm.mk_eq(sum, five);
        let mut sat = MemorySat::new();
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default().with_seed(seed));
        ctx.assert_term(eq);
        let leq = ctx.mk_literal(eq);
        make_true(&mut ctx, leq);
        assert_eq!(ctx.check(), CheckResult::Sat);
        drop(ctx);
        let model = sat.model().expect("model delivered");
        model.display(&tm)
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn test_statistics_track_work() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let x = tm.mk_var("x", int);
    let three = tm.mk_int(BigInt::from(3));
    let le = tm.mk_le(three, x);

    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(le);
    let l = ctx.mk_literal(le);
    make_true(&mut ctx, l);
    assert_eq!(ctx.check(), CheckResult::Sat);

    let stats = ctx.collect_statistics();
    assert!(stats.propagations > 0);
    assert!(stats.repair_down > 0);
    ctx.reset_statistics();
    assert_eq!(ctx.collect_statistics().propagations, 0);
}

#[test]
fn test_cancel_flag_stops_search() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.bool_sort);
    let mut sat = MemorySat::new();
    let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
    ctx.assert_term(a);
    let la = ctx.mk_literal(a);
    make_true(&mut ctx, la);
    ctx.cancel_flag()
        .store(true, std::sync::atomic::Ordering::Relaxed);
    assert_eq!(ctx.check(), CheckResult::Unknown);
}
