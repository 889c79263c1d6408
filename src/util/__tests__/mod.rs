use crate::util::{IntSet, Relation};

fn set(ranges: &[(u32, u32)]) -> IntSet {
    IntSet::new(ranges.iter().copied(), (0, 20))
}

#[test]
fn int_set_algebra() {
    let p = set(&[(0, 1), (4, 4), (8, 14)]);
    let q = set(&[(2, 6), (12, 17), (20, 20)]);
    let u = set(&[(0, 20)]);
    let e = IntSet::empty((0, 20));

    assert_eq!(p, p);
    assert_ne!(p, q);
    assert_eq!(p.intersect(&u), p);
    assert_eq!(p.union(&u), u);
    assert!(u.complement().is_empty());
    assert!(!p.is_empty());
    assert!(!p.complement().is_empty());

    assert_eq!(p.union(&q), set(&[(0, 6), (8, 17), (20, 20)]));
    assert_eq!(p.union(&q), q.union(&p));
    assert_eq!(p.intersect(&q), set(&[(4, 4), (12, 14)]));
    assert_eq!(p.complement().complement(), p);
    assert_eq!(u.complement().complement(), u);

    assert_eq!(e.union(&p), p);
    assert_eq!(e.union(&e), e);
    assert_eq!(e.intersect(&p), e);
    assert_eq!(e.complement(), u);
    assert_eq!(e.complement().complement(), e);
    assert!(e.is_empty());
}

#[test]
fn int_set_canonical_form() {
    // Overlapping, adjacent and duplicated input ranges collapse to one form.
    let a = set(&[(0, 3), (4, 6), (6, 9)]);
    let b = set(&[(0, 9), (2, 5)]);
    assert_eq!(a, b);
    assert_eq!(a.ranges(), &[(0, 9)]);
}

#[test]
fn int_set_difference_and_membership() {
    let p = set(&[(0, 10)]);
    let q = set(&[(3, 5)]);
    let d = p.difference(&q);
    assert_eq!(d, set(&[(0, 2), (6, 10)]));
    assert!(d.contains(0) && d.contains(6) && d.contains(10));
    assert!(!d.contains(3) && !d.contains(5) && !d.contains(11));
    assert_eq!(p.difference(&q), p.intersect(&q.complement()));
}

#[test]
fn relation_closures() {
    let rel: Relation<u32> = Relation::new([(1, 2), (2, 3)]);

    let transitive = rel.transitive_closure();
    assert!(transitive.contains(&(1, 3)));
    assert!(transitive.contains(&(1, 2)));
    assert!(!transitive.contains(&(3, 1)));

    let reflexive = rel.reflexive_closure();
    for x in [1, 2, 3] {
        assert!(reflexive.contains(&(x, x)));
    }

    let symmetric = rel.symmetric_closure();
    assert!(symmetric.contains(&(2, 1)));
    assert!(symmetric.contains(&(3, 2)));
}

#[test]
fn relation_transitive_chain() {
    let rel: Relation<u32> = Relation::new([(1, 2), (2, 3), (3, 4), (4, 5)]);
    let closure = rel.transitive_closure();
    assert!(closure.contains(&(1, 5)));
    assert!(closure.contains(&(2, 5)));
    assert!(!closure.contains(&(5, 1)));

    let map = closure.as_map();
    let mut reachable = map[&1].clone();
    reachable.sort_unstable();
    assert_eq!(reachable, vec![2, 3, 4, 5]);
}
