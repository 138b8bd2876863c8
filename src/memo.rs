//! Dependency-tracked memoisation.
//!
//! A [Memo] cell remembers the last value it computed together with the inputs it was computed
//! from. Inputs are compared with [Deps::same]: shared inputs by `Arc` identity, small copyable
//! inputs by value. A hit returns the remembered `Arc`, so downstream cells see the same identity
//! and skip their own recomputation.

use crate::metrics::SELECTOR_RECOMPUTATIONS;
use crate::models::Api;

use std::sync::Arc;
use tracing::{event, Level};

/// Inputs of a memoised computation
pub trait Deps: Clone {
    /// Returns true if `other` is the same input as `self`.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Deps for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<D: Deps> Deps for Option<D> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Deps for Api {
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_deps_tuple {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: Deps),+> Deps for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$index.same(&other.$index))&&+
            }
        }
    };
}

impl_deps_tuple!(A: 0, B: 1);
impl_deps_tuple!(A: 0, B: 1, C: 2);
impl_deps_tuple!(A: 0, B: 1, C: 2, D: 3);

/// A single-entry memo cell
pub struct Memo<D, V> {
    name: &'static str,
    last: Option<(D, Arc<V>)>,
    recomputations: u64,
}

impl<D: Deps, V> Memo<D, V> {
    /// Return a new empty Memo
    ///
    /// # Arguments
    ///
    /// * `name`: Name of the cell, used in logs and metrics
    pub fn new(name: &'static str) -> Self {
        Memo {
            name,
            last: None,
            recomputations: 0,
        }
    }

    /// Returns the remembered value if `deps` are the same inputs as last time, otherwise
    /// computes, remembers and returns a new value.
    pub fn get_or_compute(&mut self, deps: D, compute: impl FnOnce(&D) -> V) -> Arc<V> {
        if let Some((last_deps, value)) = &self.last {
            if last_deps.same(&deps) {
                return value.clone();
            }
        }
        event!(Level::DEBUG, selector = self.name, "recomputing selector");
        SELECTOR_RECOMPUTATIONS
            .with_label_values(&[self.name])
            .inc();
        self.recomputations += 1;
        let value = Arc::new(compute(&deps));
        self.last = Some((deps, value.clone()));
        value
    }

    /// Returns the number of times the cell has computed a value.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_arc_identity() {
        let a = Arc::new(1);
        let b = Arc::new(1);
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn same_option_and_tuple() {
        let a = Arc::new("a");
        assert!(None::<Arc<i32>>.same(&None));
        assert!(!Some(a.clone()).same(&None));
        assert!((a.clone(), Api::Cw).same(&(a.clone(), Api::Cw)));
        assert!(!(a.clone(), Api::Cw).same(&(a, Api::Indo)));
    }

    #[test]
    fn memo_hit_returns_same_value() {
        let mut memo = Memo::new("test");
        let input = Arc::new(vec![1, 2, 3]);
        let first = memo.get_or_compute(input.clone(), |input| input.iter().sum::<i32>());
        let second = memo.get_or_compute(input.clone(), |_| unreachable!());
        assert_eq!(6, *first);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(1, memo.recomputations());
    }

    #[test]
    fn memo_miss_on_new_identity() {
        let mut memo = Memo::new("test");
        let first = memo.get_or_compute(Arc::new(vec![1]), |input| input.len());
        // Equal by value, different identity.
        let second = memo.get_or_compute(Arc::new(vec![1]), |input| input.len());
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(2, memo.recomputations());
    }
}
