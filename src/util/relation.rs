use super::Relation;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

impl<T: Eq + Hash + Clone> Relation<T> {
    pub fn new(pairs: impl IntoIterator<Item = (T, T)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Obtain the relation represented as a set of pairs.
    pub fn pairs(&self) -> &HashSet<(T, T)> {
        &self.pairs
    }

    pub fn contains(&self, pair: &(T, T)) -> bool {
        self.pairs.contains(pair)
    }

    /// All elements appearing on the left side of a pair.
    pub fn left(&self) -> HashSet<T> {
        self.pairs.iter().map(|(x, _)| x.clone()).collect()
    }

    /// All elements appearing on the right side of a pair.
    pub fn right(&self) -> HashSet<T> {
        self.pairs.iter().map(|(_, y)| y.clone()).collect()
    }

    /// The union of the left and right supports.
    pub fn support(&self) -> HashSet<T> {
        self.pairs
            .iter()
            .flat_map(|(x, y)| [x.clone(), y.clone()])
            .collect()
    }

    /// The relation extended with `(x, x)` for every element of the support.
    pub fn reflexive_closure(&self) -> Relation<T> {
        let mut pairs = self.pairs.clone();
        pairs.extend(self.support().into_iter().map(|x| (x.clone(), x)));
        Relation { pairs }
    }

    /// The relation extended with `(y, x)` for every contained `(x, y)`.
    pub fn symmetric_closure(&self) -> Relation<T> {
        let mut pairs = self.pairs.clone();
        pairs.extend(self.pairs.iter().map(|(x, y)| (y.clone(), x.clone())));
        Relation { pairs }
    }

    /// Warshall's algorithm over the support of the relation.
    pub fn transitive_closure(&self) -> Relation<T> {
        let support: Vec<T> = self.support().into_iter().collect();
        let mut pairs = self.pairs.clone();
        for k in &support {
            for i in &support {
                if !pairs.contains(&(i.clone(), k.clone())) {
                    continue;
                }
                for j in &support {
                    if pairs.contains(&(k.clone(), j.clone())) {
                        pairs.insert((i.clone(), j.clone()));
                    }
                }
            }
        }
        Relation { pairs }
    }

    /// Convert the relation to a map from left elements to all their related
    /// right elements.
    pub fn as_map(&self) -> HashMap<T, Vec<T>> {
        let mut result: HashMap<T, Vec<T>> = HashMap::new();
        for (x, y) in &self.pairs {
            result.entry(x.clone()).or_default().push(y.clone());
        }
        result
    }
}
