use physics_core::{Symbol, Value};

/// Symbol to value map that keeps insertion order.
///
/// The order matters: propagation walks the symbols in the order their
/// values were given. Re-inserting an existing symbol replaces the value in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarMap {
    entries: Vec<(Symbol, Value)>,
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sym: impl Into<Symbol>, value: impl Into<Value>) -> Option<Value> {
        let sym = sym.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(s, _)| *s == sym) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((sym, value));
                None
            }
        }
    }

    pub fn get(&self, sym: &Symbol) -> Option<&Value> {
        self.entries.iter().find(|(s, _)| s == sym).map(|(_, v)| v)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(s, _)| s.name() == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, sym: &Symbol) -> bool {
        self.get(sym).is_some()
    }

    pub fn remove(&mut self, sym: &Symbol) -> Option<Value> {
        let idx = self.entries.iter().position(|(s, _)| s == sym)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.entries.iter().map(|(s, v)| (s, v))
    }
}

impl<S: Into<Symbol>, V: Into<Value>> FromIterator<(S, V)> for VarMap {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut map = VarMap::new();
        for (s, v) in iter {
            map.insert(s, v);
        }
        map
    }
}

impl<S: Into<Symbol>, V: Into<Value>, const N: usize> From<[(S, V); N]> for VarMap {
    fn from(items: [(S, V); N]) -> Self {
        items.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let map = VarMap::from([("r", 1.0), ("m", 2.0), ("g", 9.8)]);
        let names: Vec<&str> = map.keys().map(|s| s.name()).collect();
        assert_eq!(names, vec!["r", "m", "g"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut map = VarMap::from([("a", 1.0), ("b", 2.0)]);
        let old = map.insert("a", vec![3.0, 4.0]);
        assert_eq!(old, Some(Value::from(1.0)));
        let names: Vec<&str> = map.keys().map(|s| s.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(map.get_by_name("a"), Some(&Value::from(vec![3.0, 4.0])));
    }

    #[test]
    fn remove_entry() {
        let mut map = VarMap::from([("a", 1.0), ("b", 2.0)]);
        assert_eq!(map.remove(&Symbol::new("a")), Some(Value::from(1.0)));
        assert_eq!(map.len(), 1);
        assert!(map.remove(&Symbol::new("a")).is_none());
    }
}
