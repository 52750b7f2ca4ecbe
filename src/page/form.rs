// src/page/form.rs

/// Ordered name/value pairs, with the get/set/delete semantics of a browser
/// `FormData`: `set` replaces the first entry and drops later duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.pairs.push((s!(name), s!(value)));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.pairs.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.pairs[first].1 = s!(value);
                let mut ix = 0;
                self.pairs.retain(|(n, _)| {
                    let keep = ix <= first || n != name;
                    ix += 1;
                    keep
                });
            }
            None => self.append(name, value),
        }
    }

    pub fn delete(&mut self, name: &str) {
        self.pairs.retain(|(n, _)| n != name);
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_first_and_drops_rest() {
        let mut f = FormData::new();
        f.append("a", "1");
        f.append("b", "2");
        f.append("a", "3");
        f.set("a", "x");
        assert_eq!(f.pairs(), &[(s!("a"), s!("x")), (s!("b"), s!("2"))]);
        f.set("c", "y");
        assert_eq!(f.get("c"), Some("y"));
        f.delete("a");
        assert!(!f.has("a"));
        assert_eq!(f.len(), 2);
    }
}
