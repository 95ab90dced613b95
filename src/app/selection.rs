use crate::api::models::Peptide;

/// Ordered set of chosen compounds, unique by slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<Peptide>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `peptide` unless its slug is already present. Returns whether
    /// it was added.
    pub fn add(&mut self, peptide: Peptide) -> bool {
        if self.contains(&peptide.slug) {
            return false;
        }
        self.items.push(peptide);
        true
    }

    pub fn remove(&mut self, slug: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.slug != slug);
        self.items.len() != before
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.items.iter().any(|p| p.slug == slug)
    }

    pub fn as_slice(&self) -> &[Peptide] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peptide> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
