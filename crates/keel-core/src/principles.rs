//! Bounded principle collection with unique ids.

use crate::error::WorkflowError;
use crate::model::Principle;
use crate::seed::seed_principles;
use serde::{Deserialize, Serialize};

/// Maximum number of principles a user can keep.
pub const MAX_PRINCIPLES: usize = 10;

/// Ordered principle set, bounded at [`MAX_PRINCIPLES`] with unique ids.
///
/// Order is insertion order and is display-significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PrincipleBook {
    principles: Vec<Principle>,
}

impl PrincipleBook {
    /// Build a book from an existing list, validating size and id uniqueness.
    pub fn new(principles: Vec<Principle>) -> Result<Self, WorkflowError> {
        let mut book = Self::default();
        book.replace_all(principles)?;
        Ok(book)
    }

    /// Build a book holding the default seed set.
    pub fn seeded() -> Self {
        Self {
            principles: seed_principles(),
        }
    }

    /// All principles in display order.
    pub fn as_slice(&self) -> &[Principle] {
        &self.principles
    }

    /// Number of principles in the book.
    pub fn len(&self) -> usize {
        self.principles.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.principles.is_empty()
    }

    /// Whether the book has reached its maximum size.
    pub fn is_full(&self) -> bool {
        self.principles.len() >= MAX_PRINCIPLES
    }

    /// Look up a principle by id.
    pub fn get(&self, id: &str) -> Option<&Principle> {
        self.principles.iter().find(|principle| principle.id == id)
    }

    /// Append a principle, rejecting overflow, duplicate ids, and empty titles.
    pub fn add(&mut self, principle: Principle) -> Result<(), WorkflowError> {
        if self.is_full() {
            return Err(WorkflowError::PrincipleLimit(MAX_PRINCIPLES));
        }
        if principle.title.trim().is_empty() {
            return Err(WorkflowError::EmptyTitle);
        }
        if self.get(&principle.id).is_some() {
            return Err(WorkflowError::DuplicatePrinciple(principle.id));
        }
        self.principles.push(principle);
        Ok(())
    }

    /// Edit a principle in place, keeping its id and position.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WorkflowError::EmptyTitle);
        }
        let principle = self
            .principles
            .iter_mut()
            .find(|principle| principle.id == id)
            .ok_or_else(|| WorkflowError::UnknownPrinciple(id.to_string()))?;
        principle.title = title;
        principle.description = description.into();
        Ok(())
    }

    /// Remove a principle by id, returning it.
    pub fn remove(&mut self, id: &str) -> Result<Principle, WorkflowError> {
        let index = self
            .principles
            .iter()
            .position(|principle| principle.id == id)
            .ok_or_else(|| WorkflowError::UnknownPrinciple(id.to_string()))?;
        Ok(self.principles.remove(index))
    }

    /// Replace the whole set, validating size and id uniqueness.
    pub fn replace_all(&mut self, principles: Vec<Principle>) -> Result<(), WorkflowError> {
        if principles.len() > MAX_PRINCIPLES {
            return Err(WorkflowError::PrincipleLimit(MAX_PRINCIPLES));
        }
        for (index, principle) in principles.iter().enumerate() {
            if principle.title.trim().is_empty() {
                return Err(WorkflowError::EmptyTitle);
            }
            if principles[..index]
                .iter()
                .any(|earlier| earlier.id == principle.id)
            {
                return Err(WorkflowError::DuplicatePrinciple(principle.id.clone()));
            }
        }
        self.principles = principles;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PRINCIPLES, PrincipleBook};
    use crate::error::WorkflowError;
    use crate::model::Principle;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_rejects_overflow() {
        let mut book = PrincipleBook::default();
        for index in 0..MAX_PRINCIPLES {
            book.add(Principle::new(format!("p{index}"), "")).expect("add");
        }
        assert!(book.is_full());
        let result = book.add(Principle::new("one too many", ""));
        assert_eq!(result, Err(WorkflowError::PrincipleLimit(MAX_PRINCIPLES)));
        assert_eq!(book.len(), MAX_PRINCIPLES);
    }

    #[test]
    fn add_rejects_duplicate_id_and_empty_title() {
        let mut book = PrincipleBook::default();
        let principle = Principle::new("Courage", "Act despite fear");
        let duplicate = principle.clone();
        book.add(principle).expect("add");
        assert_eq!(
            book.add(duplicate.clone()),
            Err(WorkflowError::DuplicatePrinciple(duplicate.id))
        );
        assert_eq!(
            book.add(Principle::new("  ", "blank title")),
            Err(WorkflowError::EmptyTitle)
        );
    }

    #[test]
    fn update_and_remove_by_id() {
        let mut book = PrincipleBook::seeded();
        let id = book.as_slice()[0].id.clone();
        book.update(&id, "Renamed", "new text").expect("update");
        assert_eq!(book.get(&id).expect("get").title, "Renamed");

        let removed = book.remove(&id).expect("remove");
        assert_eq!(removed.title, "Renamed");
        assert_eq!(book.len(), 4);
        assert_eq!(
            book.remove(&id),
            Err(WorkflowError::UnknownPrinciple(id))
        );
    }

    #[test]
    fn replace_all_validates_the_whole_set() {
        let mut book = PrincipleBook::default();
        let principle = Principle::new("Courage", "");
        let duplicate = principle.clone();
        assert_eq!(
            book.replace_all(vec![principle.clone(), duplicate]),
            Err(WorkflowError::DuplicatePrinciple(principle.id))
        );
        assert!(book.is_empty());
    }
}
