//! Default principle set offered on first run.

use crate::model::Principle;

/// Build the fixed five-principle starter set.
///
/// Identifiers are freshly generated; the set only becomes durable once the
/// user finishes onboarding and it is persisted.
pub fn seed_principles() -> Vec<Principle> {
    vec![
        Principle::new(
            "Integrity",
            "Choose the option you could explain honestly to the people it affects.",
        ),
        Principle::new(
            "Long-term growth",
            "Prefer the path that leaves you more capable a year from now, even if it is harder today.",
        ),
        Principle::new(
            "Relationships first",
            "Do not trade the people who matter for outcomes that do not.",
        ),
        Principle::new(
            "Health is the foundation",
            "No goal is worth a decision that quietly spends your physical or mental health.",
        ),
        Principle::new(
            "Courage over comfort",
            "When two options are close, take the one you are avoiding out of fear.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::seed_principles;
    use std::collections::HashSet;

    #[test]
    fn seed_set_has_five_unique_principles() {
        let seeds = seed_principles();
        assert_eq!(seeds.len(), 5);
        let ids: HashSet<_> = seeds.iter().map(|principle| principle.id.clone()).collect();
        assert_eq!(ids.len(), 5);
        assert!(seeds.iter().all(|principle| !principle.title.is_empty()));
    }
}
