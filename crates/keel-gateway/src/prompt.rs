//! Prompt construction for the two gateway calls.

use keel_core::{Principle, Reflection};
use std::fmt::Write;

/// Instruction pinning the output language.
fn locale_instruction(locale: &str) -> String {
    format!(
        "Write every question and all advice in the language identified by the tag \"{locale}\"."
    )
}

/// System prompt for the relevance analysis call.
pub fn analysis_system(locale: &str) -> String {
    format!(
        "You help people examine a dilemma through their own stated principles. \
         Given the principles and the situation, select the 3 or 4 principles most \
         relevant to the situation, strictly by their id, and write one probing \
         reflection question per selected principle. A good question makes the \
         person confront how the principle applies to their specific situation; \
         it never suggests an answer. Only use ids that appear in the list. {}",
        locale_instruction(locale)
    )
}

/// User prompt for the relevance analysis call.
pub fn analysis_user(situation: &str, principles: &[Principle]) -> String {
    let mut prompt = String::from("My principles:\n");
    for (index, principle) in principles.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. [id: {}] {}: {}",
            index + 1,
            principle.id,
            principle.title,
            principle.description
        );
    }
    let _ = write!(prompt, "\nMy situation:\n{situation}");
    prompt
}

/// System prompt for the advice synthesis call.
pub fn synthesis_system(locale: &str) -> String {
    format!(
        "You help people settle a dilemma they have already reflected on. \
         Given the situation and the person's own answers to questions grounded \
         in their principles, write advice in three parts: first summarize the \
         conflict in one or two sentences, then explain how their principles \
         apply given what they answered, and finally give one direct \
         recommendation. Write plain prose, no headings or lists. {}",
        locale_instruction(locale)
    )
}

/// User prompt for the advice synthesis call.
pub fn synthesis_user(situation: &str, reflections: &[Reflection]) -> String {
    let mut prompt = format!("My situation:\n{situation}\n\nMy reflections:\n");
    for reflection in reflections {
        let answer = reflection.answer.as_deref().unwrap_or_default();
        let _ = writeln!(
            prompt,
            "- Principle: {} ({})\n  Question: {}\n  My answer: {}",
            reflection.principle_title,
            reflection.principle_description,
            reflection.question,
            answer
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::{analysis_system, analysis_user, synthesis_system, synthesis_user};
    use keel_core::{Principle, Reflection};

    #[test]
    fn analysis_user_lists_every_principle_with_id() {
        let principles = vec![
            Principle::new("Courage", "act despite fear"),
            Principle::new("Health", "sleep first"),
        ];
        let prompt = analysis_user("take the job offer?", &principles);
        for principle in &principles {
            assert!(prompt.contains(&principle.id));
            assert!(prompt.contains(&principle.title));
        }
        assert!(prompt.contains("take the job offer?"));
    }

    #[test]
    fn system_prompts_pin_the_locale() {
        assert!(analysis_system("ko").contains("\"ko\""));
        assert!(synthesis_system("en").contains("\"en\""));
    }

    #[test]
    fn synthesis_user_includes_each_answer() {
        let principle = Principle::new("Courage", "act despite fear");
        let mut reflection = Reflection::from_principle(&principle, "What scares you?");
        reflection.answer = Some("telling my manager".to_string());
        let prompt = synthesis_user("take the job offer?", &[reflection]);
        assert!(prompt.contains("What scares you?"));
        assert!(prompt.contains("telling my manager"));
        assert!(prompt.contains("Courage"));
    }
}
