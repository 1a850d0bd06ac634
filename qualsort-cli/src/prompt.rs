/// Prompt building for pairwise comparisons.

/// Build a comparison prompt for two items.
///
/// The prompt asks the model for a short analysis followed by "Verdict:" on
/// its own line with exactly one token: A (first option), B (second option),
/// or DRAW. A trailing marker keeps parsing trivial and works with any
/// OpenAI-compatible model.
pub fn build_prompt(criteria: &str, option1: &str, option2: &str) -> String {
    format!(
        "{criteria}\n\n\
         Option 1:\n{option1}\n\n\
         Option 2:\n{option2}\n\n\
         Instructions:\n\
         Briefly analyze both options against the stated criterion. \
         Then write \"Verdict:\" on its own line, followed by exactly one of \
         these tokens:\n\n\
         A: Option 1 wins\n\
         B: Option 2 wins\n\
         DRAW: No meaningful difference\n"
    )
}
