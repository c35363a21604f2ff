// Shared prompt fragments.
// Each stage's instruction text lives in pipeline/prompts.rs; this file holds
// the cross-cutting pieces every stage appends.

/// Appended to every stage instruction. Downstream stages embed the previous
/// stage's output verbatim, so the model must not wrap it in extra chatter.
pub const PLAIN_TEXT_OUTPUT: &str = "\
    Respond in plain text only. \
    Do NOT add an introduction, a closing summary, or apologies. \
    Do NOT wrap the output in markdown code fences.";

/// Appended to every stage instruction that names real people.
pub const NO_INVENTION: &str = "\
    Only use candidates and facts that appear in the data you were given or found. \
    If a value is unknown, write 'Unknown' rather than guessing.";
