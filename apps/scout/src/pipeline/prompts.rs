//! Stage prompts: one fixed instruction per (stage, role) plus the input text
//! rendered from the requirements and the previous stage's output.
//!
//! Rendering is literal `{placeholder}` substitution in a single pass, so text
//! coming back from the model is never re-scanned for placeholders.

use crate::llm_client::prompts::{NO_INVENTION, PLAIN_TEXT_OUTPUT};
use crate::models::requirements::{Requirements, Role};
use crate::pipeline::Stage;

// ────────────────────────────────────────────────────────────────────────────
// Instructions (system prompts)
// ────────────────────────────────────────────────────────────────────────────

pub const PLAYER_RETRIEVAL_SYSTEM: &str = "\
You are a Data Retrieval Agent for football scouting. Use Google Search to find REAL, \
currently active football players matching the user's criteria.
Output the data in this exact format for each candidate:
- Name: [Name]
- Team: [Current Team]
- Age: [Age]
- Key Stats: [Key stats from the last season]
- Market Value: [Value]

{output_rules}";

pub const COACH_RETRIEVAL_SYSTEM: &str = "\
You are a Data Retrieval Agent for football scouting. Use Google Search to find REAL \
football coaches matching the user's criteria.
Output the data in this exact format for each candidate:
- Name: [Name]
- Status: [Current Club or Status]
- Age: [Age]
- Recent Achievements: [Achievements]
- Tactical Preferences: [Formations and philosophy]

{output_rules}";

pub const PLAYER_SCORING_SYSTEM: &str = "\
You are a Football Scout (Scoring Agent). Analyze the player candidates provided \
against the user requirements.
Assign a score (0-100) to each candidate based on:
1. Performance consistency
2. Skill and tactical fit for the requirements
3. Experience

Output for each candidate:
[Name] - Score: [Score]
Justification: [One sentence]

{output_rules}";

pub const COACH_SCORING_SYSTEM: &str = "\
You are a Football Scout (Scoring Agent). Analyze the coach candidates provided \
against the user requirements.
Assign a score (0-100) to each candidate based on:
1. Fit for the requested style and development focus
2. Recent results and achievements
3. Long-term potential

Output for each candidate:
[Name] - Score: [Score]
Justification: [One sentence]

{output_rules}";

pub const PLAYER_RANKING_SYSTEM: &str = "\
You are a Head Scout (Recommendation Agent). Select the TOP 5 players from the scored list.
Present them in a clear, text-based table.
Columns: Rank | Name | Score | Key Strength | Current Team

{output_rules}";

pub const COACH_RANKING_SYSTEM: &str = "\
You are a Head Scout (Recommendation Agent). Select the TOP 5 coaches from the scored list.
Present them in a clear, text-based table.
Columns: Rank | Name | Score | Key Strength | Current Status

{output_rules}";

// ────────────────────────────────────────────────────────────────────────────
// Input templates
// ────────────────────────────────────────────────────────────────────────────

/// Replace: {position}, {age_range}, {experience}, {style}
pub const PLAYER_RETRIEVAL_PROMPT_TEMPLATE: &str = "\
Find 5-7 currently active football players who match these criteria:
- Position: {position}
- Age: {age_range}
- Experience: {experience}
- Style: {style}

List each candidate with their current team, key stats from the last season, and market value.";

/// Replace: {style}, {experience}, {age_range}, {focus}
pub const COACH_RETRIEVAL_PROMPT_TEMPLATE: &str = "\
Find 5-7 football coaches who match these criteria:
- Style: {style}
- Experience: {experience}
- Age: {age_range}
- Focus: {focus}

List each candidate with their current status, recent achievements, and tactical preferences.";

/// Replace: {requirements_json}, {candidates}
pub const SCORING_PROMPT_TEMPLATE: &str = "\
User Requirements:
{requirements_json}

Candidate Data:
{candidates}";

/// Replace: {scored}
pub const RANKING_PROMPT_TEMPLATE: &str = "\
Rank these scored candidates:
{scored}";

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Everything one stage sends to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub instruction: String,
    pub input: String,
}

/// Fixed instruction template for a (stage, role) pair.
pub fn instruction_template(stage: Stage, role: Role) -> &'static str {
    match (stage, role) {
        (Stage::Retrieve, Role::Player) => PLAYER_RETRIEVAL_SYSTEM,
        (Stage::Retrieve, Role::Coach) => COACH_RETRIEVAL_SYSTEM,
        (Stage::Score, Role::Player) => PLAYER_SCORING_SYSTEM,
        (Stage::Score, Role::Coach) => COACH_SCORING_SYSTEM,
        (Stage::Rank, Role::Player) => PLAYER_RANKING_SYSTEM,
        (Stage::Rank, Role::Coach) => COACH_RANKING_SYSTEM,
    }
}

pub struct PromptBuilder<'a> {
    requirements: &'a Requirements,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(requirements: &'a Requirements) -> Self {
        Self { requirements }
    }

    fn instruction(&self, stage: Stage) -> String {
        let output_rules = format!("{PLAIN_TEXT_OUTPUT}\n{NO_INVENTION}");
        render(
            instruction_template(stage, self.requirements.role()),
            &[("output_rules", output_rules.as_str())],
        )
    }

    pub fn retrieve(&self) -> StagePrompt {
        let template = match self.requirements.role() {
            Role::Player => PLAYER_RETRIEVAL_PROMPT_TEMPLATE,
            Role::Coach => COACH_RETRIEVAL_PROMPT_TEMPLATE,
        };
        let vars: Vec<(&str, &str)> = self.requirements.iter().collect();

        StagePrompt {
            instruction: self.instruction(Stage::Retrieve),
            input: render(template, &vars),
        }
    }

    /// Embeds the requirements (as JSON) and the full retrieval output.
    pub fn score(&self, candidates: &str) -> Result<StagePrompt, serde_json::Error> {
        let requirements_json = serde_json::to_string_pretty(self.requirements)?;

        Ok(StagePrompt {
            instruction: self.instruction(Stage::Score),
            input: render(
                SCORING_PROMPT_TEMPLATE,
                &[
                    ("requirements_json", requirements_json.as_str()),
                    ("candidates", candidates),
                ],
            ),
        })
    }

    /// Embeds the full scoring output.
    pub fn rank(&self, scored: &str) -> StagePrompt {
        StagePrompt {
            instruction: self.instruction(Stage::Rank),
            input: render(RANKING_PROMPT_TEMPLATE, &[("scored", scored)]),
        }
    }
}

/// Substitutes `{name}` occurrences found in `vars`. Unknown placeholders and
/// stray braces are copied through unchanged. Substituted values are not
/// scanned again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let replacement = after_open.find('}').and_then(|close| {
            let name = &after_open[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
