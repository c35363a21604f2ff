//! Operator-facing text blocks printed around the pipeline run.

use crate::models::requirements::Requirements;

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Capitalizes the first character: `age_range` → `Age_range`.
fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Framed table of the collected requirements, one `Key : value` row each.
pub fn requirements_table(requirements: &Requirements) -> String {
    let mut out = format!("\n{}\n PLAYER / COACH REQUIREMENTS\n{}\n", rule(), rule());
    for (key, value) in requirements.iter() {
        out.push_str(&format!("{:<15}: {}\n", capitalize(key), value));
    }
    out.push_str(&rule());
    out.push('\n');
    out
}

pub fn final_recommendations(text: &str) -> String {
    format!("\n{}\n FINAL RECOMMENDATIONS\n{}\n{}", rule(), rule(), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirements::Role;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("age_range"), "Age_range");
        assert_eq!(capitalize("type"), "Type");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_requirements_table_lists_every_field_in_order() {
        let reqs = Requirements::from_answers(
            Role::Coach,
            vec![
                "Defensive".to_string(),
                "5+ years".to_string(),
                "40-50".to_string(),
                "Youth Dev".to_string(),
            ],
        )
        .unwrap();

        let table = requirements_table(&reqs);
        let rows: Vec<&str> = table.lines().filter(|l| l.contains(": ")).collect();

        assert_eq!(
            rows,
            vec![
                "Type           : coach",
                "Style          : Defensive",
                "Experience     : 5+ years",
                "Age_range      : 40-50",
                "Focus          : Youth Dev",
            ]
        );
        assert!(table.contains("PLAYER / COACH REQUIREMENTS"));
    }

    #[test]
    fn test_final_block_frames_text() {
        let block = final_recommendations("1 | Someone | 90");
        assert!(block.contains(&"=".repeat(40)));
        assert!(block.contains("FINAL RECOMMENDATIONS"));
        assert!(block.ends_with("1 | Someone | 90"));
    }
}
