//! Plain-text rendering of an analysis.

use std::fmt::Write;

use tethercalc_core::Analysis;
use tethercalc_types::formatting::format_thousands;
use tethercalc_types::{ActorId, EncounterInfo, Friends, TetherResult};

fn actor_name(friends: &Friends, id: ActorId) -> String {
    friends
        .get(&id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| format!("Unknown ({id})"))
}

fn header(encounter: &EncounterInfo) -> String {
    let outcome = if encounter.killed { "Kill" } else { "Wipe" };
    format!(
        "{} ({}, {})",
        encounter.name, encounter.duration_text, outcome
    )
}

/// One block per tether. The caster and limit breaks are left out of the
/// damage list; the actual recipient is marked with `*`.
fn render_tether(out: &mut String, index: usize, result: &TetherResult, friends: &Friends) {
    let _ = writeln!(
        out,
        "#{} {}  {} -> {}  correct: {}",
        index + 1,
        result.timing,
        actor_name(friends, result.source),
        actor_name(friends, result.target),
        result.correct,
    );

    let rows = result.damages.iter().filter(|(id, _)| {
        *id != result.source && !friends.get(id).is_some_and(|a| a.is_limit_break())
    });
    for (id, amount) in rows {
        let marker = if *id == result.target { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {marker} {:<24} {:>12}",
            actor_name(friends, *id),
            format_thousands(*amount)
        );
    }
}

pub fn render(analysis: &Analysis) -> String {
    let mut out = header(&analysis.encounter);
    out.push('\n');
    for (i, result) in analysis.results.iter().enumerate() {
        out.push('\n');
        render_tether(&mut out, i, result, &analysis.friends);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tethercalc_types::{Actor, CorrectTarget};

    fn friends() -> Friends {
        [
            (1, "Estinien", "Dragoon"),
            (2, "Hien", "Samurai"),
            (3, "Jannequinard", "Bard"),
            (9, "Limit Break", "LimitBreak"),
        ]
        .into_iter()
        .map(|(id, name, kind)| {
            (
                id,
                Actor {
                    id,
                    name: name.to_string(),
                    kind: kind.to_string(),
                },
            )
        })
        .collect()
    }

    fn analysis() -> Analysis {
        Analysis {
            results: vec![TetherResult {
                source: 1,
                target: 2,
                correct: CorrectTarget::Actor {
                    id: 3,
                    name: "Jannequinard".into(),
                },
                timing: "00:10".into(),
                damages: vec![(9, 99_000), (1, 60_000), (3, 55_000), (2, 47_619)],
            }],
            friends: friends(),
            encounter: EncounterInfo {
                name: "The Omega Protocol".into(),
                duration_text: "12:04.500".into(),
                killed: false,
            },
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let text = render(&analysis());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "The Omega Protocol (12:04.500, Wipe)");
        assert_eq!(
            lines[2],
            "#1 00:10  Estinien -> Hien  correct: Jannequinard"
        );
        assert!(lines[3].contains("Jannequinard") && lines[3].ends_with("55,000"));
        assert!(lines[4].trim_start().starts_with("* Hien"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn caster_and_limit_break_are_hidden() {
        let text = render(&analysis());
        assert!(!text.contains("Limit Break"));
        assert!(!text.contains("60,000"));
    }
}
