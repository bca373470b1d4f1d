use crate::r#match::events::EventKind;
use crate::r#match::{Lineup, PlayerId, PlayerRef};
use crate::rng::MatchRng;

/// Share of an event kind attributed to each position group,
/// in position order: goalkeeper, defender, midfielder, forward.
fn position_shares(kind: EventKind) -> [f64; 4] {
    match kind {
        EventKind::Goal => [0.001, 0.199, 0.35, 0.45],
        EventKind::Shot => [0.001, 0.149, 0.40, 0.45],
        EventKind::Foul => [0.02, 0.43, 0.40, 0.15],
        EventKind::YellowCard => [0.02, 0.45, 0.40, 0.13],
        EventKind::RedCard => [0.03, 0.50, 0.35, 0.12],
        EventKind::Corner => [0.0, 0.10, 0.60, 0.30],
        EventKind::Offside => [0.0, 0.0, 0.20, 0.80],
        EventKind::Substitution => [0.02, 0.28, 0.35, 0.35],
        EventKind::Injury => [0.05, 0.35, 0.35, 0.25],
    }
}

const ASSIST_SHARES: [f64; 4] = [0.01, 0.19, 0.50, 0.30];

/// Maps aggression 1..=20 onto a 0.55..1.5 weight multiplier.
fn aggression_scale(player: &PlayerRef) -> f64 {
    0.5 + (player.attributes.aggression.clamp(1.0, 20.0) as f64) / 20.0
}

/// Second weighted draw of a minute: which on-pitch player the event belongs to.
///
/// A position's share is split evenly between the eligible players holding it, so the
/// split does not depend on formation. Fouls and cards are further scaled by aggression.
/// Offsides only consider attacking players, falling back to a uniform pick when none are
/// on the pitch.
pub fn select_player(kind: EventKind, lineup: &Lineup, rng: &mut dyn MatchRng) -> Option<PlayerId> {
    let on_pitch = lineup.on_pitch();
    if on_pitch.is_empty() {
        return None;
    }

    let candidates: Vec<&PlayerRef> = if kind == EventKind::Offside {
        let attackers: Vec<&PlayerRef> =
            on_pitch.iter().filter(|p| p.position.is_attacking()).collect();
        if attackers.is_empty() {
            return Some(on_pitch[rng.pick_index(on_pitch.len())].id);
        }
        attackers
    } else {
        on_pitch.iter().collect()
    };

    let scale_by_aggression = kind == EventKind::Foul || kind.is_card();

    weighted_pick(&candidates, &position_shares(kind), scale_by_aggression, rng)
}

pub fn select_assist(
    scorer: PlayerId,
    lineup: &Lineup,
    rng: &mut dyn MatchRng,
) -> Option<PlayerId> {
    let candidates: Vec<&PlayerRef> = lineup.on_pitch().iter().filter(|p| p.id != scorer).collect();

    if candidates.is_empty() {
        return None;
    }

    weighted_pick(&candidates, &ASSIST_SHARES, false, rng)
}

fn weighted_pick(
    candidates: &[&PlayerRef],
    shares: &[f64; 4],
    scale_by_aggression: bool,
    rng: &mut dyn MatchRng,
) -> Option<PlayerId> {
    let mut per_position = [0usize; 4];
    for player in candidates {
        per_position[player.position.index()] += 1;
    }

    let weights: Vec<f64> = candidates
        .iter()
        .map(|player| {
            let position = player.position.index();
            let mut weight = shares[position] / per_position[position] as f64;
            if scale_by_aggression {
                weight *= aggression_scale(player);
            }
            weight
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return candidates.get(rng.pick_index(candidates.len())).map(|p| p.id);
    }

    let draw = rng.next_f64() * total;
    let mut cumulative = 0.0;

    for (player, weight) in candidates.iter().zip(&weights) {
        cumulative += weight;
        if draw < cumulative {
            return Some(player.id);
        }
    }

    candidates.last().map(|p| p.id)
}
