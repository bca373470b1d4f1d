use crate::r#match::Position;

#[derive(Debug, Clone, Copy, Default)]
pub struct RatingInput {
    pub goals: u16,
    pub assists: u16,
    pub shots: u16,
    pub shots_on_target: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
    pub team_goals: u8,
    pub opponent_goals: u8,
}

/// Football Manager-style match rating (1.0 - 10.0, base 6.0)
pub fn match_rating(input: &RatingInput, position: Position) -> f32 {
    let mut rating: f32 = 6.0;

    // Goals: +1.0 each, capped at +3.0
    rating += (input.goals as f32 * 1.0).min(3.0);

    // Assists: +0.5 each, capped at +1.5
    rating += (input.assists as f32 * 0.5).min(1.5);

    if input.shots > 0 {
        let shot_accuracy = input.shots_on_target as f32 / input.shots as f32;
        let shot_bonus = (shot_accuracy - 0.4) * 0.6;
        rating += shot_bonus.clamp(-0.2, 0.3);
    }

    rating -= input.yellow_cards.min(1) as f32 * 0.5;
    rating -= input.red_cards.min(1) as f32 * 1.5;

    if input.team_goals > input.opponent_goals {
        rating += 0.3;
    } else if input.team_goals < input.opponent_goals {
        rating -= 0.2;
    }

    if input.opponent_goals == 0 {
        match position {
            Position::Goalkeeper => rating += 0.8,
            Position::Defender => rating += 0.4,
            Position::Midfielder => rating += 0.1,
            _ => {}
        }
    }

    if input.opponent_goals >= 3 {
        match position {
            Position::Goalkeeper => rating -= 0.5,
            Position::Defender => rating -= 0.3,
            _ => {}
        }
    }

    rating.clamp(1.0, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_draw_is_base() {
        let input = RatingInput {
            team_goals: 1,
            opponent_goals: 1,
            ..RatingInput::default()
        };
        assert_eq!(match_rating(&input, Position::Forward), 6.0);
    }

    #[test]
    fn test_hat_trick_capped() {
        let input = RatingInput {
            goals: 5,
            team_goals: 5,
            opponent_goals: 1,
            ..RatingInput::default()
        };
        assert!((match_rating(&input, Position::Forward) - 9.3).abs() < 1e-4);
    }

    #[test]
    fn test_clean_sheet_keeper() {
        let input = RatingInput {
            team_goals: 0,
            opponent_goals: 0,
            ..RatingInput::default()
        };
        assert!((match_rating(&input, Position::Goalkeeper) - 6.8).abs() < 1e-4);
    }

    #[test]
    fn test_red_card_and_heavy_defeat() {
        let input = RatingInput {
            red_cards: 1,
            team_goals: 0,
            opponent_goals: 4,
            ..RatingInput::default()
        };
        assert!((match_rating(&input, Position::Defender) - 4.0).abs() < 1e-4);
    }
}
