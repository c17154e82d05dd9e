use crate::audio::SoundCue;
use crate::game::player::Player;
use crate::game::session::GameSession;
use crate::screens::{Screen, ScreenAction};
use crate::ui::color;
use crate::ui::frame::Frame;
use crossterm::event::{KeyCode, KeyEvent};

const OPTION_COUNT: usize = 4;
const OPTIONS: [&str; OPTION_COUNT] = ["REMATCH: 1 PLAYER", "REMATCH: 2 PLAYERS", "REMATCH: 3 PLAYERS", "MAIN MENU"];

/// Final standings frozen at the game-over transition; the session itself is
/// dropped once this screen takes over.
pub struct State {
    players: Vec<Player>,
    winners: Vec<u8>,
    pub selected_index: usize,
    cues: Vec<SoundCue>,
}

pub fn init(session: &GameSession) -> State {
    let players = session.players().to_vec();
    // Default the rematch choice to the player count just played.
    let selected_index = players.len().saturating_sub(1);
    State {
        players,
        winners: session.winners(),
        selected_index,
        cues: Vec::new(),
    }
}

pub fn take_cues(state: &mut State) -> Vec<SoundCue> {
    std::mem::take(&mut state.cues)
}

pub fn handle_key_press(state: &mut State, event: &KeyEvent) -> ScreenAction {
    match event.code {
        KeyCode::Enter => {
            state.cues.push(SoundCue::MenuSelect);
            match state.selected_index {
                i @ 0..=2 => ScreenAction::StartGame(i + 1),
                _ => ScreenAction::Navigate(Screen::Menu),
            }
        }
        KeyCode::Esc => ScreenAction::Navigate(Screen::Menu),
        KeyCode::Up | KeyCode::Char('w') => {
            move_selection(state, -1);
            ScreenAction::None
        }
        KeyCode::Down | KeyCode::Char('s') => {
            move_selection(state, 1);
            ScreenAction::None
        }
        _ => ScreenAction::None,
    }
}

fn move_selection(state: &mut State, delta: isize) {
    let n = OPTION_COUNT as isize;
    let cur = state.selected_index as isize;
    state.selected_index = ((cur + delta + n) % n) as usize;
    state.cues.push(SoundCue::MenuMove);
}

/// Winner line shown under the final scores. An all-zero game is announced
/// distinctly from a tie.
fn announcement(players: &[Player], winners: &[u8]) -> String {
    let Some(&first) = winners.first() else {
        return "NO ONE SCORED ANY POINTS THIS TIME".to_string();
    };
    let top_score = players
        .iter()
        .find(|p| p.id == first)
        .map(|p| p.score)
        .unwrap_or(0);
    let names: Vec<String> = winners.iter().map(|id| format!("PLAYER {id}")).collect();
    if names.len() == 1 {
        format!("WINNER: {} WITH {} POINTS", names[0], top_score)
    } else {
        format!(
            "WINNERS: {} WITH {} POINTS EACH",
            names.join(" & "),
            top_score
        )
    }
}

pub fn draw(state: &State, frame: &mut Frame) {
    frame.clear();

    let top = frame.height() / 8;
    frame.put_centered(top, "G A M E   O V E R", color::HEADING, true);

    let scores_top = top + 3;
    for (i, player) in state.players.iter().enumerate() {
        let line = format!("PLAYER {}: {} POINTS", player.id, player.score);
        frame.put_centered(scores_top + i as u16, &line, color::seat(player.color), true);
    }

    let announce_row = scores_top + state.players.len() as u16 + 2;
    frame.put_centered(
        announce_row,
        &announcement(&state.players, &state.winners),
        color::MENU_SELECTED,
        true,
    );

    let list_top = announce_row + 3;
    for (i, option) in OPTIONS.iter().enumerate() {
        let selected = i == state.selected_index;
        let label = if selected {
            format!("> {option} <")
        } else {
            option.to_string()
        };
        let fg = if selected {
            color::MENU_SELECTED
        } else {
            color::MENU_NORMAL
        };
        frame.put_centered(list_top + i as u16, &label, fg, selected);
    }

    frame.put_centered(
        frame.height().saturating_sub(2),
        "UP/DOWN: SELECT   ENTER: CONFIRM   ESC: MENU",
        color::FOOTER,
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ring::{NUM_LIGHTS, Ring};
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::time::Instant;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn finished_session(scores: &[u32]) -> GameSession {
        let mut session = GameSession::with_ring(
            scores.len(),
            Ring::from_values(&[1; NUM_LIGHTS]),
            Instant::now(),
        );
        for (seat, &score) in scores.iter().enumerate() {
            session.player_mut(seat).score = score;
        }
        session
    }

    #[test]
    fn announces_the_sole_winner() {
        let state = init(&finished_session(&[7, 3, 1]));
        assert_eq!(
            announcement(&state.players, &state.winners),
            "WINNER: PLAYER 1 WITH 7 POINTS"
        );
    }

    #[test]
    fn announces_joint_winners() {
        let state = init(&finished_session(&[5, 5, 3]));
        assert_eq!(
            announcement(&state.players, &state.winners),
            "WINNERS: PLAYER 1 & PLAYER 2 WITH 5 POINTS EACH"
        );
    }

    #[test]
    fn announces_a_scoreless_game_distinctly() {
        let state = init(&finished_session(&[0, 0, 0]));
        assert_eq!(
            announcement(&state.players, &state.winners),
            "NO ONE SCORED ANY POINTS THIS TIME"
        );
    }

    #[test]
    fn rematch_defaults_to_the_player_count_just_played() {
        let state = init(&finished_session(&[2, 4]));
        assert_eq!(state.selected_index, 1);
    }

    #[test]
    fn enter_restarts_with_the_selected_count() {
        let mut state = init(&finished_session(&[2, 4]));
        state.selected_index = 2;
        assert_eq!(
            handle_key_press(&mut state, &press(KeyCode::Enter)),
            ScreenAction::StartGame(3)
        );
        state.selected_index = 3;
        assert_eq!(
            handle_key_press(&mut state, &press(KeyCode::Enter)),
            ScreenAction::Navigate(Screen::Menu)
        );
    }
}
