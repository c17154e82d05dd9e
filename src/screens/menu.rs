use crate::audio::SoundCue;
use crate::screens::ScreenAction;
use crate::ui::color;
use crate::ui::frame::Frame;
use crossterm::event::{KeyCode, KeyEvent};

const OPTION_COUNT: usize = 4;
const MENU_OPTIONS: [&str; OPTION_COUNT] = ["1 PLAYER", "2 PLAYERS", "3 PLAYERS", "EXIT"];

const TITLE: &str = "R I N G   R U S H";
const TAGLINE: &str = "CATCH THE LIGHT INSIDE ITS WINDOW";

pub struct State {
    pub selected_index: usize,
    cues: Vec<SoundCue>,
}

pub fn init() -> State {
    State {
        selected_index: 0,
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
                _ => ScreenAction::Exit,
            }
        }
        KeyCode::Esc => ScreenAction::Exit,
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

pub fn draw(state: &State, frame: &mut Frame) {
    frame.clear();

    let top = frame.height() / 6;
    frame.put_centered(top, TITLE, color::HEADING, true);
    frame.put_centered(top + 2, TAGLINE, color::MENU_NORMAL, false);

    let list_top = top + 5;
    for (i, option) in MENU_OPTIONS.iter().enumerate() {
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
        frame.put_centered(list_top + i as u16 * 2, &label, fg, selected);
    }

    frame.put_centered(
        frame.height().saturating_sub(2),
        "UP/DOWN: SELECT   ENTER: CONFIRM   ESC: QUIT",
        color::FOOTER,
        false,
    );
}
