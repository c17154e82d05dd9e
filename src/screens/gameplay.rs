use crate::audio::SoundCue;
use crate::config;
use crate::game::events::{AttemptVerdict, GameEvent};
use crate::game::player::SeatColor;
use crate::game::ring::NUM_LIGHTS;
use crate::game::scheduler::LightCycle;
use crate::game::session::GameSession;
use crate::screens::{Screen, ScreenAction};
use crate::ui::color;
use crate::ui::frame::Frame;
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::style::Color;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::{Duration, Instant};

/// How long an attempt's flash stays on the light it targeted.
const FLASH_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
struct Flash {
    color: SeatColor,
    until: Instant,
}

pub struct State {
    session: GameSession,
    cycle: LightCycle,
    flashes: [Option<Flash>; NUM_LIGHTS],
    events: Vec<GameEvent>,
    cues: Vec<SoundCue>,
    dirty: bool,
}

pub fn init(player_count: usize, now: Instant) -> State {
    State {
        session: GameSession::start(player_count, now, &mut rand::rng()),
        cycle: LightCycle::start(now),
        flashes: [None; NUM_LIGHTS],
        events: Vec::new(),
        cues: Vec::new(),
        dirty: true,
    }
}

pub fn session(state: &State) -> &GameSession {
    &state.session
}

pub fn next_deadline(state: &State) -> Instant {
    state.cycle.next_due()
}

pub fn take_cues(state: &mut State) -> Vec<SoundCue> {
    std::mem::take(&mut state.cues)
}

pub fn take_dirty(state: &mut State) -> bool {
    std::mem::take(&mut state.dirty)
}

/// Drives the light cycle and turns engine events into cues and flashes.
/// Returns a navigation action once the game is over.
pub fn update(state: &mut State, now: Instant) -> ScreenAction {
    state.cycle.poll(&mut state.session, now, &mut state.events);

    let mut action = ScreenAction::None;
    for event in state.events.drain(..) {
        state.dirty = true;
        match event {
            GameEvent::LightAdvanced { .. } => state.cues.push(SoundCue::TickStep),
            GameEvent::AttemptJudged {
                seat,
                light_index,
                verdict,
            } => {
                if let Some(player) = state.session.players().get(seat) {
                    state.flashes[light_index] = Some(Flash {
                        color: player.color,
                        until: now + FLASH_DURATION,
                    });
                }
                state.cues.push(match verdict {
                    AttemptVerdict::Hit { points } => SoundCue::Hit(points),
                    AttemptVerdict::Mistimed | AttemptVerdict::DeadLight => SoundCue::Miss,
                });
            }
            GameEvent::GameOver { .. } => action = ScreenAction::Navigate(Screen::Evaluation),
        }
    }

    for flash in state.flashes.iter_mut() {
        if flash.is_some_and(|f| now >= f.until) {
            *flash = None;
            state.dirty = true;
        }
    }

    action
}

pub fn handle_key_press(state: &mut State, event: &KeyEvent, now: Instant) -> ScreenAction {
    match event.code {
        KeyCode::Esc => return ScreenAction::Navigate(Screen::Menu),
        KeyCode::Char(c) => {
            let pressed = c.to_ascii_uppercase();
            let seat_keys = config::get().seat_keys;
            if let Some(seat) = seat_keys.iter().position(|&k| k == pressed) {
                // Fire any tick due before the press so the attempt is
                // judged against the light actually lit at press time.
                state.cycle.poll(&mut state.session, now, &mut state.events);
                state.session.attempt(seat, now, &mut state.events);
            }
        }
        _ => {}
    }
    ScreenAction::None
}

fn light_glyph(point_value: u32) -> char {
    match point_value {
        10 => '★',
        5 => '5',
        2 => '2',
        1 => '1',
        _ => '·',
    }
}

pub fn draw(state: &State, frame: &mut Frame) {
    frame.clear();

    let players = state.session.players();
    let hud_rows = players.len() as u16 + 2;
    let ring_rows = frame.height().saturating_sub(hud_rows);

    let cx = frame.width() as f32 / 2.0;
    let cy = ring_rows as f32 / 2.0;
    // Terminal cells are roughly twice as tall as they are wide.
    let ry = (cy - 1.5).max(2.0);
    let rx = (ry * 2.0).min(cx - 4.0).max(4.0);

    for (i, light) in state.session.ring().lights().iter().enumerate() {
        let angle = TAU * i as f32 / NUM_LIGHTS as f32 - FRAC_PI_2;
        let x = (cx + rx * angle.cos()).round().max(0.0) as u16;
        let y = (cy + ry * angle.sin()).round().max(0.0) as u16;

        let active = i == state.session.current_light_index();
        let mut fg = color::point_value(light.point_value);
        let mut bold = light.is_main_target;

        if let Some(flash) = state.flashes[i] {
            let flash_fg = color::seat(flash.color);
            frame.put(x.saturating_sub(1), y, '(', flash_fg, true);
            frame.put(x + 1, y, ')', flash_fg, true);
            fg = flash_fg;
            bold = true;
        }
        if active {
            frame.put(x.saturating_sub(1), y, '[', Color::White, true);
            frame.put(x + 1, y, ']', Color::White, true);
            fg = Color::White;
            bold = true;
        }
        frame.put(x, y, light_glyph(light.point_value), fg, bold);
    }

    let seat_keys = config::get().seat_keys;
    let hud_top = frame.height().saturating_sub(hud_rows) + 1;
    for (seat, player) in players.iter().enumerate() {
        let line = format!(
            "PLAYER {} [{}]   SCORE {:>3}   ATTEMPTS {:>2}",
            player.id,
            seat_keys.get(seat).copied().unwrap_or('?'),
            player.score,
            player.attempts
        );
        frame.put_centered(hud_top + seat as u16, &line, color::seat(player.color), true);
    }

    frame.put_centered(
        frame.height().saturating_sub(1),
        "★ = 10 PTS   ESC: ABANDON GAME",
        color::FOOTER,
        false,
    );
}
