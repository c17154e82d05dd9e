use crate::audio::AudioManager;
use crate::config;
use crate::screens::{Screen, ScreenAction, evaluation, gameplay, menu};
use crate::ui::frame::Frame;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use std::error::Error;
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

// Poll timeout while idling on a menu.
const IDLE_POLL: Duration = Duration::from_millis(50);

// Gameplay polls much tighter than the tick cadence so attempts are stamped
// close to the physical key press; the narrowest scoring window is 15ms.
const GAMEPLAY_POLL: Duration = Duration::from_millis(4);

/// Puts the terminal into raw/alternate-screen mode and restores it on drop,
/// including on error unwind.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show) {
            error!("Failed to restore terminal screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            error!("Failed to disable raw mode: {e}");
        }
    }
}

pub struct App {
    current_screen: Screen,
    menu_state: menu::State,
    gameplay_state: Option<gameplay::State>,
    evaluation_state: Option<evaluation::State>,
    audio: Option<AudioManager>,
    needs_redraw: bool,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let mut app = App::new();
    let _guard = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    let mut frame = Frame::new(cols, rows);
    let mut out = stdout();
    app.main_loop(&mut frame, &mut out)
}

impl App {
    fn new() -> Self {
        let audio = if config::get().audio_enabled {
            match AudioManager::new() {
                Ok(audio) => Some(audio),
                Err(e) => {
                    // The game runs fine silent.
                    error!("Failed to initialize audio engine: {e}");
                    None
                }
            }
        } else {
            info!("Audio disabled by config");
            None
        };

        App {
            current_screen: Screen::Menu,
            menu_state: menu::init(),
            gameplay_state: None,
            evaluation_state: None,
            audio,
            needs_redraw: true,
        }
    }

    fn main_loop(&mut self, frame: &mut Frame, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
        loop {
            let now = Instant::now();

            // The gameplay screen owns the light cycle and must be driven
            // even when no input arrives.
            if self.current_screen == Screen::Gameplay
                && let Some(state) = self.gameplay_state.as_mut()
            {
                let action = gameplay::update(state, now);
                if gameplay::take_dirty(state) {
                    self.needs_redraw = true;
                }
                // Cues must drain before the action: navigating away drops
                // the screen state they are buffered in.
                self.drain_cues();
                if self.handle_action(action, now) {
                    return Ok(());
                }
            }

            self.drain_cues();

            if self.needs_redraw {
                self.draw(frame);
                frame.render(out)?;
                self.needs_redraw = false;
            }

            if event::poll(self.poll_timeout(now))? {
                loop {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if key.modifiers.contains(KeyModifiers::CONTROL)
                                && matches!(key.code, event::KeyCode::Char('c' | 'C'))
                            {
                                return Ok(());
                            }
                            let pressed_at = Instant::now();
                            let action = self.dispatch_key(&key, pressed_at);
                            self.needs_redraw = true;
                            self.drain_cues();
                            if self.handle_action(action, pressed_at) {
                                return Ok(());
                            }
                        }
                        Event::Resize(cols, rows) => {
                            frame.resize(cols, rows);
                            self.needs_redraw = true;
                        }
                        _ => {}
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        match (self.current_screen, self.gameplay_state.as_ref()) {
            (Screen::Gameplay, Some(state)) => gameplay::next_deadline(state)
                .saturating_duration_since(now)
                .min(GAMEPLAY_POLL),
            _ => IDLE_POLL,
        }
    }

    fn dispatch_key(&mut self, key: &KeyEvent, now: Instant) -> ScreenAction {
        match self.current_screen {
            Screen::Menu => menu::handle_key_press(&mut self.menu_state, key),
            Screen::Gameplay => match self.gameplay_state.as_mut() {
                Some(state) => gameplay::handle_key_press(state, key, now),
                None => ScreenAction::None,
            },
            Screen::Evaluation => match self.evaluation_state.as_mut() {
                Some(state) => evaluation::handle_key_press(state, key),
                None => ScreenAction::None,
            },
        }
    }

    /// Applies a screen action; returns true when the app should exit.
    fn handle_action(&mut self, action: ScreenAction, now: Instant) -> bool {
        match action {
            ScreenAction::None => {}
            ScreenAction::StartGame(player_count) => {
                info!("Navigating to gameplay with {player_count} player(s)");
                // Replacing the state drops the previous session and its
                // light cycle; a stale cycle cannot fire after a restart.
                self.gameplay_state = Some(gameplay::init(player_count, now));
                self.evaluation_state = None;
                self.current_screen = Screen::Gameplay;
                self.needs_redraw = true;
            }
            ScreenAction::Navigate(Screen::Evaluation) => {
                match self.gameplay_state.take() {
                    Some(state) => {
                        self.evaluation_state = Some(evaluation::init(gameplay::session(&state)));
                        self.current_screen = Screen::Evaluation;
                    }
                    None => {
                        warn!("Evaluation requested without a finished game");
                        self.current_screen = Screen::Menu;
                    }
                }
                self.needs_redraw = true;
            }
            ScreenAction::Navigate(screen) => {
                info!("Navigating to {screen:?}");
                self.gameplay_state = None;
                self.evaluation_state = None;
                self.current_screen = screen;
                self.needs_redraw = true;
            }
            ScreenAction::Exit => return true,
        }
        false
    }

    fn drain_cues(&mut self) {
        let mut cues = menu::take_cues(&mut self.menu_state);
        if let Some(state) = self.gameplay_state.as_mut() {
            cues.extend(gameplay::take_cues(state));
        }
        if let Some(state) = self.evaluation_state.as_mut() {
            cues.extend(evaluation::take_cues(state));
        }
        if let Some(audio) = self.audio.as_mut() {
            for cue in cues {
                audio.play(cue);
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match self.current_screen {
            Screen::Menu => menu::draw(&self.menu_state, frame),
            Screen::Gameplay => {
                if let Some(state) = self.gameplay_state.as_ref() {
                    gameplay::draw(state, frame);
                }
            }
            Screen::Evaluation => {
                if let Some(state) = self.evaluation_state.as_ref() {
                    evaluation::draw(state, frame);
                }
            }
        }
    }
}
