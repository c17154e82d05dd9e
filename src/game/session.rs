use super::events::{AttemptVerdict, GameEvent};
use super::player::{MAX_PLAYERS, Player};
use super::ring::{NUM_LIGHTS, Ring};
use log::{debug, info};
use rand::Rng;
use std::time::{Duration, Instant};

/// Cadence of the light cycle.
pub const LIGHT_STEP: Duration = Duration::from_millis(100);

// Window math is done in whole microseconds so the inclusive bounds are
// exact; float rounding at the edges would flip real hits into misses.
const LIGHT_STEP_US: u64 = 100_000;

// The 10-point light's window bottoms out here; anything narrower would be
// unhittable on real input hardware.
const MIN_WINDOW_US: u64 = 15_000;

/// Width of the scoring window for a light, in microseconds. Higher point
/// values get narrower windows; this is the whole difficulty curve.
pub fn hit_window_us(point_value: u32) -> u64 {
    (LIGHT_STEP_US / u64::from(point_value)).max(MIN_WINDOW_US)
}

// A press scores when it lands inside the window centered on the midpoint of
// the active light's step, bounds inclusive.
fn in_hit_window(elapsed: Duration, point_value: u32) -> bool {
    let center = LIGHT_STEP_US / 2;
    let elapsed_us = elapsed.as_micros().min(u128::from(u64::MAX)) as u64;
    elapsed_us.abs_diff(center).saturating_mul(2) <= hit_window_us(point_value)
}

/// One running (or just-finished) game: the players, the dealt ring, and the
/// position/instant of the currently active light. Owned by the gameplay
/// screen; the scheduler and the evaluator both work through it.
pub struct GameSession {
    players: Vec<Player>,
    ring: Ring,
    active: bool,
    current_light_index: usize,
    light_activated_at: Instant,
}

impl GameSession {
    /// Starts a fresh game: new players, a freshly dealt ring, the cycle
    /// parked on position zero as of `now`.
    pub fn start<R: Rng + ?Sized>(player_count: usize, now: Instant, rng: &mut R) -> Self {
        let player_count = player_count.clamp(1, MAX_PLAYERS);
        info!("Starting game with {player_count} player(s)");
        GameSession {
            players: (0..player_count).map(Player::new).collect(),
            ring: Ring::generate(rng),
            active: true,
            current_light_index: 0,
            light_activated_at: now,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn current_light_index(&self) -> usize {
        self.current_light_index
    }

    /// Advances the active light one position. Called only by the scheduler,
    /// with the instant the tick was due.
    pub(crate) fn advance_light(&mut self, at: Instant, events: &mut Vec<GameEvent>) {
        if !self.active {
            return;
        }
        self.current_light_index = (self.current_light_index + 1) % NUM_LIGHTS;
        self.light_activated_at = at;
        events.push(GameEvent::LightAdvanced {
            index: self.current_light_index,
        });
    }

    /// Evaluates one press for the given seat. Invalid calls — inactive game,
    /// unknown seat, exhausted player — are silent no-ops.
    pub fn attempt(&mut self, seat: usize, now: Instant, events: &mut Vec<GameEvent>) {
        if !self.active {
            return;
        }
        let Some(player) = self.players.get_mut(seat) else {
            return;
        };
        if player.attempts == 0 {
            return;
        }
        player.attempts -= 1;

        let light_index = self.current_light_index;
        let light = *self.ring.light(light_index);
        let verdict = if light.point_value == 0 {
            debug!("Player {} pressed on a dead light", player.id);
            AttemptVerdict::DeadLight
        } else {
            let elapsed = now.duration_since(self.light_activated_at);
            if in_hit_window(elapsed, light.point_value) {
                player.score += light.point_value;
                debug!(
                    "Player {} hit the {}-point light ({:.1}ms window)",
                    player.id,
                    light.point_value,
                    hit_window_us(light.point_value) as f32 / 1000.0
                );
                AttemptVerdict::Hit {
                    points: light.point_value,
                }
            } else {
                debug!(
                    "Player {} pressed the {}-point light outside its window",
                    player.id, light.point_value
                );
                AttemptVerdict::Mistimed
            }
        };
        events.push(GameEvent::AttemptJudged {
            seat,
            light_index,
            verdict,
        });

        if self.players.iter().all(|p| p.attempts == 0) {
            self.finish(events);
        }
    }

    /// Winning seat ids: every player holding the maximum score, provided
    /// that maximum is positive. An all-zero game has no winner.
    pub fn winners(&self) -> Vec<u8> {
        let max = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| p.score == max)
            .map(|p| p.id)
            .collect()
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.active = false;
        let winners = self.winners();
        info!("Game over; winning seats: {winners:?}");
        events.push(GameEvent::GameOver { winners });
    }

    #[cfg(test)]
    pub(crate) fn with_ring(player_count: usize, ring: Ring, now: Instant) -> Self {
        GameSession {
            players: (0..player_count).map(Player::new).collect(),
            ring,
            active: true,
            current_light_index: 0,
            light_activated_at: now,
        }
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, seat: usize) -> &mut Player {
        &mut self.players[seat]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::STARTING_ATTEMPTS;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session_with_values(player_count: usize, values: &[u32], now: Instant) -> GameSession {
        GameSession::with_ring(player_count, Ring::from_values(values), now)
    }

    #[test]
    fn window_widths_follow_the_difficulty_curve() {
        assert_eq!(hit_window_us(10), 15_000);
        assert_eq!(hit_window_us(5), 20_000);
        assert_eq!(hit_window_us(2), 50_000);
        assert_eq!(hit_window_us(1), 100_000);
        assert!(hit_window_us(10) < hit_window_us(5));
        assert!(hit_window_us(5) < hit_window_us(2));
        assert!(hit_window_us(2) < hit_window_us(1));
    }

    #[test]
    fn press_inside_the_window_scores() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[2; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        // Two-point light: 50ms window centered 50ms after activation.
        session.attempt(0, t0 + ms(30), &mut events);

        assert_eq!(session.players()[0].score, 2);
        assert_eq!(session.players()[0].attempts, STARTING_ATTEMPTS - 1);
        assert_eq!(
            events,
            vec![GameEvent::AttemptJudged {
                seat: 0,
                light_index: 0,
                verdict: AttemptVerdict::Hit { points: 2 },
            }]
        );
    }

    #[test]
    fn press_outside_the_window_still_costs_an_attempt() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[2; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        session.attempt(0, t0 + ms(80), &mut events);

        assert_eq!(session.players()[0].score, 0);
        assert_eq!(session.players()[0].attempts, STARTING_ATTEMPTS - 1);
        assert_eq!(
            events,
            vec![GameEvent::AttemptJudged {
                seat: 0,
                light_index: 0,
                verdict: AttemptVerdict::Mistimed,
            }]
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let t0 = Instant::now();
        // Two-point light: the window is exactly [25ms, 75ms] after activation.
        for (offset, expected) in [(24, 0), (25, 2), (50, 2), (75, 2), (76, 0)] {
            let mut session = session_with_values(1, &[2; NUM_LIGHTS], t0);
            let mut events = Vec::new();
            session.attempt(0, t0 + ms(offset), &mut events);
            assert_eq!(session.players()[0].score, expected, "press at +{offset}ms");
        }
    }

    #[test]
    fn ten_point_window_bottoms_out_at_the_floor() {
        let t0 = Instant::now();
        // 15ms floor: [42.5ms, 57.5ms] around the 50ms midpoint.
        for (offset, expected) in [(42, 0), (43, 10), (57, 10), (58, 0)] {
            let mut session = session_with_values(1, &[10; NUM_LIGHTS], t0);
            let mut events = Vec::new();
            session.attempt(0, t0 + ms(offset), &mut events);
            assert_eq!(session.players()[0].score, expected, "press at +{offset}ms");
        }
    }

    #[test]
    fn dead_light_scores_nothing_but_consumes_an_attempt() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[0; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        // Dead center of the step; timing cannot save a dead light.
        session.attempt(0, t0 + ms(50), &mut events);

        assert_eq!(session.players()[0].score, 0);
        assert_eq!(session.players()[0].attempts, STARTING_ATTEMPTS - 1);
        assert_eq!(
            events,
            vec![GameEvent::AttemptJudged {
                seat: 0,
                light_index: 0,
                verdict: AttemptVerdict::DeadLight,
            }]
        );
    }

    #[test]
    fn unknown_seat_and_inactive_game_are_no_ops() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[1; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        session.attempt(5, t0 + ms(50), &mut events);
        assert!(events.is_empty());
        assert_eq!(session.players()[0].attempts, STARTING_ATTEMPTS);

        // Exhaust the single player; the session goes inactive.
        for _ in 0..STARTING_ATTEMPTS {
            session.attempt(0, t0 + ms(1), &mut events);
        }
        assert!(!session.active());
        events.clear();

        session.attempt(0, t0 + ms(50), &mut events);
        assert!(events.is_empty());
        assert_eq!(session.players()[0].attempts, 0);
    }

    #[test]
    fn attempts_never_go_below_zero() {
        let t0 = Instant::now();
        let mut session = session_with_values(2, &[1; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        for _ in 0..(STARTING_ATTEMPTS + 5) {
            session.attempt(0, t0 + ms(1), &mut events);
        }
        assert_eq!(session.players()[0].attempts, 0);
        // Player 2 still has attempts, so the game keeps running.
        assert!(session.active());
    }

    #[test]
    fn game_ends_exactly_when_the_last_attempt_is_spent() {
        let t0 = Instant::now();
        let mut session = session_with_values(2, &[0; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        for _ in 0..STARTING_ATTEMPTS {
            session.attempt(0, t0 + ms(1), &mut events);
        }
        for _ in 0..(STARTING_ATTEMPTS - 1) {
            session.attempt(1, t0 + ms(1), &mut events);
        }
        assert!(session.active());
        assert!(
            !events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })),
            "game over must not fire while attempts remain"
        );

        session.attempt(1, t0 + ms(1), &mut events);
        assert!(!session.active());
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn scheduler_no_longer_mutates_a_finished_session() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[0; NUM_LIGHTS], t0);
        let mut events = Vec::new();
        for _ in 0..STARTING_ATTEMPTS {
            session.attempt(0, t0 + ms(1), &mut events);
        }
        assert!(!session.active());
        events.clear();

        session.advance_light(t0 + ms(200), &mut events);
        assert!(events.is_empty());
        assert_eq!(session.current_light_index(), 0);
    }

    #[test]
    fn light_advances_in_ring_order_and_wraps() {
        let t0 = Instant::now();
        let mut session = session_with_values(1, &[1; NUM_LIGHTS], t0);
        let mut events = Vec::new();

        for step in 1..=NUM_LIGHTS {
            session.advance_light(t0 + ms(step as u64 * 100), &mut events);
            assert_eq!(session.current_light_index(), step % NUM_LIGHTS);
        }
        assert_eq!(events.len(), NUM_LIGHTS);
    }

    #[test]
    fn all_zero_scores_mean_no_winner() {
        let t0 = Instant::now();
        let session = session_with_values(3, &[1; NUM_LIGHTS], t0);
        assert!(session.winners().is_empty());
    }

    #[test]
    fn joint_winners_share_the_positive_maximum() {
        let t0 = Instant::now();
        let mut session = session_with_values(3, &[1; NUM_LIGHTS], t0);
        session.player_mut(0).score = 5;
        session.player_mut(1).score = 5;
        session.player_mut(2).score = 3;
        assert_eq!(session.winners(), vec![1, 2]);
    }

    #[test]
    fn sole_winner_takes_the_maximum() {
        let t0 = Instant::now();
        let mut session = session_with_values(3, &[1; NUM_LIGHTS], t0);
        session.player_mut(0).score = 7;
        session.player_mut(1).score = 3;
        session.player_mut(2).score = 1;
        assert_eq!(session.winners(), vec![1]);
    }

    #[test]
    fn start_clamps_the_player_count_and_resets_everyone() {
        let t0 = Instant::now();
        let mut rng = rand::rng();
        let session = GameSession::start(9, t0, &mut rng);
        assert_eq!(session.players().len(), MAX_PLAYERS);
        for (seat, player) in session.players().iter().enumerate() {
            assert_eq!(player.id as usize, seat + 1);
            assert_eq!(player.score, 0);
            assert_eq!(player.attempts, STARTING_ATTEMPTS);
        }
        assert!(session.active());
        assert_eq!(session.current_light_index(), 0);
    }
}
