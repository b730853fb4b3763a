//! Screen sequencing.
//!
//! Screens form a fixed chain `Welcome -> Greeting -> Rules -> Game[0..N] -> Stats`, held
//! in an immutable `NavigationTable`. Every state change goes through a `GameCommand`;
//! the commands are processed by a single system so exactly one screen is active at a time.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::countdown::RoundClock;
use crate::resolver::{Answer, RoundResolver, Submission};
use crate::state::{AnswerRecord, GameState};

pub struct NavigationPlugin;
impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<Screen>()
            .init_resource::<GameState>()
            .init_resource::<NavigationTable>()
            .init_resource::<ActiveRound>()
            .add_message::<GameCommand>()
            .add_systems(Update, GameCommand::process)
            ;
    }
}

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Greeting,
    Rules,
    Game(usize),
    Stats,
}

impl Screen {
    pub fn is_game(screen: Res<State<Screen>>) -> bool {
        matches!(screen.get(), Screen::Game(_))
    }

    /// Restart is offered everywhere past the greeting.
    pub fn can_restart(self) -> bool {
        !matches!(self, Screen::Welcome | Screen::Greeting)
    }
}

// ============================================================================
// Navigation table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLinks {
    pub screen: Screen,
    /// Target on normal completion. `None` only for the terminal screen.
    pub next: Option<Screen>,
    /// Target when the game is over. Set on game screens only.
    pub end: Option<Screen>,
}

#[derive(Resource, Debug, Clone)]
pub struct NavigationTable {
    links: Vec<ScreenLinks>,
}

impl FromWorld for NavigationTable {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource_or_init::<GameConfig>();
        NavigationTable::new(&config)
    }
}

impl NavigationTable {
    pub fn new(config: &GameConfig) -> Self {
        let mut screens = vec![Screen::Welcome, Screen::Greeting, Screen::Rules];
        screens.extend((0..config.games_count).map(Screen::Game));
        screens.push(Screen::Stats);

        let links = screens
            .iter()
            .enumerate()
            .map(|(i, &screen)| ScreenLinks {
                screen,
                next: screens.get(i + 1).copied(),
                end: matches!(screen, Screen::Game(_)).then_some(Screen::Stats),
            })
            .collect();
        Self { links }
    }

    pub fn start(&self) -> Screen {
        Screen::Welcome
    }

    pub fn screens(&self) -> impl Iterator<Item = Screen> + '_ {
        self.links.iter().map(|l| l.screen)
    }

    pub fn links(&self, screen: Screen) -> Option<&ScreenLinks> {
        self.links.iter().find(|l| l.screen == screen)
    }

    pub fn next(&self, screen: Screen) -> Option<Screen> {
        self.links(screen).and_then(|l| l.next)
    }

    pub fn end(&self, screen: Screen) -> Option<Screen> {
        self.links(screen).and_then(|l| l.end)
    }
}

/// Records a resolved round and picks the screen that follows it.
pub fn after_round(
    table: &NavigationTable,
    game: &mut GameState,
    current: Screen,
    record: AnswerRecord,
) -> Option<Screen> {
    game.add_answer(record);
    if !record.is_correct {
        game.minus_live();
    }
    if game.is_game_over() {
        table.end(current)
    } else {
        table.next(current)
    }
}

// ============================================================================
// Active round
// ============================================================================

/// Selections of the round on screen. Replaced on every game-screen entry.
#[derive(Resource, Default, Debug)]
pub struct ActiveRound {
    pub index: usize,
    pub resolver: RoundResolver,
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameCommand {
    /// Leave the welcome or greeting screen.
    Advance,
    /// Leave the rules screen with the entered name.
    Start { player_name: String },
    /// Player input on the game screen showing `round`.
    Answer { round: usize, answer: Answer },
    /// The countdown of `round` reached zero.
    TimeUp { round: usize },
    /// Restart confirmed by the player.
    Restart,
}

/// Everything a command may touch, borrowed for the duration of one batch.
pub struct Session<'a> {
    pub config: &'a GameConfig,
    pub table: &'a NavigationTable,
    pub game: &'a mut GameState,
    pub clock: &'a mut RoundClock,
    pub active_round: &'a mut ActiveRound,
}

impl Session<'_> {
    /// Applies one command on `current` and returns the screen to show next, if any.
    pub fn handle(&mut self, current: Screen, command: &GameCommand) -> Option<Screen> {
        let target = match (current, command) {
            (Screen::Welcome | Screen::Greeting, GameCommand::Advance) => self.table.next(current),
            (Screen::Rules, GameCommand::Start { player_name }) => {
                let name = player_name.trim();
                if name.is_empty() || !self.game.has_rounds() {
                    return None;
                }
                self.game.player_name = name.to_string();
                info!("Starting game for '{}'", self.game.player_name);
                self.table.next(current)
            }
            (Screen::Game(index), GameCommand::Answer { round, answer }) => {
                if *round != index || self.clock.countdown.remaining_ms() == 0 {
                    debug!("Dropping answer for round {} on {:?}", round, current);
                    return None;
                }
                let Some(round) = self.game.round(index) else {
                    error!("No round {} in this session", index);
                    return None;
                };
                match self.active_round.resolver.submit(round, *answer) {
                    Ok(Submission::Resolved { is_correct }) => {
                        self.clock.stop();
                        let record = AnswerRecord::new(is_correct, self.clock.countdown.elapsed_secs());
                        self.resolve(current, record)
                    }
                    Ok(Submission::Pending | Submission::Ignored) => None,
                    Err(e) => {
                        error!("Rejected answer on round {}: {}", index, e);
                        None
                    }
                }
            }
            (Screen::Game(index), GameCommand::TimeUp { round }) => {
                if *round != index
                    || self.clock.countdown.remaining_ms() != 0
                    || self.active_round.resolver.is_complete()
                {
                    debug!("Dropping timeout for round {} on {:?}", round, current);
                    return None;
                }
                self.active_round.resolver.expire();
                self.clock.stop();
                let record = AnswerRecord::new(false, self.config.time_to_answer_secs());
                self.resolve(current, record)
            }
            (screen, GameCommand::Restart) if screen.can_restart() => {
                self.game.reset();
                self.clock.stop();
                info!("Game restarted");
                Some(self.table.start())
            }
            _ => None,
        };

        if let Some(target) = target {
            self.enter(target);
        }
        target
    }

    fn resolve(&mut self, current: Screen, record: AnswerRecord) -> Option<Screen> {
        info!(
            "Round resolved: correct={} time={}s",
            record.is_correct, record.elapsed_secs
        );
        let target = after_round(self.table, self.game, current, record);
        if self.game.is_game_over() {
            info!("Game over after {} answers", self.game.answers().len());
        }
        target
    }

    /// Entry behaviour of the target screen.
    fn enter(&mut self, target: Screen) {
        match target {
            Screen::Game(index) => {
                self.clock.restart(self.config);
                let resolver = self
                    .game
                    .round(index)
                    .map(RoundResolver::new)
                    .unwrap_or_default();
                *self.active_round = ActiveRound { index, resolver };
            }
            _ => self.clock.stop(),
        }
    }
}

impl GameCommand {
    pub fn process(
        mut events: MessageReader<GameCommand>,
        config: Res<GameConfig>,
        table: Res<NavigationTable>,
        screen: Res<State<Screen>>,
        mut next_screen: ResMut<NextState<Screen>>,
        mut game: ResMut<GameState>,
        mut round_clock: ResMut<RoundClock>,
        mut active_round: ResMut<ActiveRound>,
    ) {
        let mut session = Session {
            config: &config,
            table: &table,
            game: &mut game,
            clock: &mut round_clock,
            active_round: &mut active_round,
        };
        let mut current = *screen.get();
        for command in events.read() {
            if let Some(target) = session.handle(current, command) {
                debug!("Screen {:?} -> {:?}", current, target);
                next_screen.set(target);
                current = target;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::{CountdownTimer, Tick};
    use crate::resolver::Answer;
    use crate::round::ImageKind::{self, Painting, Photo};
    use crate::round::{Round, fixtures};
    use bevy::ecs::message::Messages;
    use bevy::state::app::StatesPlugin;

    struct Harness {
        config: GameConfig,
        table: NavigationTable,
        game: GameState,
        clock: RoundClock,
        active_round: ActiveRound,
        screen: Screen,
        visited: Vec<Screen>,
    }

    impl Harness {
        fn new(rounds: Vec<Round>) -> Self {
            let config = GameConfig::default();
            let mut game = GameState::new(&config);
            game.set_rounds(rounds);
            Self {
                table: NavigationTable::new(&config),
                clock: RoundClock::idle(&config),
                game,
                config,
                active_round: ActiveRound::default(),
                screen: Screen::Welcome,
                visited: vec![Screen::Welcome],
            }
        }

        fn send(&mut self, command: GameCommand) {
            let mut session = Session {
                config: &self.config,
                table: &self.table,
                game: &mut self.game,
                clock: &mut self.clock,
                active_round: &mut self.active_round,
            };
            if let Some(target) = session.handle(self.screen, &command) {
                self.screen = target;
                self.visited.push(target);
            }
        }

        fn reach_first_round(&mut self) {
            self.send(GameCommand::Advance);
            self.send(GameCommand::Advance);
            self.send(GameCommand::Start { player_name: "Ann".into() });
        }

        fn round_on_screen(&self) -> usize {
            match self.screen {
                Screen::Game(index) => index,
                _ => 0,
            }
        }

        fn answer(&mut self, kind: ImageKind) {
            let round = self.round_on_screen();
            self.send(GameCommand::Answer { round, answer: Answer::Classify { option: 0, kind } });
        }

        fn answer_photo(&mut self) {
            self.answer(Photo);
        }

        fn expire_countdown(&mut self) {
            while let Tick::Running(_) = self.clock.countdown.tick() {}
        }
    }

    fn photo_rounds() -> Vec<Round> {
        vec![fixtures::one_of_two(Photo); 10]
    }

    #[test]
    fn table_chains_every_screen() {
        let table = NavigationTable::new(&GameConfig::default());
        let screens: Vec<Screen> = table.screens().collect();
        assert_eq!(screens.len(), 14);
        assert_eq!(table.next(Screen::Rules), Some(Screen::Game(0)));
        assert_eq!(table.next(Screen::Game(9)), Some(Screen::Stats));
        assert_eq!(table.next(Screen::Stats), None);
        assert_eq!(table.end(Screen::Game(4)), Some(Screen::Stats));
        assert_eq!(table.end(Screen::Rules), None);
        assert_eq!(table.start(), Screen::Welcome);
    }

    #[test]
    fn perfect_game_visits_every_screen() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        for _ in 0..10 {
            harness.answer_photo();
        }

        let mut expected = vec![Screen::Welcome, Screen::Greeting, Screen::Rules];
        expected.extend((0..10).map(Screen::Game));
        expected.push(Screen::Stats);
        assert_eq!(harness.visited, expected);
        assert_eq!(harness.game.answers().len(), 10);
        assert!(!harness.game.is_game_over());
        assert_eq!(harness.game.player_name, "Ann");
    }

    #[test]
    fn fourth_wrong_answer_ends_the_game() {
        let mut harness = Harness::new(vec![fixtures::one_of_two(Painting); 10]);
        harness.reach_first_round();
        for wrong in 1..=3 {
            harness.answer_photo();
            assert!(!harness.game.is_game_over());
            assert_eq!(harness.screen, Screen::Game(wrong));
        }
        harness.answer_photo();
        assert!(harness.game.is_game_over());
        assert_eq!(harness.screen, Screen::Stats);
        assert_eq!(harness.game.answers().len(), 4);

        // nothing resolves once the game is over
        harness.answer_photo();
        assert_eq!(harness.game.answers().len(), 4);
    }

    #[test]
    fn timeout_counts_as_wrong_answer_with_full_budget() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        for _ in 0..30 {
            if harness.clock.countdown.tick() == Tick::Expired {
                harness.send(GameCommand::TimeUp { round: 0 });
            }
        }
        assert_eq!(harness.screen, Screen::Game(1));
        assert_eq!(harness.game.answers(), &[AnswerRecord::new(false, 30)]);
        assert_eq!(harness.game.lives(), 2);

        // the following round starts fresh and resolves normally
        harness.answer_photo();
        assert_eq!(harness.screen, Screen::Game(2));
        assert_eq!(harness.game.answers().len(), 2);
    }

    #[test]
    fn duplicate_timeout_does_not_double_resolve() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        harness.expire_countdown();
        harness.send(GameCommand::TimeUp { round: 0 });
        harness.send(GameCommand::TimeUp { round: 0 });
        assert_eq!(harness.screen, Screen::Game(1));
        assert_eq!(harness.game.answers(), &[AnswerRecord::new(false, 30)]);
    }

    #[test]
    fn timeout_before_expiry_is_ignored() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        harness.send(GameCommand::TimeUp { round: 0 });
        assert_eq!(harness.screen, Screen::Game(0));
        assert!(harness.game.answers().is_empty());
    }

    #[test]
    fn answer_after_expiry_does_not_resolve_two_rounds() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        harness.expire_countdown();
        // the click lands after the countdown ran out but before the timeout is handled
        harness.answer_photo();
        harness.send(GameCommand::TimeUp { round: 0 });

        assert_eq!(harness.screen, Screen::Game(1));
        assert_eq!(harness.game.answers(), &[AnswerRecord::new(false, 30)]);
        assert_eq!(harness.game.lives(), 2);
        assert!(harness.clock.countdown.is_active());
    }

    #[test]
    fn commands_for_a_finished_round_are_dropped() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        harness.answer_photo();
        assert_eq!(harness.screen, Screen::Game(1));

        // same batch: a stale timeout and a stale click both still name round 0
        harness.clock.countdown = CountdownTimer::new(&harness.config);
        harness.expire_countdown();
        harness.send(GameCommand::TimeUp { round: 0 });
        harness.send(GameCommand::Answer {
            round: 0,
            answer: Answer::Classify { option: 0, kind: Photo },
        });
        assert_eq!(harness.screen, Screen::Game(1));
        assert_eq!(harness.game.answers(), &[AnswerRecord::new(true, 0)]);
        assert!(!harness.active_round.resolver.is_complete());
    }

    #[test]
    fn elapsed_time_is_frozen_at_answer() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        for _ in 0..12 {
            harness.clock.countdown.tick();
        }
        harness.answer_photo();
        assert_eq!(harness.game.answers(), &[AnswerRecord::new(true, 12)]);
        // the next round starts with a fresh timer
        assert!(harness.clock.countdown.is_active());
        assert_eq!(harness.clock.countdown.remaining_ms(), 30_000);
    }

    #[test]
    fn restart_mid_game_resets_everything() {
        let mut harness = Harness::new(photo_rounds());
        harness.reach_first_round();
        harness.answer(Painting);
        harness.answer_photo();
        harness.send(GameCommand::Restart);

        assert_eq!(harness.screen, Screen::Welcome);
        assert_eq!(harness.game.lives(), 3);
        assert!(harness.game.answers().is_empty());
        assert!(!harness.game.is_game_over());
        assert!(!harness.clock.countdown.is_active());
        // same round pool after restart
        assert_eq!(harness.game.rounds().len(), 10);
    }

    #[test]
    fn restart_is_not_offered_before_rules() {
        let mut harness = Harness::new(photo_rounds());
        harness.send(GameCommand::Restart);
        harness.send(GameCommand::Advance);
        harness.send(GameCommand::Restart);
        assert_eq!(harness.visited, vec![Screen::Welcome, Screen::Greeting]);
    }

    #[test]
    fn start_needs_a_name_and_rounds() {
        let mut harness = Harness::new(Vec::new());
        harness.send(GameCommand::Advance);
        harness.send(GameCommand::Advance);
        harness.send(GameCommand::Start { player_name: "Ann".into() });
        assert_eq!(harness.screen, Screen::Rules);

        let mut harness = Harness::new(photo_rounds());
        harness.send(GameCommand::Advance);
        harness.send(GameCommand::Advance);
        harness.send(GameCommand::Start { player_name: "   ".into() });
        assert_eq!(harness.screen, Screen::Rules);
    }

    #[test]
    fn commands_drive_bevy_state() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<GameConfig>()
            .init_resource::<RoundClock>()
            .add_plugins(NavigationPlugin);
        app.update();

        app.world_mut()
            .resource_mut::<Messages<GameCommand>>()
            .write(GameCommand::Advance);
        app.update();
        app.update();

        let screen = app.world().resource::<State<Screen>>();
        assert_eq!(*screen.get(), Screen::Greeting);
    }
}
