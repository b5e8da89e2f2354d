use crate::agents::{AgentKind, AgentTable, BotAgent, BotProfile, HumanAgent, PickStyle};
use crate::cards::{numbered_cards, Card};
use crate::draft::{Draft, DraftConfig, DraftStatus, DEFAULT_CARDS_PER_PACK};
use crate::pool::Pool;
use crate::seating::{PlayerId, Seating};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    NewDraft,
    CursorUp,
    CursorDown,
    Pick,
    FocusNext,
    FocusPrev,
    FocusSeat(usize),
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub draft: Draft,
    pub agents: AgentTable,
    // Seat whose picks are shown; the human always drafts from seat 0
    pub focus: usize,
    // Highlighted card in the human's on-deck pack
    pub cursor: usize,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_num_players: usize,
    pub cfg_cards_per_pack: usize,
    pub cfg_bot_style: PickStyle,
    pub cfg_bot_delay_ms: u64,
    pub bot_style: PickStyle,
    pub bot_delay_ms: u64,
    pub draft_started: bool,
    pub(crate) cards: Vec<Card>,
    pub(crate) seed: Option<u64>,
    help_open: bool,
    menu_error: Option<String>,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(numbered_cards(3 * 8 * DEFAULT_CARDS_PER_PACK), None)
    }
}

impl AppState {
    pub const HUMAN_SEAT: usize = 0;
    pub const MAX_PLAYERS: usize = 12;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    /// A fresh app drafting from `cards`, seeded when `seed` is set.
    pub fn new(cards: Vec<Card>, seed: Option<u64>) -> Self {
        let num_players = 8;
        let default_delay = 300;
        let style = PickStyle::Random;
        let draft = Self::build_draft(&cards, num_players, DEFAULT_CARDS_PER_PACK, seed);
        let agents = Self::build_agents(num_players, style, default_delay, seed);
        Self {
            scene: Scene::Menu,
            draft,
            agents,
            focus: Self::HUMAN_SEAT,
            cursor: 0,
            menu_index: 0,
            cfg_num_players: num_players,
            cfg_cards_per_pack: DEFAULT_CARDS_PER_PACK,
            cfg_bot_style: style,
            cfg_bot_delay_ms: default_delay,
            bot_style: style,
            bot_delay_ms: default_delay,
            draft_started: false,
            cards,
            seed,
            help_open: false,
            menu_error: None,
            action_error: None,
            action_error_at: None,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.cards.len()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn menu_error(&self) -> Option<&str> {
        self.menu_error.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn set_menu_error(&mut self, msg: Option<String>) {
        self.menu_error = msg;
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    fn set_action_error(&mut self, msg: String) {
        self.action_error = Some(msg);
        self.action_error_at = Some(Instant::now());
    }

    pub fn player_label(&self, seat: usize) -> String {
        let name = self.draft.player_order().get(seat).map(PlayerId::as_str).unwrap_or("?");
        match self.agents.agent_kind(seat) {
            Some(AgentKind::Bot) => format!("{name} [{}]", self.bot_style.label()),
            _ => name.to_string(),
        }
    }

    /// Cards in the human's on-deck pack, if one is waiting.
    pub fn human_pack(&self) -> Option<&[Card]> {
        self.draft.queue_at(Self::HUMAN_SEAT).and_then(|q| q.on_deck()).map(|p| p.as_slice())
    }

    fn can_pick(&self) -> bool {
        self.scene == Scene::Table
            && self.draft_started
            && self.human_pack().is_some_and(|cards| !cards.is_empty())
    }

    fn queue_pick(&mut self) -> bool {
        if !self.can_pick() {
            return false;
        }
        let Some(card) = self.human_pack().and_then(|cards| cards.get(self.cursor)).cloned() else {
            return false;
        };
        self.clear_action_error();
        self.agents.receive(Self::HUMAN_SEAT, card)
    }

    fn clamp_cursor(&mut self) {
        let len = self.human_pack().map(<[Card]>::len).unwrap_or(0);
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::NewDraft => {
                if self.scene == Scene::Table {
                    self.new_draft();
                }
                false
            }
            InputAction::CursorUp => {
                if self.scene == Scene::Table {
                    self.cursor = self.cursor.saturating_sub(1);
                }
                false
            }
            InputAction::CursorDown => {
                if self.scene == Scene::Table {
                    self.cursor += 1;
                    self.clamp_cursor();
                }
                false
            }
            InputAction::Pick => self.queue_pick(),
            InputAction::FocusNext => {
                if self.scene == Scene::Table {
                    self.focus_next();
                }
                false
            }
            InputAction::FocusPrev => {
                if self.scene == Scene::Table {
                    self.focus_prev();
                }
                false
            }
            InputAction::FocusSeat(idx) => {
                if self.scene == Scene::Table {
                    self.set_focus(idx);
                }
                false
            }
        }
    }

    /// Deal a new draft, unless one is still running.
    pub fn new_draft(&mut self) {
        if self.draft_started && !self.draft.is_complete() {
            return;
        }
        if self.draft.is_distributed() {
            self.draft.reset();
        }
        match self.draft.distribute() {
            Ok(()) => {
                self.draft_started = true;
                self.cursor = 0;
                self.clear_action_error();
            }
            Err(err) => self.set_action_error(err.to_string()),
        }
    }

    pub fn focus_next(&mut self) {
        let n = self.draft.num_players();
        if n == 0 {
            return;
        }
        self.focus = (self.focus + 1) % n;
    }

    pub fn focus_prev(&mut self) {
        let n = self.draft.num_players();
        if n == 0 {
            return;
        }
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn set_focus(&mut self, idx: usize) {
        let n = self.draft.num_players();
        if n == 0 {
            return;
        }
        self.focus = idx % n;
    }

    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table || !self.draft_started {
            return;
        }
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        self.agents.ensure_len(self.draft.num_players());
        match self.agents.on_turn(&mut self.draft) {
            Ok(true) => {
                self.clear_action_error();
                self.clamp_cursor();
            }
            Ok(false) => {}
            Err(err) => self.set_action_error(err.to_string()),
        }
    }

    pub fn status_line(&self) -> String {
        match self.draft.status() {
            DraftStatus::Unstarted => "Press [Space] to deal".to_string(),
            DraftStatus::Distributed => "Packs dealt".to_string(),
            DraftStatus::Drafting => match self.draft.round() {
                Some(r) => format!(
                    "Pack {} of 3, passing {}",
                    r + 1,
                    crate::seating::Direction::for_round(r).label()
                ),
                None => "Opening packs".to_string(),
            },
            DraftStatus::Complete => "Draft complete. [Space] deals again".to_string(),
        }
    }

    pub(crate) fn build_draft(
        cards: &[Card],
        num_players: usize,
        cards_per_pack: usize,
        seed: Option<u64>,
    ) -> Draft {
        let players = (0..num_players).map(|i| {
            if i == Self::HUMAN_SEAT {
                PlayerId::from("@you")
            } else {
                PlayerId::new(format!("@bot{i}"))
            }
        });
        // Generated handles are unique, so this never falls back to an empty table.
        let seating = Seating::try_new(players).unwrap_or_default();
        let mut config = DraftConfig::default().with_cards_per_pack(cards_per_pack);
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        Draft::with_config(seating, Pool::new(cards.iter().cloned()), config)
    }

    pub(crate) fn build_agents(
        num_players: usize,
        style: PickStyle,
        delay_ms: u64,
        seed: Option<u64>,
    ) -> AgentTable {
        let mut agents = AgentTable::for_seats(num_players);
        agents.set_min_action_delay_ms(delay_ms.min(150));
        agents.set_agent(Self::HUMAN_SEAT, Some(Box::new(HumanAgent::new())));
        for seat in 1..num_players {
            let mut profile = BotProfile::for_style(style).with_delay_ms(delay_ms / 2, delay_ms);
            if let Some(seed) = seed {
                profile = profile.with_seed(seed.wrapping_add(seat as u64));
            }
            agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
        }
        agents
    }
}
