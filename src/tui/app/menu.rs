use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Players,
    CardsPerPack,
    BotStyle,
    BotDelayMs,
}

const MENU_ITEMS: [MenuItem; 4] =
    [MenuItem::Players, MenuItem::CardsPerPack, MenuItem::BotStyle, MenuItem::BotDelayMs];

const MAX_CARDS_PER_PACK: usize = 20;

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Players => format!("Players: {}", app.cfg_num_players),
            MenuItem::CardsPerPack => format!("Cards per Pack: {}", app.cfg_cards_per_pack),
            MenuItem::BotStyle => format!("Bot Style: {}", app.cfg_bot_style.label()),
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", app.cfg_bot_delay_ms),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_num_players < AppState::MAX_PLAYERS {
                    app.cfg_num_players += 1;
                }
            }
            MenuItem::CardsPerPack => {
                if app.cfg_cards_per_pack < MAX_CARDS_PER_PACK {
                    app.cfg_cards_per_pack += 1;
                }
            }
            MenuItem::BotStyle => app.cfg_bot_style = app.cfg_bot_style.next(),
            MenuItem::BotDelayMs => {
                app.cfg_bot_delay_ms = app.cfg_bot_delay_ms.saturating_add(100);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_num_players > 2 {
                    app.cfg_num_players -= 1;
                }
            }
            MenuItem::CardsPerPack => {
                if app.cfg_cards_per_pack > 1 {
                    app.cfg_cards_per_pack -= 1;
                }
            }
            MenuItem::BotStyle => app.cfg_bot_style = app.cfg_bot_style.prev(),
            MenuItem::BotDelayMs => {
                app.cfg_bot_delay_ms = app.cfg_bot_delay_ms.saturating_sub(100);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.scene = match self.scene {
            Scene::Menu => Scene::Table,
            _ => {
                self.open_menu();
                Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.set_menu_error(None);
        self.menu_index = 0;
        self.cfg_num_players = self.draft.num_players();
        self.cfg_cards_per_pack = self.draft.config().cards_per_pack;
        self.cfg_bot_delay_ms = self.bot_delay_ms;
        self.cfg_bot_style = self.bot_style;
        self.scene = Scene::Menu;
    }

    /// Rebuild the table from the edited settings. Stays on the menu with an
    /// error when the pool cannot fill every pack.
    pub fn apply_menu(&mut self) {
        self.cfg_num_players = self.cfg_num_players.clamp(2, Self::MAX_PLAYERS);
        self.cfg_cards_per_pack = self.cfg_cards_per_pack.max(1);

        let n = self.cfg_num_players;
        let k = self.cfg_cards_per_pack;
        let draft = Self::build_draft(&self.cards, n, k, self.seed);
        let needed = draft.config().cards_needed(n);
        if needed > self.pool_size() {
            self.set_menu_error(Some(format!(
                "{n} players x {k} cards needs {needed} cards, pool has {}",
                self.pool_size()
            )));
            return;
        }

        self.bot_delay_ms = self.cfg_bot_delay_ms;
        self.bot_style = self.cfg_bot_style;
        self.draft = draft;
        self.agents = Self::build_agents(n, self.bot_style, self.bot_delay_ms, self.seed);
        self.focus = Self::HUMAN_SEAT;
        self.cursor = 0;
        self.draft_started = false;
        self.set_menu_error(None);
        self.scene = Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.set_menu_error(None);
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
