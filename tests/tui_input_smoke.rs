use booster_draft::cards::numbered_cards;
use booster_draft::draft::DraftStatus;
use booster_draft::tui::app::{AppState, InputAction, Scene};
use booster_draft::tui::controller::handle_key;
use crossterm::event::KeyCode;

fn setup_table_app() -> AppState {
    let mut app = AppState::new(numbered_cards(360), Some(3));
    app.cfg_bot_delay_ms = 0;
    app.apply_menu();
    app
}

#[test]
fn menu_navigation_and_apply() {
    let mut app = AppState::default();
    assert!(matches!(app.scene, Scene::Menu));
    let start = app.menu_index;
    let _ = app.handle_input(InputAction::MenuNext);
    assert_ne!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuPrev);
    assert_eq!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuApply);
    assert!(matches!(app.scene, Scene::Table));
}

#[test]
fn help_toggle() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    let _ = app.handle_input(InputAction::ToggleMenu);
    assert!(!app.help_open());
    assert!(matches!(app.scene, Scene::Menu));
}

#[test]
fn deal_then_human_pick() {
    let mut app = setup_table_app();
    assert!(!app.handle_input(InputAction::Pick), "nothing to pick before the deal");
    let _ = app.handle_input(InputAction::NewDraft);
    assert!(app.draft_started);
    assert_eq!(app.draft.status(), DraftStatus::Distributed);

    // First tick opens everyone's first pack.
    app.agents_on_turn();
    let pack = app.human_pack().unwrap().to_vec();
    assert_eq!(pack.len(), 15);

    let _ = app.handle_input(InputAction::CursorDown);
    let _ = app.handle_input(InputAction::CursorDown);
    assert_eq!(app.cursor, 2);
    assert!(app.handle_input(InputAction::Pick));
    assert!(!app.handle_input(InputAction::Pick), "one pick queued at a time");
    app.agents_on_turn();
    assert_eq!(app.draft.picks_at(AppState::HUMAN_SEAT).unwrap()[0].drafted, pack[2]);
    assert_eq!(app.action_error(), None);
}

#[test]
fn cursor_stays_inside_the_pack() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::NewDraft);
    app.agents_on_turn();
    for _ in 0..40 {
        let _ = app.handle_input(InputAction::CursorDown);
    }
    assert_eq!(app.cursor, 14);
    for _ in 0..40 {
        let _ = app.handle_input(InputAction::CursorUp);
    }
    assert_eq!(app.cursor, 0);
}

#[test]
fn focus_wraps_across_seats() {
    let mut app = setup_table_app();
    let n = app.draft.num_players();
    assert!(n >= 2);
    app.focus = n - 1;
    let _ = app.handle_input(InputAction::FocusNext);
    assert_eq!(app.focus, 0);
    let _ = app.handle_input(InputAction::FocusPrev);
    assert_eq!(app.focus, n - 1);
    let _ = app.handle_input(InputAction::FocusSeat(n + 2));
    assert_eq!(app.focus, 2);
}

#[test]
fn keys_drive_menu_and_quit() {
    let mut app = AppState::new(numbered_cards(400), None);
    assert!(!handle_key(&mut app, KeyCode::Down));
    assert!(!handle_key(&mut app, KeyCode::Char('+')));
    assert_eq!(app.cfg_cards_per_pack, 16);
    assert!(!handle_key(&mut app, KeyCode::Enter));
    assert!(matches!(app.scene, Scene::Table));
    assert_eq!(app.draft.config().cards_per_pack, 16);
    assert!(!handle_key(&mut app, KeyCode::Char('m')));
    assert!(handle_key(&mut app, KeyCode::Char('q')));
}
