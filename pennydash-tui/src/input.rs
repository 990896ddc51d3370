//! Keyboard input dispatch: overlays, then global keys, then panel keys.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    if app.detail.is_open() {
        handle_detail_overlay(app, key);
        return;
    }
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(panel) = c.to_digit(10).and_then(|d| Panel::from_index(d as usize - 1)) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.refresh(Instant::now());
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Stocks => handle_stocks_key(app, key),
        Panel::Trends => handle_trends_key(app, key),
        Panel::Overview | Panel::Help => {}
    }
}

fn handle_detail_overlay(app: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
        app.close_detail();
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            let search = app.search_input.trim().to_string();
            app.set_search(search);
            app.search_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_stocks_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor_up(),
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => app.next_page(),
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => app.prev_page(),
        KeyCode::Enter => app.open_detail_at_cursor(),
        KeyCode::Char('/') => {
            app.search_input = app.filter.search.clone();
            app.overlay = Overlay::Search;
        }
        KeyCode::Char('s') => app.cycle_sector(),
        KeyCode::Char('o') => app.cycle_country(),
        KeyCode::Char('m') => app.cycle_market_cap(),
        KeyCode::Char('c') => app.clear_filters(),
        _ => {}
    }
}

fn handle_trends_key(app: &mut AppState, key: KeyEvent) {
    let count = app.trend_tickers().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.trend_cursor + 1 < count {
                app.trend_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.trend_cursor = app.trend_cursor.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::loaded_app;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = loaded_app(3);
        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.active_panel, Panel::Stocks);
        handle_key(&mut app, press(KeyCode::Char('4')));
        assert_eq!(app.active_panel, Panel::Help);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Overview);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = loaded_app(3);
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn welcome_swallows_first_key() {
        let mut app = loaded_app(3);
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn enter_opens_detail_and_esc_closes() {
        let mut app = loaded_app(20);
        app.active_panel = Panel::Stocks;
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.detail.selected().map(|r| r.reddit_ticker.as_str()), Some("T001"));

        // 'q' closes the modal instead of quitting.
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.detail.is_open());
        assert!(app.running);
    }

    #[test]
    fn page_keys_move_within_bounds() {
        let mut app = loaded_app(47);
        app.active_panel = Panel::Stocks;
        handle_key(&mut app, press(KeyCode::Char('p')));
        assert_eq!(app.page(), 1);
        for _ in 0..6 {
            handle_key(&mut app, press(KeyCode::Char('n')));
        }
        assert_eq!(app.page(), 4);
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.page(), 3);
    }

    #[test]
    fn search_overlay_applies_on_enter() {
        let mut app = loaded_app(47);
        app.active_panel = Panel::Stocks;
        handle_key(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.overlay, Overlay::Search);
        // Panel keys are captured as text while searching.
        type_str(&mut app, "t04");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.filter.search, "t04");
        assert_eq!(app.filtered_rows().len(), 7);
        assert_eq!(app.active_panel, Panel::Stocks);

        handle_key(&mut app, press(KeyCode::Char('c')));
        assert!(app.filter.is_empty());
    }

    #[test]
    fn search_escape_keeps_previous_filter() {
        let mut app = loaded_app(47);
        app.active_panel = Panel::Stocks;
        app.set_search("t01".into());
        handle_key(&mut app, press(KeyCode::Char('/')));
        handle_key(&mut app, press(KeyCode::Backspace));
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.filter.search, "t01");
    }

    #[test]
    fn filter_keys_cycle_country_and_market_cap() {
        let mut app = loaded_app(47);
        app.active_panel = Panel::Stocks;
        handle_key(&mut app, press(KeyCode::Char('o')));
        assert_eq!(app.filter.country.as_deref(), Some("Canada"));
        handle_key(&mut app, press(KeyCode::Char('m')));
        assert_eq!(app.filter.max_market_cap, Some(10e6));
        // Even rows T000..T008 are Canadian and under $10M.
        assert_eq!(app.filtered_rows().len(), 5);
        handle_key(&mut app, press(KeyCode::Char('c')));
        assert!(app.filter.is_empty());
    }

    #[test]
    fn error_overlay_scrolls_and_closes() {
        let mut app = loaded_app(3);
        for i in 0..3 {
            app.push_error(pennydash_core::api::ErrorKind::Parse, format!("e{i}"), String::new());
        }
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        for _ in 0..5 {
            handle_key(&mut app, press(KeyCode::Char('j')));
        }
        assert_eq!(app.error_scroll, 2);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn trends_cursor_is_bounded() {
        let mut app = loaded_app(3);
        app.active_panel = Panel::Trends;
        for _ in 0..5 {
            handle_key(&mut app, press(KeyCode::Char('j')));
        }
        assert_eq!(app.trend_cursor, 1);
        assert_eq!(app.selected_trend().as_deref(), Some("T001"));
    }
}
