use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.load_catalog`(...) for the selected source
    LoadCatalog,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::SourceSelect => match key.code {
            Up | Char('k') => {
                if app.source_list_index > 0 {
                    app.source_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.source_list_index + 1 < app.sources.len() {
                    app.source_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                if app.select_current_source().is_some() {
                    action = Action::LoadCatalog;
                }
            }
            _ => {}
        },

        Screen::Planner => match key.code {
            Up | Char('k') => app.move_up(),
            Down | Char('j') => app.move_down(),
            Enter | Char(' ') => app.toggle_current_site(),
            Backspace => app.remove_last_stop(),
            Char('c') => app.clear_selection(),
            Char('f') => app.cycle_filter(),
            Char('r') => action = Action::LoadCatalog,
            Left | Esc => {
                app.screen = Screen::SourceSelect;
            }
            _ => {}
        },
    }
    action
}
