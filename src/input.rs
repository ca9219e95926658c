//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] changes.  Anything that needs the
//! poll worker or an external program comes back as an [`Action`] for the
//! main loop to carry out.
//!
//! | Key | Action |
//! |---|---|
//! | `c` | check now |
//! | `Enter` / `o` | open the selected item |
//! | `t` | test notification |
//! | `e` | open config |
//! | `r` | reload config |
//! | `x` | clear seen data (asks first) |
//! | `a` | about |
//! | `q` / `Esc` | quit |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, Modal};

/// Side effects requested by a keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CheckNow,
    OpenLink(String),
    TestNotification,
    OpenConfig,
    ReloadConfig,
    ClearSeenData,
}

/// Process a single key event.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.  While a modal is open it
/// receives every key.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match app.modal {
        Some(Modal::ConfirmClear { .. }) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    app.close_modal();
                    Some(Action::ClearSeenData)
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    app.close_modal();
                    None
                }
                _ => None,
            };
        }
        Some(Modal::Alert { .. }) => {
            app.close_modal();
            return None;
        }
        None => {}
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('x') => app.request_clear(),
        KeyCode::Char('a') => app.show_about(),
        KeyCode::Char('c') => return Some(Action::CheckNow),
        KeyCode::Char('t') => return Some(Action::TestNotification),
        KeyCode::Char('e') => return Some(Action::OpenConfig),
        KeyCode::Char('r') => return Some(Action::ReloadConfig),
        KeyCode::Enter | KeyCode::Char('o') => {
            return app.selected_item().map(|i| Action::OpenLink(i.link.clone()));
        }
        _ => {}
    }
    None
}
