//! Login overlay form state.

use crate::ui::themes::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

/// Which input currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Outcome of a key handled by the form
#[derive(Debug, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit { username: String, password: String },
    Cancel,
}

/// Two-field credential form shown while logged out
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
        }
    }
}

impl LoginForm {
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        match key.code {
            KeyCode::Esc => LoginAction::Cancel,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                LoginAction::None
            }
            KeyCode::Enter => {
                if self.focus == LoginField::Username {
                    self.focus = LoginField::Password;
                    LoginAction::None
                } else {
                    LoginAction::Submit {
                        username: self.username.clone(),
                        password: self.password.clone(),
                    }
                }
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
                LoginAction::None
            }
            KeyCode::Char(c) => {
                self.field_mut().push(c);
                LoginAction::None
            }
            _ => LoginAction::None,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn field_style(&self, field: LoginField, theme: &Theme) -> ratatui::style::Style {
        if self.focus == field {
            theme.styles.value
        } else {
            theme.styles.base
        }
    }

    /// Render the form body
    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled("Username: ".to_string(), theme.styles.label),
                Span::styled(
                    self.username.clone(),
                    self.field_style(LoginField::Username, theme),
                ),
                Span::raw(if self.focus == LoginField::Username {
                    "▏"
                } else {
                    ""
                }),
            ]),
            Line::from(vec![
                Span::styled("Password: ".to_string(), theme.styles.label),
                Span::styled(
                    "*".repeat(self.password.len()),
                    self.field_style(LoginField::Password, theme),
                ),
                Span::raw(if self.focus == LoginField::Password {
                    "▏"
                } else {
                    ""
                }),
            ]),
            Line::raw(""),
            Line::from(Span::styled(
                "Enter to sign in · Tab to switch · Esc to quit".to_string(),
                theme.styles.muted,
            )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut form = LoginForm::default();
        form.handle_key(key(KeyCode::Char('a')));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('p')));
        form.handle_key(key(KeyCode::Char('w')));
        form.handle_key(key(KeyCode::Backspace));

        assert_eq!(form.username, "a");
        assert_eq!(form.password, "p");
    }

    #[test]
    fn enter_on_username_moves_focus_then_submits() {
        let mut form = LoginForm::default();
        form.handle_key(key(KeyCode::Char('u')));
        assert_eq!(form.handle_key(key(KeyCode::Enter)), LoginAction::None);
        form.handle_key(key(KeyCode::Char('s')));

        let action = form.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            LoginAction::Submit {
                username: "u".to_string(),
                password: "s".to_string()
            }
        );
    }

    #[test]
    fn escape_cancels() {
        let mut form = LoginForm::default();
        assert_eq!(form.handle_key(key(KeyCode::Esc)), LoginAction::Cancel);
    }
}
