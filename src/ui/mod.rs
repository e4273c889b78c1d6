//! Terminal user interface for the console.
//!
//! Owns the terminal lifecycle and the event loop: crossterm input arrives
//! on one channel, scheduler ticks on another, and both drive the `App`
//! controller. Rendering itself lives in `views`.

pub mod format;
pub mod login;
pub mod themes;
pub mod views;

use crate::app::{App, Page, RefreshScheduler};
use crate::ui::login::{LoginAction, LoginForm};
use crate::ui::themes::Theme;
use crate::ui::views::ViewState;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Errors that can occur in the UI layer
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the interactive console until the operator quits
pub async fn run(mut app: App) -> Result<(), UiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), UiError> {
    let authenticated = Arc::new(AtomicBool::new(app.session.is_authenticated()));
    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    let mut scheduler = RefreshScheduler::new(tick_tx, authenticated.clone());
    scheduler.set_interval(app.config.config().refresh.interval());
    scheduler.start();

    let mut inputs = spawn_input_reader();
    let mut login = LoginForm::default();
    let mut view = ViewState::default();

    if app.session.is_authenticated() {
        app.refresh_dashboard().await;
    }

    loop {
        let theme = Theme::from_variant(app.session.theme());
        terminal.draw(|f| views::render(f, app, &view, &login, &theme))?;

        tokio::select! {
            Some(()) = ticks.recv() => {
                if app.session.is_authenticated() {
                    app.refresh_dashboard().await;
                }
            }
            event = inputs.recv() => {
                let Some(event) = event else { break };
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        handle_key(app, &mut view, &mut login, &mut scheduler, key).await;
                    }
                }
            }
        }

        authenticated.store(app.session.is_authenticated(), Ordering::Relaxed);

        if app.reset_requested {
            app.reinitialize();
            login = LoginForm::default();
            view = ViewState::default();
        }
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_key(
    app: &mut App,
    view: &mut ViewState,
    login: &mut LoginForm,
    scheduler: &mut RefreshScheduler,
    key: KeyEvent,
) {
    if !app.session.is_authenticated() {
        match login.handle_key(key) {
            LoginAction::Submit { username, password } => {
                app.login(&username, &password).await;
            }
            LoginAction::Cancel => app.should_quit = true,
            LoginAction::None => {}
        }
        return;
    }

    // An armed delete captures the next key: y confirms, anything cancels
    if let Some(target) = view.pending_delete.take() {
        if key.code == KeyCode::Char('y') {
            match app.page {
                Page::Customers => app.delete_customer(&target).await,
                Page::Collections => app.delete_collection(&target).await,
                _ => {}
            }
            view.selected = 0;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('r') => app.refresh_dashboard().await,
        KeyCode::Char('t') => app.toggle_theme().await,
        KeyCode::Char('o') => app.logout().await,
        KeyCode::Char('d') => arm_delete(app, view),
        KeyCode::Char(c @ '1'..='6') => {
            view.selected = 0;
            let index = (c as usize) - ('1' as usize);
            app.navigate(Page::ALL[index]).await;
        }
        KeyCode::Tab | KeyCode::Right => {
            view.selected = 0;
            app.navigate(app.page.next()).await;
        }
        KeyCode::BackTab | KeyCode::Left => {
            view.selected = 0;
            app.navigate(app.page.previous()).await;
        }
        KeyCode::Down => {
            let count = item_count(app);
            view.selected = (view.selected + 1).min(count.saturating_sub(1));
        }
        KeyCode::Up => view.selected = view.selected.saturating_sub(1),
        KeyCode::Char('+') if app.page == Page::Settings => {
            let seconds = app.config.config().refresh.interval_seconds + 5;
            let seconds = app.set_refresh_interval(seconds);
            scheduler.set_interval(Duration::from_secs(seconds));
        }
        KeyCode::Char('-') if app.page == Page::Settings => {
            let current = app.config.config().refresh.interval_seconds;
            let seconds = app.set_refresh_interval(current.saturating_sub(5));
            scheduler.set_interval(Duration::from_secs(seconds));
        }
        _ => {}
    }
}

fn item_count(app: &App) -> usize {
    match app.page {
        Page::Customers => app.data.customers.len(),
        Page::Collections => app.data.collections.len(),
        _ => 0,
    }
}

fn arm_delete(app: &App, view: &mut ViewState) {
    view.pending_delete = match app.page {
        Page::Customers => app
            .data
            .customers
            .get(view.selected)
            .map(|c| c.customer_id.clone()),
        Page::Collections => app
            .data
            .collections
            .get(view.selected)
            .map(|c| c.name.clone()),
        _ => None,
    };
}

/// Blocking crossterm reader on its own thread, bridged into the async loop
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
    rx
}
