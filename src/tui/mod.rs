pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::api::{create_client, ApiClient, AuthError};
use crate::fetch::CompanyReport;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

fn spawn_fetch(
    client: &ApiClient,
    app: &App,
) -> tokio::task::JoinHandle<Result<anyhow::Result<Vec<CompanyReport>>, tokio::time::error::Elapsed>>
{
    let client = client.clone();
    let config = app.config.clone();
    let verbose = app.verbose;
    tokio::spawn(async move {
        tokio::time::timeout(
            FETCH_TIMEOUT,
            async move { crate::fetch::fetch_and_score(&client, &config, verbose).await },
        )
        .await
    })
}

pub async fn run_tui(mut app: App, mut client: ApiClient) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    // Create event handler with tick rate and auto-refresh interval
    let mut events = EventHandler::new(250, app.auto_refresh_interval()); // 250ms tick

    // Spawn initial fetch as background task
    let mut pending_fetch = Some(spawn_fetch(&client, &app));
    app.is_loading = true;

    // Main loop
    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Handle events
        match events.next().await {
            Event::Key(key) => {
                app.last_interaction = std::time::Instant::now();
                handle_key_event(&mut app, key);
            }
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::Refresh => {
                app.needs_refresh = true;
            }
        }

        // Check if background fetch has completed
        if let Some(handle) = &mut pending_fetch {
            if handle.is_finished() {
                let handle = pending_fetch.take().unwrap();
                match handle.await {
                    Ok(Ok(Ok(reports))) => {
                        app.update_reports(reports);
                    }
                    Ok(Ok(Err(e))) => {
                        if e.downcast_ref::<AuthError>().is_some() {
                            // Auth failure: restore terminal, re-prompt, re-init
                            ratatui::restore();

                            match crate::credentials::reprompt_for_token() {
                                Ok(new_token) => {
                                    match create_client(&app.config.api.base_url, Some(&new_token))
                                    {
                                        Ok(new_client) => {
                                            client = new_client;
                                            terminal = ratatui::init();
                                            app.needs_refresh = true;
                                            app.show_flash(
                                                "Re-authenticated. Refreshing...".to_string(),
                                            );
                                        }
                                        Err(ce) => {
                                            // Re-init terminal even on failure (must restore TUI)
                                            terminal = ratatui::init();
                                            app.show_flash(format!("Re-auth failed: {}", ce));
                                        }
                                    }
                                }
                                Err(pe) => {
                                    // User cancelled or error during prompt
                                    terminal = ratatui::init();
                                    app.show_flash(format!("Re-auth cancelled: {}", pe));
                                }
                            }
                        } else {
                            app.show_flash(format!("Refresh failed: {}", e));
                        }
                    }
                    Ok(Err(_elapsed)) => {
                        app.show_flash(
                            "Refresh timed out (20s). Will retry on next refresh.".to_string(),
                        );
                    }
                    Err(e) => {
                        app.show_flash(format!("Refresh task panicked: {}", e));
                    }
                }
                app.is_loading = false;
            }
        }

        // Spawn new refresh if needed and no fetch is pending
        if app.needs_refresh && pending_fetch.is_none() {
            let is_manual = app.force_refresh;
            let modal_open = app.input_mode != app::InputMode::Normal;
            let recent_interaction = app.last_interaction.elapsed() < Duration::from_secs(10);

            // Suppress auto-refresh while a modal is open or the user is
            // actively navigating; needs_refresh stays set so it retries on
            // the next tick. Manual refresh ('r' key) always proceeds.
            if is_manual || (!modal_open && !recent_interaction) {
                app.needs_refresh = false;
                app.force_refresh = false;
                pending_fetch = Some(spawn_fetch(&client, &app));
                app.is_loading = true;
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Open company in the web dashboard
                KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),

                // Export current reports
                KeyCode::Char('e') => app.export_reports(),

                // Tab switching
                KeyCode::Tab => app.toggle_view(),

                // Manual refresh
                KeyCode::Char('r') => {
                    app.needs_refresh = true;
                    app.force_refresh = true;
                    app.show_flash("Refreshing...".to_string());
                }

                // Help
                KeyCode::Char('?') => app.show_help(),

                // Score & risk breakdown
                KeyCode::Char('b') => app.show_breakdown(),

                _ => {}
            }
        }
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
